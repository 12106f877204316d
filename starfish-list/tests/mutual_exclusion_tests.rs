//! Runs mixed workloads with the `instrumentation` feature and checks the
//! gate's own record of who was inside at the same time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use rand::Rng;
use serial_test::serial;
use starfish_list::{GatedList, Node, Order};

fn run_mixed_workload(list: &Arc<GatedList>, readers: usize, writers: usize, duration: Duration) {
    let stop = Arc::new(AtomicBool::new(false));
    let start = Arc::new(Barrier::new(readers + writers + 1));
    let mut handles = Vec::with_capacity(readers + writers);

    for _ in 0..writers {
        let list = Arc::clone(list);
        let stop = Arc::clone(&stop);
        let start = Arc::clone(&start);
        handles.push(thread::spawn(move || {
            let mut rng = rand::rng();
            start.wait();
            while !stop.load(Ordering::Relaxed) {
                let value = rng.random_range(0..200);
                match rng.random_range(0..10) {
                    0..=5 => list.insert(Node::new(value)),
                    6..=8 => {
                        list.delete(value);
                    }
                    _ => list.sort(Order::Ascending).unwrap(),
                }
            }
        }));
    }

    for _ in 0..readers {
        let list = Arc::clone(list);
        let stop = Arc::clone(&stop);
        let start = Arc::clone(&start);
        handles.push(thread::spawn(move || {
            let mut rng = rand::rng();
            start.wait();
            while !stop.load(Ordering::Relaxed) {
                match rng.random_range(0..3) {
                    0 => {
                        let _ = list.at(rng.random_range(0..64));
                    }
                    1 => {
                        list.contains(rng.random_range(0..200));
                    }
                    _ => {
                        let length = list.iter().len();
                        assert!(length <= 1_000_000);
                    }
                }
            }
        }));
    }

    start.wait();
    thread::sleep(duration);
    stop.store(true, Ordering::Relaxed);

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
#[serial(mutual_exclusion)]
fn test_no_overlap_under_mixed_load() {
    let list = Arc::new(GatedList::from_values(Order::Unordered, 0..100).unwrap());

    run_mixed_workload(&list, 8, 4, Duration::from_millis(400));

    let snapshot = list.monitor();
    assert_eq!(snapshot.overlaps, 0, "readers and writers overlapped: {snapshot:?}");
    assert!(snapshot.read_entries > 0);
    assert!(snapshot.write_entries > 0);
    assert_eq!(snapshot.active_readers, 0);
    assert_eq!(snapshot.active_writers, 0);
}

#[test]
#[serial(mutual_exclusion)]
fn test_no_overlap_with_writers_only() {
    let list = Arc::new(GatedList::with_order(Order::Ascending));

    run_mixed_workload(&list, 0, 8, Duration::from_millis(200));

    let snapshot = list.monitor();
    assert_eq!(snapshot.overlaps, 0);
    assert_eq!(snapshot.read_entries, 0);
    assert!(snapshot.write_entries > 0);
}

#[test]
#[serial(mutual_exclusion)]
fn test_readers_share_the_section() {
    let list = Arc::new(GatedList::from_values(Order::Descending, 0..10).unwrap());
    let num_readers = 6;
    let all_inside = Arc::new(Barrier::new(num_readers));

    let handles: Vec<_> = (0..num_readers)
        .map(|index| {
            let list = Arc::clone(&list);
            let all_inside = Arc::clone(&all_inside);
            thread::spawn(move || {
                let node = list.at(index).unwrap();
                all_inside.wait();
                assert_eq!(node.data(), 9 - index as i32);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = list.monitor();
    assert_eq!(snapshot.peak_readers, num_readers);
    assert_eq!(snapshot.overlaps, 0);
}

#[test]
#[serial(mutual_exclusion)]
fn test_reorders_never_overlap_readers() {
    let list = Arc::new(GatedList::from_values(Order::Unordered, (0..500).rev()).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let reorderer = {
        let list = Arc::clone(&list);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let cycle = [Order::Ascending, Order::Descending, Order::Unordered];
            for order in cycle.iter().cycle() {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                list.change_order(*order).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let list = Arc::clone(&list);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    assert_eq!(list.iter().count(), 500);
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(300));
    stop.store(true, Ordering::Relaxed);

    reorderer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    let snapshot = list.monitor();
    assert_eq!(snapshot.overlaps, 0);
    assert!(snapshot.write_entries > 0);
}
