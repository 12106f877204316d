//! Reusable test scenarios, driven from the integration tests.
