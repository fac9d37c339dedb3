// Shared by several test binaries; not every helper is used by each one
#![allow(dead_code, unused_imports)]

pub mod app;
pub mod factory;

pub use app::{test_config, StubScorer, TestApp};
pub use factory::{prediction_body, Factory, TestAuth, TEST_PASSWORD};
