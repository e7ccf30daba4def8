//! Shared utilities for stepstake.

pub mod logging;

pub use logging::{init_test_tracing, init_tracing, LogFormat};
