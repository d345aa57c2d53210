//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use dataflow_rs::Value;

/// Install a tracing subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Integer payload of `values`, skipping anything that is not an integer.
pub fn ints(values: &[Value]) -> Vec<i64> {
    values.iter().filter_map(Value::as_int).collect()
}
