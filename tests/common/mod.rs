//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod algorithms;
pub mod builders;

use datavis_pipeline::{DataObject, Node};

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Pull output 0 of `node` and return it as a scalar
pub fn scalar_output(node: &Node) -> Option<f64> {
    node.output_data(0)
        .expect("update failed")
        .and_then(|value| value.as_scalar())
}

/// Output 0 of `node` as currently cached, without updating
pub fn cached_scalar(node: &Node) -> Option<f64> {
    node.cached_output(0).and_then(|value| value.as_scalar())
}

/// Execution counts of `nodes`, in order
pub fn execution_counts(nodes: &[Node]) -> Vec<u64> {
    nodes.iter().map(Node::execution_count).collect()
}

pub fn scalar(value: f64) -> DataObject {
    DataObject::Scalar(value)
}
