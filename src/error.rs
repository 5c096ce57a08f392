//! Error handling for the pipeline engine
//!
//! This module defines the error type shared by the engine, the built-in
//! nodes and the configuration layer, plus a Result alias.

use crate::pipeline::id::NodeId;
use thiserror::Error;

/// Errors that can occur within the pipeline system.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input port index beyond the node's declared input count.
    #[error("Node {node} has {count} input ports, port {port} is out of range")]
    PortOutOfRange {
        node: NodeId,
        port: usize,
        count: usize,
    },

    /// An output port index beyond the node's declared output count.
    #[error("Node {node} has {count} output ports, output {port} is out of range")]
    OutputOutOfRange {
        node: NodeId,
        port: usize,
        count: usize,
    },

    /// A slot position that does not exist on a port.
    #[error("Node {node} input {port} has no slot {slot}")]
    SlotOutOfRange {
        node: NodeId,
        port: usize,
        slot: usize,
    },

    /// Producer and consumer ports carry incompatible data kinds.
    #[error("Port mismatch: {0}")]
    PortMismatch(String),

    /// Appending a second value to a single-value input port.
    #[error("Node {node} input {port} accepts a single value")]
    CardinalityMismatch { node: NodeId, port: usize },

    /// Wiring nodes that were created with different executives.
    #[error("Node {node} belongs to a different executive")]
    ForeignNode { node: NodeId },

    /// The upstream graph of a node loops back onto itself.
    #[error("Cycle detected in pipeline graph at node {node}")]
    CycleDetected { node: NodeId },

    /// Traversal exceeded the configured depth bound.
    #[error("Pipeline depth {depth} exceeded at node {node}")]
    MaxDepthExceeded { node: NodeId, depth: usize },

    /// A compute callback reported a failure.
    #[error("Node {node} error: {message}")]
    Compute { node: NodeId, message: String },

    /// Errors related to Rhai expression compilation or evaluation
    #[error("Script error: {0}")]
    Script(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this is a graph configuration problem rather than a compute failure.
    ///
    /// Configuration errors degrade a node to "produces nothing"; everything
    /// else is propagated to the caller of `update()`.
    pub fn is_configuration(&self) -> bool {
        match self {
            PipelineError::PortOutOfRange { .. }
            | PipelineError::OutputOutOfRange { .. }
            | PipelineError::SlotOutOfRange { .. }
            | PipelineError::PortMismatch(_)
            | PipelineError::CardinalityMismatch { .. }
            | PipelineError::ForeignNode { .. }
            | PipelineError::CycleDetected { .. }
            | PipelineError::MaxDepthExceeded { .. } => true,
            PipelineError::WithContext { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::CardinalityMismatch {
            node: NodeId(3),
            port: 0,
        };
        assert_eq!(err.to_string(), "Node NodeId(3) input 0 accepts a single value");
    }

    #[test]
    fn test_error_with_context() {
        let err = PipelineError::Script("bad token".to_string());
        let with_ctx = err.with_context("Failed to compile");
        assert!(with_ctx.to_string().contains("Failed to compile"));
        assert!(with_ctx.to_string().contains("bad token"));
    }

    #[test]
    fn test_configuration_classification() {
        assert!(PipelineError::CycleDetected { node: NodeId(1) }.is_configuration());
        assert!(PipelineError::PortOutOfRange {
            node: NodeId(1),
            port: 4,
            count: 1
        }
        .is_configuration());
        assert!(!PipelineError::Compute {
            node: NodeId(1),
            message: "boom".into()
        }
        .is_configuration());
        assert!(PipelineError::CycleDetected { node: NodeId(2) }
            .with_context("update")
            .is_configuration());
    }
}
