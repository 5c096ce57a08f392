//! Node kind enumeration.
//!
//! A node's kind is derived from its declared port arity and is checked by
//! pattern matching (`Node::is_a`), never by comparing class-name strings.

use serde::{Deserialize, Serialize};

/// Structural role of a node in a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// No inputs, at least one output.
    Source,
    /// Inputs and outputs.
    Filter,
    /// Inputs but no outputs.
    Sink,
}

impl NodeKind {
    /// Classify a node from its port counts.
    pub fn from_arity(inputs: usize, outputs: usize) -> Self {
        match (inputs, outputs) {
            (0, _) => NodeKind::Source,
            (_, 0) => NodeKind::Sink,
            _ => NodeKind::Filter,
        }
    }

    /// Get the display name for this node kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Source => "Source",
            NodeKind::Filter => "Filter",
            NodeKind::Sink => "Sink",
        }
    }

    /// Get all node kinds.
    pub fn all() -> &'static [NodeKind] {
        &[NodeKind::Source, NodeKind::Filter, NodeKind::Sink]
    }

    pub fn is_source(&self) -> bool {
        matches!(self, NodeKind::Source)
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, NodeKind::Sink)
    }

    /// Whether nodes of this kind expose output ports.
    pub fn has_outputs(&self) -> bool {
        !self.is_sink()
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
