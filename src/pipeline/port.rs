//! Port descriptors for the node system.
//!
//! Each algorithm declares its ports (inputs/outputs) via static `PortDescriptor`
//! arrays. Nodes copy them at construction and use them to validate wiring.

use serde::Serialize;

/// The kind of data a port carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataKind {
    /// Accepts or produces any data object.
    Any,
    Bool,
    Scalar,
    Array,
    Text,
    Record,
}

impl DataKind {
    /// Whether data produced as `produced` may flow into a port of this kind.
    pub fn accepts(self, produced: DataKind) -> bool {
        self == DataKind::Any || produced == DataKind::Any || self == produced
    }
}

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PortDirection {
    Input,
    Output,
}

/// How many upstream values an input port holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    /// At most one connection or value.
    Single,
    /// An ordered list of connections/values (append-style nodes).
    Multiple,
}

/// Static descriptor for a node's port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortDescriptor {
    pub name: &'static str,
    pub direction: PortDirection,
    pub kind: DataKind,
    pub cardinality: Cardinality,
    /// Only meaningful for inputs.
    pub required: bool,
}

impl PortDescriptor {
    /// A required single-value input.
    pub const fn input(name: &'static str, kind: DataKind) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            kind,
            cardinality: Cardinality::Single,
            required: true,
        }
    }

    pub const fn output(name: &'static str, kind: DataKind) -> Self {
        Self {
            name,
            direction: PortDirection::Output,
            kind,
            cardinality: Cardinality::Single,
            required: false,
        }
    }

    /// Mark an input as optional.
    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    /// Let an input hold an ordered list of values.
    pub const fn multiple(self) -> Self {
        Self {
            cardinality: Cardinality::Multiple,
            ..self
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_multiple(&self) -> bool {
        self.cardinality == Cardinality::Multiple
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PORTS: &[PortDescriptor] = &[
        PortDescriptor::input("in", DataKind::Scalar),
        PortDescriptor::input("extra", DataKind::Any).optional().multiple(),
        PortDescriptor::output("out", DataKind::Array),
    ];

    #[test]
    fn test_const_builders() {
        assert!(PORTS[0].is_input());
        assert!(PORTS[0].required);
        assert!(!PORTS[0].is_multiple());

        assert!(!PORTS[1].required);
        assert!(PORTS[1].is_multiple());

        assert_eq!(PORTS[2].direction, PortDirection::Output);
        assert_eq!(PORTS[2].kind, DataKind::Array);
    }

    #[test]
    fn test_kind_compatibility() {
        assert!(DataKind::Scalar.accepts(DataKind::Scalar));
        assert!(DataKind::Any.accepts(DataKind::Text));
        assert!(DataKind::Array.accepts(DataKind::Any));
        assert!(!DataKind::Scalar.accepts(DataKind::Text));
    }
}
