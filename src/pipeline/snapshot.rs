//! Serializable snapshots of a pipeline graph.
//!
//! A snapshot captures the structure and bookkeeping (stamps, execution
//! counts, parameters) of a node and everything upstream of it, without
//! triggering computation. Intended for logging and debugging dumps.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::clock::Stamp;
use crate::pipeline::data::ParamValue;
use crate::pipeline::id::NodeId;
use crate::pipeline::node::Node;
use crate::pipeline::node_type::NodeKind;
use crate::pipeline::port::PortDescriptor;
use crate::pipeline::topology::UpstreamGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// Snapshot of a single pipeline node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub class_name: String,
    pub kind: NodeKind,
    pub inputs: Vec<PortDescriptor>,
    pub outputs: Vec<PortDescriptor>,
    pub parameters: BTreeMap<String, ParamValue>,
    pub parameter_mtime: Stamp,
    pub last_execution: Option<Stamp>,
    pub execution_count: u64,
    pub output_stamps: Vec<Stamp>,
}

/// Snapshot of a single connection.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeSnapshot {
    pub from_node: NodeId,
    pub from_output: usize,
    pub to_node: NodeId,
    pub to_input: usize,
    pub slot: usize,
}

/// Complete snapshot of the upstream graph of `root`.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSnapshot {
    pub root: NodeId,
    /// Latest modification stamp issued when the snapshot was taken.
    pub clock: Stamp,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl NodeSnapshot {
    fn capture(node: &Node) -> Self {
        let inputs = node
            .input_ports_state()
            .into_iter()
            .map(|(descriptor, _)| descriptor)
            .collect();
        let outputs = (0..node.number_of_output_ports())
            .filter_map(|i| node.output_descriptor(i))
            .collect();
        let parameters = node
            .parameters()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let output_stamps = (0..node.number_of_output_ports())
            .map(|i| node.output_stamp(i))
            .collect();

        Self {
            id: node.id(),
            class_name: node.class_name().to_string(),
            kind: node.kind(),
            inputs,
            outputs,
            parameters,
            parameter_mtime: node.parameter_mtime(),
            last_execution: node.last_execution(),
            execution_count: node.execution_count(),
            output_stamps,
        }
    }
}

impl PipelineSnapshot {
    pub fn capture(root: &Node) -> Self {
        let graph = UpstreamGraph::collect(root);
        let nodes: Vec<NodeSnapshot> = graph.nodes().iter().map(NodeSnapshot::capture).collect();
        let edges = graph
            .edges()
            .iter()
            .map(|edge| EdgeSnapshot {
                from_node: nodes[edge.from].id,
                from_output: edge.from_output,
                to_node: nodes[edge.to].id,
                to_input: edge.to_input,
                slot: edge.slot,
            })
            .collect();

        Self {
            root: root.id(),
            clock: root.executive().clock().current(),
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn to_json(&self) -> PipelineResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::Serialization(format!("Failed to serialize snapshot: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::executor::Executive;
    use crate::pipeline::node::{Algorithm, ComputeContext};
    use crate::pipeline::port::DataKind;

    static IN: &[PortDescriptor] = &[PortDescriptor::input("in", DataKind::Scalar).optional()];
    static OUT: &[PortDescriptor] = &[PortDescriptor::output("out", DataKind::Scalar)];

    struct Passthrough;

    impl Algorithm for Passthrough {
        fn class_name(&self) -> &str {
            "Passthrough"
        }
        fn input_ports(&self) -> &[PortDescriptor] {
            IN
        }
        fn output_ports(&self) -> &[PortDescriptor] {
            OUT
        }
        fn default_parameters(&self) -> Vec<(&'static str, ParamValue)> {
            vec![("gain", ParamValue::Float(1.0))]
        }
        fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
            let x = ctx.input(0).and_then(|v| v.as_scalar()).unwrap_or(0.0);
            ctx.set_output(0, x)
        }
    }

    #[test]
    fn test_snapshot_structure() {
        let exec = Executive::default();
        let a = exec.create(Passthrough);
        let b = exec.create(Passthrough);
        b.set_input_connection(0, &a.output_port(0).unwrap()).unwrap();
        b.update().unwrap();

        let snapshot = b.snapshot();
        assert_eq!(snapshot.root, b.id());
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.edges.len(), 1);

        let edge = &snapshot.edges[0];
        assert_eq!(edge.from_node, a.id());
        assert_eq!(edge.to_node, b.id());

        let a_snap = snapshot.node(a.id()).unwrap();
        assert_eq!(a_snap.execution_count, 1);
        assert_eq!(a_snap.kind, NodeKind::Filter);
        assert_eq!(a_snap.parameters.get("gain"), Some(&ParamValue::Float(1.0)));
        assert_eq!(a_snap.output_stamps[0], a.output_stamp(0));
    }

    #[test]
    fn test_snapshot_does_not_compute() {
        let exec = Executive::default();
        let a = exec.create(Passthrough);
        let snapshot = a.snapshot();
        assert_eq!(snapshot.nodes[0].execution_count, 0);
        assert!(snapshot.nodes[0].last_execution.is_none());
        assert_eq!(a.execution_count(), 0);
    }

    #[test]
    fn test_snapshot_json() {
        let exec = Executive::default();
        let a = exec.create(Passthrough);
        let json = a.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"][0]["class_name"], "Passthrough");
        assert_eq!(value["nodes"][0]["kind"], "Filter");
    }
}
