//! Upstream graph analysis.
//!
//! Collects every node reachable upstream of a root node and orders them
//! producers-first using Kahn's algorithm. Used for diagnostics and
//! snapshots; `update()` itself walks the graph recursively.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::id::NodeId;
use crate::pipeline::node::Node;
use std::collections::HashMap;

/// One connection inside an `UpstreamGraph`, by position in `nodes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamEdge {
    pub from: usize,
    pub from_output: usize,
    pub to: usize,
    pub to_input: usize,
    pub slot: usize,
}

/// The root node and everything upstream of it.
pub struct UpstreamGraph {
    nodes: Vec<Node>,
    edges: Vec<UpstreamEdge>,
}

impl UpstreamGraph {
    /// Walk the connections of `root` and its producers (DFS, each node once).
    pub fn collect(root: &Node) -> Self {
        let mut nodes: Vec<Node> = Vec::new();
        let mut index: HashMap<NodeId, usize> = HashMap::new();
        let mut edges = Vec::new();
        let mut stack = vec![root.clone()];
        index.insert(root.id(), 0);
        nodes.push(root.clone());

        while let Some(node) = stack.pop() {
            let to = index[&node.id()];
            for (to_input, (_, slots)) in node.input_ports_state().into_iter().enumerate() {
                for connection in slots.into_iter().flatten() {
                    let producer = connection.producer();
                    let from = match index.get(&producer.id()) {
                        Some(&i) => i,
                        None => {
                            let i = nodes.len();
                            index.insert(producer.id(), i);
                            nodes.push(producer.clone());
                            stack.push(producer.clone());
                            i
                        }
                    };
                    edges.push(UpstreamEdge {
                        from,
                        from_output: connection.producer_output(),
                        to,
                        to_input,
                        slot: connection.slot(),
                    });
                }
            }
        }

        Self { nodes, edges }
    }

    /// Nodes in discovery order; index 0 is the root.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[UpstreamEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Producers before consumers, or `CycleDetected` naming a node on a cycle.
    pub fn topological_order(&self) -> PipelineResult<Vec<Node>> {
        let n = self.nodes.len();
        let mut in_degree = vec![0u32; n];
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];

        for edge in &self.edges {
            adj[edge.from].push(edge.to);
            in_degree[edge.to] += 1;
        }

        // Kahn's algorithm
        let mut queue: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(node) = queue.pop() {
            order.push(node);
            for &next in &adj[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push(next);
                }
            }
        }

        // Every node left unordered has a positive in-degree.
        if let Some(stuck) = (0..n).find(|&i| in_degree[i] > 0) {
            tracing::warn!(
                "Upstream graph has a cycle! Only {} of {} nodes ordered.",
                order.len(),
                n
            );
            return Err(PipelineError::CycleDetected {
                node: self.nodes[stuck].id(),
            });
        }

        Ok(order.into_iter().map(|i| self.nodes[i].clone()).collect())
    }
}
