//! Property tests over randomly wired pipelines

mod common;

use common::algorithms::Sum;
use datavis_pipeline::{Executive, Node};
use proptest::prelude::*;

/// Node `i` sums its own index, its `offset` and the outputs of every
/// earlier node `j` with `edges[i][j]` set.
struct RandomDag {
    nodes: Vec<Node>,
    producers: Vec<Vec<usize>>,
}

impl RandomDag {
    fn build(exec: &Executive, edges: &[Vec<bool>]) -> Self {
        let mut nodes: Vec<Node> = Vec::with_capacity(edges.len());
        let mut producers = Vec::with_capacity(edges.len());
        for (i, row) in edges.iter().enumerate() {
            let node = exec.create(Sum);
            node.add_input_data(0, i as f64).unwrap();
            let feeding: Vec<usize> = (0..i).filter(|&j| row[j]).collect();
            for &j in &feeding {
                node.add_input_connection(0, &nodes[j].output_port(0).unwrap())
                    .unwrap();
            }
            nodes.push(node);
            producers.push(feeding);
        }
        Self { nodes, producers }
    }

    fn expected(&self, offsets: &[f64]) -> Vec<f64> {
        let mut values: Vec<f64> = Vec::with_capacity(self.nodes.len());
        for (i, feeding) in self.producers.iter().enumerate() {
            let upstream: f64 = feeding.iter().map(|&j| values[j]).sum();
            values.push(i as f64 + offsets[i] + upstream);
        }
        values
    }

    /// Nodes that depend on any node in `changed`, the changed nodes included.
    fn downstream_of(&self, changed: &[bool]) -> Vec<bool> {
        let mut dirty = changed.to_vec();
        for (i, feeding) in self.producers.iter().enumerate() {
            if feeding.iter().any(|&j| dirty[j]) {
                dirty[i] = true;
            }
        }
        dirty
    }

    fn update_all(&self) {
        for node in self.nodes.iter().rev() {
            node.update().unwrap();
        }
    }
}

fn dag_strategy() -> impl Strategy<Value = (Vec<Vec<bool>>, Vec<bool>)> {
    (2usize..10).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
            prop::collection::vec(any::<bool>(), n),
        )
    })
}

proptest! {
    #[test]
    fn test_only_downstream_of_changes_recomputes((edges, changed) in dag_strategy()) {
        let exec = Executive::default();
        let dag = RandomDag::build(&exec, &edges);
        let mut offsets = vec![0.0; dag.nodes.len()];

        dag.update_all();
        prop_assert_eq!(common::execution_counts(&dag.nodes), vec![1; dag.nodes.len()]);

        for (i, &bump) in changed.iter().enumerate() {
            if bump {
                offsets[i] = 0.5;
                dag.nodes[i].set_parameter("offset", 0.5);
            }
        }
        dag.update_all();

        // Property: exactly the changed nodes and their dependents ran again
        let dirty = dag.downstream_of(&changed);
        let expected_counts: Vec<u64> = dirty.iter().map(|&d| if d { 2 } else { 1 }).collect();
        prop_assert_eq!(common::execution_counts(&dag.nodes), expected_counts);

        // Property: cached outputs match a direct evaluation
        let expected = dag.expected(&offsets);
        for (node, value) in dag.nodes.iter().zip(expected) {
            prop_assert_eq!(common::cached_scalar(node), Some(value));
        }

        // Property: a second pass is a pure cache hit
        let before = common::execution_counts(&dag.nodes);
        dag.update_all();
        prop_assert_eq!(common::execution_counts(&dag.nodes), before);
    }

    #[test]
    fn test_sink_update_reaches_every_ancestor(edges in dag_strategy().prop_map(|(e, _)| e)) {
        let exec = Executive::default();
        let dag = RandomDag::build(&exec, &edges);
        let sink = dag.nodes.last().unwrap();
        sink.update().unwrap();

        let order = sink.upstream_order().unwrap();
        let last_executions: Vec<_> = order.iter().map(|node| node.last_execution()).collect();

        // Property: every ancestor ran, producers before consumers
        prop_assert!(last_executions.iter().all(Option::is_some));
        for (i, feeding) in dag.producers.iter().enumerate() {
            if dag.nodes[i].last_execution().is_none() {
                continue;
            }
            for &j in feeding {
                prop_assert!(dag.nodes[j].last_execution() < dag.nodes[i].last_execution());
            }
        }
        prop_assert!(order.last().unwrap().ptr_eq(sink));
    }
}
