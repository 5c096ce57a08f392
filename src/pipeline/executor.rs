//! Pipeline executor: the demand-driven update traversal.
//!
//! `Node::update()` walks the upstream graph depth-first. For each node:
//! 1. Update every connected producer first.
//! 2. Compute the required stamp: the node's own mtime (parameters, wrapped
//!    resource, required producers' mtimes) and every connected producer's
//!    output stamp.
//! 3. If the required stamp is not newer than the last execution, stop (cache hit).
//! 4. Otherwise run the compute callback and stamp what it wrote.
//!
//! The traversal keeps the set of nodes on the active call path to reject
//! cycles, and memoises finished nodes so shared producers are visited once
//! per call.

use crate::config::ExecutorConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::clock::{ModificationClock, Stamp};
use crate::pipeline::id::{NodeId, NodeIdAllocator};
use crate::pipeline::node::{Algorithm, Node};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared execution state every node is created with: the modification
/// clock, the node id allocator and the executor configuration.
///
/// Nodes can only be wired to nodes of the same executive, since stamps from
/// different clocks are not comparable.
#[derive(Clone, Debug)]
pub struct Executive {
    clock: ModificationClock,
    ids: NodeIdAllocator,
    config: Arc<ExecutorConfig>,
}

impl Executive {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            clock: ModificationClock::new(),
            ids: NodeIdAllocator::new(),
            config: Arc::new(config),
        }
    }

    pub fn clock(&self) -> &ModificationClock {
        &self.clock
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Create a node owned by this executive.
    pub fn create(&self, algorithm: impl Algorithm + 'static) -> Node {
        Node::new(self, algorithm)
    }

    /// Whether both handles share one clock.
    pub fn same_as(&self, other: &Executive) -> bool {
        self.clock.same_clock(&other.clock)
    }

    pub(crate) fn allocate_id(&self) -> NodeId {
        self.ids.next_id()
    }
}

impl Default for Executive {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

/// What one update did to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The compute callback ran; outputs it wrote carry `stamp`.
    Executed { stamp: Stamp },
    /// Nothing upstream changed since the last execution.
    CacheHit,
    /// A required input is unconnected; compute was not invoked.
    SkippedMissingInput { port: usize },
}

impl UpdateOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, UpdateOutcome::Executed { .. })
    }
}

struct Finished {
    mtime: Stamp,
    outcome: UpdateOutcome,
}

/// State of one `update()` call.
pub(crate) struct Traversal<'a> {
    config: &'a ExecutorConfig,
    active: Vec<NodeId>,
    finished: HashMap<NodeId, Finished>,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(config: &'a ExecutorConfig) -> Self {
        Self {
            config,
            active: Vec::new(),
            finished: HashMap::new(),
        }
    }

    pub(crate) fn update(&mut self, node: &Node) -> PipelineResult<UpdateOutcome> {
        let id = node.id();
        if let Some(done) = self.finished.get(&id) {
            return Ok(done.outcome);
        }
        if self.active.contains(&id) {
            return Err(PipelineError::CycleDetected { node: id });
        }
        if self.active.len() >= self.config.max_depth {
            return Err(PipelineError::MaxDepthExceeded {
                node: id,
                depth: self.active.len(),
            });
        }

        self.active.push(id);
        let result = self.visit(node);
        self.active.pop();
        result
    }

    fn visit(&mut self, node: &Node) -> PipelineResult<UpdateOutcome> {
        let id = node.id();
        let mut upstream_mtime = Stamp::ZERO;
        let mut required = Stamp::ZERO;

        for up in node.upstream() {
            self.update(&up.producer)?;
            if up.required {
                let producer_mtime = self
                    .finished
                    .get(&up.producer.id())
                    .map_or(Stamp::ZERO, |done| done.mtime);
                upstream_mtime = upstream_mtime.max(producer_mtime);
            }
            required = required.max(up.producer.output_stamp(up.output));
        }

        let mtime = node.local_mtime().max(upstream_mtime);
        required = required.max(mtime);

        let outcome = self.decide(node, required)?;
        self.finished.insert(id, Finished { mtime, outcome });
        Ok(outcome)
    }

    fn decide(&self, node: &Node, required: Stamp) -> PipelineResult<UpdateOutcome> {
        if let Some(last) = node.last_execution() {
            if required <= last {
                if self.config.trace_cache_hits {
                    tracing::debug!(node = %node.id(), %required, %last, "cache hit");
                }
                return Ok(UpdateOutcome::CacheHit);
            }
        }

        if let Some(port) = node.first_missing_required_input() {
            tracing::warn!(
                node = %node.id(),
                class = %node.class_name(),
                port,
                "required input not connected, skipping compute"
            );
            node.record_skip(
                self.config.records_skipped_attempts(),
                self.config.clear_outputs_on_missing_input,
            );
            return Ok(UpdateOutcome::SkippedMissingInput { port });
        }

        let stamp = node.run_compute()?;
        tracing::debug!(node = %node.id(), class = %node.class_name(), %stamp, "executed");
        Ok(UpdateOutcome::Executed { stamp })
    }
}

/// Side-effect free mtime walk behind `Node::mtime()`.
///
/// Folding stops `max_depth` levels above the root; a node at the bound
/// contributes only its own stamp.
pub(crate) struct MtimeQuery {
    max_depth: usize,
    active: Vec<NodeId>,
    done: HashMap<NodeId, Stamp>,
}

impl MtimeQuery {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            active: Vec::new(),
            done: HashMap::new(),
        }
    }

    pub(crate) fn mtime(&mut self, node: &Node) -> Stamp {
        let id = node.id();
        if let Some(&mtime) = self.done.get(&id) {
            return mtime;
        }
        // A node already on the path contributes nothing further.
        if self.active.contains(&id) {
            return Stamp::ZERO;
        }
        if self.active.len() >= self.max_depth {
            tracing::warn!(node = %id, depth = self.active.len(), "mtime walk truncated at max depth");
            return node.local_mtime();
        }

        self.active.push(id);
        let mut mtime = node.local_mtime();
        for up in node.upstream().into_iter().filter(|up| up.required) {
            mtime = mtime.max(self.mtime(&up.producer));
        }
        self.active.pop();

        self.done.insert(id, mtime);
        mtime
    }
}
