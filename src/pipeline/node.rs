//! Node abstraction for the pipeline.
//!
//! Two-layer design:
//! - **`Algorithm` trait**: the compute callback plus port declarations,
//!   supplied by whoever writes a concrete source/filter/sink.
//! - **`Node` handle**: a cheap, clonable handle that owns the algorithm,
//!   its parameter bag, input wiring and cached outputs, and exposes the
//!   public `update` / `output_data` / `set_input_connection` contract.
//!
//! Ownership of a node is shared by everything holding a handle to it,
//! including the input connections of downstream nodes.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::clock::Stamp;
use crate::pipeline::connection::{Connection, InputPortState, InputSlot, OutputPort};
use crate::pipeline::data::{DataObject, ParamValue, ParameterBag};
use crate::pipeline::events::{ModifiedEvent, ModifiedReason, Observers};
use crate::pipeline::executor::{self, Executive, UpdateOutcome};
use crate::pipeline::id::NodeId;
use crate::pipeline::node_type::NodeKind;
use crate::pipeline::port::{DataKind, PortDescriptor};
use crate::pipeline::snapshot::PipelineSnapshot;
use crate::pipeline::topology::UpstreamGraph;
use crossbeam_channel::Receiver;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Current values of one input port, one entry per slot.
///
/// `None` marks a connected producer that has no cached value yet.
pub type InputValues = Vec<Option<Rc<DataObject>>>;

/// Context passed to `Algorithm::request_data`.
pub struct ComputeContext<'a> {
    /// The node being computed.
    pub node: NodeId,
    /// Read-only view of the node's parameters.
    pub params: &'a ParameterBag,
    /// Output buffer for the algorithm's results.
    pub outputs: &'a mut OutputWriter,
    inputs: &'a [InputValues],
}

impl<'a> ComputeContext<'a> {
    /// First value of an input port, if any.
    pub fn input(&self, port: usize) -> Option<&DataObject> {
        self.inputs.get(port)?.first()?.as_deref()
    }

    /// All slot values of an input port, in slot order.
    pub fn inputs(&self, port: usize) -> impl Iterator<Item = Option<&DataObject>> + '_ {
        self.inputs
            .get(port)
            .into_iter()
            .flat_map(|slots| slots.iter().map(|v| v.as_deref()))
    }

    /// Number of slots wired on an input port.
    pub fn input_count(&self, port: usize) -> usize {
        self.inputs.get(port).map_or(0, Vec::len)
    }

    /// First value of an input port, or a compute error naming the port.
    pub fn require_input(&self, port: usize) -> PipelineResult<&DataObject> {
        self.input(port)
            .ok_or_else(|| self.fail(format!("input {} has no data", port)))
    }

    /// Write an output value.
    pub fn set_output(&mut self, index: usize, value: impl Into<DataObject>) -> PipelineResult<()> {
        self.outputs.set(index, value.into())
    }

    /// Build a compute error for this node.
    pub fn fail(&self, message: impl Into<String>) -> PipelineError {
        PipelineError::Compute {
            node: self.node,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum OutputWrite {
    Untouched,
    Set(DataObject),
    Cleared,
}

/// Writable view of a node's output slots during compute.
#[derive(Debug)]
pub struct OutputWriter {
    node: NodeId,
    kinds: Vec<DataKind>,
    writes: Vec<OutputWrite>,
}

impl OutputWriter {
    pub(crate) fn new(node: NodeId, kinds: Vec<DataKind>) -> Self {
        let writes = kinds.iter().map(|_| OutputWrite::Untouched).collect();
        Self {
            node,
            kinds,
            writes,
        }
    }

    fn check(&self, index: usize) -> PipelineResult<()> {
        if index >= self.writes.len() {
            return Err(PipelineError::Compute {
                node: self.node,
                message: format!(
                    "wrote output {} but only {} outputs are declared",
                    index,
                    self.writes.len()
                ),
            });
        }
        Ok(())
    }

    /// Store a value in an output slot. The value must match the port's kind.
    pub fn set(&mut self, index: usize, value: DataObject) -> PipelineResult<()> {
        self.check(index)?;
        let declared = self.kinds[index];
        if !declared.accepts(value.kind()) {
            return Err(PipelineError::Compute {
                node: self.node,
                message: format!("output {} is {:?}, got {:?}", index, declared, value.kind()),
            });
        }
        self.writes[index] = OutputWrite::Set(value);
        Ok(())
    }

    /// Empty an output slot.
    pub fn clear(&mut self, index: usize) -> PipelineResult<()> {
        self.check(index)?;
        self.writes[index] = OutputWrite::Cleared;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn is_written(&self, index: usize) -> bool {
        matches!(
            self.writes.get(index),
            Some(OutputWrite::Set(_)) | Some(OutputWrite::Cleared)
        )
    }

    pub(crate) fn into_writes(self) -> Vec<OutputWrite> {
        self.writes
    }
}

/// Compute behavior of a node.
///
/// Algorithms must produce their outputs as a function of their inputs and
/// the node's parameter bag. State that influences the result but lives
/// outside the bag must be reported through `resource_mtime`.
pub trait Algorithm {
    /// Human-readable class name of this algorithm.
    fn class_name(&self) -> &str;

    /// Input port descriptors.
    fn input_ports(&self) -> &[PortDescriptor];

    /// Output port descriptors.
    fn output_ports(&self) -> &[PortDescriptor];

    /// Parameters installed when the node is created.
    fn default_parameters(&self) -> Vec<(&'static str, ParamValue)> {
        Vec::new()
    }

    /// Produce outputs from the current inputs and parameters.
    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()>;

    /// Freshness of any external resource the algorithm wraps.
    fn resource_mtime(&self) -> Stamp {
        Stamp::ZERO
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct OutputSlot {
    pub(crate) value: Option<Rc<DataObject>>,
    pub(crate) stamp: Stamp,
}

pub(crate) struct NodeState {
    pub(crate) params: ParameterBag,
    pub(crate) param_mtime: Stamp,
    pub(crate) inputs: Vec<InputPortState>,
    pub(crate) outputs: Vec<OutputSlot>,
    pub(crate) last_execution: Option<Stamp>,
    pub(crate) execution_count: u64,
}

struct NodeInner {
    id: NodeId,
    executive: Executive,
    class_name: String,
    kind: NodeKind,
    output_descriptors: Vec<PortDescriptor>,
    state: RefCell<NodeState>,
    algorithm: RefCell<Box<dyn Algorithm>>,
    observers: RefCell<Observers>,
}

/// One connected producer of a node, as seen by the executor.
pub(crate) struct Upstream {
    pub(crate) producer: Node,
    pub(crate) output: usize,
    pub(crate) required: bool,
}

/// Shared handle to a pipeline stage.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

/// Non-owning handle to a node.
#[derive(Clone)]
pub struct WeakNode {
    inner: Weak<NodeInner>,
}

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.inner.upgrade().map(|inner| Node { inner })
    }
}

impl Node {
    /// Create a node around an algorithm. Ports and default parameters are
    /// taken from the algorithm once, here.
    pub fn new(executive: &Executive, algorithm: impl Algorithm + 'static) -> Self {
        let id = executive.allocate_id();
        let inputs: Vec<InputPortState> = algorithm
            .input_ports()
            .iter()
            .copied()
            .map(InputPortState::new)
            .collect();
        let output_descriptors = algorithm.output_ports().to_vec();
        let kind = NodeKind::from_arity(inputs.len(), output_descriptors.len());

        let mut params = ParameterBag::new();
        for (key, value) in algorithm.default_parameters() {
            params.set(key, value);
        }

        let class_name = algorithm.class_name().to_string();
        tracing::debug!(node = %id, class = %class_name, %kind, "created node");

        let state = NodeState {
            params,
            param_mtime: executive.clock().touch(),
            inputs,
            outputs: vec![OutputSlot::default(); output_descriptors.len()],
            last_execution: None,
            execution_count: 0,
        };

        Self {
            inner: Rc::new(NodeInner {
                id,
                executive: executive.clone(),
                class_name,
                kind,
                output_descriptors,
                state: RefCell::new(state),
                algorithm: RefCell::new(Box::new(algorithm)),
                observers: RefCell::new(Observers::new()),
            }),
        }
    }

    // ── Identity ──

    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    pub fn class_name(&self) -> &str {
        &self.inner.class_name
    }

    pub fn kind(&self) -> NodeKind {
        self.inner.kind
    }

    /// Capability check by structural kind.
    pub fn is_a(&self, kind: NodeKind) -> bool {
        self.inner.kind == kind
    }

    pub fn executive(&self) -> &Executive {
        &self.inner.executive
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ── Ports ──

    pub fn number_of_input_ports(&self) -> usize {
        self.inner.state.borrow().inputs.len()
    }

    pub fn number_of_output_ports(&self) -> usize {
        self.inner.output_descriptors.len()
    }

    pub fn input_descriptor(&self, port: usize) -> Option<PortDescriptor> {
        self.inner
            .state
            .borrow()
            .inputs
            .get(port)
            .map(|input| input.descriptor)
    }

    pub fn output_descriptor(&self, index: usize) -> Option<PortDescriptor> {
        self.inner.output_descriptors.get(index).copied()
    }

    fn check_input_port(&self, port: usize) -> PipelineResult<()> {
        let count = self.number_of_input_ports();
        if port >= count {
            return Err(PipelineError::PortOutOfRange {
                node: self.id(),
                port,
                count,
            });
        }
        Ok(())
    }

    fn check_output_port(&self, index: usize) -> PipelineResult<()> {
        let count = self.number_of_output_ports();
        if index >= count {
            return Err(PipelineError::OutputOutOfRange {
                node: self.id(),
                port: index,
                count,
            });
        }
        Ok(())
    }

    // ── Parameters and modification ──

    /// Set a parameter. The parameter stamp only advances when the value changes.
    pub fn set_parameter(&self, key: &str, value: impl Into<ParamValue>) -> bool {
        let changed = self.inner.state.borrow_mut().params.set(key, value.into());
        if changed {
            self.bump(ModifiedReason::Parameter);
        }
        changed
    }

    pub fn remove_parameter(&self, key: &str) -> bool {
        let removed = self.inner.state.borrow_mut().params.remove(key);
        if removed {
            self.bump(ModifiedReason::Parameter);
        }
        removed
    }

    pub fn parameter(&self, key: &str) -> Option<ParamValue> {
        self.inner.state.borrow().params.get(key).cloned()
    }

    pub fn parameters(&self) -> ParameterBag {
        self.inner.state.borrow().params.clone()
    }

    /// Mark the node as modified.
    pub fn modified(&self) -> Stamp {
        self.bump(ModifiedReason::Explicit)
    }

    /// Mark the node as modified unless `other` is older than its parameter stamp.
    pub fn modified_after(&self, other: Stamp) -> bool {
        if other < self.parameter_mtime() {
            return false;
        }
        self.bump(ModifiedReason::Explicit);
        true
    }

    /// Subscribe to modification events of this node.
    pub fn subscribe(&self) -> Receiver<ModifiedEvent> {
        self.inner.observers.borrow_mut().subscribe()
    }

    fn bump(&self, reason: ModifiedReason) -> Stamp {
        let stamp = self.inner.executive.clock().touch();
        self.inner.state.borrow_mut().param_mtime = stamp;
        self.notify(stamp, reason);
        stamp
    }

    pub(crate) fn notify(&self, stamp: Stamp, reason: ModifiedReason) {
        self.inner.observers.borrow_mut().notify(ModifiedEvent {
            node: self.id(),
            stamp,
            reason,
        });
    }

    // ── Wiring ──

    fn validate_source(&self, input: &InputPortState, source: &OutputPort) -> PipelineResult<()> {
        let producer = source.producer();
        if !producer.executive().same_as(self.executive()) {
            return Err(PipelineError::ForeignNode {
                node: producer.id(),
            });
        }
        let produced = producer.output_descriptor(source.index()).ok_or_else(|| {
            PipelineError::OutputOutOfRange {
                node: producer.id(),
                port: source.index(),
                count: producer.number_of_output_ports(),
            }
        })?;
        if !input.descriptor.kind.accepts(produced.kind) {
            return Err(PipelineError::PortMismatch(format!(
                "{} output '{}' ({:?}) cannot feed {} input '{}' ({:?})",
                producer.id(),
                produced.name,
                produced.kind,
                self.id(),
                input.descriptor.name,
                input.descriptor.kind
            )));
        }
        Ok(())
    }

    fn validate_data(&self, input: &InputPortState, value: &DataObject) -> PipelineResult<()> {
        if !input.descriptor.kind.accepts(value.kind()) {
            return Err(PipelineError::PortMismatch(format!(
                "{} input '{}' ({:?}) cannot take {:?} data",
                self.id(),
                input.descriptor.name,
                input.descriptor.kind,
                value.kind()
            )));
        }
        Ok(())
    }

    /// Apply an edit to one input port and stamp the node if it succeeds.
    fn edit_input<T>(
        &self,
        port: usize,
        edit: impl FnOnce(&Node, &mut InputPortState, Stamp) -> PipelineResult<T>,
    ) -> PipelineResult<T> {
        let result = self.check_input_port(port).and_then(|()| {
            let stamp = self.inner.executive.clock().touch();
            let mut state = self.inner.state.borrow_mut();
            let value = edit(self, &mut state.inputs[port], stamp)?;
            state.param_mtime = stamp;
            Ok((value, stamp))
        });

        match result {
            Ok((value, stamp)) => {
                self.notify(stamp, ModifiedReason::Wiring);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(node = %self.id(), port, error = %e, "rejected input change");
                Err(e)
            }
        }
    }

    /// Make `source` the only thing feeding input `port`.
    pub fn set_input_connection(&self, port: usize, source: &OutputPort) -> PipelineResult<()> {
        self.edit_input(port, |node, input, _| {
            node.validate_source(input, source)?;
            input.slots.clear();
            input
                .slots
                .push(InputSlot::Connected(Connection::new(source, node.id(), port, 0)));
            Ok(())
        })
    }

    /// Append a connection to input `port`. Returns the slot position.
    ///
    /// Single-value ports only accept an append while empty.
    pub fn add_input_connection(&self, port: usize, source: &OutputPort) -> PipelineResult<usize> {
        self.edit_input(port, |node, input, _| {
            node.validate_source(input, source)?;
            if !input.descriptor.is_multiple() && !input.is_empty() {
                return Err(PipelineError::CardinalityMismatch {
                    node: node.id(),
                    port,
                });
            }
            let slot = input.slots.len();
            input
                .slots
                .push(InputSlot::Connected(Connection::new(source, node.id(), port, slot)));
            Ok(slot)
        })
    }

    /// Replace the connection at `slot`, or append when `slot` is one past the end.
    pub fn set_input_connection_at(
        &self,
        port: usize,
        slot: usize,
        source: &OutputPort,
    ) -> PipelineResult<()> {
        self.edit_input(port, |node, input, _| {
            node.validate_source(input, source)?;
            let connection = InputSlot::Connected(Connection::new(source, node.id(), port, slot));
            if slot < input.slots.len() {
                input.slots[slot] = connection;
                return Ok(());
            }
            if slot == input.slots.len() && (input.descriptor.is_multiple() || input.is_empty()) {
                input.slots.push(connection);
                return Ok(());
            }
            Err(PipelineError::SlotOutOfRange {
                node: node.id(),
                port,
                slot,
            })
        })
    }

    /// Remove whatever feeds `slot` of input `port`; later slots move down.
    pub fn remove_input_connection(&self, port: usize, slot: usize) -> PipelineResult<()> {
        self.edit_input(port, |node, input, _| {
            if slot >= input.slots.len() {
                return Err(PipelineError::SlotOutOfRange {
                    node: node.id(),
                    port,
                    slot,
                });
            }
            input.slots.remove(slot);
            input.reindex();
            Ok(())
        })
    }

    /// Disconnect everything from input `port`.
    pub fn clear_input(&self, port: usize) -> PipelineResult<()> {
        self.check_input_port(port)?;
        if self.number_of_input_slots(port) == 0 {
            return Ok(());
        }
        self.edit_input(port, |_, input, _| {
            input.slots.clear();
            Ok(())
        })
    }

    /// Feed input `port` a fixed value, replacing any connection.
    pub fn set_input_data(&self, port: usize, value: impl Into<DataObject>) -> PipelineResult<()> {
        let value = value.into();
        self.edit_input(port, |node, input, stamp| {
            node.validate_data(input, &value)?;
            input.slots.clear();
            input.slots.push(InputSlot::Data {
                value: Rc::new(value),
                stamp,
            });
            Ok(())
        })
    }

    /// Append a fixed value to input `port`. Returns the slot position.
    pub fn add_input_data(&self, port: usize, value: impl Into<DataObject>) -> PipelineResult<usize> {
        let value = value.into();
        self.edit_input(port, |node, input, stamp| {
            node.validate_data(input, &value)?;
            if !input.descriptor.is_multiple() && !input.is_empty() {
                return Err(PipelineError::CardinalityMismatch {
                    node: node.id(),
                    port,
                });
            }
            input.slots.push(InputSlot::Data {
                value: Rc::new(value),
                stamp,
            });
            Ok(input.slots.len() - 1)
        })
    }

    /// The connection feeding `slot` of input `port`, if that slot is connected.
    pub fn input_connection(&self, port: usize, slot: usize) -> Option<Connection> {
        let state = self.inner.state.borrow();
        state
            .inputs
            .get(port)?
            .slots
            .get(slot)?
            .connection()
            .cloned()
    }

    /// Number of connections and direct values on input `port`.
    pub fn number_of_input_slots(&self, port: usize) -> usize {
        self.inner
            .state
            .borrow()
            .inputs
            .get(port)
            .map_or(0, |input| input.slots.len())
    }

    /// Number of producer connections on input `port`, ignoring direct values.
    pub fn number_of_connections(&self, port: usize) -> usize {
        self.inner
            .state
            .borrow()
            .inputs
            .get(port)
            .map_or(0, |input| input.connections().count())
    }

    /// Current value of the first slot of input `port`, bringing a connected
    /// producer up to date first.
    pub fn input_data(&self, port: usize) -> PipelineResult<Option<Rc<DataObject>>> {
        self.check_input_port(port)?;
        match self.input_slot(port, 0) {
            Some(slot) => Self::read_slot(slot),
            None => Ok(None),
        }
    }

    /// Current value of `slot` on input `port`. Unlike `input_data`, a slot
    /// that does not exist is an error.
    pub fn input_data_at(
        &self,
        port: usize,
        slot: usize,
    ) -> PipelineResult<Option<Rc<DataObject>>> {
        self.check_input_port(port)?;
        let value = self
            .input_slot(port, slot)
            .ok_or(PipelineError::SlotOutOfRange {
                node: self.id(),
                port,
                slot,
            })?;
        Self::read_slot(value)
    }

    fn input_slot(&self, port: usize, slot: usize) -> Option<InputSlot> {
        self.inner.state.borrow().inputs[port].slots.get(slot).cloned()
    }

    fn read_slot(slot: InputSlot) -> PipelineResult<Option<Rc<DataObject>>> {
        match slot {
            InputSlot::Connected(c) => c.producer().output_data(c.producer_output()),
            InputSlot::Data { value, .. } => Ok(Some(value)),
        }
    }

    // ── Outputs ──

    /// Handle to output `index`, for another node's `set_input_connection`.
    /// Does not trigger computation.
    pub fn output_port(&self, index: usize) -> PipelineResult<OutputPort> {
        self.check_output_port(index)?;
        Ok(OutputPort {
            producer: self.clone(),
            index,
        })
    }

    /// Bring the node up to date and return output `index`.
    pub fn output_data(&self, index: usize) -> PipelineResult<Option<Rc<DataObject>>> {
        self.check_output_port(index)?;
        self.update()?;
        Ok(self.cached_output(index))
    }

    /// Output `index` as currently cached, without updating.
    pub fn cached_output(&self, index: usize) -> Option<Rc<DataObject>> {
        self.inner
            .state
            .borrow()
            .outputs
            .get(index)
            .and_then(|slot| slot.value.clone())
    }

    /// Stamp at which output `index` was last written.
    pub fn output_stamp(&self, index: usize) -> Stamp {
        self.inner
            .state
            .borrow()
            .outputs
            .get(index)
            .map_or(Stamp::ZERO, |slot| slot.stamp)
    }

    // ── Execution ──

    /// Recompute this node and anything upstream of it, where stale.
    ///
    /// Configuration errors (cycles, depth overruns) are logged and leave the
    /// node untouched; compute errors are returned.
    pub fn update(&self) -> PipelineResult<()> {
        match self.try_update() {
            Ok(_) => Ok(()),
            Err(e) if e.is_configuration() => {
                tracing::error!(
                    node = %self.id(),
                    class = %self.class_name(),
                    error = %e,
                    "pipeline configuration error, update skipped"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Like `update`, but reports every error and what happened to this node.
    pub fn try_update(&self) -> PipelineResult<UpdateOutcome> {
        executor::Traversal::new(self.executive().config()).update(self)
    }

    /// Latest stamp of this node's parameters, external resource, and the
    /// producers feeding its required inputs. Never triggers computation.
    pub fn mtime(&self) -> Stamp {
        executor::MtimeQuery::new(self.executive().config().max_depth).mtime(self)
    }

    /// Stamp of the last parameter or wiring change.
    pub fn parameter_mtime(&self) -> Stamp {
        self.inner.state.borrow().param_mtime
    }

    /// Stamp of the last compute (or recorded skip).
    pub fn last_execution(&self) -> Option<Stamp> {
        self.inner.state.borrow().last_execution
    }

    /// How many times the compute callback has run.
    pub fn execution_count(&self) -> u64 {
        self.inner.state.borrow().execution_count
    }

    // ── Introspection ──

    /// This node and everything upstream of it, producers first.
    pub fn upstream_order(&self) -> PipelineResult<Vec<Node>> {
        UpstreamGraph::collect(self).topological_order()
    }

    /// Serialisable description of this node's upstream graph.
    pub fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot::capture(self)
    }

    // ── Executor hooks ──

    /// Stamp of parameters and wrapped resource, without upstream.
    pub(crate) fn local_mtime(&self) -> Stamp {
        let resource = self
            .inner
            .algorithm
            .try_borrow()
            .map_or(Stamp::ZERO, |algorithm| algorithm.resource_mtime());
        self.parameter_mtime().max(resource)
    }

    pub(crate) fn upstream(&self) -> Vec<Upstream> {
        let state = self.inner.state.borrow();
        state
            .inputs
            .iter()
            .flat_map(|input| {
                let required = input.descriptor.required;
                input.connections().map(move |c| Upstream {
                    producer: c.producer().clone(),
                    output: c.producer_output(),
                    required,
                })
            })
            .collect()
    }

    pub(crate) fn first_missing_required_input(&self) -> Option<usize> {
        self.inner
            .state
            .borrow()
            .inputs
            .iter()
            .position(|input| input.descriptor.required && input.is_empty())
    }

    pub(crate) fn input_ports_state(&self) -> Vec<(PortDescriptor, Vec<Option<Connection>>)> {
        self.inner
            .state
            .borrow()
            .inputs
            .iter()
            .map(|input| {
                let slots = input.slots.iter().map(|s| s.connection().cloned()).collect();
                (input.descriptor, slots)
            })
            .collect()
    }

    fn gather_inputs(&self) -> Vec<InputValues> {
        let state = self.inner.state.borrow();
        state
            .inputs
            .iter()
            .map(|input| {
                input
                    .slots
                    .iter()
                    .map(|slot| match slot {
                        InputSlot::Connected(c) => c.producer().cached_output(c.producer_output()),
                        InputSlot::Data { value, .. } => Some(Rc::clone(value)),
                    })
                    .collect()
            })
            .collect()
    }

    /// Run the compute callback and stamp whatever it wrote.
    pub(crate) fn run_compute(&self) -> PipelineResult<Stamp> {
        let inputs = self.gather_inputs();
        let kinds = self.inner.output_descriptors.iter().map(|d| d.kind).collect();
        let mut writer = OutputWriter::new(self.id(), kinds);

        {
            let state = self.inner.state.borrow();
            let mut algorithm = self.inner.algorithm.borrow_mut();
            let mut ctx = ComputeContext {
                node: self.id(),
                params: &state.params,
                outputs: &mut writer,
                inputs: &inputs,
            };
            // Anything the callback returns is a compute failure for this node.
            algorithm.request_data(&mut ctx).map_err(|e| match e {
                PipelineError::Compute { .. } => e,
                other => PipelineError::Compute {
                    node: self.id(),
                    message: other.to_string(),
                },
            })?;
        }

        let stamp = self.inner.executive.clock().touch();
        let mut state = self.inner.state.borrow_mut();
        for (slot, write) in state.outputs.iter_mut().zip(writer.into_writes()) {
            match write {
                OutputWrite::Untouched => {}
                OutputWrite::Set(value) => {
                    slot.value = Some(Rc::new(value));
                    slot.stamp = stamp;
                }
                OutputWrite::Cleared => {
                    slot.value = None;
                    slot.stamp = stamp;
                }
            }
        }
        state.last_execution = Some(stamp);
        state.execution_count += 1;
        Ok(stamp)
    }

    /// Record a skipped compute for a node with a missing required input.
    pub(crate) fn record_skip(&self, remember: bool, clear_outputs: bool) {
        let clock = self.inner.executive.clock();
        let mut state = self.inner.state.borrow_mut();
        if clear_outputs && state.outputs.iter().any(|slot| slot.value.is_some()) {
            let stamp = clock.touch();
            for slot in state.outputs.iter_mut() {
                slot.value = None;
                slot.stamp = stamp;
            }
        }
        if remember {
            state.last_execution = Some(clock.current());
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id())
            .field("class", &self.class_name())
            .field("kind", &self.kind())
            .finish()
    }
}
