//! Connections between nodes.
//!
//! An `OutputPort` is the opaque handle returned by `Node::output_port`; it
//! keeps the producer alive. Feeding it to `Node::set_input_connection` stores
//! a `Connection` in the consumer's input slot. Consumers own their
//! producers, so a producer lives as long as anything downstream uses it.

use crate::pipeline::clock::Stamp;
use crate::pipeline::data::DataObject;
use crate::pipeline::id::NodeId;
use crate::pipeline::node::Node;
use crate::pipeline::port::PortDescriptor;
use std::fmt;
use std::rc::Rc;

/// Handle to one output of a producer node.
#[derive(Clone)]
pub struct OutputPort {
    pub(crate) producer: Node,
    pub(crate) index: usize,
}

impl OutputPort {
    pub fn producer(&self) -> &Node {
        &self.producer
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Debug for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputPort")
            .field("producer", &self.producer.id())
            .field("index", &self.index)
            .finish()
    }
}

/// Immutable wiring of one producer output into one consumer input slot.
#[derive(Clone)]
pub struct Connection {
    producer: Node,
    producer_output: usize,
    consumer: NodeId,
    consumer_input: usize,
    slot: usize,
}

impl Connection {
    pub(crate) fn new(
        source: &OutputPort,
        consumer: NodeId,
        consumer_input: usize,
        slot: usize,
    ) -> Self {
        Self {
            producer: source.producer.clone(),
            producer_output: source.index,
            consumer,
            consumer_input,
            slot,
        }
    }

    pub fn producer(&self) -> &Node {
        &self.producer
    }

    pub fn producer_output(&self) -> usize {
        self.producer_output
    }

    pub fn consumer(&self) -> NodeId {
        self.consumer
    }

    pub fn consumer_input(&self) -> usize {
        self.consumer_input
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Same wiring moved to another slot position.
    pub(crate) fn at_slot(&self, slot: usize) -> Self {
        Self {
            slot,
            ..self.clone()
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Connection({}:{} -> {}:{}[{}])",
            self.producer.id(),
            self.producer_output,
            self.consumer,
            self.consumer_input,
            self.slot
        )
    }
}

/// What feeds one slot of an input port.
#[derive(Clone, Debug)]
pub(crate) enum InputSlot {
    Connected(Connection),
    Data { value: Rc<DataObject>, stamp: Stamp },
}

impl InputSlot {
    pub(crate) fn connection(&self) -> Option<&Connection> {
        match self {
            InputSlot::Connected(c) => Some(c),
            InputSlot::Data { .. } => None,
        }
    }
}

/// Runtime state of one input port.
#[derive(Debug)]
pub(crate) struct InputPortState {
    pub(crate) descriptor: PortDescriptor,
    pub(crate) slots: Vec<InputSlot>,
}

impl InputPortState {
    pub(crate) fn new(descriptor: PortDescriptor) -> Self {
        Self {
            descriptor,
            slots: Vec::new(),
        }
    }

    /// Whether the port has no connection and no direct value.
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.slots.iter().filter_map(InputSlot::connection)
    }

    /// Renumber connection slots after an insertion or removal.
    pub(crate) fn reindex(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let InputSlot::Connected(c) = slot {
                if c.slot() != i {
                    *c = c.at_slot(i);
                }
            }
        }
    }
}
