//! Modification notifications.
//!
//! Nodes broadcast a `ModifiedEvent` to every subscriber whenever their
//! parameter stamp (or an external resource stamp) advances. The engine never
//! acts on these events itself; they exist so that callers driving an
//! interactive pipeline know when another `update()` is worthwhile.

use crate::pipeline::clock::Stamp;
use crate::pipeline::id::NodeId;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// What kind of change produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifiedReason {
    /// A parameter value changed.
    Parameter,
    /// An input connection or direct input value was set or removed.
    Wiring,
    /// An external resource wrapped by the node delivered new data.
    Resource,
    /// `Node::modified()` was called explicitly.
    Explicit,
}

/// Sent to subscribers when a node is modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifiedEvent {
    pub node: NodeId,
    pub stamp: Stamp,
    pub reason: ModifiedReason,
}

/// Subscriber list of one node.
#[derive(Debug, Default)]
pub struct Observers {
    senders: Vec<Sender<ModifiedEvent>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<ModifiedEvent> {
        let (tx, rx) = unbounded();
        self.senders.push(tx);
        rx
    }

    /// Deliver an event, dropping subscribers whose receiver is gone.
    pub fn notify(&mut self, event: ModifiedEvent) {
        self.senders.retain(|tx| tx.send(event).is_ok());
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
