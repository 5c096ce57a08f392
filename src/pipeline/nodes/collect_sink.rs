//! CollectSink: terminal node that records every value it computes on.

use crate::error::PipelineResult;
use crate::pipeline::data::DataObject;
use crate::pipeline::executor::Executive;
use crate::pipeline::node::{Algorithm, ComputeContext, Node};
use crate::pipeline::port::{DataKind, PortDescriptor};
use std::cell::RefCell;
use std::rc::Rc;

static PORTS: &[PortDescriptor] = &[PortDescriptor::input("in", DataKind::Any).optional()];

type History = Rc<RefCell<Vec<Option<DataObject>>>>;

/// Sink with one optional input and no outputs.
///
/// Each compute appends the current input (or `None` when nothing is
/// connected or the producer is empty) to a history shared with a
/// `CollectHandle`.
pub struct CollectSink {
    history: History,
}

impl CollectSink {
    pub fn create(executive: &Executive) -> (Node, CollectHandle) {
        let history: History = Rc::default();
        let node = executive.create(CollectSink {
            history: Rc::clone(&history),
        });
        (node, CollectHandle { history })
    }
}

impl Algorithm for CollectSink {
    fn class_name(&self) -> &str {
        "CollectSink"
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        &[]
    }

    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
        self.history.borrow_mut().push(ctx.input(0).cloned());
        Ok(())
    }
}

/// Read side of a `CollectSink` history.
#[derive(Clone)]
pub struct CollectHandle {
    history: History,
}

impl CollectHandle {
    pub fn len(&self) -> usize {
        self.history.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.borrow().is_empty()
    }

    /// The most recently recorded input.
    pub fn last(&self) -> Option<DataObject> {
        self.history.borrow().last().cloned().flatten()
    }

    pub fn history(&self) -> Vec<Option<DataObject>> {
        self.history.borrow().clone()
    }

    pub fn clear(&self) {
        self.history.borrow_mut().clear();
    }
}
