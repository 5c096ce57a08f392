//! DeferredSource: a source backed by data that arrives later.
//!
//! The node is created together with a `DeferredHandle`. Whoever owns the
//! external resource (a loader, a socket reader, a test) calls
//! `DeferredHandle::deliver` when data is ready. Delivery stamps the
//! resource and notifies the node's subscribers; the next `update()` sees
//! the newer resource stamp through `Algorithm::resource_mtime` and emits
//! the value. Until then the output is empty.

use crate::error::PipelineResult;
use crate::pipeline::clock::{ModificationClock, Stamp};
use crate::pipeline::data::DataObject;
use crate::pipeline::events::ModifiedReason;
use crate::pipeline::executor::Executive;
use crate::pipeline::node::{Algorithm, ComputeContext, Node, WeakNode};
use crate::pipeline::port::{DataKind, PortDescriptor};
use std::cell::RefCell;
use std::rc::Rc;

static PORTS: &[PortDescriptor] = &[PortDescriptor::output("out", DataKind::Any)];

#[derive(Debug, Default)]
struct Resource {
    value: Option<DataObject>,
    stamp: Stamp,
}

pub struct DeferredSource {
    resource: Rc<RefCell<Resource>>,
}

impl DeferredSource {
    /// Create the node and the handle that feeds it.
    pub fn create(executive: &Executive) -> (Node, DeferredHandle) {
        let resource = Rc::new(RefCell::new(Resource::default()));
        let node = executive.create(DeferredSource {
            resource: Rc::clone(&resource),
        });
        let handle = DeferredHandle {
            node: node.downgrade(),
            clock: executive.clock().clone(),
            resource,
        };
        (node, handle)
    }
}

impl Algorithm for DeferredSource {
    fn class_name(&self) -> &str {
        "DeferredSource"
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        &[]
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
        let value = self.resource.borrow().value.clone();
        match value {
            Some(value) => ctx.set_output(0, value),
            None => ctx.outputs.clear(0),
        }
    }

    fn resource_mtime(&self) -> Stamp {
        self.resource.borrow().stamp
    }
}

/// Producer side of a `DeferredSource`.
#[derive(Clone)]
pub struct DeferredHandle {
    node: WeakNode,
    clock: ModificationClock,
    resource: Rc<RefCell<Resource>>,
}

impl DeferredHandle {
    /// Hand over newly arrived data. Returns the resource stamp.
    pub fn deliver(&self, value: impl Into<DataObject>) -> Stamp {
        self.replace(Some(value.into()))
    }

    /// Drop the current data; the next update empties the output.
    pub fn reset(&self) -> Stamp {
        self.replace(None)
    }

    pub fn is_pending(&self) -> bool {
        self.resource.borrow().value.is_none()
    }

    /// The node this handle feeds, if it is still alive.
    pub fn node(&self) -> Option<Node> {
        self.node.upgrade()
    }

    fn replace(&self, value: Option<DataObject>) -> Stamp {
        let stamp = self.clock.touch();
        {
            let mut resource = self.resource.borrow_mut();
            resource.value = value;
            resource.stamp = stamp;
        }
        if let Some(node) = self.node.upgrade() {
            tracing::debug!(node = %node.id(), %stamp, "deferred resource changed");
            node.notify(stamp, ModifiedReason::Resource);
        }
        stamp
    }
}
