//! AppendFilter: concatenates every connected input into one array.

use crate::error::PipelineResult;
use crate::pipeline::data::DataObject;
use crate::pipeline::node::{Algorithm, ComputeContext};
use crate::pipeline::port::{DataKind, PortDescriptor};

static PORTS_IN: &[PortDescriptor] = &[PortDescriptor::input("in", DataKind::Any).multiple()];
static PORTS_OUT: &[PortDescriptor] = &[PortDescriptor::output("out", DataKind::Array)];

/// Filter with one multi-slot input. Scalars and arrays from each slot are
/// appended in slot order; slots whose producer has no value are skipped.
#[derive(Default)]
pub struct AppendFilter;

impl AppendFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Algorithm for AppendFilter {
    fn class_name(&self) -> &str {
        "AppendFilter"
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        PORTS_IN
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        PORTS_OUT
    }

    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
        let mut merged = Vec::new();
        for (slot, value) in ctx.inputs(0).enumerate() {
            match value {
                Some(DataObject::Scalar(x)) => merged.push(*x),
                Some(DataObject::Array(values)) => merged.extend_from_slice(values),
                Some(other) => {
                    return Err(ctx.fail(format!("slot {} holds {:?} data", slot, other.kind())));
                }
                None => {}
            }
        }
        ctx.set_output(0, merged)
    }
}
