//! ValueSource: emits its `value` parameter.

use crate::error::PipelineResult;
use crate::pipeline::data::ParamValue;
use crate::pipeline::node::{Algorithm, ComputeContext};
use crate::pipeline::port::{DataKind, PortDescriptor};

static PORTS: &[PortDescriptor] = &[PortDescriptor::output("out", DataKind::Any)];

/// Source node with no inputs; its single output is the `value` parameter.
///
/// Removing the parameter empties the output.
pub struct ValueSource {
    initial: ParamValue,
}

impl ValueSource {
    pub const VALUE: &'static str = "value";

    pub fn new() -> Self {
        Self::with_value(0.0)
    }

    pub fn with_value(value: impl Into<ParamValue>) -> Self {
        Self {
            initial: value.into(),
        }
    }
}

impl Default for ValueSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for ValueSource {
    fn class_name(&self) -> &str {
        "ValueSource"
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        &[]
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn default_parameters(&self) -> Vec<(&'static str, ParamValue)> {
        vec![(Self::VALUE, self.initial.clone())]
    }

    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
        match ctx.params.get(Self::VALUE).map(ParamValue::to_data) {
            Some(value) => ctx.set_output(0, value),
            None => ctx.outputs.clear(0),
        }
    }
}
