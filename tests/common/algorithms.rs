//! Small algorithms used to exercise the executor

use datavis_pipeline::pipeline::PortDescriptor;
use datavis_pipeline::{Algorithm, ComputeContext, DataKind, ParamValue, PipelineResult};

static SCALAR_OUT: &[PortDescriptor] = &[PortDescriptor::output("out", DataKind::Scalar)];
static SUM_IN: &[PortDescriptor] = &[
    PortDescriptor::input("terms", DataKind::Scalar).multiple(),
    PortDescriptor::input("bias", DataKind::Scalar).optional(),
];

/// Adds every value on its multi-slot `terms` input, the optional `bias`
/// input and its own `offset` parameter.
pub struct Sum;

impl Algorithm for Sum {
    fn class_name(&self) -> &str {
        "Sum"
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        SUM_IN
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        SCALAR_OUT
    }

    fn default_parameters(&self) -> Vec<(&'static str, ParamValue)> {
        vec![("offset", ParamValue::Float(0.0))]
    }

    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
        let terms: f64 = ctx
            .inputs(0)
            .flatten()
            .filter_map(|value| value.as_scalar())
            .sum();
        let bias = ctx.input(1).and_then(|value| value.as_scalar()).unwrap_or(0.0);
        let offset = ctx.params.get_float("offset").unwrap_or(0.0);
        ctx.set_output(0, terms + bias + offset)
    }
}

/// Fails while its `fail` parameter is true, otherwise emits 1.
pub struct Flaky;

impl Algorithm for Flaky {
    fn class_name(&self) -> &str {
        "Flaky"
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        &[]
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        SCALAR_OUT
    }

    fn default_parameters(&self) -> Vec<(&'static str, ParamValue)> {
        vec![("fail", ParamValue::Bool(true))]
    }

    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
        if ctx.params.get_bool("fail").unwrap_or(false) {
            return Err(ctx.fail("asked to fail"));
        }
        ctx.set_output(0, 1.0)
    }
}

static ANY_IN: &[PortDescriptor] = &[PortDescriptor::input("in", DataKind::Any)];

/// Copies whatever arrives on its input to a `Scalar` output, unchecked.
pub struct Passthrough;

impl Algorithm for Passthrough {
    fn class_name(&self) -> &str {
        "Passthrough"
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        ANY_IN
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        SCALAR_OUT
    }

    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
        let value = ctx.require_input(0)?.clone();
        ctx.set_output(0, value)
    }
}
