//! ExpressionFilter: applies a Rhai expression to its input.
//!
//! The `expression` parameter is evaluated with the input bound to `x`.
//! Scalars map to scalars; arrays are mapped element-wise. A connected
//! producer with no value empties the output.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::data::{DataObject, ParamValue};
use crate::pipeline::node::{Algorithm, ComputeContext};
use crate::pipeline::port::{DataKind, PortDescriptor};
use crate::scripting::ExpressionEngine;

static PORTS_IN: &[PortDescriptor] = &[PortDescriptor::input("in", DataKind::Any)];
static PORTS_OUT: &[PortDescriptor] = &[PortDescriptor::output("out", DataKind::Any)];

pub struct ExpressionFilter {
    initial: String,
    engine: ExpressionEngine,
}

impl ExpressionFilter {
    pub const EXPRESSION: &'static str = "expression";

    /// Identity filter (`x`).
    pub fn new() -> Self {
        Self::with_expression("x")
    }

    pub fn with_expression(expression: impl Into<String>) -> Self {
        Self {
            initial: expression.into(),
            engine: ExpressionEngine::new(),
        }
    }

    fn apply(&mut self, source: &str, input: &DataObject) -> PipelineResult<DataObject> {
        self.map_input(source, input)
            .map_err(|e| e.with_context(format!("expression '{}'", source)))
    }

    fn map_input(&mut self, source: &str, input: &DataObject) -> PipelineResult<DataObject> {
        let compiled = self.engine.compile(source)?;
        match input {
            DataObject::Scalar(x) => self.engine.evaluate(&compiled, *x).map(DataObject::Scalar),
            DataObject::Array(values) => values
                .iter()
                .map(|x| self.engine.evaluate(&compiled, *x))
                .collect::<PipelineResult<Vec<f64>>>()
                .map(DataObject::Array),
            other => Err(PipelineError::Script(format!(
                "cannot evaluate over {:?} data",
                other.kind()
            ))),
        }
    }
}

impl Default for ExpressionFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for ExpressionFilter {
    fn class_name(&self) -> &str {
        "ExpressionFilter"
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        PORTS_IN
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        PORTS_OUT
    }

    fn default_parameters(&self) -> Vec<(&'static str, ParamValue)> {
        vec![(Self::EXPRESSION, ParamValue::String(self.initial.clone()))]
    }

    fn request_data(&mut self, ctx: &mut ComputeContext<'_>) -> PipelineResult<()> {
        let source = ctx
            .params
            .get_str(Self::EXPRESSION)
            .ok_or_else(|| ctx.fail("parameter 'expression' must be a string"))?
            .to_string();

        let Some(input) = ctx.input(0).cloned() else {
            tracing::debug!(node = %ctx.node, "no input data, clearing output");
            return ctx.outputs.clear(0);
        };

        let result = self
            .apply(&source, &input)
            .map_err(|e| ctx.fail(e.to_string()))?;
        ctx.set_output(0, result)
    }
}
