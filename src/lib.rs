//! # datavis-pipeline: demand-driven dataflow engine
//!
//! A small pull-based pipeline: sources, filters and sinks are wired
//! output-to-input, and asking any node for its output recomputes only
//! the stale part of its upstream graph.
//!
//! ## Architecture
//!
//! - **Pipeline**: `Node` handles, the `Algorithm` compute trait, ports and
//!   connections, the update traversal and its logical modification clock
//! - **Nodes**: built-in sources, filters and sinks
//! - **Scripting**: Rhai expressions used by `ExpressionFilter`
//! - **Config**: `ExecutorConfig`, loaded from TOML
//!
//! ## Example
//!
//! ```
//! use datavis_pipeline::pipeline::nodes::{ExpressionFilter, ValueSource};
//! use datavis_pipeline::{DataObject, Executive};
//!
//! let exec = Executive::default();
//! let source = exec.create(ValueSource::with_value(1.0));
//! let filter = exec.create(ExpressionFilter::with_expression("x * 2.0"));
//! filter.set_input_connection(0, &source.output_port(0)?)?;
//!
//! assert_eq!(filter.output_data(0)?.as_deref(), Some(&DataObject::Scalar(2.0)));
//!
//! source.set_parameter("value", 5.0);
//! assert_eq!(filter.output_data(0)?.as_deref(), Some(&DataObject::Scalar(10.0)));
//! # Ok::<(), datavis_pipeline::PipelineError>(())
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod scripting;

// Re-export commonly used types
pub use config::{ExecutorConfig, MissingInputPolicy};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{
    Algorithm, ComputeContext, DataKind, DataObject, Executive, Node, NodeId, NodeKind,
    ParamValue, PortDescriptor, Stamp, UpdateOutcome,
};
pub use scripting::ExpressionEngine;
