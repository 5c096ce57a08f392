//! Demand-driven dataflow pipeline.
//!
//! Nodes are connected output-to-input into a directed acyclic graph.
//! Nothing is pushed: asking a node for its output (`update()`,
//! `output_data()`) walks upstream, recomputes exactly the nodes whose
//! inputs or parameters changed since their last run, and serves
//! everything else from cache.
//!
//! # Architecture
//!
//! ```text
//! [ValueSource] ──► [ExpressionFilter] ──► [AppendFilter] ──► [CollectSink]
//! [DeferredSource] ─────────────────────────────┘
//! ```
//!
//! # Design
//!
//! - **Logical clock**: every change takes a fresh `Stamp` from the
//!   executive's `ModificationClock`; staleness is a stamp comparison.
//! - **Shared handles**: `Node` is a cheap `Rc` handle; consumers keep
//!   their producers alive through their input connections.
//! - **Algorithm trait**: node behavior lives behind `Algorithm`, the
//!   engine owns wiring, parameters and caching.
//! - **Explicit state**: clock, id allocator and `ExecutorConfig` travel
//!   together in an `Executive`, never in globals.

pub mod clock;
pub mod connection;
pub mod data;
pub mod events;
pub mod executor;
pub mod id;
pub mod node;
pub mod node_type;
pub mod nodes;
pub mod port;
pub mod snapshot;
pub mod topology;

pub use clock::{ModificationClock, Stamp};
pub use connection::{Connection, OutputPort};
pub use data::{DataObject, ParamValue, ParameterBag};
pub use events::{ModifiedEvent, ModifiedReason};
pub use executor::{Executive, UpdateOutcome};
pub use id::NodeId;
pub use node::{Algorithm, ComputeContext, InputValues, Node, OutputWriter, WeakNode};
pub use node_type::NodeKind;
pub use port::{Cardinality, DataKind, PortDescriptor, PortDirection};
pub use snapshot::{EdgeSnapshot, NodeSnapshot, PipelineSnapshot};
pub use topology::{UpstreamEdge, UpstreamGraph};
