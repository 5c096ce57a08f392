//! Built-in pipeline node implementations.

pub mod append_filter;
pub mod collect_sink;
pub mod deferred_source;
pub mod expression_filter;
pub mod value_source;

pub use append_filter::AppendFilter;
pub use collect_sink::{CollectHandle, CollectSink};
pub use deferred_source::{DeferredHandle, DeferredSource};
pub use expression_filter::ExpressionFilter;
pub use value_source::ValueSource;
