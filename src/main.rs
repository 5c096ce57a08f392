//! Pipeline demo - Main Entry Point
//!
//! Builds a small source → filter pipeline, shows recomputation and cache
//! hits in the log, and prints the JSON snapshot of the graph.
//!
//! Usage: `datavis-pipeline [config.toml]`

use anyhow::Context;
use datavis_pipeline::pipeline::nodes::{
    AppendFilter, CollectSink, DeferredSource, ExpressionFilter, ValueSource,
};
use datavis_pipeline::{ExecutorConfig, Executive};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,datavis_pipeline=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading executor config from {}", path);
            ExecutorConfig::load(&path).with_context(|| format!("loading {}", path))?
        }
        None => ExecutorConfig::default(),
    };
    tracing::info!(?config, "Starting pipeline demo");

    let exec = Executive::new(config);
    let source = exec.create(ValueSource::with_value(1.0));
    let filter = exec.create(ExpressionFilter::with_expression("x * 2.0"));
    filter.set_input_connection(0, &source.output_port(0)?)?;

    tracing::info!("first request: {:?}", filter.output_data(0)?);

    source.set_parameter(ValueSource::VALUE, 5.0);
    tracing::info!("cached after parameter change: {:?}", filter.cached_output(0));
    tracing::info!("after update: {:?}", filter.output_data(0)?);

    // Fan-in with a late-arriving resource
    let (deferred, handle) = DeferredSource::create(&exec);
    let append = exec.create(AppendFilter::new());
    append.add_input_connection(0, &filter.output_port(0)?)?;
    append.add_input_connection(0, &deferred.output_port(0)?)?;

    let (sink, history) = CollectSink::create(&exec);
    sink.set_input_connection(0, &append.output_port(0)?)?;

    sink.update()?;
    handle.deliver(vec![7.0, 8.0]);
    sink.update()?;
    sink.update()?;
    tracing::info!(
        "sink saw {} values, last {:?}",
        history.len(),
        history.last()
    );

    let order: Vec<String> = sink
        .upstream_order()?
        .iter()
        .map(|node| format!("{}:{}", node.id(), node.class_name()))
        .collect();
    tracing::info!("upstream order: {}", order.join(" -> "));

    println!("{}", sink.snapshot().to_json()?);

    tracing::info!("Done");
    Ok(())
}
