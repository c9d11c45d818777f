//! # mackerel-agent plugin contract
//!
//! The agent runs a plugin as a short lived command and reads its stdout. A plugin
//! has to answer two questions:
//!
//! - **What does it report?** When the agent sets `MACKEREL_AGENT_PLUGIN_META`, the
//!   plugin prints a `# mackerel-agent-plugin` header followed by a JSON document
//!   describing its graphs and their metrics.
//! - **What are the current values?** Otherwise the plugin prints one
//!   `name\tvalue\ttimestamp` line per metric.
//!
//! Implement [`Plugin`] and hand it to a [`Runner`] to get both behaviours.

#[macro_use]
extern crate tracing;

mod graph;
mod runner;

pub use graph::{
    Graph,
    Metric,
    Unit,
};
pub use runner::{
    meta_requested,
    Runner,
    META_ENV,
    META_HEADER,
};
use std::collections::HashMap;

/// The capabilities the agent expects from a plugin.
pub trait Plugin {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Collect the current metric values, keyed by metric name.
    fn fetch_metrics(&self) -> Result<HashMap<String, f64>, Self::Error>;

    /// Describe the graphs the metrics belong to, keyed by graph name.
    fn graph_definition(&self) -> HashMap<String, Graph>;

    /// Namespace prepended to every graph and metric key.
    fn metric_key_prefix(&self) -> &str;
}
