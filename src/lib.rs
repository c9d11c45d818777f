//! # mackerel-plugin-sendgrid
//!
//! Reports the previous day's SendGrid delivery statistics to mackerel-agent.
//!
//! - **`stats`**: one authenticated request to `/v3/stats` for yesterday, flattened
//!   into `name -> value`
//! - **`graph`**: the static `global` graph with its fifteen counters
//! - **`plugin`**: [`SendgridPlugin`], which the [`Runner`] drives
//!
//! ```bash
//! mackerel-plugin-sendgrid --sendgrid-apikey=SG.xxxx
//! MACKEREL_AGENT_PLUGIN_META=1 mackerel-plugin-sendgrid
//! ```

#[macro_use]
extern crate tracing;

mod args;
pub mod graph;
mod logging;
pub mod plugin;
pub mod stats;

pub use args::Args;
pub use logging::init_logging;
pub use mackerel_plugin_host::Runner;
pub use plugin::SendgridPlugin;
pub use stats::{
    FetchError,
    StatsFetcher,
};
