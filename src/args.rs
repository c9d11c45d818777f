use clap::Parser;
use std::ffi::OsString;

const LONG_FLAGS: [&str; 2] = ["metric-key-prefix", "sendgrid-apikey"];

/// mackerel-agent plugin reporting yesterday's SendGrid statistics
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Metric key prefix
    #[arg(long = "metric-key-prefix", env = "METRIC_KEY_PREFIX", default_value = "sendgrid")]
    pub metric_key_prefix: String,

    /// API key of Sendgrid (needs access permission to get Stats)
    #[arg(long = "sendgrid-apikey", env = "SENDGRID_APIKEY", default_value = "", hide_env_values = true)]
    pub sendgrid_apikey: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse the process arguments, also accepting the single dash form
    /// (`-sendgrid-apikey=...`) used in existing agent configurations.
    pub fn parse_compat() -> Self {
        Self::parse_from(normalize(std::env::args_os()))
    }
}

fn normalize(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(flag) = text.strip_prefix('-').filter(|rest| !rest.starts_with('-')) else {
                return arg;
            };
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}
