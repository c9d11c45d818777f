use color_eyre::Result;
use mackerel_plugin_sendgrid::{
    init_logging,
    Args,
    Runner,
    SendgridPlugin,
};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse_compat();
    init_logging(args.verbose)?;
    Runner::new(SendgridPlugin::new(args.metric_key_prefix, args.sendgrid_apikey)).run()
}
