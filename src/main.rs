use anyhow::Result;
use clap::Parser;

use deferred_op::cli::{Cli, Commands};
use deferred_op::config::Config;
use deferred_op::utils::{logging, report_error, set_color_enabled};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.debug);

    let config_path = cli.config.clone().unwrap_or_else(Config::config_file_path);
    let mut config = match Config::load_custom(&config_path) {
        Ok(config) => config,
        Err(err) => {
            report_error(&err);
            std::process::exit(1);
        }
    };

    if cli.no_color {
        config.general.color = false;
    }
    set_color_enabled(config.general.color);

    let command = Commands::or_default(cli.command);
    command.execute(config, config_path).await?;

    Ok(())
}
