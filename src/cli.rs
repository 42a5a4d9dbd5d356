use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use anyhow::Result;
use crate::config::Config;
use crate::commands::{chain, configure, run};

#[derive(Parser)]
#[command(name = "deferred-op")]
#[command(about = "Run a deferred conditional operation and report its outcome")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable diagnostic logging on stderr")]
    pub debug: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Commands {
    /// No subcommand runs the operation with configured defaults
    pub fn or_default(command: Option<Commands>) -> Commands {
        command.unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    pub async fn execute(self, config: Config, config_path: PathBuf) -> Result<()> {
        match self {
            Commands::Run(args) => {
                run::handle_run_command(&config, &args).await?;
            }
            Commands::Chain(args) => {
                chain::handle_chain_command(&config, &args).await?;
            }
            Commands::Config(args) => {
                configure::handle_config_command(&config, &config_path, &args.command)?;
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Invoke the deferred operation once and report the outcome (default)
    Run(RunArgs),

    /// Await a sequence of deferred operations one after another
    Chain(ChainArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Stream lines to stdout as they happen
    #[default]
    Text,
    /// Print a single JSON document once finished
    Json,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[arg(short = 'n', long, allow_negative_numbers = true, help = "Parameter passed to the operation")]
    pub number: Option<i64>,

    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    #[arg(short, long)]
    pub marker: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Default)]
pub struct ChainArgs {
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    #[arg(short, long, value_delimiter = ',', help = "Comma separated markers, e.g. A,B,C")]
    pub markers: Option<Vec<String>>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}
