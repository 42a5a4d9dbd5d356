use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{ChainArgs, OutputFormat};
use crate::config::{Config, validate_delay_ms, validate_marker};
use crate::core::chain::{ChainReport, run_chain};
use crate::core::transcript::{ConsoleTranscript, MemoryTranscript};

#[derive(Serialize)]
struct ChainOutput {
    completed: Vec<String>,
    lines: Vec<String>,
}

fn resolve_markers(config: &Config, args: &ChainArgs) -> Result<Vec<String>> {
    let markers = args
        .markers
        .clone()
        .unwrap_or_else(|| config.chain.markers.clone());

    for marker in &markers {
        validate_marker(marker)?;
    }
    Ok(markers)
}

pub async fn handle_chain_command(config: &Config, args: &ChainArgs) -> Result<ChainReport> {
    let markers = resolve_markers(config, args)?;
    let delay_ms = args.delay_ms.unwrap_or(config.general.delay_ms);
    validate_delay_ms(delay_ms)?;
    let delay = std::time::Duration::from_millis(delay_ms);

    match args.format {
        OutputFormat::Text => {
            let console = Arc::new(ConsoleTranscript::new(config.general.color));
            Ok(run_chain(&markers, delay, console).await)
        }
        OutputFormat::Json => {
            let memory = MemoryTranscript::shared();
            let report = run_chain(&markers, delay, memory.clone()).await;

            let output = ChainOutput {
                completed: report.completed.clone(),
                lines: memory.lines(),
            };
            let json = serde_json::to_string_pretty(&output)
                .context("Failed to serialize chain output to JSON")?;
            println!("{}", json);
            Ok(report)
        }
    }
}
