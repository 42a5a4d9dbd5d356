use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{OutputFormat, RunArgs};
use crate::config::{Config, validate_delay_ms, validate_marker};
use crate::core::caller::{Outcome, Phase, RunReport, run};
use crate::core::operation::DeferredOperation;
use crate::core::transcript::{ConsoleTranscript, MemoryTranscript, SharedTranscript};

/// Settings for one run after merging CLI flags over config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub parameter: i64,
    pub delay: Duration,
    pub marker: String,
}

impl RunSettings {
    pub fn resolve(config: &Config, args: &RunArgs) -> Result<Self> {
        let marker = args
            .marker
            .clone()
            .unwrap_or_else(|| config.general.marker.clone());
        validate_marker(&marker)?;

        let delay_ms = args.delay_ms.unwrap_or(config.general.delay_ms);
        validate_delay_ms(delay_ms)?;

        Ok(Self {
            parameter: args.number.unwrap_or(config.general.parameter),
            delay: Duration::from_millis(delay_ms),
            marker,
        })
    }
}

#[derive(Serialize)]
struct RunOutput {
    parameter: i64,
    outcome: Outcome,
    phase: Phase,
    lines: Vec<String>,
}

pub async fn execute_run(settings: &RunSettings, transcript: SharedTranscript) -> RunReport {
    let operation = DeferredOperation::new(settings.marker.as_str(), settings.delay, transcript.clone());
    run(&operation, settings.parameter, transcript).await
}

pub async fn handle_run_command(config: &Config, args: &RunArgs) -> Result<RunReport> {
    let settings = RunSettings::resolve(config, args)?;

    match args.format {
        OutputFormat::Text => {
            let console = Arc::new(ConsoleTranscript::new(config.general.color));
            Ok(execute_run(&settings, console).await)
        }
        OutputFormat::Json => {
            let memory = MemoryTranscript::shared();
            let report = execute_run(&settings, memory.clone()).await;

            let output = RunOutput {
                parameter: report.parameter,
                outcome: report.outcome,
                phase: report.phase,
                lines: memory.lines(),
            };
            let json = serde_json::to_string_pretty(&output)
                .context("Failed to serialize run output to JSON")?;
            println!("{}", json);
            Ok(report)
        }
    }
}
