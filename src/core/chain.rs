//! Sequential chain of deferred operations
//!
//! Each marker gets its own operation; operations are awaited one after
//! another, so the next timer is only scheduled once the previous one fired.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::core::operation::DeferredOperation;
use crate::core::transcript::{DONE_LINE, SharedTranscript};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChainReport {
    pub completed: Vec<String>,
}

pub async fn run_chain(
    markers: &[String],
    delay: Duration,
    transcript: SharedTranscript,
) -> ChainReport {
    let mut report = ChainReport::default();

    for marker in markers {
        let operation = DeferredOperation::new(marker.as_str(), delay, transcript.clone());
        // The unconditional path cannot reject.
        if operation.schedule().await.is_ok() {
            report.completed.push(marker.clone());
        }
    }

    transcript.emit(DONE_LINE);
    info!(steps = report.completed.len(), "chain finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operation::DEFAULT_DELAY;
    use crate::core::transcript::MemoryTranscript;
    use tokio::time::Instant;

    fn markers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_chain_runs_in_order() {
        let transcript = MemoryTranscript::shared();
        let start = Instant::now();

        let report = run_chain(&markers(&["A", "B", "C", "D"]), DEFAULT_DELAY, transcript.clone()).await;

        assert_eq!(report.completed, markers(&["A", "B", "C", "D"]));
        assert_eq!(transcript.lines(), vec!["A", "B", "C", "D", "Done!"]);

        let elapsed = start.elapsed();
        assert!(elapsed >= DEFAULT_DELAY * 4);
        assert!(elapsed < DEFAULT_DELAY * 4 + Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_chain_only_cleans_up() {
        let transcript = MemoryTranscript::shared();
        let report = run_chain(&[], DEFAULT_DELAY, transcript.clone()).await;

        assert!(report.completed.is_empty());
        assert_eq!(transcript.lines(), vec!["Done!"]);
    }
}
