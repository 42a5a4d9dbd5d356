//! Caller that awaits a deferred operation and reports its outcome
//!
//! Each invocation walks `Pending -> {Succeeded | Failed} -> CleanedUp`.
//! The cleanup line is owned by a guard so it is emitted on every path.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::operation::DeferredOperation;
use crate::core::transcript::{DONE_LINE, REJECT_LINE, RESOLVE_LINE, SharedTranscript};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Pending,
    Succeeded,
    Failed,
    CleanedUp,
}

impl Phase {
    /// Transitions allowed within a single invocation; there is no way back
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Pending, Phase::Succeeded)
                | (Phase::Pending, Phase::Failed)
                | (Phase::Succeeded, Phase::CleanedUp)
                | (Phase::Failed, Phase::CleanedUp)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::CleanedUp
    }
}

impl From<Outcome> for Phase {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Succeeded => Phase::Succeeded,
            Outcome::Failed => Phase::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub parameter: i64,
    pub outcome: Outcome,
    /// Phase reached when the run returned; always `CleanedUp`
    pub phase: Phase,
}

/// Tracks the phase of one invocation and owns the cleanup line
///
/// `finish` emits it on the normal path; `Drop` emits it if the guard is
/// torn down before reaching `CleanedUp`.
struct CleanupGuard {
    transcript: SharedTranscript,
    phase: Phase,
}

impl CleanupGuard {
    fn new(transcript: SharedTranscript) -> Self {
        Self {
            transcript,
            phase: Phase::Pending,
        }
    }

    fn advance(&mut self, next: Phase) -> bool {
        if !self.phase.can_transition_to(next) {
            warn!(from = ?self.phase, to = ?next, "ignoring invalid phase transition");
            return false;
        }
        debug!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
        true
    }

    fn cleanup(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.transcript.emit(DONE_LINE);
        self.phase = Phase::CleanedUp;
    }

    fn finish(mut self) -> Phase {
        self.cleanup();
        self.phase
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Invoke `operation` once with `parameter`, await it, and report.
///
/// Emits `Resolve!` or `Reject!`, then `Done!` exactly once.
pub async fn run(
    operation: &DeferredOperation,
    parameter: i64,
    transcript: SharedTranscript,
) -> RunReport {
    let mut guard = CleanupGuard::new(transcript.clone());

    let outcome = match operation.invoke(parameter).await {
        Ok(()) => {
            transcript.emit(RESOLVE_LINE);
            Outcome::Succeeded
        }
        Err(err) => {
            debug!(error = %err, "operation rejected");
            transcript.emit(REJECT_LINE);
            Outcome::Failed
        }
    };

    guard.advance(Phase::from(outcome));
    let phase = guard.finish();
    info!(parameter, ?outcome, "run finished");

    RunReport {
        parameter,
        outcome,
        phase,
    }
}
