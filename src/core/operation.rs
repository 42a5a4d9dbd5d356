//! Deferred conditional operation
//!
//! An operation that, given a parameter, either rejects immediately or
//! schedules a one-shot timer. When the timer fires the operation emits its
//! marker line and resolves.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::core::transcript::SharedTranscript;

/// Parameters strictly above this value are rejected
pub const THRESHOLD: i64 = 4;

/// Simulated latency of the success path
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Marker emitted when the operation succeeds
pub const DEFAULT_MARKER: &str = "A";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    #[error("threshold exceeded")]
    ThresholdExceeded,

    /// The timer task was torn down (runtime shutdown) before it fired
    #[error("operation abandoned")]
    Abandoned,
}

pub type OperationResult = Result<(), OperationError>;

/// Whether `parameter` takes the rejection branch
pub fn exceeds_threshold(parameter: i64) -> bool {
    parameter > THRESHOLD
}

/// Single-shot handle to the outcome of one invocation
///
/// The receiving half of a oneshot channel. The sender is completed exactly
/// once, either at invocation time (rejection) or by the timer task.
/// Dropping the handle does not cancel the timer.
pub struct Deferred {
    rejected: bool,
    receiver: oneshot::Receiver<OperationResult>,
}

impl Deferred {
    fn rejected(err: OperationError) -> Self {
        let (sender, receiver) = oneshot::channel();
        // The receiver is alive, so the send cannot fail.
        let _ = sender.send(Err(err));
        Self {
            rejected: true,
            receiver,
        }
    }

    fn pending(receiver: oneshot::Receiver<OperationResult>) -> Self {
        Self {
            rejected: false,
            receiver,
        }
    }

    /// True when the outcome was decided at invocation time, before any delay
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }
}

impl Future for Deferred {
    type Output = OperationResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => {
                warn!("timer task dropped before firing");
                Poll::Ready(Err(OperationError::Abandoned))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

pub struct DeferredOperation {
    marker: String,
    delay: Duration,
    transcript: SharedTranscript,
}

impl DeferredOperation {
    pub fn new(marker: impl Into<String>, delay: Duration, transcript: SharedTranscript) -> Self {
        Self {
            marker: marker.into(),
            delay,
            transcript,
        }
    }

    /// Start the operation for `parameter`.
    ///
    /// Parameters above [`THRESHOLD`] reject before any timer is scheduled
    /// and emit nothing. Must be called from within a Tokio runtime.
    pub fn invoke(&self, parameter: i64) -> Deferred {
        if exceeds_threshold(parameter) {
            debug!(parameter, threshold = THRESHOLD, "rejecting without scheduling");
            return Deferred::rejected(OperationError::ThresholdExceeded);
        }
        debug!(parameter, "parameter within threshold");
        self.schedule()
    }

    /// Schedule the delayed success path unconditionally.
    ///
    /// The timer runs on its own task with its deadline fixed at call time.
    /// It emits the marker even if the returned handle is never awaited.
    pub fn schedule(&self) -> Deferred {
        let (sender, receiver) = oneshot::channel();
        let sleep = tokio::time::sleep(self.delay);
        let marker = self.marker.clone();
        let transcript = Arc::clone(&self.transcript);
        debug!(marker = %marker, delay_ms = self.delay.as_millis() as u64, "timer scheduled");

        tokio::spawn(async move {
            sleep.await;
            transcript.emit(&marker);
            debug!(marker = %marker, "timer fired");
            // Nobody may be listening any more; the marker is still emitted.
            let _ = sender.send(Ok(()));
        });

        Deferred::pending(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::MemoryTranscript;
    use tokio::time::Instant;

    fn assert_about(elapsed: Duration, expected: Duration) {
        assert!(
            elapsed >= expected && elapsed <= expected + Duration::from_millis(5),
            "elapsed {:?}, expected about {:?}",
            elapsed,
            expected
        );
    }

    fn operation(transcript: &Arc<MemoryTranscript>) -> DeferredOperation {
        DeferredOperation::new(DEFAULT_MARKER, DEFAULT_DELAY, transcript.clone())
    }

    #[test]
    fn test_threshold_boundary() {
        assert!(!exceeds_threshold(-3));
        assert!(!exceeds_threshold(0));
        assert!(!exceeds_threshold(4));
        assert!(exceeds_threshold(5));
        assert!(exceeds_threshold(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_emits_marker_after_delay() {
        let transcript = MemoryTranscript::shared();
        let op = operation(&transcript);

        for parameter in [-1, 0, 2, 4] {
            transcript.clear();
            let start = Instant::now();
            let deferred = op.invoke(parameter);
            assert!(!deferred.is_rejected());
            assert!(transcript.lines().is_empty());

            assert_eq!(deferred.await, Ok(()));
            assert_about(start.elapsed(), DEFAULT_DELAY);
            assert_eq!(transcript.lines(), vec!["A"]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_immediate_and_silent() {
        let transcript = MemoryTranscript::shared();
        let op = operation(&transcript);

        for parameter in [5, 8, i64::MAX] {
            let start = Instant::now();
            let deferred = op.invoke(parameter);
            assert!(deferred.is_rejected());

            assert_eq!(deferred.await, Err(OperationError::ThresholdExceeded));
            assert_eq!(start.elapsed(), Duration::ZERO);
        }
        assert!(transcript.lines().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_fixed_at_invocation() {
        let transcript = MemoryTranscript::shared();
        let op = operation(&transcript);

        let start = Instant::now();
        let deferred = op.invoke(1);
        tokio::time::sleep(Duration::from_millis(400)).await;
        deferred.await.unwrap();

        assert_about(start.elapsed(), DEFAULT_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_still_fires() {
        let transcript = MemoryTranscript::shared();
        let op = operation(&transcript);

        let deferred = op.invoke(2);
        drop(deferred);
        assert!(transcript.lines().is_empty());

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(transcript.lines(), vec!["A"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_rejection_stays_silent() {
        let transcript = MemoryTranscript::shared();
        let op = operation(&transcript);

        drop(op.invoke(8));
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(transcript.lines().is_empty());
    }

    #[test]
    fn test_error_has_no_payload() {
        assert_eq!(OperationError::ThresholdExceeded.to_string(), "threshold exceeded");
    }
}
