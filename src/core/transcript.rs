//! Line sinks for everything the program reports
//!
//! Every observable line (markers, outcome lines, cleanup) flows through a
//! [`Transcript`]. The console implementation prints as lines arrive; the
//! in-memory implementation records them for tests and JSON output.

use std::io::Write;
use std::sync::{Arc, Mutex};

use colored::ColoredString;

use crate::utils::output::OutputStyle;

/// Line emitted when the deferred operation succeeds
pub const RESOLVE_LINE: &str = "Resolve!";
/// Line emitted when the deferred operation fails
pub const REJECT_LINE: &str = "Reject!";
/// Cleanup line emitted on every path
pub const DONE_LINE: &str = "Done!";

/// Sink for transcript lines
///
/// Shared across the timer and the awaiting caller, hence `Send + Sync`.
pub trait Transcript: Send + Sync {
    /// Emit a single line
    fn emit(&self, line: &str);
}

/// Shared handle to a transcript
pub type SharedTranscript = Arc<dyn Transcript>;

/// Writes lines straight to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTranscript {
    styled: bool,
}

impl ConsoleTranscript {
    pub fn new(styled: bool) -> Self {
        Self { styled }
    }

    fn style(&self, line: &str) -> ColoredString {
        if !self.styled {
            return OutputStyle::content(line);
        }
        match line {
            RESOLVE_LINE => OutputStyle::success(line),
            REJECT_LINE => OutputStyle::error(line),
            DONE_LINE => OutputStyle::muted(line),
            _ => OutputStyle::content(line),
        }
    }
}

/// Write one line, dropping write errors
///
/// `emit` also runs from the cleanup guard's `Drop`, where a panic during
/// unwinding would abort the process.
fn write_line(out: &mut impl Write, line: ColoredString) {
    let _ = writeln!(out, "{}", line);
}

impl Transcript for ConsoleTranscript {
    fn emit(&self, line: &str) {
        write_line(&mut std::io::stdout().lock(), self.style(line));
    }
}

/// Records lines in emission order
#[derive(Debug, Default)]
pub struct MemoryTranscript {
    lines: Mutex<Vec<String>>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Snapshot of all lines recorded so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Transcript for MemoryTranscript {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}
