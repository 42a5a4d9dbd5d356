//! deferred-op - deferred conditional operations with guaranteed cleanup
//!
//! A deferred operation either rejects immediately or resolves after a
//! simulated delay. A caller awaits it, reports the outcome, and always
//! emits a cleanup line last.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod utils;

// Re-export core types for easier use
pub use self::core::{
    caller::{Outcome, Phase, RunReport, run},
    chain::{ChainReport, run_chain},
    operation::{Deferred, DeferredOperation, OperationError, THRESHOLD},
    transcript::{ConsoleTranscript, MemoryTranscript, SharedTranscript, Transcript},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
