//! Core async logic
//!
//! The deferred operation, the caller that awaits it, the sequential chain,
//! and the transcript every observable line is written to.

pub mod caller;
pub mod chain;
pub mod operation;
pub mod transcript;
