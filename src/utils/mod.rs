pub mod error;
pub mod logging;
pub mod output;

pub use error::*;
pub use output::*;
