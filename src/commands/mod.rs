pub mod chain;
pub mod configure;
pub mod run;
