//! Command implementations.

mod config;
mod summarize;

pub use config::run_config;
pub use summarize::run_summarize;
