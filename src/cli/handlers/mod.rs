//! Command handlers for CLI operations

pub mod format;
pub mod serve;

pub use format::FormatCommandHandler;
pub use serve::ServeCommandHandler;
