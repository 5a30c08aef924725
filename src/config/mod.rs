//! Configuration management
//!
//! Settings are loaded in layers, lowest priority first:
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml` (not committed to version control)
//! 4. `GKE_NOTIFIER_*` environment variables
//! 5. `SLACK_WEBHOOK`, `PROJECT_ID` and `PORT`, the variables the deployment platform sets
//!
//! Every layer is optional; all settings have defaults.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{ApplicationConfig, LoggerSettings, NotifierConfig, ServerConfig, Settings};
