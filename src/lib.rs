//! gke-event-notifier
//!
//! Receives GKE cluster notifications from a Pub/Sub push subscription and
//! relays them to Slack as Block Kit messages.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod external;
pub mod logger;
pub mod server;
pub mod services;
pub mod state;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
