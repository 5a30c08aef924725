//! Request and response bodies.
//!
//! - `pubsub` - push request envelope
//! - `health` - probe responses
//! - `error` - common error body

mod error;
mod health;
mod pubsub;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pubsub::PushRequest;
