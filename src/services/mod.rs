//! Service layer.
//!
//! Services coordinate the pure event formatting with outbound delivery.

pub mod notifications;

pub use notifications::NotificationService;
