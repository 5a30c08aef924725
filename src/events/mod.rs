//! GKE cluster notification events and their chat rendering.
//!
//! An [`EventEnvelope`] is classified into an [`EventKind`] and turned into a
//! [`WebhookMessage`] by the [`EventFormatter`]. Nothing here performs I/O.

mod envelope;
mod formatter;
mod kind;
mod message;
mod upgrade;

pub use envelope::{
    ATTR_CLUSTER_LOCATION, ATTR_CLUSTER_NAME, ATTR_PAYLOAD, ATTR_TYPE_URL, EventEnvelope,
    PubsubMessage,
};
pub use formatter::EventFormatter;
pub use kind::EventKind;
pub use message::{Block, HEADER_MAX_CHARS, TextKind, TextObject, WebhookMessage};
pub use upgrade::{CONTROL_PLANE_RESOURCE_TYPE, UpgradeDetails, extract_node_pool};
