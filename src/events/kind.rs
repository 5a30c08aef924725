//! Event classification by type marker.

use std::fmt;

/// Marker carried by cluster and node-pool upgrade notifications,
/// e.g. `type.googleapis.com/google.container.v1beta1.UpgradeEvent`.
const UPGRADE_MARKER: &str = "UpgradeEvent";

/// Marker carried by security bulletin notifications.
const SECURITY_BULLETIN_MARKER: &str = "SecurityBulletinEvent";

/// Kind of a cluster notification, derived from its `type_url` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Control plane or node pool version transition
    Upgrade,
    /// Security bulletin for the cluster
    SecurityBulletin,
    /// Any other marker, kept verbatim for logging
    Unrecognized(String),
}

impl EventKind {
    /// Classify a type marker.
    pub fn from_type_url(type_url: &str) -> Self {
        if type_url.contains(UPGRADE_MARKER) {
            EventKind::Upgrade
        } else if type_url.contains(SECURITY_BULLETIN_MARKER) {
            EventKind::SecurityBulletin
        } else {
            EventKind::Unrecognized(type_url.to_string())
        }
    }

    /// Whether the event carries a structured upgrade payload.
    pub fn is_upgrade(&self) -> bool {
        matches!(self, EventKind::Upgrade)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Upgrade => "upgrade",
            EventKind::SecurityBulletin => "security_bulletin",
            EventKind::Unrecognized(_) => "unrecognized",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
