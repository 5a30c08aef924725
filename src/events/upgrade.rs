//! Upgrade event payload and headline construction.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, AppResult};

/// Resource type reported for control plane upgrades
pub const CONTROL_PLANE_RESOURCE_TYPE: &str = "MASTER";

/// Matches one `/nodePools/<name>` path segment and captures the name.
static NODE_POOL_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/nodePools/([^/]+)").expect("node pool pattern must compile")
});

/// Structured details carried in the `payload` attribute of an upgrade event.
///
/// Every field is optional on the wire; absent and `null` fields read as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpgradeDetails {
    /// `MASTER` or `NODE_POOL`
    #[serde(deserialize_with = "null_as_empty")]
    pub resource_type: String,
    /// Operation identifier, usable with `gcloud container operations`
    #[serde(deserialize_with = "null_as_empty")]
    pub operation: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub operation_start_time: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub current_version: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub target_version: String,
    /// Full resource path, e.g. `projects/p/locations/l/clusters/c/nodePools/np`
    #[serde(deserialize_with = "null_as_empty")]
    pub resource: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl UpgradeDetails {
    /// Parse the JSON payload of an upgrade event.
    ///
    /// # Errors
    /// `PayloadParse` when the payload is not a JSON object of the expected shape.
    pub fn parse(payload: &str) -> AppResult<Self> {
        serde_json::from_str(payload).map_err(|source| AppError::PayloadParse { source })
    }

    pub fn is_control_plane(&self) -> bool {
        self.resource_type == CONTROL_PLANE_RESOURCE_TYPE
    }

    /// Name of the upgraded node pool, taken from the last `/nodePools/` segment.
    ///
    /// # Errors
    /// `StructureNotFound` when the resource path has no node pool segment.
    pub fn node_pool_name(&self) -> AppResult<&str> {
        extract_node_pool(&self.resource).ok_or_else(|| AppError::StructureNotFound {
            resource_type: self.resource_type.clone(),
            resource: self.resource.clone(),
        })
    }

    /// One sentence describing the upgrade of the given cluster.
    pub fn headline(&self, cluster_name: &str) -> AppResult<String> {
        if self.is_control_plane() {
            return Ok(format!(
                "{} of cluster {} is upgrading from version {} to version {}.",
                self.resource_type, cluster_name, self.current_version, self.target_version
            ));
        }

        let node_pool = self.node_pool_name()?;
        Ok(format!(
            "{} {} of cluster {} is upgrading from version {} to version {}.",
            self.resource_type, node_pool, cluster_name, self.current_version, self.target_version
        ))
    }
}

/// Extract the name following the last `/nodePools/` segment of a resource path.
pub fn extract_node_pool(resource: &str) -> Option<&str> {
    NODE_POOL_SEGMENT
        .captures_iter(resource)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
