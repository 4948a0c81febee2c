//! Project metadata (`amplify-meta.json`) as seen by the walkthrough.

use crate::{Result, WalkthroughError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Category holding GraphQL/REST API resources.
pub const API_CATEGORY: &str = "api";

/// Service tag of the API resources a data source can be attached to.
pub const APPSYNC_SERVICE: &str = "AppSync";

/// Provider whose configuration carries the project region.
pub const CLOUDFORMATION_PROVIDER: &str = "awscloudformation";

/// Location of the metadata file relative to the project root.
pub const META_FILE: &str = "amplify/backend/amplify-meta.json";

/// A provider entry under `providers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderMeta {
    #[serde(rename = "Region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A resource entry under a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_plugin: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Parsed project metadata. Read-only to the walkthrough.
///
/// Only `providers` and the resources of the category being looked up are
/// given a shape; every other key is kept as raw JSON, so categories the
/// walkthrough never reads cannot make parsing fail.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectMetadata {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub providers: BTreeMap<String, ProviderMeta>,

    /// Every other top-level key, typically a category of resources.
    #[serde(flatten)]
    pub categories: serde_json::Map<String, Value>,
}

/// Deserializes a JSON object into typed entries, dropping entries that do
/// not fit `T`. Anything but an object yields an empty map.
fn lenient_entries<'de, D, T>(deserializer: D) -> std::result::Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(typed_entries(&value))
}

fn typed_entries<T: DeserializeOwned>(value: &Value) -> BTreeMap<String, T> {
    let Some(entries) = value.as_object() else {
        return BTreeMap::new();
    };

    entries
        .iter()
        .filter_map(|(name, entry)| {
            if !entry.is_object() {
                debug!(%name, "skipping non-object metadata entry");
                return None;
            }
            serde_json::from_value(entry.clone())
                .ok()
                .map(|typed| (name.clone(), typed))
        })
        .collect()
}

impl ProjectMetadata {
    /// Parses metadata from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads `amplify/backend/amplify-meta.json` under a project root.
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self> {
        let path = Self::path_in(project_dir);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WalkthroughError::InvalidMetadata(format!(
                    "project metadata not found at {} (is this an initialized project?)",
                    path.display()
                ))
            } else {
                WalkthroughError::Io(e)
            }
        })?;
        Self::from_json(&json)
    }

    /// Path of the metadata file for a project root.
    pub fn path_in(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(META_FILE)
    }

    /// Region configured for the CloudFormation provider.
    pub fn region(&self) -> Option<&str> {
        self.providers
            .get(CLOUDFORMATION_PROVIDER)
            .and_then(|p| p.region.as_deref())
    }

    /// Resources of a category, if the category exists. Entries that are
    /// not resource objects are left out.
    pub fn category(&self, name: &str) -> Option<BTreeMap<String, ResourceMeta>> {
        self.categories.get(name).map(typed_entries)
    }

    /// First resource in `category` tagged with `service`, in name order.
    pub fn find_resource(&self, category: &str, service: &str) -> Option<&str> {
        self.categories
            .get(category)?
            .as_object()?
            .iter()
            .filter(|(_, resource)| resource.get("service").and_then(Value::as_str) == Some(service))
            .map(|(name, _)| name.as_str())
            .min()
    }

    /// Name of the AppSync API resource the data source will belong to.
    pub fn appsync_api(&self) -> Option<&str> {
        self.find_resource(API_CATEGORY, APPSYNC_SERVICE)
    }
}
