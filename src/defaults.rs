//! Default values for a new Aurora Serverless data source resource.

use crate::project::ProjectMetadata;
use serde::{Deserialize, Serialize};

/// Prefix of the generated IAM policy name.
pub const POLICY_NAME_PREFIX: &str = "rds-policy-";

/// A reference to an infrastructure-template parameter, serialized as
/// `{"Ref": "<name>"}`. It is a placeholder, not a resolved value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateRef {
    #[serde(rename = "Ref")]
    pub name: String,
}

impl TemplateRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Defaults used when scaffolding the data source resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultValues {
    pub resource_name: String,
    pub policy_name: String,
    pub region: String,
    pub auth_role_name: TemplateRef,
    pub unauth_role_name: TemplateRef,
}

/// Source of default values for the walkthrough.
pub trait DefaultsSource {
    fn defaults(&self, project: &ProjectMetadata) -> DefaultValues;
}

/// Defaults for the Aurora Serverless (RDS) data source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RdsDefaults;

impl DefaultsSource for RdsDefaults {
    fn defaults(&self, project: &ProjectMetadata) -> DefaultValues {
        let id = short_id();
        DefaultValues {
            policy_name: format!("{}{}", POLICY_NAME_PREFIX, id),
            resource_name: id,
            region: project.region().unwrap_or_default().to_string(),
            auth_role_name: TemplateRef::new("AuthRoleName"),
            unauth_role_name: TemplateRef::new("UnauthRoleName"),
        }
    }
}

/// First group of a random v4 UUID: 8 lowercase hex characters.
///
/// Collisions are possible; this is a naming convenience, not an identity.
pub fn short_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
