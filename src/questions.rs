//! Data-source question definitions.
//!
//! The walkthrough addresses questions by position, so the order of
//! `inputs` is part of the contract: region, cluster, secret, database.

use crate::{Result, WalkthroughError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Question asking for the cluster's region.
pub const REGION_QUESTION: usize = 0;
/// Question asking for the cluster.
pub const CLUSTER_QUESTION: usize = 1;
/// Question asking for the credential secret.
pub const SECRET_QUESTION: usize = 2;
/// Question asking for the database.
pub const DATABASE_QUESTION: usize = 3;

const BUNDLED: &str = include_str!("../resources/rds-datasource.json");

/// How a question is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Single selection from a list of choices
    List,
    /// Free text input
    Input,
}

/// One question definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    #[serde(rename = "type")]
    pub kind: QuestionKind,

    /// Answer field name
    pub key: String,

    /// Displayed message
    pub question: String,
}

/// Questions and selectable regions for the Aurora Serverless data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceMetadata {
    pub inputs: Vec<QuestionSpec>,
    pub available_regions: Vec<String>,
}

impl DataSourceMetadata {
    /// The metadata shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    /// Parses and validates metadata from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let metadata: Self = serde_json::from_str(json)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Reads metadata from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks that every question position the walkthrough uses is present
    /// and that there is at least one region to choose from.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.len() <= DATABASE_QUESTION {
            return Err(WalkthroughError::InvalidMetadata(format!(
                "expected {} questions (region, cluster, secret, database), found {}",
                DATABASE_QUESTION + 1,
                self.inputs.len()
            )));
        }

        if self.available_regions.is_empty() {
            return Err(WalkthroughError::InvalidMetadata(
                "availableRegions is empty".to_string(),
            ));
        }

        Ok(())
    }
}
