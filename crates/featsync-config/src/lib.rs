//! Sync configuration loading.
//!
//! The config file keeps the JSON shape the source system's operators already
//! maintain: a `credentials` block, a `constants` block with the test plan id,
//! and a `paths` block naming the output folder for feature documents.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub credentials: Credentials,
    pub constants: Constants,
    pub paths: Paths,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// May be left empty in the file; the CLI then requires a flag or env var.
    #[serde(default)]
    pub personal_access_token: String,
    pub organization_name: String,
    pub project_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    #[serde(rename = "TestPlanId")]
    pub test_plan_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    /// Output folder for the generated `.feature` documents.
    pub tests: PathBuf,
}

/// Load configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {path:?}"))?;
    serde_json::from_str(&contents).with_context(|| format!("parse config file {path:?}"))
}
