//! Worker manifest persistence.
//!
//! Scanning is an offline step: `team-planner scan` writes the discovered
//! capability records to a YAML manifest, and `team-planner run` loads that
//! manifest at start. The running pipeline never parses worker source itself.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use team_planner_sdk::CapabilityRecord;

/// Default manifest file name, resolved against the working directory.
pub const DEFAULT_MANIFEST_FILE: &str = "workers.yaml";

/// On-disk manifest: a scan timestamp plus the records, sorted by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub workers: Vec<CapabilityRecord>,
}

impl Manifest {
    pub fn new(mut workers: Vec<CapabilityRecord>) -> Self {
        workers.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            generated_at: Utc::now(),
            workers,
        }
    }
}

/// Write the manifest as YAML, creating parent directories as needed.
pub fn save_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(manifest).context("Failed to serialize worker manifest")?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(())
}

/// Load the manifest written by a previous scan.
pub fn load_manifest(path: &Path) -> Result<Vec<CapabilityRecord>> {
    if !path.exists() {
        anyhow::bail!(
            "Worker manifest not found at {}. Run `team-planner scan` first or specify with --manifest.",
            path.display()
        );
    }
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest from {}", path.display()))?;
    let manifest: Manifest =
        serde_yaml::from_str(&yaml).context("Failed to parse worker manifest YAML")?;
    Ok(manifest.workers)
}
