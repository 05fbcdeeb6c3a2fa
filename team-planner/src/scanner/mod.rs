//! Static discovery of worker capabilities.
//!
//! The scanner walks a directory tree of worker-definition sources and emits
//! one [`CapabilityRecord`] per discovered worker. Files are independent: a
//! file that fails to parse contributes a [`ParseFailure`] and nothing else,
//! and every other file's records are retained. Per-file work fans out on
//! blocking tasks; the merge is deterministic regardless of completion order.

pub mod extract;
pub mod manifest;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use team_planner_sdk::CapabilityRecord;

/// One source file the scanner could not use.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of scanning a directory tree.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Discovered workers, in scan order (first appearance wins the slot,
    /// last definition wins the content).
    pub records: Vec<CapabilityRecord>,
    /// Files skipped because they could not be read or parsed.
    pub failures: Vec<ParseFailure>,
    /// Worker names that were defined more than once across the tree.
    pub duplicates: Vec<String>,
}

/// Recursively collect `.rs` files under `root`, sorted for a stable scan
/// order.
pub fn collect_rust_sources(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_into(&path, files)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
            files.push(path);
        }
    }
    Ok(())
}

/// Scan every worker-definition source under `root`.
///
/// Per-file extraction runs on blocking tasks in parallel; results are merged
/// back in file order so the report does not depend on scheduling.
pub async fn scan_workers(root: &Path) -> Result<ScanReport> {
    let files = collect_rust_sources(root)
        .with_context(|| format!("Failed to enumerate worker sources under {}", root.display()))?;

    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            tokio::task::spawn_blocking(move || {
                let outcome = extract::scan_file(&path);
                (path, outcome)
            })
        })
        .collect();

    let mut per_file = Vec::new();
    for handle in futures::future::join_all(handles).await {
        per_file.push(handle.context("Scan task panicked")?);
    }

    Ok(merge_file_scans(per_file))
}

/// Fold per-file outcomes into a single report.
///
/// Duplicate names are a reportable anomaly: the record seen last replaces
/// the earlier content while keeping the earlier position.
pub fn merge_file_scans(
    per_file: Vec<(PathBuf, Result<Vec<CapabilityRecord>, String>)>,
) -> ScanReport {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, CapabilityRecord> = HashMap::new();
    let mut report = ScanReport::default();

    for (path, outcome) in per_file {
        match outcome {
            Ok(records) => {
                for record in records {
                    let name = record.name.clone();
                    if by_name.insert(name.clone(), record).is_some() {
                        report.duplicates.push(name);
                    } else {
                        order.push(name);
                    }
                }
            }
            Err(message) => report.failures.push(ParseFailure { path, message }),
        }
    }

    report.records = order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .collect();
    report
}
