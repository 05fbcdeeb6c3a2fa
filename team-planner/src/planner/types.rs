//! Data types for the planning pipeline.

use serde::{Deserialize, Serialize};

// ============================================================================
// Domains
// ============================================================================

/// Task domains the pipeline supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    SoftwareEngineering,
    Design,
    Consulting,
}

/// Sentinel the classifier may answer when no domain applies.
pub const NONE_SENTINEL: &str = "none";

impl Domain {
    pub const SUPPORTED: [Domain; 3] =
        [Domain::SoftwareEngineering, Domain::Design, Domain::Consulting];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::SoftwareEngineering => "software engineering",
            Domain::Design => "design",
            Domain::Consulting => "consulting",
        }
    }

    /// Exact-match lookup against the supported labels.
    ///
    /// Case and whitespace variants do not match: the classifier returns its
    /// label verbatim and the pipeline only trims before calling this.
    pub fn from_label(label: &str) -> Option<Domain> {
        Self::SUPPORTED
            .into_iter()
            .find(|domain| domain.as_str() == label)
    }

    /// Comma-separated label list for prompt construction.
    pub fn supported_labels() -> String {
        Self::SUPPORTED
            .iter()
            .map(|d| format!("'{}'", d.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Plan payload
// ============================================================================

/// One subtask entry of the raw plan payload.
///
/// Field names are the wire keys the reasoning service is asked to emit.
/// All keys are required; extra keys are tolerated. `subtask_number` is an
/// ordering hint only and is neither unique nor contiguous by contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtaskAssignment {
    pub subtask_number: u32,
    pub subtask_description: String,
    pub agent: String,
    pub skill: String,
    pub actions: Vec<String>,
    pub watch_items: Vec<String>,
    pub trigger: String,
}

/// One worker's merged assignment after aggregation.
///
/// `description` concatenates every merged subtask description in encounter
/// order; all other fields keep their first-occurrence values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedAssignment {
    pub agent: String,
    pub description: String,
    pub skill: String,
    pub actions: Vec<String>,
    pub watch_items: Vec<String>,
    pub trigger: String,
}
