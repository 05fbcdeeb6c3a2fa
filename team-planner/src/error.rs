//! Error taxonomy for the planning pipeline.
//!
//! Per-file scan failures are not represented here: they are isolated and
//! reported through the scan report rather than aborting anything.

use thiserror::Error;

use crate::provider::ProviderError;

/// Terminal failures the pipeline can surface to its caller.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The classifier's label did not exactly match a supported domain.
    #[error("unsupported domain {0:?}; supported domains are listed in the classifier prompt")]
    UnsupportedDomain(String),

    /// The plan payload was structurally malformed after review acceptance.
    #[error("plan payload failed schema validation: {detail}")]
    SchemaValidation { detail: String },

    /// The plan referenced a worker absent from the registry or factory.
    /// Assembly fails closed; no partial team is returned.
    #[error("plan references unknown worker {0:?}")]
    UnknownWorker(String),

    /// The reviewer rejected every response within the configured bound.
    #[error("refinement exhausted after {rounds} rejected rounds")]
    RefinementExhausted { rounds: usize },

    /// Reasoning-service failure, surfaced as-is. Retry policy belongs to
    /// the provider, not the pipeline.
    #[error("reasoning service error: {0}")]
    Provider(#[from] ProviderError),
}
