//! Domain classification via the reasoning service.

use anyhow::Result;

use crate::feedback::{FeedbackSession, Query};
use crate::planner::types::{Domain, NONE_SENTINEL};
use crate::provider::ReasoningService;

/// Build the single-round classification prompt.
pub fn classification_prompt(idea: &str) -> String {
    let labels = Domain::supported_labels();
    format!(
        "You are given a task description and a list of supported domains: {labels}.\n\
         Classify the task to one of the domains based on key features or keywords.\n\n\
         Task: {idea}\n\n\
         # Output format:\n\
         <domain name> (exact match to one of {labels}, or '{NONE_SENTINEL}')\n\
         Answer with the label only."
    )
}

/// Classify the idea, returning the trimmed label verbatim.
///
/// The label is deliberately not validated against the supported set here;
/// the pipeline boundary treats any non-exact match as an unsupported
/// domain. The exchange runs through the feedback refinement loop.
pub async fn classify_idea(
    service: &dyn ReasoningService,
    session: &mut FeedbackSession,
    idea: &str,
) -> Result<String> {
    let mut query = Query::new(classification_prompt(idea));
    let label = session.refined_ask(service, &mut query).await?;
    Ok(label.trim().to_string())
}
