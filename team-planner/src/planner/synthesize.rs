//! Subtask plan generation and schema validation.

use anyhow::Result;

use crate::error::PlanError;
use crate::feedback::{FeedbackSession, Query};
use crate::planner::types::{Domain, SubtaskAssignment};
use crate::planner::utils::strip_code_fences;
use crate::provider::ReasoningService;
use crate::registry::CapabilityRegistry;

/// Build the plan-synthesis prompt: idea, domain, the registry snapshot, the
/// fixed output schema and the advisory selection policy.
///
/// The selection policy is guidance for the reasoning service only. Nothing
/// here re-verifies that the returned plan actually honors it; this module
/// guarantees structural well-formedness and nothing more.
pub fn plan_prompt(idea: &str, domain: Domain, registry: &CapabilityRegistry) -> String {
    format!(
        "Given the project idea and its domain, break the work into an ordered list of\n\
         subtasks and assign each subtask to one of the available agents.\n\n\
         Project idea: {idea}\n\
         Domain: {domain}\n\n\
         Available agents with their skills, produced actions and watched items:\n\
         {snapshot}\n\n\
         Selection policy:\n\
         - Start from the agent whose watch items include 'UserRequirement'.\n\
         - Include a further agent only if one of its watch items matches an action\n\
           produced by an agent selected earlier.\n\
         - Stop when no remaining agent is triggered.\n\n\
         # Output format:\n\
         A JSON array, one object per subtask, with exactly these keys:\n\
         [\n\
           {{\n\
             \"subtask_number\": 1,\n\
             \"subtask_description\": \"<what this subtask accomplishes>\",\n\
             \"agent\": \"<agent name from the list above>\",\n\
             \"skill\": \"<the agent's skill>\",\n\
             \"actions\": [\"<actions the agent produces>\"],\n\
             \"watch_items\": [\"<items the agent watches>\"],\n\
             \"trigger\": \"<which earlier output triggers this agent>\"\n\
           }}\n\
         ]\n\n\
         Output only the JSON array, no markdown code fences or extra commentary.",
        idea = idea,
        domain = domain,
        snapshot = registry.snapshot_json(),
    )
}

/// Parse a plan payload into typed subtask assignments.
///
/// Markdown fences are stripped first. Any missing key, wrong shape or empty
/// array is a schema-validation failure; by the time this runs the response
/// has already passed review, so the failure is terminal.
pub fn parse_plan(response: &str) -> Result<Vec<SubtaskAssignment>, PlanError> {
    let cleaned = strip_code_fences(response);
    let plan: Vec<SubtaskAssignment> =
        serde_json::from_str(&cleaned).map_err(|e| PlanError::SchemaValidation {
            detail: e.to_string(),
        })?;

    if plan.is_empty() {
        return Err(PlanError::SchemaValidation {
            detail: "plan contained no subtasks".to_string(),
        });
    }
    for subtask in &plan {
        if subtask.agent.trim().is_empty() {
            return Err(PlanError::SchemaValidation {
                detail: format!(
                    "subtask {} has an empty agent name",
                    subtask.subtask_number
                ),
            });
        }
    }
    Ok(plan)
}

/// Request and validate the subtask plan for an already-classified idea.
pub async fn synthesize_plan(
    service: &dyn ReasoningService,
    session: &mut FeedbackSession,
    idea: &str,
    domain: Domain,
    registry: &CapabilityRegistry,
) -> Result<Vec<SubtaskAssignment>> {
    let mut query = Query::new(plan_prompt(idea, domain, registry));
    let response = session.refined_ask(service, &mut query).await?;
    Ok(parse_plan(&response)?)
}
