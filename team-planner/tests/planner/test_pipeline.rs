//! Classifier boundary and plan-to-team pipeline tests

use super::common::{scenario_registry, ScriptedService, SCENARIO_PLAN};
use team_planner::error::PlanError;
use team_planner::feedback::FeedbackSession;
use team_planner::planner::aggregate::aggregate;
use team_planner::planner::assemble::{assemble_team, AssemblyConfig};
use team_planner::planner::classify::classify_idea;
use team_planner::planner::synthesize::synthesize_plan;
use team_planner::planner::types::Domain;
use team_planner::planner::workflow::plan_team;
use team_planner::workers;

#[tokio::test]
async fn test_classifier_returns_label_verbatim() {
    let service = ScriptedService::new(&["  software engineering \n"]);
    let mut session = FeedbackSession::disabled();

    let label = classify_idea(&service, &mut session, "write a CLI based snake game")
        .await
        .unwrap();
    assert_eq!(label, "software engineering");
    assert_eq!(Domain::from_label(&label), Some(Domain::SoftwareEngineering));
}

#[tokio::test]
async fn test_unmatched_label_passes_through_then_fails_at_boundary() {
    let service = ScriptedService::new(&["Software Dev (probably)"]);
    let mut session = FeedbackSession::disabled();

    // the component itself does not normalize or validate
    let label = classify_idea(&service, &mut session, "write a game").await.unwrap();
    assert_eq!(label, "Software Dev (probably)");
    assert_eq!(Domain::from_label(&label), None);
}

#[tokio::test]
async fn test_pipeline_raises_unsupported_domain() {
    let registry = scenario_registry();
    // the 'none' sentinel is not an exact domain match either
    let service = ScriptedService::new(&["none"]);
    let mut session = FeedbackSession::disabled();

    let err = plan_team(
        &service,
        &mut session,
        "organize my sock drawer",
        &registry,
        &AssemblyConfig::default(),
    )
    .await
    .unwrap_err();

    let plan_err = err.downcast_ref::<PlanError>().unwrap();
    assert!(matches!(plan_err, PlanError::UnsupportedDomain(label) if label == "none"));
    // classification was the only service round; nothing was retried
    assert_eq!(service.seen_prompts().len(), 1);
}

#[tokio::test]
async fn test_full_pipeline_scenario_via_plan_team() {
    let registry = scenario_registry();
    let service = ScriptedService::new(&["software engineering", SCENARIO_PLAN]);
    let mut session = FeedbackSession::disabled();

    let team = plan_team(
        &service,
        &mut session,
        "write a CLI based snake game",
        &registry,
        &AssemblyConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(team.len(), 2);
    assert_eq!(team.names(), vec!["ProductManager", "Architect"]);
    assert_eq!(service.seen_prompts().len(), 2);
}

#[tokio::test]
async fn test_scenario_plan_to_team_of_two() {
    let registry = scenario_registry();
    let service = ScriptedService::new(&[SCENARIO_PLAN]);
    let mut session = FeedbackSession::disabled();

    let raw_plan = synthesize_plan(
        &service,
        &mut session,
        "write a CLI based snake game",
        Domain::SoftwareEngineering,
        &registry,
    )
    .await
    .unwrap();
    assert_eq!(raw_plan.len(), 2);

    // the prompt carried the registry snapshot and the advisory policy
    let prompts = service.seen_prompts();
    assert!(prompts[0].contains("ProductManager"));
    assert!(prompts[0].contains("UserRequirement"));

    let aggregated = aggregate(&raw_plan);
    let agents: Vec<&str> = aggregated.iter().map(|a| a.agent.as_str()).collect();
    assert_eq!(agents, vec!["ProductManager", "Architect"]);

    let factory = workers::builtin_factory();
    let team = assemble_team(
        &aggregated,
        &registry,
        &factory,
        &AssemblyConfig::default(),
    )
    .unwrap();
    assert_eq!(team.len(), 2);
    assert_eq!(team.names(), vec!["ProductManager", "Architect"]);
}

#[tokio::test]
async fn test_malformed_plan_is_schema_failure() {
    let registry = scenario_registry();
    let service = ScriptedService::new(&["the plan is: ProductManager then Architect"]);
    let mut session = FeedbackSession::disabled();

    let err = synthesize_plan(
        &service,
        &mut session,
        "write a game",
        Domain::SoftwareEngineering,
        &registry,
    )
    .await
    .unwrap_err();

    let plan_err = err.downcast_ref::<PlanError>().unwrap();
    assert!(matches!(plan_err, PlanError::SchemaValidation { .. }));
}

#[tokio::test]
async fn test_fenced_plan_payload_is_accepted() {
    let registry = scenario_registry();
    let fenced = format!("```json\n{}\n```", SCENARIO_PLAN);
    let service = ScriptedService::new(&[fenced.as_str()]);
    let mut session = FeedbackSession::disabled();

    let raw_plan = synthesize_plan(
        &service,
        &mut session,
        "write a game",
        Domain::SoftwareEngineering,
        &registry,
    )
    .await
    .unwrap();
    assert_eq!(raw_plan.len(), 2);
}

#[test]
fn test_unknown_agent_never_yields_partial_team() {
    let registry = scenario_registry();
    let factory = workers::builtin_factory();

    let raw: Vec<team_planner::planner::types::SubtaskAssignment> =
        serde_json::from_str(SCENARIO_PLAN).unwrap();
    let mut aggregated = aggregate(&raw);
    aggregated[1].agent = "Freelancer".to_string();

    let err = assemble_team(
        &aggregated,
        &registry,
        &factory,
        &AssemblyConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PlanError::UnknownWorker(name) if name == "Freelancer"));
}
