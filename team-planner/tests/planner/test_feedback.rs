//! Feedback refinement loop tests

use super::common::{
    approve, cleanup_temp_dir, create_temp_dir, reject, ScriptedReviewer, ScriptedService,
};
use team_planner::error::PlanError;
use team_planner::feedback::{FeedbackSession, Query};

#[tokio::test]
async fn test_two_round_refinement_scenario() {
    let service = ScriptedService::new(&["first draft", "second draft"]);
    let reviewer = ScriptedReviewer::new(vec![reject("add error handling"), approve()]);
    let mut session = FeedbackSession::new(true, 3, Box::new(reviewer));
    let mut query = Query::new("plan the error strategy");
    let hash = query.identity_hash().to_string();

    let response = session.refined_ask(&service, &mut query).await.unwrap();

    // the loop terminates returning the accepted response
    assert_eq!(response, "second draft");

    // the resubmitted query embedded the first response and its correction
    let prompts = service.seen_prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], "plan the error strategy");
    assert!(prompts[1].contains("first draft"));
    assert!(prompts[1].contains("add error handling"));
    assert!(prompts[1].contains("plan the error strategy"));

    // identity hash never changed; the log holds exactly two entries under it
    assert_eq!(query.identity_hash(), hash);
    let logged = session.logged(&hash).unwrap();
    assert_eq!(logged.entries.len(), 2);
    assert!(!logged.entries[0].approved);
    assert_eq!(
        logged.entries[0].correction.as_deref(),
        Some("add error handling")
    );
    assert!(logged.entries[1].approved);
}

#[tokio::test]
async fn test_flushed_log_is_keyed_by_identity_hash() {
    let dir = create_temp_dir("feedback_flush");
    let log_path = dir.join("feedback_log.json");

    let service = ScriptedService::new(&["first draft", "second draft"]);
    let reviewer = ScriptedReviewer::new(vec![reject("tighten the scope"), approve()]);
    let mut session = FeedbackSession::new(true, 3, Box::new(reviewer));
    let mut query = Query::new("outline the project");

    session.refined_ask(&service, &mut query).await.unwrap();
    session.flush(&log_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&log_path).unwrap()).unwrap();
    let logged = &json[query.identity_hash()];
    assert_eq!(logged["original_text"], "outline the project");
    assert_eq!(logged["entries"].as_array().unwrap().len(), 2);
    assert_eq!(logged["entries"][0]["correction"], "tighten the scope");

    cleanup_temp_dir(&dir);
}

#[tokio::test]
async fn test_exhaustion_escalates_instead_of_recursing() {
    let service = ScriptedService::new(&["a", "b", "c"]);
    let reviewer =
        ScriptedReviewer::new(vec![reject("no"), reject("still no"), reject("never")]);
    let mut session = FeedbackSession::new(true, 3, Box::new(reviewer));
    let mut query = Query::new("impossible request");

    let err = session.refined_ask(&service, &mut query).await.unwrap_err();
    let plan_err = err.downcast_ref::<PlanError>().unwrap();
    assert!(matches!(
        plan_err,
        PlanError::RefinementExhausted { rounds: 3 }
    ));

    // every rejected round is still on the record
    assert_eq!(session.logged(query.identity_hash()).unwrap().entries.len(), 3);
}
