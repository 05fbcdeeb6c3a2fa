//! Scanner tests against real files on disk

use super::common::{cleanup_temp_dir, create_temp_dir};
use std::path::PathBuf;
use team_planner::scanner::manifest::{load_manifest, save_manifest, Manifest};
use team_planner::scanner::scan_workers;

const VALID_WORKER: &str = r#"
use team_planner_sdk::{Action, Worker, WorkerCore};

pub struct %NAME% {
    core: WorkerCore,
}

impl %NAME% {
    pub const GOAL: &'static str = "%GOAL%";

    pub fn new() -> Self {
        let mut core = WorkerCore::new("%NAME%");
        core.set_actions(vec![Action::%ACTION%]);
        core.watch(vec![Action::%WATCH%]);
        Self { core }
    }
}

impl Worker for %NAME% {
    fn core(&self) -> &WorkerCore {
        &self.core
    }
}
"#;

fn worker_source(name: &str, goal: &str, action: &str, watch: &str) -> String {
    VALID_WORKER
        .replace("%NAME%", name)
        .replace("%GOAL%", goal)
        .replace("%ACTION%", action)
        .replace("%WATCH%", watch)
}

#[tokio::test]
async fn test_n_records_and_m_isolated_failures() {
    let dir = create_temp_dir("scan_isolation");
    let nested = dir.join("nested");
    std::fs::create_dir_all(&nested).unwrap();

    std::fs::write(
        dir.join("product_manager.rs"),
        worker_source("ProductManager", "ship products", "WritePrd", "UserRequirement"),
    )
    .unwrap();
    std::fs::write(
        dir.join("architect.rs"),
        worker_source("Architect", "design systems", "WriteDesign", "WritePrd"),
    )
    .unwrap();
    std::fs::write(
        nested.join("engineer.rs"),
        worker_source("Engineer", "write code", "WriteCode", "WriteTasks"),
    )
    .unwrap();
    std::fs::write(dir.join("broken_one.rs"), "pub struct {").unwrap();
    std::fs::write(dir.join("broken_two.rs"), "impl impl impl").unwrap();

    let report = scan_workers(&dir).await.unwrap();

    assert_eq!(report.records.len(), 3, "exactly N valid records");
    assert_eq!(report.failures.len(), 2, "exactly M isolated failures");
    assert!(report.duplicates.is_empty());

    let engineer = report
        .records
        .iter()
        .find(|r| r.name == "Engineer")
        .unwrap();
    assert_eq!(engineer.skill.as_deref(), Some("write code"));
    assert!(engineer.actions.contains("WriteCode"));
    assert!(engineer.watched.contains("WriteTasks"));
    assert!(engineer.source.line > 0);

    cleanup_temp_dir(&dir);
}

#[tokio::test]
async fn test_duplicate_definitions_reported_last_wins() {
    let dir = create_temp_dir("scan_duplicates");

    std::fs::write(
        dir.join("a_first.rs"),
        worker_source("Engineer", "first definition", "WriteCode", "WriteTasks"),
    )
    .unwrap();
    std::fs::write(
        dir.join("b_second.rs"),
        worker_source("Engineer", "second definition", "WriteCode", "WriteTasks"),
    )
    .unwrap();

    let report = scan_workers(&dir).await.unwrap();

    assert_eq!(report.duplicates, vec!["Engineer".to_string()]);
    assert_eq!(report.records.len(), 1);
    assert_eq!(
        report.records[0].skill.as_deref(),
        Some("second definition")
    );

    cleanup_temp_dir(&dir);
}

#[tokio::test]
async fn test_bundled_workers_scan_to_expected_capabilities() {
    let workers_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/workers");

    let report = scan_workers(&workers_dir).await.unwrap();
    assert!(report.failures.is_empty());

    let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
    for expected in [
        "ProductManager",
        "Architect",
        "ProjectManager",
        "Engineer",
        "QaEngineer",
    ] {
        assert!(names.contains(&expected), "missing {}", expected);
    }

    let product_manager = report
        .records
        .iter()
        .find(|r| r.name == "ProductManager")
        .unwrap();
    assert!(product_manager.actions.contains("WritePrd"));
    assert!(product_manager.watched.contains("UserRequirement"));
    assert!(product_manager.skill.is_some());

    // the review-mode watch sits one level inside a conditional
    let engineer = report
        .records
        .iter()
        .find(|r| r.name == "Engineer")
        .unwrap();
    assert!(engineer.watched.contains("ReviewCode"));

    // DESC works as the skill binding too
    let project_manager = report
        .records
        .iter()
        .find(|r| r.name == "ProjectManager")
        .unwrap();
    assert!(project_manager
        .skill
        .as_deref()
        .unwrap()
        .contains("task list"));
}

#[tokio::test]
async fn test_scan_then_manifest_round_trip() {
    let dir = create_temp_dir("scan_manifest");
    std::fs::write(
        dir.join("qa.rs"),
        worker_source("QaEngineer", "test things", "RunTests", "WriteCode"),
    )
    .unwrap();

    let report = scan_workers(&dir).await.unwrap();
    let manifest_path = dir.join("workers.yaml");
    save_manifest(&Manifest::new(report.records.clone()), &manifest_path).unwrap();

    let loaded = load_manifest(&manifest_path).unwrap();
    assert_eq!(loaded, report.records);

    cleanup_temp_dir(&dir);
}
