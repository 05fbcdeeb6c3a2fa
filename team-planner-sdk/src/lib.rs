use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Symbolic capability identifiers shared by all worker definitions.
///
/// An action names an effect a worker produces; the same identifiers are used
/// in watch lists to name the upstream outputs a worker reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    UserRequirement,
    WritePrd,
    WriteDesign,
    WriteTasks,
    WriteCode,
    ReviewCode,
    RunTests,
}

impl Action {
    /// Canonical symbol name, identical to the variant identifier.
    ///
    /// The capability scanner records these names as plain strings, so the
    /// two representations must stay in sync.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::UserRequirement => "UserRequirement",
            Action::WritePrd => "WritePrd",
            Action::WriteDesign => "WriteDesign",
            Action::WriteTasks => "WriteTasks",
            Action::WriteCode => "WriteCode",
            Action::ReviewCode => "ReviewCode",
            Action::RunTests => "RunTests",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime state every worker embeds: its name plus the action and watch
/// lists populated by the worker's constructor.
#[derive(Debug, Clone, Default)]
pub struct WorkerCore {
    name: String,
    actions: Vec<Action>,
    watched: Vec<Action>,
}

impl WorkerCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            watched: Vec::new(),
        }
    }

    /// Declare the actions this worker produces. Repeated calls accumulate.
    pub fn set_actions<I: IntoIterator<Item = Action>>(&mut self, actions: I) {
        self.actions.extend(actions);
    }

    /// Declare the upstream outputs this worker reacts to. Repeated calls
    /// accumulate.
    pub fn watch<I: IntoIterator<Item = Action>>(&mut self, signals: I) {
        self.watched.extend(signals);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn watched(&self) -> &[Action] {
        &self.watched
    }
}

/// Contract every instantiated worker satisfies.
///
/// The planner only relies on the capability surface below; how a worker
/// actually executes its actions belongs to the execution layer consuming
/// the assembled team.
pub trait Worker: Send {
    fn core(&self) -> &WorkerCore;

    fn name(&self) -> &str {
        self.core().name()
    }

    /// One-line summary of what the worker is good at, when declared.
    fn skill(&self) -> Option<&str> {
        None
    }

    fn actions(&self) -> &[Action] {
        self.core().actions()
    }

    fn watched(&self) -> &[Action] {
        self.core().watched()
    }

    /// Number of parallel replicas this worker runs with.
    fn replicas(&self) -> usize {
        1
    }
}

/// Construction parameters resolved by the team assembler.
#[derive(Debug, Clone)]
pub struct HireSpec {
    pub replicas: usize,
    pub review_mode: bool,
}

impl Default for HireSpec {
    fn default() -> Self {
        Self {
            replicas: 1,
            review_mode: false,
        }
    }
}

/// Constructor signature stored in the factory.
pub type WorkerCtor = fn(&HireSpec) -> Box<dyn Worker>;

/// Explicit name → constructor map.
///
/// Populated once by a loader at startup; worker names are never resolved by
/// reflective lookup at assembly time.
#[derive(Default)]
pub struct WorkerFactory {
    ctors: HashMap<String, WorkerCtor>,
}

impl WorkerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, ctor: WorkerCtor) {
        self.ctors.insert(name.into(), ctor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ctors.contains_key(name)
    }

    /// Instantiate the named worker, or None when no constructor was
    /// registered under that name.
    pub fn create(&self, name: &str, spec: &HireSpec) -> Option<Box<dyn Worker>> {
        self.ctors.get(name).map(|ctor| ctor(spec))
    }

    /// Registered worker names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ctors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.ctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ctors.is_empty()
    }
}

/// Where a worker definition was found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
}

/// Static capability descriptor discovered for one worker definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(default)]
    pub actions: std::collections::BTreeSet<String>,
    #[serde(default)]
    pub watched: std::collections::BTreeSet<String>,
    pub source: SourceLocation,
}

/// Structured logging events emitted by the planning pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlannerLog {
    /// Phase started
    PhaseStarted {
        phase: usize,
        name: String,
        total_phases: usize,
    },
    /// Phase completed
    PhaseCompleted {
        phase: usize,
        name: String,
    },
    /// Phase failed
    PhaseFailed {
        phase: usize,
        name: String,
        error: String,
    },
    /// State file created (manifest, feedback log)
    StateFileCreated {
        phase: usize,
        file_path: String,
        description: String,
    },
}

impl PlannerLog {
    /// Emit this log event to stderr for outer tooling to parse
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            use std::io::Write;
            eprintln!("__TP_EVENT__:{}", json);
            let _ = std::io::stderr().flush();
        }
    }
}

/// Helper macros for structured pipeline logging
#[macro_export]
macro_rules! log_phase_start {
    ($phase:expr, $name:expr, $total:expr) => {
        $crate::PlannerLog::PhaseStarted {
            phase: $phase,
            name: $name.to_string(),
            total_phases: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_phase_complete {
    ($phase:expr, $name:expr) => {
        $crate::PlannerLog::PhaseCompleted {
            phase: $phase,
            name: $name.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_phase_failed {
    ($phase:expr, $name:expr, $error:expr) => {
        $crate::PlannerLog::PhaseFailed {
            phase: $phase,
            name: $name.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_state_file {
    ($phase:expr, $path:expr, $desc:expr) => {
        $crate::PlannerLog::StateFileCreated {
            phase: $phase,
            file_path: $path.to_string(),
            description: $desc.to_string(),
        }
        .emit();
    };
}

// ============================================================================
// Console Logging Macros
// ============================================================================
// Colored console output for human-readable logs, complementing the
// structured PlannerLog events above.
// ============================================================================

/// Logs the start of a pipeline phase with a header and description.
///
/// # Example
/// ```
/// use team_planner_sdk::log_phase_start_console;
/// log_phase_start_console!(1, "Task Classifier", "Classify the idea's domain");
/// ```
///
/// Outputs:
/// ```text
/// ═══ PHASE 1: Task Classifier ═══
/// Classify the idea's domain
/// ```
#[macro_export]
macro_rules! log_phase_start_console {
    ($phase:expr, $title:expr, $description:expr) => {
        println!("\x1b[1;36m═══ PHASE {}: {} ═══\x1b[0m", $phase, $title);
        println!("\x1b[36m{}\x1b[0m", $description);
    };
}

/// Logs the completion of a pipeline phase.
///
/// # Example
/// ```
/// use team_planner_sdk::log_phase_complete_console;
/// log_phase_complete_console!(1);
/// ```
#[macro_export]
macro_rules! log_phase_complete_console {
    ($phase:expr) => {
        println!("\x1b[32m✓ Phase {} complete\x1b[0m", $phase);
    };
}

/// Logs an informational message.
///
/// # Example
/// ```
/// use team_planner_sdk::log_info;
/// log_info!("Loading worker manifest...");
/// ```
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        println!("\x1b[36mℹ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[36mℹ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a warning message.
///
/// # Example
/// ```
/// use team_planner_sdk::log_warning;
/// log_warning!("Duplicate worker name discovered");
/// ```
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs the number of items found.
///
/// # Example
/// ```
/// use team_planner_sdk::log_found;
/// log_found!(5, "worker capabilities");
/// ```
#[macro_export]
macro_rules! log_found {
    ($count:expr, $item_type:expr) => {
        println!("\x1b[36mFound {} {}\x1b[0m", $count, $item_type);
    };
}

/// Logs that a file has been saved.
///
/// # Example
/// ```
/// use team_planner_sdk::log_file_saved;
/// log_file_saved!("./workers.yaml");
/// ```
#[macro_export]
macro_rules! log_file_saved {
    ($path:expr) => {
        println!("\x1b[32m✓ Saved: {}\x1b[0m", $path);
    };
}

/// Logs a debug message (intended to be used conditionally).
///
/// # Example
/// ```
/// use team_planner_sdk::log_debug;
/// log_debug!("Parsed 4 subtasks from plan payload");
/// ```
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        println!("\x1b[2m[DEBUG] {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[2m[DEBUG] {}\x1b[0m", format!($fmt, $($arg)*));
    };
}
