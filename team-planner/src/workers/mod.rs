//! Bundled worker definitions and the factory loader.
//!
//! These sources are also the default scan target: `team-planner scan` reads
//! this directory to produce the shipped manifest, so capability declarations
//! here must stay inside the worker constructors where the scanner looks for
//! them.

pub mod architect;
pub mod engineer;
pub mod product_manager;
pub mod project_manager;
pub mod qa_engineer;

pub use architect::Architect;
pub use engineer::Engineer;
pub use product_manager::ProductManager;
pub use project_manager::ProjectManager;
pub use qa_engineer::QaEngineer;

use team_planner_sdk::WorkerFactory;

/// Register every bundled worker constructor.
///
/// This is the only place worker names are bound to constructors; assembly
/// resolves names against this map and nowhere else.
pub fn builtin_factory() -> WorkerFactory {
    let mut factory = WorkerFactory::new();
    factory.register("ProductManager", |_spec| Box::new(ProductManager::new()));
    factory.register("Architect", |_spec| Box::new(Architect::new()));
    factory.register("ProjectManager", |_spec| Box::new(ProjectManager::new()));
    factory.register("Engineer", |spec| {
        Box::new(Engineer::new(spec.replicas, spec.review_mode))
    });
    factory.register("QaEngineer", |_spec| Box::new(QaEngineer::new()));
    factory
}
