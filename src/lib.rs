// Library target shared by the binary, integration tests and criterion benches.
// The planner lives in `engine`; `store` and `config` supply its inputs.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod store;

pub use engine::{DailyPlan, StudyPlanInput, compute_study_plan};
pub use error::PlanError;
