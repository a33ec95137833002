use thiserror::Error;

/// Errors raised at the boundary between stored/user input and the planner.
///
/// The planner itself is total; everything here is a precondition failure
/// caught before `compute_study_plan` is called.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid date {input:?}: expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("readiness target must be a positive finite number, got {0}")]
    InvalidReadinessTarget(f64),

    #[error("readiness score {score} is outside [0, {target}]")]
    ReadinessOutOfRange { score: f64, target: f64 },

    #[error("mastery for {subject} is {value}, expected a value in [0, 100]")]
    MasteryOutOfRange { subject: String, value: f64 },

    #[error("weak category name must not be empty")]
    EmptyCategoryName,

    #[error("mock test with {correct} correct out of {total} is not a valid result")]
    InvalidMockTest { correct: u32, total: u32 },
}
