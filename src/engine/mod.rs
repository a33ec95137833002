pub mod calendar;
pub mod mastery;
pub mod pace;
pub mod snapshot;
pub mod study_plan;

pub use pace::PaceStatus;
pub use study_plan::{
    DailyPlan, DrillRecommendation, StudyPlanInput, WeakCategory, compute_study_plan,
};
