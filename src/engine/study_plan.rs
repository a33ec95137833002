use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::engine::calendar::{days_since, days_until};
use crate::engine::pace::{PaceStatus, pace_status};

pub const DEFAULT_READINESS_TARGET: f64 = 90.0;

const MAX_DAILY_REVIEWS: u32 = 20;
const MIN_NEW_QUESTIONS: u32 = 3;
const MAX_NEW_QUESTIONS_WITH_DEADLINE: u32 = 15;
const MAX_NEW_QUESTIONS_NO_DEADLINE: u32 = 10;
const MIN_DRILL_SIZE: u32 = 5;
const MAX_DRILL_SIZE: u32 = 10;
const MOCK_TEST_MIN_MASTERY: f64 = 40.0;
const MOCK_TEST_SPACING_DAYS: i64 = 3;
const MINUTES_PER_REVIEW: f64 = 0.5;
const MINUTES_PER_NEW_QUESTION: f64 = 1.0;
const MINUTES_PER_DRILL_QUESTION: f64 = 1.0;
const MOCK_TEST_MINUTES: f64 = 12.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeakCategory {
    pub name: String,
    pub mastery: f64,
}

impl WeakCategory {
    pub fn new(name: impl Into<String>, mastery: f64) -> Self {
        Self {
            name: name.into(),
            mastery,
        }
    }
}

/// Snapshot of learner state the planner works from.
///
/// Numeric fields are trusted as-is; see `snapshot::validate` for the
/// boundary check callers should run first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanInput {
    pub readiness_score: f64,
    #[serde(default = "default_readiness_target")]
    pub readiness_target: f64,
    pub srs_due_count: u32,
    pub unpracticed_count: u32,
    #[serde(default)]
    pub weak_categories: Vec<WeakCategory>,
    #[serde(default)]
    pub test_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_mock_test_date: Option<NaiveDate>,
    pub overall_mastery: f64,
    /// Local wall-clock time the plan is computed for.
    #[serde(default = "local_now")]
    pub now: NaiveDateTime,
}

fn default_readiness_target() -> f64 {
    DEFAULT_READINESS_TARGET
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Default for StudyPlanInput {
    fn default() -> Self {
        Self {
            readiness_score: 0.0,
            readiness_target: default_readiness_target(),
            srs_due_count: 0,
            unpracticed_count: 0,
            weak_categories: Vec::new(),
            test_date: None,
            last_mock_test_date: None,
            overall_mastery: 0.0,
            now: local_now(),
        }
    }
}

impl StudyPlanInput {
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillRecommendation {
    pub category: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub srs_review_count: u32,
    pub new_question_target: u32,
    pub drill_recommendation: Option<DrillRecommendation>,
    pub mock_test_recommended: bool,
    pub estimated_minutes: u32,
    pub pace_status: Option<PaceStatus>,
    pub days_remaining: Option<u32>,
}

/// Compute today's study plan. Pure: identical input gives identical output.
pub fn compute_study_plan(input: &StudyPlanInput) -> DailyPlan {
    let today = input.today();
    let days_remaining = input.test_date.map(|date| days_until(today, date));

    let srs_review_count = input.srs_due_count.min(MAX_DAILY_REVIEWS);
    let new_question_target = new_question_target(input.unpracticed_count, days_remaining);
    let drill_recommendation = drill_recommendation(&input.weak_categories);
    let mock_test_recommended =
        mock_test_recommended(input.overall_mastery, input.last_mock_test_date, today);
    let estimated_minutes = estimated_minutes(
        srs_review_count,
        new_question_target,
        drill_recommendation.as_ref(),
        mock_test_recommended,
    );
    let pace_status = pace_status(
        input.readiness_score,
        input.readiness_target,
        days_remaining,
    );

    let plan = DailyPlan {
        srs_review_count,
        new_question_target,
        drill_recommendation,
        mock_test_recommended,
        estimated_minutes,
        pace_status,
        days_remaining,
    };
    tracing::debug!(
        srs_review_count = plan.srs_review_count,
        new_question_target = plan.new_question_target,
        mock_test_recommended = plan.mock_test_recommended,
        estimated_minutes = plan.estimated_minutes,
        days_remaining = ?plan.days_remaining,
        pace_status = ?plan.pace_status,
        "computed study plan"
    );
    plan
}

fn new_question_target(unpracticed_count: u32, days_remaining: Option<u32>) -> u32 {
    if unpracticed_count == 0 {
        return 0;
    }
    match days_remaining {
        Some(days) => unpracticed_count
            .div_ceil(days.max(1))
            .clamp(MIN_NEW_QUESTIONS, MAX_NEW_QUESTIONS_WITH_DEADLINE),
        None => unpracticed_count.clamp(MIN_NEW_QUESTIONS, MAX_NEW_QUESTIONS_NO_DEADLINE),
    }
}

/// Drill the weakest category. Ties go to the earliest entry.
fn drill_recommendation(weak_categories: &[WeakCategory]) -> Option<DrillRecommendation> {
    let weakest = weak_categories
        .iter()
        .min_by(|a, b| a.mastery.total_cmp(&b.mastery))?;
    // TODO: scale drill size with how far below threshold the category is
    let count = MAX_DRILL_SIZE.clamp(MIN_DRILL_SIZE, MAX_DRILL_SIZE);
    Some(DrillRecommendation {
        category: weakest.name.clone(),
        count,
    })
}

fn mock_test_recommended(
    overall_mastery: f64,
    last_mock_test_date: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    if overall_mastery < MOCK_TEST_MIN_MASTERY {
        return false;
    }
    match last_mock_test_date {
        None => true,
        Some(last) => days_since(today, last) >= MOCK_TEST_SPACING_DAYS,
    }
}

fn estimated_minutes(
    srs_review_count: u32,
    new_question_target: u32,
    drill: Option<&DrillRecommendation>,
    mock_test_recommended: bool,
) -> u32 {
    let drill_count = drill.map(|d| d.count).unwrap_or(0);
    let mock_minutes = if mock_test_recommended {
        MOCK_TEST_MINUTES
    } else {
        0.0
    };
    let minutes = srs_review_count as f64 * MINUTES_PER_REVIEW
        + new_question_target as f64 * MINUTES_PER_NEW_QUESTION
        + drill_count as f64 * MINUTES_PER_DRILL_QUESTION
        + mock_minutes;
    (minutes.round() as u32).max(1)
}
