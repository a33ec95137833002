use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::config::Config;
use crate::engine::study_plan::{StudyPlanInput, WeakCategory};
use crate::error::PlanError;
use crate::store::schema::ProgressData;

const ACCURACY_WEIGHT: f64 = 0.7;
const COVERAGE_WEIGHT: f64 = 0.3;

/// Assembles planner input from stored progress and user settings.
pub struct SnapshotBuilder<'a> {
    progress: &'a ProgressData,
    config: &'a Config,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(progress: &'a ProgressData, config: &'a Config) -> Self {
        Self { progress, config }
    }

    pub fn build(&self, now: NaiveDateTime) -> StudyPlanInput {
        let today = now.date();
        let overall_mastery = self.progress.overall_mastery();

        StudyPlanInput {
            readiness_score: self.readiness_score(overall_mastery),
            readiness_target: self.config.readiness_target,
            srs_due_count: self.progress.due_count(today),
            unpracticed_count: self.unpracticed_count(),
            weak_categories: self.weak_categories(),
            test_date: self.config.test_date,
            last_mock_test_date: self.progress.last_mock_test_date(),
            overall_mastery,
            now,
        }
    }

    fn practiced_count(&self) -> u32 {
        u32::try_from(self.progress.practiced_questions.len()).unwrap_or(u32::MAX)
    }

    fn unpracticed_count(&self) -> u32 {
        self.config
            .question_pool_size
            .saturating_sub(self.practiced_count())
    }

    fn weak_categories(&self) -> Vec<WeakCategory> {
        self.progress
            .categories
            .iter()
            .filter(|(_, stats)| stats.attempts > 0)
            .map(|(name, stats)| WeakCategory::new(name.as_str(), stats.mastery()))
            .filter(|c| c.mastery < self.config.weak_mastery_threshold)
            .collect()
    }

    /// Accuracy blended with how much of the pool has been seen.
    fn readiness_score(&self, overall_mastery: f64) -> f64 {
        let pool = self.config.question_pool_size.max(1) as f64;
        let coverage = (self.practiced_count() as f64 / pool * 100.0).min(100.0);
        let score = ACCURACY_WEIGHT * overall_mastery + COVERAGE_WEIGHT * coverage;
        // min/max instead of clamp: an unvalidated target must not panic here
        score.max(0.0).min(self.config.readiness_target)
    }
}

/// Read a saved `StudyPlanInput`, optionally pinning it to a different `now`.
pub fn read_snapshot(path: &Path, now: Option<NaiveDateTime>) -> Result<StudyPlanInput> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut input: StudyPlanInput = serde_json::from_str(&content)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    if let Some(now) = now {
        input.now = now;
    }
    Ok(input)
}

/// Reject input outside the planner's documented domain.
pub fn validate(input: &StudyPlanInput) -> std::result::Result<(), PlanError> {
    let target = input.readiness_target;
    if !target.is_finite() || target <= 0.0 {
        return Err(PlanError::InvalidReadinessTarget(target));
    }
    let score = input.readiness_score;
    if !(0.0..=target).contains(&score) {
        return Err(PlanError::ReadinessOutOfRange { score, target });
    }
    check_mastery("overall", input.overall_mastery)?;
    for category in &input.weak_categories {
        if category.name.trim().is_empty() {
            return Err(PlanError::EmptyCategoryName);
        }
        check_mastery(&category.name, category.mastery)?;
    }
    Ok(())
}

fn check_mastery(subject: &str, value: f64) -> std::result::Result<(), PlanError> {
    // NaN fails the range check too
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(PlanError::MasteryOutOfRange {
            subject: subject.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn noon(d: u32) -> NaiveDateTime {
        day(d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn sample_progress() -> ProgressData {
        let mut progress = ProgressData::default();
        // History: 1/4 correct -> 25%
        progress.record_answer("h1", "American History", true, day(1));
        progress.record_answer("h2", "American History", false, day(1));
        progress.record_answer("h3", "American History", false, day(1));
        progress.record_answer("h4", "American History", false, day(1));
        // Government: 1/2 correct -> exactly the threshold
        progress.record_answer("g1", "American Government", true, day(1));
        progress.record_answer("g2", "American Government", false, day(1));
        // Civics: 2/2
        progress.record_answer("c1", "Integrated Civics", true, day(1));
        progress.record_answer("c2", "Integrated Civics", true, day(1));
        progress.record_mock_test(day(2), 6, 10).unwrap();
        progress
    }

    #[test]
    fn test_build_derives_counts() {
        let progress = sample_progress();
        let config = Config {
            question_pool_size: 100,
            test_date: Some(day(30)),
            ..Config::default()
        };
        let input = SnapshotBuilder::new(&progress, &config).build(noon(2));

        assert_eq!(input.unpracticed_count, 92);
        // four misses due on day 2
        assert_eq!(input.srs_due_count, 4);
        assert_eq!(input.test_date, Some(day(30)));
        assert_eq!(input.last_mock_test_date, Some(day(2)));
        assert!((input.overall_mastery - 50.0).abs() < 1e-9);
        assert_eq!(input.now, noon(2));
    }

    #[test]
    fn test_weak_threshold_is_strict() {
        let progress = sample_progress();
        let config = Config::default();
        let input = SnapshotBuilder::new(&progress, &config).build(noon(2));
        let names: Vec<&str> = input.weak_categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["American History"]);
        assert!((input.weak_categories[0].mastery - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_unpracticed_saturates_at_zero() {
        let progress = sample_progress();
        let config = Config {
            question_pool_size: 5,
            ..Config::default()
        };
        let input = SnapshotBuilder::new(&progress, &config).build(noon(2));
        assert_eq!(input.unpracticed_count, 0);
    }

    #[test]
    fn test_readiness_blends_accuracy_and_coverage() {
        let progress = sample_progress();
        let config = Config {
            question_pool_size: 8,
            ..Config::default()
        };
        let input = SnapshotBuilder::new(&progress, &config).build(noon(2));
        // 0.7 * 50 + 0.3 * 100
        assert!((input.readiness_score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_readiness_capped_at_target() {
        let mut progress = ProgressData::default();
        progress.record_answer("q1", "Geography", true, day(1));
        let config = Config {
            question_pool_size: 1,
            readiness_target: 80.0,
            ..Config::default()
        };
        let input = SnapshotBuilder::new(&progress, &config).build(noon(2));
        assert_eq!(input.readiness_score, 80.0);
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_empty_progress_builds_valid_input() {
        let progress = ProgressData::default();
        let config = Config::default();
        let input = SnapshotBuilder::new(&progress, &config).build(noon(2));
        assert_eq!(input.unpracticed_count, 128);
        assert_eq!(input.srs_due_count, 0);
        assert!(input.weak_categories.is_empty());
        assert_eq!(input.readiness_score, 0.0);
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_domain_values() {
        let good = StudyPlanInput {
            readiness_score: 40.0,
            overall_mastery: 60.0,
            weak_categories: vec![WeakCategory::new("Geography", 20.0)],
            now: noon(2),
            ..StudyPlanInput::default()
        };
        assert!(validate(&good).is_ok());

        let mut input = good.clone();
        input.readiness_target = 0.0;
        assert_eq!(validate(&input), Err(PlanError::InvalidReadinessTarget(0.0)));

        let mut input = good.clone();
        input.readiness_score = 95.0;
        assert!(matches!(
            validate(&input),
            Err(PlanError::ReadinessOutOfRange { .. })
        ));

        let mut input = good.clone();
        input.overall_mastery = -1.0;
        assert!(matches!(
            validate(&input),
            Err(PlanError::MasteryOutOfRange { ref subject, .. }) if subject == "overall"
        ));

        let mut input = good.clone();
        input.weak_categories[0].mastery = f64::NAN;
        assert!(matches!(
            validate(&input),
            Err(PlanError::MasteryOutOfRange { ref subject, .. }) if subject == "Geography"
        ));

        let mut input = good;
        input.weak_categories.push(WeakCategory::new("  ", 10.0));
        assert_eq!(validate(&input), Err(PlanError::EmptyCategoryName));
    }

    #[test]
    fn test_unvalidated_negative_target_does_not_panic() {
        let progress = sample_progress();
        let config = Config {
            readiness_target: -5.0,
            ..Config::default()
        };
        let input = SnapshotBuilder::new(&progress, &config).build(noon(2));
        assert_eq!(input.readiness_score, -5.0);
        assert_eq!(validate(&input), Err(PlanError::InvalidReadinessTarget(-5.0)));

        let config = Config {
            readiness_target: f64::NAN,
            ..Config::default()
        };
        let input = SnapshotBuilder::new(&progress, &config).build(noon(2));
        assert!(matches!(
            validate(&input),
            Err(PlanError::InvalidReadinessTarget(t)) if t.is_nan()
        ));
    }

    #[test]
    fn test_read_snapshot_applies_now_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        let json = r#"{
            "readiness_score": 40.0,
            "srs_due_count": 3,
            "unpracticed_count": 12,
            "overall_mastery": 55.0,
            "test_date": "2026-08-20",
            "now": "2026-08-01T08:00:00"
        }"#;
        fs::write(&path, json).unwrap();

        let kept = read_snapshot(&path, None).unwrap();
        assert_eq!(kept.now, day(1).and_hms_opt(8, 0, 0).unwrap());
        assert_eq!(kept.test_date, Some(day(20)));

        let pinned = read_snapshot(&path, Some(noon(10))).unwrap();
        assert_eq!(pinned.now, noon(10));
        assert_eq!(pinned.srs_due_count, 3);
    }

    #[test]
    fn test_read_snapshot_reports_missing_and_bad_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let err = read_snapshot(&missing, None).unwrap_err();
        assert!(err.to_string().contains("reading"));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"readiness_score": "high"}"#).unwrap();
        let err = read_snapshot(&bad, None).unwrap_err();
        assert!(err.to_string().contains("parsing snapshot"));
    }
}
