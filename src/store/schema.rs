use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::mastery::{CategoryStats, ReviewCard};
use crate::error::PlanError;

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockTestRecord {
    pub taken_on: NaiveDate,
    pub correct: u32,
    pub total: u32,
}

impl MockTestRecord {
    pub fn score_percent(&self) -> f64 {
        self.correct as f64 / self.total as f64 * 100.0
    }
}

/// Everything persisted about a learner's practice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    #[serde(default)]
    pub practiced_questions: BTreeSet<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryStats>,
    #[serde(default)]
    pub review_queue: BTreeMap<String, ReviewCard>,
    #[serde(default)]
    pub mock_tests: Vec<MockTestRecord>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            practiced_questions: BTreeSet::new(),
            categories: BTreeMap::new(),
            review_queue: BTreeMap::new(),
            mock_tests: Vec::new(),
        }
    }
}

impl ProgressData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn record_answer(
        &mut self,
        question_id: &str,
        category: &str,
        correct: bool,
        answered_on: NaiveDate,
    ) {
        self.practiced_questions.insert(question_id.to_string());
        self.categories
            .entry(category.to_string())
            .or_default()
            .record(correct);
        self.review_queue
            .entry(question_id.to_string())
            .or_insert_with(|| ReviewCard::new(question_id, answered_on))
            .schedule(answered_on, correct);
    }

    pub fn record_mock_test(
        &mut self,
        taken_on: NaiveDate,
        correct: u32,
        total: u32,
    ) -> Result<&MockTestRecord, PlanError> {
        if total == 0 || correct > total {
            return Err(PlanError::InvalidMockTest { correct, total });
        }
        self.mock_tests.push(MockTestRecord {
            taken_on,
            correct,
            total,
        });
        Ok(&self.mock_tests[self.mock_tests.len() - 1])
    }

    pub fn last_mock_test_date(&self) -> Option<NaiveDate> {
        self.mock_tests.iter().map(|t| t.taken_on).max()
    }

    pub fn due_count(&self, today: NaiveDate) -> u32 {
        let due = self.review_queue.values().filter(|c| c.is_due(today)).count();
        u32::try_from(due).unwrap_or(u32::MAX)
    }

    /// Accuracy over every recorded answer, as a percentage.
    pub fn overall_mastery(&self) -> f64 {
        let (attempts, correct) = self
            .categories
            .values()
            .fold((0u64, 0u64), |(a, c), s| {
                (a + s.attempts as u64, c + s.correct as u64)
            });
        if attempts == 0 {
            return 0.0;
        }
        correct as f64 / attempts as f64 * 100.0
    }
}
