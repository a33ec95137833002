use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

const MAX_REVIEW_INTERVAL_DAYS: u32 = 60;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub attempts: u32,
    pub correct: u32,
}

impl CategoryStats {
    pub fn record(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Accuracy as a percentage; 0 before the first attempt.
    pub fn mastery(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        (self.correct as f64 / self.attempts as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// A question in the spaced-repetition queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCard {
    pub question_id: String,
    pub interval_days: u32,
    pub due: NaiveDate,
}

impl ReviewCard {
    pub fn new(question_id: impl Into<String>, answered_on: NaiveDate) -> Self {
        Self {
            question_id: question_id.into(),
            interval_days: 0,
            due: answered_on,
        }
    }

    /// Leitner-style rescheduling: a miss comes back tomorrow, a hit doubles the gap.
    pub fn schedule(&mut self, answered_on: NaiveDate, correct: bool) {
        self.interval_days = if correct {
            (self.interval_days.max(1) * 2).min(MAX_REVIEW_INTERVAL_DAYS)
        } else {
            1
        };
        self.due = answered_on + Duration::days(self.interval_days as i64);
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.due <= today
    }
}
