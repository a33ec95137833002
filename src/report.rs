use std::fmt;

use crate::engine::pace::PaceStatus;
use crate::engine::study_plan::DailyPlan;

fn plural(n: u32, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

impl fmt::Display for DailyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Today's plan (~{} min)", self.estimated_minutes)?;

        if self.srs_review_count > 0 {
            writeln!(f, "  Review:    {} due", plural(self.srs_review_count, "card"))?;
        }
        if self.new_question_target > 0 {
            writeln!(
                f,
                "  Learn:     {}",
                plural(self.new_question_target, "new question")
            )?;
        }
        if let Some(drill) = &self.drill_recommendation {
            writeln!(
                f,
                "  Drill:     {} ({})",
                drill.category,
                plural(drill.count, "question")
            )?;
        }
        if self.mock_test_recommended {
            writeln!(f, "  Mock test: recommended")?;
        }
        if self.srs_review_count == 0
            && self.new_question_target == 0
            && self.drill_recommendation.is_none()
            && !self.mock_test_recommended
        {
            writeln!(f, "  Nothing scheduled. A quick look over your notes will do.")?;
        }

        match self.days_remaining {
            None => write!(f, "No test date set."),
            Some(0) => write!(f, "Test day. Good luck!"),
            Some(days) => {
                write!(f, "{} until your test", plural(days, "day"))?;
                match self.pace_status {
                    Some(PaceStatus::Ahead) => write!(f, ", ahead of pace."),
                    Some(PaceStatus::OnTrack) => write!(f, ", on track."),
                    Some(PaceStatus::Behind) => write!(f, ", behind pace."),
                    None => write!(f, "."),
                }
            }
        }
    }
}
