use serde::{Deserialize, Serialize};

/// Minimum planning horizon assumed when estimating how far along the learner is.
const MIN_HORIZON_DAYS: u32 = 30;
/// Assumed lead time before the current point at which studying started.
const ASSUMED_LEAD_DAYS: u32 = 14;
const PACE_TOLERANCE: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaceStatus {
    Ahead,
    OnTrack,
    Behind,
}

impl PaceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaceStatus::Ahead => "ahead",
            PaceStatus::OnTrack => "on-track",
            PaceStatus::Behind => "behind",
        }
    }
}

/// Compare readiness progress against elapsed time in the approximate study window.
///
/// Returns `None` in no-date mode and on test day (`days_remaining == 0`).
pub fn pace_status(
    readiness_score: f64,
    readiness_target: f64,
    days_remaining: Option<u32>,
) -> Option<PaceStatus> {
    let days_remaining = days_remaining.filter(|&d| d > 0)?;

    let readiness_fraction = readiness_score / readiness_target;
    let approx_total_days = days_remaining
        .saturating_add(ASSUMED_LEAD_DAYS)
        .max(MIN_HORIZON_DAYS);
    let time_fraction =
        (approx_total_days - days_remaining) as f64 / approx_total_days as f64;

    let status = if readiness_fraction > time_fraction + PACE_TOLERANCE {
        PaceStatus::Ahead
    } else if readiness_fraction < time_fraction - PACE_TOLERANCE {
        PaceStatus::Behind
    } else {
        PaceStatus::OnTrack
    };
    Some(status)
}
