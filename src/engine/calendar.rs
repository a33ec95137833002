use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::PlanError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Whole calendar days from `today` until `date`. Today or a past date gives 0.
pub fn days_until(today: NaiveDate, date: NaiveDate) -> u32 {
    let diff = (date - today).num_days();
    u32::try_from(diff.max(0)).unwrap_or(u32::MAX)
}

/// Whole calendar days elapsed since `date`. Negative when `date` is in the future.
pub fn days_since(today: NaiveDate, date: NaiveDate) -> i64 {
    (today - date).num_days()
}

/// Strict `YYYY-MM-DD` parsing.
pub fn parse_date(input: &str) -> Result<NaiveDate, PlanError> {
    let trimmed = input.trim();
    // chrono accepts signs and unpadded fields like "+2026-1-05"; require the exact shape
    if !has_iso_date_shape(trimmed) {
        return Err(PlanError::InvalidDate {
            input: input.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| PlanError::InvalidDate {
        input: input.to_string(),
    })
}

fn has_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// A `--now` style argument: `YYYY-MM-DDTHH:MM:SS`, or a bare date meaning midnight.
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime, PlanError> {
    let trimmed = input.trim();
    if let Some((date, time)) = trimmed.split_once('T') {
        let date = parse_date(date).map_err(|_| PlanError::InvalidDate {
            input: input.to_string(),
        })?;
        let time = NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|_| {
            PlanError::InvalidDate {
                input: input.to_string(),
            }
        })?;
        return Ok(date.and_time(time));
    }
    Ok(parse_date(trimmed)?.and_time(NaiveTime::default()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
