//! Walk-forward date split — in-sample window followed by a forward-test window.
//!
//! The forward-test (FT) window is anchored to the end of the full range:
//!
//! ```text
//! range_start                    ft_start = is_end          range_end = ft_end
//!     |--------- in-sample ---------|------- forward test -------|
//!               is_days                        ft_days
//! ```
//!
//! The FT window must leave a non-empty in-sample window. A window that is
//! too large is a configuration error and is never clamped.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Result types ────────────────────────────────────────────────────

/// In-sample / forward-test date boundaries.
///
/// Invariants: `ft_end == range_end`, `is_end == ft_start`,
/// `ft_start == ft_end - ft_days`, `is_days + ft_days == total_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSplit {
    pub is_start: DateTime<Utc>,
    pub is_end: DateTime<Utc>,
    pub ft_start: DateTime<Utc>,
    pub ft_end: DateTime<Utc>,
    pub is_days: i64,
    pub ft_days: i64,
}

impl DateSplit {
    pub fn total_days(&self) -> i64 {
        self.is_days + self.ft_days
    }
}

/// Errors from validation setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ValidationError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

// ─── Split ───────────────────────────────────────────────────────────

/// Split `[range_start, range_end]` into an in-sample window and a trailing
/// forward-test window of `ft_days` days.
///
/// Day counts are whole days (`Duration::num_days`, truncating).
pub fn calculate_ft_dates(
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    ft_days: i64,
) -> Result<DateSplit, ValidationError> {
    if ft_days < 1 {
        return Err(ValidationError::invalid_config(format!(
            "FT period must be at least 1 day, got {ft_days}"
        )));
    }

    let total_days = (range_end - range_start).num_days();
    if ft_days >= total_days {
        return Err(ValidationError::invalid_config(format!(
            "FT period ({ft_days} days) is too large for the available range \
             ({total_days} days from {} to {}); the in-sample window would be empty",
            range_start.date_naive(),
            range_end.date_naive()
        )));
    }

    let ft_end = range_end;
    let ft_start = ft_end - Duration::days(ft_days);
    let is_start = range_start;
    let is_end = ft_start;
    let is_days = (is_end - is_start).num_days();

    tracing::debug!(
        %is_start,
        %ft_start,
        %ft_end,
        is_days,
        ft_days,
        "walk-forward split"
    );

    Ok(DateSplit {
        is_start,
        is_end,
        ft_start,
        ft_end,
        is_days,
        ft_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn thirty_day_forward_test() {
        let split = calculate_ft_dates(day(2025, 5, 1), day(2025, 9, 1), 30).unwrap();
        assert_eq!(split.ft_end, day(2025, 9, 1));
        assert_eq!(split.ft_start, day(2025, 8, 2));
        assert_eq!(split.is_end, split.ft_start);
        assert_eq!(split.is_start, day(2025, 5, 1));
        assert_eq!(split.ft_days, 30);
        assert_eq!(split.is_days, 93);
        assert_eq!(split.total_days(), 123);
    }

    #[test]
    fn ft_window_larger_than_range_is_rejected() {
        let err = calculate_ft_dates(day(2025, 5, 1), day(2025, 5, 10), 10).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid configuration"), "{msg}");
        assert!(msg.contains("FT period"), "{msg}");
        assert!(msg.contains("too large"), "{msg}");
    }

    #[test]
    fn ft_window_equal_to_range_is_rejected() {
        // 9 days total; FT of 9 leaves no in-sample window
        assert!(calculate_ft_dates(day(2025, 5, 1), day(2025, 5, 10), 9).is_err());
        assert!(calculate_ft_dates(day(2025, 5, 1), day(2025, 5, 10), 8).is_ok());
    }

    #[test]
    fn non_positive_ft_days_rejected() {
        assert!(calculate_ft_dates(day(2025, 1, 1), day(2025, 6, 1), 0).is_err());
        assert!(calculate_ft_dates(day(2025, 1, 1), day(2025, 6, 1), -5).is_err());
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(calculate_ft_dates(day(2025, 6, 1), day(2025, 1, 1), 10).is_err());
    }

    #[test]
    fn intraday_boundaries_keep_time_of_day() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 16, 0, 0).unwrap();
        let split = calculate_ft_dates(start, end, 14).unwrap();
        assert_eq!(
            split.ft_start,
            Utc.with_ymd_and_hms(2024, 2, 16, 16, 0, 0).unwrap()
        );
        assert_eq!(split.is_days + split.ft_days, (end - start).num_days());
    }
}
