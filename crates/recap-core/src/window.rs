//! Look-back window for recently added media.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Window construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The window must cover at least one day.
    #[error("look-back window must be at least 1 day, got {days}")]
    NonPositiveDays { days: u32 },
}

/// Closed interval `[start, end]` of the last `days` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    days: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl LookbackWindow {
    /// Builds the window ending at `now` and reaching back `days` whole days.
    pub fn ending_at(now: DateTime<Utc>, days: u32) -> Result<Self, WindowError> {
        if days == 0 {
            return Err(WindowError::NonPositiveDays { days: 0 });
        }
        Ok(Self {
            days,
            start: now - Duration::days(i64::from(days)),
            end: now,
        })
    }

    pub const fn days(&self) -> u32 {
        self.days
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive at both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 16, 0, 0).unwrap()
    }

    #[test]
    fn test_window_rejects_zero_days() {
        assert_eq!(
            LookbackWindow::ending_at(now(), 0),
            Err(WindowError::NonPositiveDays { days: 0 })
        );
    }

    #[test]
    fn test_window_spans_whole_days() {
        let window = LookbackWindow::ending_at(now(), 5).unwrap();
        assert_eq!(window.days(), 5);
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2025, 1, 24, 16, 0, 0).unwrap()
        );
        assert_eq!(window.end(), now());
    }

    #[test]
    fn test_window_is_inclusive_at_both_ends() {
        let window = LookbackWindow::ending_at(now(), 1).unwrap();
        assert!(window.contains(window.start()));
        assert!(window.contains(window.end()));
        assert!(window.contains(now() - Duration::hours(12)));
    }

    #[test]
    fn test_window_excludes_outside_instants() {
        let window = LookbackWindow::ending_at(now(), 1).unwrap();
        assert!(!window.contains(window.start() - Duration::seconds(1)));
        assert!(!window.contains(window.end() + Duration::seconds(1)));
    }
}
