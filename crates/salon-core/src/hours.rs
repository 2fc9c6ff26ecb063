//! Opening-hours status.
//!
//! A static weekly schedule mapped to an open/closed status string. The
//! status is a pure function of a timestamp; callers that want a live
//! indicator recompute it on their own interval.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};

/// Open and close times for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayHours {
    /// Opening time.
    pub open: NaiveTime,
    /// Closing time (exclusive).
    pub close: NaiveTime,
}

/// Current open/closed state plus the display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningStatus {
    /// True while the salon is open.
    pub is_open: bool,
    /// Human-readable status line.
    pub text: String,
}

/// A weekly schedule, indexed Monday-first; `None` marks a closed day.
#[derive(Debug, Clone)]
pub struct WeeklyHours {
    days: [Option<DayHours>; 7],
}

const OPEN_TEXT: &str = "We are currently open";
const CLOSED_TEXT: &str = "We are currently closed";

impl WeeklyHours {
    /// Build a schedule from Monday-first day entries.
    pub fn new(days: [Option<DayHours>; 7]) -> Self {
        Self { days }
    }

    /// The salon's schedule: Monday-Friday 08:00-17:00, weekend closed.
    pub fn salon_default() -> Self {
        let weekday = DayHours {
            open: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        };
        Self::new([
            Some(weekday),
            Some(weekday),
            Some(weekday),
            Some(weekday),
            Some(weekday),
            None,
            None,
        ])
    }

    /// Hours for a given weekday, `None` when closed all day.
    pub fn for_day(&self, day: Weekday) -> Option<DayHours> {
        self.days[day.num_days_from_monday() as usize]
    }

    /// Status at a given local timestamp.
    ///
    /// Open means `open <= time < close` on a working day; the closing
    /// minute itself counts as closed.
    pub fn status_at(&self, when: NaiveDateTime) -> OpeningStatus {
        let is_open = self
            .for_day(when.weekday())
            .is_some_and(|hours| when.time() >= hours.open && when.time() < hours.close);

        OpeningStatus {
            is_open,
            text: if is_open { OPEN_TEXT } else { CLOSED_TEXT }.to_string(),
        }
    }
}

impl Default for WeeklyHours {
    fn default() -> Self {
        Self::salon_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn open_midweek_during_hours() {
        // 2025-06-04 is a Wednesday.
        let status = WeeklyHours::salon_default().status_at(at(2025, 6, 4, 10, 30));
        assert!(status.is_open);
        assert_eq!(status.text, OPEN_TEXT);
    }

    #[test]
    fn closed_before_opening_and_at_closing_time() {
        let hours = WeeklyHours::salon_default();
        assert!(!hours.status_at(at(2025, 6, 4, 7, 59)).is_open);
        assert!(hours.status_at(at(2025, 6, 4, 8, 0)).is_open);
        assert!(!hours.status_at(at(2025, 6, 4, 17, 0)).is_open);
    }

    #[test]
    fn closed_on_weekends() {
        // 2025-06-07 is a Saturday, 2025-06-08 a Sunday.
        let hours = WeeklyHours::salon_default();
        assert!(!hours.status_at(at(2025, 6, 7, 11, 0)).is_open);
        assert!(!hours.status_at(at(2025, 6, 8, 11, 0)).is_open);
    }
}
