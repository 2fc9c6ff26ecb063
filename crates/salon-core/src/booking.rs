//! Booking-widget redirect helpers.
//!
//! Bookings happen entirely in a third-party widget; this module only
//! builds the redirect URL and rate-limits repeat redirects so one stuck
//! finger cannot fire a burst of reservation tabs.

use chrono::{DateTime, TimeDelta, Utc};

/// Default third-party booking widget URL.
pub const DEFAULT_BOOKING_URL: &str = "https://services.bookio.com/phd-studio/widget?lang=en";

/// Minimum spacing between two reservation redirects, in seconds.
pub const MIN_INTERVAL_SECS: i64 = 10;

/// Whether a reservation redirect is allowed `MIN_INTERVAL_SECS` after the
/// previous one.
pub fn reservation_allowed(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last {
        None => true,
        Some(last) => now.signed_duration_since(last) >= TimeDelta::seconds(MIN_INTERVAL_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn first_reservation_is_always_allowed() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert!(reservation_allowed(None, now));
    }

    #[test]
    fn repeat_within_the_window_is_blocked() {
        let last = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let now = last + TimeDelta::seconds(9);
        assert!(!reservation_allowed(Some(last), now));
    }

    #[test]
    fn repeat_at_the_window_edge_is_allowed() {
        let last = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let now = last + TimeDelta::seconds(10);
        assert!(reservation_allowed(Some(last), now));
    }
}
