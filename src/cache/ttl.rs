//! Calendar-aware cache expiry.
//!
//! Upstream schedule and stats data rolls over once a week (the league
//! publishes updated lines and stats after the Monday night game), so cache
//! entries expire at the next fixed weekly anchor instead of after a sliding
//! TTL. An entry written on Wednesday lives ~6 days; one written Monday
//! night lives a few hours. Both go stale at the same moment.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};

/// Computes the next refresh boundary from "now".
///
/// The boundary is the next occurrence of `anchor_weekday` at `anchor_time`
/// strictly AFTER `now`: when `now` lands exactly on the anchor, the next
/// boundary is a full week out, so an entry can never be born expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyTtlPolicy {
    pub anchor_weekday: Weekday,
    pub anchor_time: NaiveTime,
}

impl Default for WeeklyTtlPolicy {
    /// Tuesday 00:00 UTC, the first quiet moment after the NFL week ends.
    fn default() -> Self {
        WeeklyTtlPolicy {
            anchor_weekday: Weekday::Tue,
            anchor_time: NaiveTime::from_hms_opt(0, 0, 0).expect("valid anchor time"),
        }
    }
}

impl WeeklyTtlPolicy {
    pub fn next_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days_ahead = (self.anchor_weekday.num_days_from_monday() as i64
            - now.weekday().num_days_from_monday() as i64)
            .rem_euclid(7);
        let candidate =
            now.date_naive().and_time(self.anchor_time).and_utc() + Duration::days(days_ahead);
        if candidate <= now {
            candidate + Duration::days(7)
        } else {
            candidate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn exactly_on_anchor_rolls_a_full_week() {
        let policy = WeeklyTtlPolicy::default();
        // 2025-09-09 is a Tuesday.
        let anchor = utc(2025, 9, 9, 0, 0, 0);
        let next = policy.next_boundary(anchor);
        assert_eq!(next, anchor + Duration::days(7));
    }

    #[test]
    fn one_day_after_anchor_expires_within_six_days() {
        let policy = WeeklyTtlPolicy::default();
        // Wednesday 00:00, six days short of the next Tuesday.
        let now = utc(2025, 9, 10, 0, 0, 0);
        let next = policy.next_boundary(now);
        assert_eq!(next, utc(2025, 9, 16, 0, 0, 0));
        assert!(next - now <= Duration::days(6));
    }

    #[test]
    fn monday_night_entries_expire_within_hours() {
        let policy = WeeklyTtlPolicy::default();
        // Monday 23:30, boundary is 30 minutes away.
        let now = utc(2025, 9, 8, 23, 30, 0);
        let next = policy.next_boundary(now);
        assert_eq!(next, utc(2025, 9, 9, 0, 0, 0));
    }

    #[test]
    fn later_the_same_weekday_rolls_to_next_week() {
        let policy = WeeklyTtlPolicy::default();
        // Tuesday 08:00, today's anchor already passed.
        let now = utc(2025, 9, 9, 8, 0, 0);
        assert_eq!(policy.next_boundary(now), utc(2025, 9, 16, 0, 0, 0));
    }

    #[test]
    fn boundary_crosses_year_end() {
        let policy = WeeklyTtlPolicy::default();
        // Wednesday 2025-12-31 → first Tuesday of 2026.
        let now = utc(2025, 12, 31, 12, 0, 0);
        assert_eq!(policy.next_boundary(now), utc(2026, 1, 6, 0, 0, 0));
    }

    #[test]
    fn boundary_is_always_strictly_in_the_future() {
        let policy = WeeklyTtlPolicy::default();
        let mut now = utc(2025, 9, 1, 0, 0, 0);
        for _ in 0..(7 * 24) {
            let next = policy.next_boundary(now);
            assert!(next > now, "boundary {next} not after {now}");
            assert!(next - now <= Duration::days(7));
            now += Duration::hours(1);
        }
    }

    #[test]
    fn custom_anchor_is_respected() {
        let policy = WeeklyTtlPolicy {
            anchor_weekday: Weekday::Fri,
            anchor_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        };
        let now = utc(2025, 9, 9, 0, 0, 0); // Tuesday
        assert_eq!(policy.next_boundary(now), utc(2025, 9, 12, 6, 0, 0));
    }
}
