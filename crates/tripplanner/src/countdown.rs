//! Days remaining until departure.

use chrono::{DateTime, NaiveDate, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days from `now` until the start of `target`, never negative.
///
/// The target day starts at midnight UTC. Any remaining fraction of a day
/// counts as a full day, so the morning before departure still reads `1`.
#[must_use]
pub fn days_until(target: NaiveDate, now: DateTime<Utc>) -> i64 {
    let departure = target.and_time(chrono::NaiveTime::MIN).and_utc();
    let remaining = departure.timestamp_millis() - now.timestamp_millis();
    if remaining <= 0 {
        return 0;
    }
    (remaining + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn departure() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    #[test]
    fn test_exact_days() {
        let now = Utc.with_ymd_and_hms(2025, 11, 21, 0, 0, 0).unwrap();
        assert_eq!(days_until(departure(), now), 10);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let now = Utc.with_ymd_and_hms(2025, 11, 30, 18, 45, 0).unwrap();
        assert_eq!(days_until(departure(), now), 1);

        let now = Utc.with_ymd_and_hms(2025, 11, 20, 0, 0, 1).unwrap();
        assert_eq!(days_until(departure(), now), 11);
    }

    #[test]
    fn test_never_negative() {
        let on_the_day = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        assert_eq!(days_until(departure(), on_the_day), 0);

        let later = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
        assert_eq!(days_until(departure(), later), 0);
    }
}
