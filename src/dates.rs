use time::{Date, Duration, OffsetDateTime, Time, UtcOffset};

/// Calendar date of a timestamp, always resolved in UTC. This is the
/// aggregation key for meals: `meal_date = utc_date(occurred_at)`.
pub fn utc_date(ts: OffsetDateTime) -> Date {
    ts.to_offset(UtcOffset::UTC).date()
}

/// Half-open one-day window `[date, date + 1)` for range queries.
pub fn day_range(date: Date) -> (Date, Date) {
    (date, date.next_day().unwrap_or(Date::MAX))
}

/// Compose a timestamp from an `HH:MM` time of day on the same UTC day as
/// `now`. Returns `None` for anything that does not parse as a valid wall
/// clock time.
pub fn today_at(hhmm: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
    let (h, m) = hhmm.split_once(':')?;
    let hour: u8 = h.parse().ok()?;
    let minute: u8 = m.parse().ok()?;
    let tod = Time::from_hms(hour, minute, 0).ok()?;
    Some(utc_date(now).with_time(tod).assume_utc())
}

/// The 7 consecutive dates ending at `end`, clamped so the window never
/// extends past `today`.
pub fn week_window(end: Date, today: Date) -> Vec<Date> {
    let anchor = end.min(today);
    (0..7).rev().map(|i| anchor - Duration::days(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn utc_date_ignores_local_offset() {
        // 23:30 at +02:00 is 21:30 UTC, still the same calendar day
        assert_eq!(utc_date(datetime!(2026-03-14 23:30 +2)), date!(2026 - 03 - 14));
        // 01:00 at +03:00 is 22:00 UTC the previous day
        assert_eq!(utc_date(datetime!(2026-03-15 01:00 +3)), date!(2026 - 03 - 14));
    }

    #[test]
    fn day_range_is_half_open() {
        let (start, end) = day_range(date!(2026 - 02 - 28));
        assert_eq!(start, date!(2026 - 02 - 28));
        assert_eq!(end, date!(2026 - 03 - 01));
    }

    #[test]
    fn today_at_composes_on_the_utc_day() {
        let now = datetime!(2026-08-07 18:45 UTC);
        let ts = today_at("08:30", now).expect("valid time");
        assert_eq!(ts, datetime!(2026-08-07 08:30 UTC));
    }

    #[test]
    fn today_at_rejects_garbage() {
        let now = datetime!(2026-08-07 18:45 UTC);
        assert!(today_at("25:00", now).is_none());
        assert!(today_at("12:60", now).is_none());
        assert!(today_at("noonish", now).is_none());
        assert!(today_at("", now).is_none());
    }

    #[test]
    fn week_window_spans_seven_days_ending_at_anchor() {
        let days = week_window(date!(2026 - 08 - 05), date!(2026 - 08 - 07));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date!(2026 - 07 - 30));
        assert_eq!(days[6], date!(2026 - 08 - 05));
    }

    #[test]
    fn week_window_never_extends_past_today() {
        let days = week_window(date!(2026 - 08 - 20), date!(2026 - 08 - 07));
        assert_eq!(days[6], date!(2026 - 08 - 07));
        assert_eq!(days[0], date!(2026 - 08 - 01));
    }
}
