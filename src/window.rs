use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::models::TimeWindow;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a backend date into an instant in `tz`. Bare `YYYY-MM-DD` is UTC
/// midnight; date-times without an offset are wall-clock times in `tz`.
pub fn parse_timestamp<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(tz));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc().with_timezone(tz));
    }
    NAIVE_FORMATS.iter().find_map(|format| {
        let naive = NaiveDateTime::parse_from_str(value, format).ok()?;
        tz.from_local_datetime(&naive).earliest()
    })
}

/// Whether `value` falls in `window` relative to `now`.
///
/// Today and Yesterday compare calendar days. This Week compares the full
/// timestamp against local midnight of the most recent Sunday and has no
/// upper bound. Unparseable values only match [`TimeWindow::All`].
pub fn classify<Tz: TimeZone>(value: &str, window: TimeWindow, now: &DateTime<Tz>) -> bool {
    if window == TimeWindow::All {
        return true;
    }
    let Some(at) = parse_timestamp(value, &now.timezone()) else {
        return false;
    };
    let today = now.date_naive();

    match window {
        TimeWindow::All => true,
        TimeWindow::Today => at.date_naive() == today,
        TimeWindow::Yesterday => today.pred_opt() == Some(at.date_naive()),
        TimeWindow::ThisWeek => at.naive_local() >= week_start(today).and_time(NaiveTime::MIN),
        TimeWindow::ThisMonth => at.year() == today.year() && at.month() == today.month(),
    }
}

/// Sunday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_sunday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

pub fn locale_date<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<String> {
    parse_timestamp(value, tz).map(|at| at.naive_local().format("%-m/%-d/%Y").to_string())
}

/// UTC calendar date of a backend timestamp read in the viewer's zone.
pub fn utc_date<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<NaiveDate> {
    parse_timestamp(value, tz).map(|at| at.with_timezone(&Utc).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    // Friday 2024-03-15, noon UTC.
    fn friday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn windows(value: &str, now: &DateTime<Utc>) -> [bool; 4] {
        [
            classify(value, TimeWindow::Today, now),
            classify(value, TimeWindow::Yesterday, now),
            classify(value, TimeWindow::ThisWeek, now),
            classify(value, TimeWindow::ThisMonth, now),
        ]
    }

    #[test]
    fn parses_supported_shapes() {
        assert!(parse_timestamp("2024-03-01T10:00:00Z", &Utc).is_some());
        assert!(parse_timestamp("2024-03-01T10:00:00.000Z", &Utc).is_some());
        assert!(parse_timestamp("2024-03-01T10:00:00+05:30", &Utc).is_some());
        assert!(parse_timestamp("2024-03-01T10:00", &Utc).is_some());
        assert!(parse_timestamp("2024-03-01 10:00:00", &Utc).is_some());
        assert!(parse_timestamp("2024-03-01", &Utc).is_some());
        assert!(parse_timestamp("", &Utc).is_none());
        assert!(parse_timestamp("next tuesday", &Utc).is_none());
    }

    #[test]
    fn same_day_record_matches_today_week_and_month() {
        let now = friday();
        assert_eq!(windows("2024-03-15T08:00", &now), [true, false, true, true]);
    }

    #[test]
    fn later_today_still_counts_as_today() {
        let now = friday();
        assert!(classify("2024-03-15T23:30:00", TimeWindow::Today, &now));
    }

    #[test]
    fn previous_day_matches_yesterday_only_by_calendar_day() {
        let now = friday();
        assert_eq!(windows("2024-03-14T23:59:00", &now), [false, true, true, true]);
        assert_eq!(windows("2024-03-14T00:00:01", &now), [false, true, true, true]);
    }

    #[test]
    fn saturday_before_week_start_is_outside_this_week() {
        let now = friday();
        assert_eq!(week_start(now.date_naive()), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert!(!classify("2024-03-09", TimeWindow::ThisWeek, &now));
        assert!(classify("2024-03-09", TimeWindow::ThisMonth, &now));
    }

    // This Week compares full timestamps, unlike Today/Yesterday.
    #[test]
    fn week_boundary_compares_full_timestamps() {
        let now = friday();
        assert!(classify("2024-03-10T00:00:00", TimeWindow::ThisWeek, &now));
        assert!(!classify("2024-03-09T23:59:59", TimeWindow::ThisWeek, &now));
        assert!(classify("2024-04-20T09:00:00", TimeWindow::ThisWeek, &now));
        assert!(!classify("2024-04-20T09:00:00", TimeWindow::Today, &now));
    }

    #[test]
    fn sunday_is_its_own_week_start() {
        let sunday = Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();
        assert_eq!(week_start(sunday.date_naive()), sunday.date_naive());
        assert!(classify("2024-03-10T01:00:00", TimeWindow::ThisWeek, &sunday));
        assert!(!classify("2024-03-09T22:00:00", TimeWindow::ThisWeek, &sunday));
    }

    #[test]
    fn yesterday_across_month_boundary() {
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert!(classify("2024-02-29T18:00:00", TimeWindow::Yesterday, &first));
        assert!(!classify("2024-02-29T18:00:00", TimeWindow::ThisMonth, &first));
    }

    #[test]
    fn month_requires_same_year() {
        let now = friday();
        assert!(!classify("2023-03-15T08:00:00", TimeWindow::ThisMonth, &now));
    }

    #[test]
    fn unparseable_dates_only_match_all() {
        let now = friday();
        for value in ["", "not a date", "15/03/2024"] {
            assert!(classify(value, TimeWindow::All, &now));
            assert_eq!(windows(value, &now), [false; 4]);
        }
    }

    #[test]
    fn offsets_are_read_in_viewer_zone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = ist.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        assert!(classify("2024-03-14T20:00:00Z", TimeWindow::Today, &now));
        assert!(classify("2024-03-15", TimeWindow::Today, &now));

        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = est.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        assert!(classify("2024-03-15", TimeWindow::Yesterday, &now));
    }

    #[test]
    fn locale_date_uses_month_first() {
        assert_eq!(locale_date("2024-03-05T10:00:00Z", &Utc).as_deref(), Some("3/5/2024"));
        assert_eq!(locale_date("bogus", &Utc), None);
    }

    #[test]
    fn utc_date_shifts_local_wall_clock() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(
            utc_date("2024-03-01T02:00:00", &ist),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            utc_date("2024-03-01T10:00:00Z", &ist),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }
}
