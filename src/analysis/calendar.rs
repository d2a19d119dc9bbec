use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};

/// Weekdays between two instants, counted on UTC calendar dates from
/// `start`'s date up to (not including) `end`'s date. Negative when `end`
/// precedes `start`.
pub fn business_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let (from, to) = (start.date_naive(), end.date_naive());
    if to >= from {
        count_weekdays(from, to)
    } else {
        -count_weekdays(to, from)
    }
}

/// Whole 24-hour periods from `start` to `end`, truncated toward zero.
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    end.signed_duration_since(start).num_days()
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Saturates at `NaiveDate::MAX`.
pub fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

fn count_weekdays(from: NaiveDate, to: NaiveDate) -> i64 {
    let span = to.signed_duration_since(from).num_days();
    let full_weeks = span / 7;
    let mut count = full_weeks * 5;

    let mut cursor = from + chrono::Duration::days(full_weeks * 7);
    while cursor < to {
        if !is_weekend(cursor) {
            count += 1;
        }
        cursor = cursor + chrono::Duration::days(1);
    }

    count
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
