//! Calendar periods for day and month groupings
//!
//! All calendar arithmetic happens in UTC so that groupings do not depend on
//! the host time zone. Day keys are `YYYYMMDD`, month keys `YYYYMM`; both
//! sort lexicographically in chronological order.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Calendar date of an epoch timestamp, if representable.
pub fn date_of(timestamp: f64) -> Option<NaiveDate> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos).map(|dt| dt.date_naive())
}

/// `YYYYMMDD` key of a date.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// `YYYYMM` key of a date.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y%m").to_string()
}

/// Continuous month counter, so that month differences are plain
/// subtractions.
pub fn month_ordinal(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

/// `YYYYMM` key of a month ordinal.
pub fn month_key_of_ordinal(ordinal: i64) -> String {
    let year = ordinal.div_euclid(12);
    let month = ordinal.rem_euclid(12) + 1;
    format!("{:04}{:02}", year, month)
}

/// The date `days` calendar days before `date`.
pub fn days_before(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days))
}
