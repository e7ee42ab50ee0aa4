//! Local-time formatting without a timezone database.
//!
//! Providers give an epoch timestamp plus the location's UTC offset in
//! seconds. Adding the offset and then formatting the result as if it were
//! UTC yields the wall-clock reading at the location, including for places
//! that have no IANA zone identifier.

use chrono::{DateTime, Utc};

const CLOCK_FORMAT: &str = "%I:%M %p";
const LOCAL_DATE_TIME_FORMAT: &str = "%A, %B %-d, %Y at %I:%M %p";
const WEEKDAY_FORMAT: &str = "%A";

/// Shift `epoch_secs` by `offset_secs`; the returned instant must only be
/// formatted, never compared with real UTC instants.
pub fn shift_to_local(epoch_secs: i64, offset_secs: i32) -> Option<DateTime<Utc>> {
    let shifted = epoch_secs.checked_add(i64::from(offset_secs))?;
    DateTime::from_timestamp(shifted, 0)
}

/// `06:05 AM`
pub fn format_clock(epoch_secs: i64, offset_secs: i32) -> Option<String> {
    format_shifted(epoch_secs, offset_secs, CLOCK_FORMAT)
}

/// `Tuesday, November 14, 2023 at 10:13 PM`
pub fn format_local_date_time(epoch_secs: i64, offset_secs: i32) -> Option<String> {
    format_shifted(epoch_secs, offset_secs, LOCAL_DATE_TIME_FORMAT)
}

/// `Tuesday`
pub fn format_weekday(epoch_secs: i64, offset_secs: i32) -> Option<String> {
    format_shifted(epoch_secs, offset_secs, WEEKDAY_FORMAT)
}

fn format_shifted(epoch_secs: i64, offset_secs: i32, fmt: &str) -> Option<String> {
    shift_to_local(epoch_secs, offset_secs).map(|t| t.format(fmt).to_string())
}
