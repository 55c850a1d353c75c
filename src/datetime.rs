//! FILETIME conversion and timestamp formatting.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Serialize, Serializer};

/// FILETIME to Unix epoch offset (100-nanosecond intervals)
const FILETIME_UNIX_EPOCH: u64 = 116_444_736_000_000_000;

/// 100-nanosecond intervals per second
const FILETIME_TICKS_PER_SECOND: u64 = 10_000_000;

/// Raw 64-bit FILETIME as stored in the link header (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Filetime(pub u64);

impl Filetime {
    /// Zero means the writer left the timestamp unset
    pub fn is_set(&self) -> bool {
        self.0 != 0
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        filetime_to_datetime(self.0)
    }
}

impl Serialize for Filetime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_datetime() {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

/// Convert FILETIME to DateTime<Utc>, keeping the 100ns precision.
///
/// Returns `None` for zero, the unset marker. Values before the Unix epoch
/// convert normally.
pub fn filetime_to_datetime(filetime: u64) -> Option<DateTime<Utc>> {
    if filetime == 0 {
        return None;
    }

    let ticks = filetime as i128 - FILETIME_UNIX_EPOCH as i128;
    let secs = ticks.div_euclid(FILETIME_TICKS_PER_SECOND as i128);
    let nanos = ticks.rem_euclid(FILETIME_TICKS_PER_SECOND as i128) * 100;
    DateTime::from_timestamp(i64::try_from(secs).ok()?, nanos as u32)
}

/// Format timestamp for human-readable output
pub fn format_timestamp_human(dt: &DateTime<Utc>) -> String {
    let nanos = dt.nanosecond();
    let weekday = format_weekday(dt.weekday());
    let base_format = dt.format("%Y-%m-%d %H:%M:%S");

    format!("{} {}.{:07} UTC", weekday, base_format, nanos / 100)
}

/// Format weekday as three-letter abbreviation
fn format_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
