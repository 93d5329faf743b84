// src/clock.rs

//! Timestamps for banner lines.

use chrono::{DateTime, Local, TimeZone};

/// Format used in banner lines, e.g. `2024/03/01 14:05:09`.
pub const BANNER_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Current local time, formatted for a banner line.
pub fn now() -> String {
    format_timestamp(&Local::now())
}

pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(BANNER_TIME_FORMAT).to_string()
}
