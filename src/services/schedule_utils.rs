use chrono::{Duration, NaiveTime, Timelike};
use serde_json::json;

use crate::error::{AppError, AppResult};

const CLOCK_FORMAT: &str = "%H:%M";

/// Parses a strict zero-padded 24-hour "HH:MM" value.
pub fn parse_clock(value: &str) -> AppResult<NaiveTime> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(index, byte)| index == 2 || byte.is_ascii_digit());
    if !well_formed {
        return Err(AppError::validation_with_details(
            "invalid clock time",
            json!({ "value": value }),
        ));
    }
    NaiveTime::parse_from_str(value, CLOCK_FORMAT).map_err(|err| {
        AppError::validation_with_details(
            "invalid clock time",
            json!({ "value": value, "error": err.to_string() }),
        )
    })
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Adds minutes to a wall-clock time, wrapping past midnight.
pub fn add_minutes(time: NaiveTime, minutes: u32) -> NaiveTime {
    let (next, _) = time.overflowing_add_signed(Duration::minutes(i64::from(minutes)));
    next
}

pub fn minutes_from_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn to_naive_time(total_minutes: u32) -> NaiveTime {
    let wrapped = total_minutes % (24 * 60);
    NaiveTime::from_hms_opt(wrapped / 60, wrapped % 60, 0).unwrap_or(NaiveTime::MIN)
}
