//! Text forms of the dates and times stored in the JSON files.
//!
//! Timestamps are ISO-8601 local date-times (`2025-02-03T10:15:30.123`),
//! lesson dates are `YYYY-MM-DD` and lesson times are `HH:mm`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::LoadCause;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_TIME_MINUTES_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

pub fn encode_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Accepts full timestamps as well as the minute-precision form, where the
/// seconds were zero.
pub fn decode_date_time(value: &str) -> Result<NaiveDateTime, LoadCause> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATE_TIME_MINUTES_FORMAT))
        .map_err(|source| timestamp_error(value, source))
}

pub fn encode_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn decode_date(value: &str) -> Result<NaiveDate, LoadCause> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| timestamp_error(value, source))
}

pub fn encode_time(value: &NaiveTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

pub fn decode_time(value: &str) -> Result<NaiveTime, LoadCause> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|source| timestamp_error(value, source))
}

fn timestamp_error(value: &str, source: chrono::ParseError) -> LoadCause {
    LoadCause::Timestamp {
        value: value.to_string(),
        source,
    }
}
