//! Test-date parsing, epidemiological weeks and ISO formatting.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use respat_model::DateOrder;

const ISO_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DAY_FIRST_DATETIME: [&str; 2] = ["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];
const MONTH_FIRST_DATETIME: [&str; 2] = ["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];

fn slash_formats(order: DateOrder) -> (&'static [&'static str], &'static str) {
    match order {
        DateOrder::DayFirst => (&DAY_FIRST_DATETIME, "%d/%m/%Y"),
        DateOrder::MonthFirst => (&MONTH_FIRST_DATETIME, "%m/%d/%Y"),
    }
}

fn parse_slash(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let (datetime_formats, date_format) = slash_formats(order);
    datetime_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(value, date_format).ok())
}

/// Parse a test or birth date.
///
/// ISO dates and datetimes are unambiguous. Slash dates are read in the lab's
/// preferred order first and in the other order when that fails, so
/// `25/01/2022` still parses for a month-first lab.
pub fn parse_date(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Some(dt) = ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Some(dt.date());
    }
    let fallback = match order {
        DateOrder::DayFirst => DateOrder::MonthFirst,
        DateOrder::MonthFirst => DateOrder::DayFirst,
    };
    parse_slash(trimmed, order).or_else(|| parse_slash(trimmed, fallback))
}

/// End date (Saturday) of the CDC epidemiological week containing `date`.
pub fn epiweek_end(date: NaiveDate) -> NaiveDate {
    let days_from_sunday = i64::from(date.weekday().num_days_from_sunday());
    date + Duration::days(6 - days_from_sunday)
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
