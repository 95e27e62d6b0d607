use chrono::{Datelike, NaiveDate, TimeDelta};

/// The number of days in a month, as the save document counts them.
const DAYS_PER_MONTH: f64 = 30.0;

pub(crate) const MONTHS_PER_YEAR: f64 = 12.0;

/// Parses a number the lenient way the save document writes them.
/// Surrounding whitespace is ignored. Empty input is not a number.
pub(crate) fn parse_float(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Interprets a flag the way the game does.
pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Formats a number with two decimal places, or nothing at all.
/// Non-finite values are spelled `nan`, `inf` and `-inf`.
pub fn format_decimal(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_nan() => "nan".to_owned(),
        Some(v) => format!("{:.2}", v),
    }
}

/// Converts an age in months to an age in days.
/// Rounds half to even. Returns [None] for input that isn't a finite number.
pub fn age_days(age_in_months: &str) -> Option<i64> {
    let months = parse_float(age_in_months)?;
    let days = (months * DAYS_PER_MONTH).round_ties_even();
    if days.is_finite() && days.abs() < i64::MAX as f64 {
        Some(days as i64)
    } else {
        None
    }
}

/// Converts an age in months to an age in years.
pub fn age_years(age_in_months: &str) -> Option<f64> {
    parse_float(age_in_months)
        .map(|months| months / MONTHS_PER_YEAR)
        .filter(|years| years.is_finite())
}

/// Calculates the date a pregnancy ends.
///
/// The date parts must be integers, the duration is a number of days and is
/// truncated. Anything that does not form a real calendar date, or lands
/// outside of years 1 to 9999, gives [None].
pub fn due_date(year: &str, month: &str, day: &str, duration_days: &str) -> Option<NaiveDate> {
    let year = year.trim().parse::<i32>().ok()?;
    let month = month.trim().parse::<u32>().ok()?;
    let day = day.trim().parse::<u32>().ok()?;
    let duration = parse_float(duration_days)?.trunc();
    if !duration.is_finite() || duration.abs() > i32::MAX as f64 {
        return None;
    }
    if !(1..=9999).contains(&year) {
        return None;
    }
    let start = NaiveDate::from_ymd_opt(year, month, day)?;
    let end = start.checked_add_signed(TimeDelta::try_days(duration as i64)?)?;
    if (1..=9999).contains(&end.year()) {
        Some(end)
    } else {
        None
    }
}

/// Renders a date the ISO way.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
