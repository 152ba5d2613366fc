//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Local::now().year())
}

/// Format a `YYYY-MM-DD` date as a long human date, e.g.
/// "Monday, June 10, 2024". Falls through unchanged if the input does not
/// parse.
///
/// Usage in templates: `{{ date_str|long_date }}`
#[askama::filter_fn]
pub fn long_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_long_date(&value.to_string()))
}

/// Format a decimal amount as dollars, e.g. "$150.00".
///
/// Usage in templates: `{{ room.price_per_night|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&value.to_string()))
}

fn format_long_date(raw: &str) -> String {
    roomboard_core::window::parse_date(raw)
        .map_or_else(|_| raw.to_owned(), |d| d.format("%A, %B %-d, %Y").to_string())
}

fn format_money(raw: &str) -> String {
    raw.parse::<rust_decimal::Decimal>()
        .map_or_else(|_| format!("${raw}"), |d| format!("${d:.2}"))
}
