// Parsing and rounding helpers shared by the normalizer and the aggregator.
//
// This module centralizes all the "dirty" string handling coming out of the
// ministry spreadsheet and the API payload, so the rest of the code can
// assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports and API fields.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Strips thousands separators like `"65,000"` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

/// Same forgiving policy, with a `0` fallback.
///
/// Raw-field accessors in the normalizer behave as if the field carried
/// `"0"` when it is absent or unparseable.
pub fn parse_f64_or_zero(s: Option<&str>) -> f64 {
    parse_f64_safe(s).unwrap_or(0.0)
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn parse_date_safe(s: &str) -> Option<NaiveDate> {
    // Canonical contract dates are `YYYY-MM-DD`.
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Round to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Pyeong-equivalent area type stored on a deal: `round(area_m2 / 3.3)`.
pub fn area_type_of(area_m2: f64) -> i32 {
    (area_m2 / 3.3).round() as i32
}

/// Deposit in 억 units from 만원: `round(manwon / 10000 * 10) / 10`.
pub fn deposit_uk_of(deposit_manwon: f64) -> f64 {
    round1(deposit_manwon / 10000.0)
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `1,234 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
