//! Reporting-period buckets derived from contract dates.
//!
//! Weeks are fixed day-of-month buckets, not ISO calendar weeks: days 1–7
//! fall into week 1, 8–14 into week 2, 15–21 into week 3, and everything
//! from day 22 to the end of the month into week 4.

use chrono::{Datelike, NaiveDate};

/// Derive `(period_key, period_text)` for a contract date.
///
/// The key looks like `"2025-12-W1"`, the text like `"2025년 12월 1주차"`
/// (month without a leading zero).
pub fn derive_period(date: NaiveDate) -> (String, String) {
    let week = week_of(date.day());
    let key = format!("{}-{:02}-W{}", date.year(), date.month(), week);
    let text = format!("{}년 {}월 {}주차", date.year(), date.month(), week);
    (key, text)
}

fn week_of(day: u32) -> u32 {
    match day {
        1..=7 => 1,
        8..=14 => 2,
        15..=21 => 3,
        _ => 4,
    }
}
