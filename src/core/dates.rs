// src/core/dates.rs
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate};

const YEARS: RangeInclusive<i32> = 1900..=2100;

/// Best-effort calendar date from the free text review sites print.
///
/// Accepts ISO dates and datetimes, `M/D/YYYY`, `Month D, YYYY`, `D Month YYYY`
/// (full or short month names, ordinals allowed) and `Month YYYY`, which lands on
/// the first of the month. Leading labels such as `Reviewed:` are ignored.
/// Returns `None` when no date can be recovered.
pub fn parse_loose(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_numeric(s).or_else(|| parse_named(s))
}

fn parse_numeric(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let head = s.split(|c: char| c == 'T' || c.is_whitespace()).next()?;
    ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d.%m.%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok().filter(plausible))
}

/// chrono's `%Y` takes one- and two-digit years too; reviews are never that old.
fn plausible(d: &NaiveDate) -> bool {
    YEARS.contains(&d.year())
}

fn parse_named(s: &str) -> Option<NaiveDate> {
    let mut month = None;
    let mut year = None;
    let mut day = None;

    for token in s.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
        let token = token.to_lowercase();
        if let Some(m) = month_token_to_number(&token) {
            month.get_or_insert(m);
            continue;
        }
        let digits = strip_ordinal(&token);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let Ok(n) = digits.parse::<u32>() else { continue };
        match digits.len() {
            4 if YEARS.contains(&(n as i32)) => { year.get_or_insert(n as i32); }
            1 | 2 if (1..=31).contains(&n) => { day.get_or_insert(n); }
            _ => {}
        }
    }

    NaiveDate::from_ymd_opt(year?, month?, day.unwrap_or(1))
}

/// `"3rd"` → `"3"`; anything else unchanged.
fn strip_ordinal(token: &str) -> &str {
    for suffix in ["st", "nd", "rd", "th"] {
        if let Some(head) = token.strip_suffix(suffix) {
            if !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit()) {
                return head;
            }
        }
    }
    token
}

/// Convert a lowercase month token to a month number (1-12).
fn month_token_to_number(token: &str) -> Option<u32> {
    match token {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_and_datetime() {
        assert_eq!(parse_loose("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_loose("2024-03-05 00:00:00"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_loose("2024-03-05T10:11:12Z"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn month_first_slashes() {
        assert_eq!(parse_loose("03/04/2024"), Some(ymd(2024, 3, 4)));
    }

    #[test]
    fn short_years_are_not_guessed() {
        assert_eq!(parse_loose("3/4/24"), None);
        assert_eq!(parse_loose("10/11/12"), None);
        assert_eq!(parse_loose("5.6.07"), None);
    }

    #[test]
    fn named_months_in_either_order() {
        assert_eq!(parse_loose("March 3, 2024"), Some(ymd(2024, 3, 3)));
        assert_eq!(parse_loose("3 March 2024"), Some(ymd(2024, 3, 3)));
        assert_eq!(parse_loose("Sept 21st, 2019"), Some(ymd(2019, 9, 21)));
        assert_eq!(parse_loose("Reviewed: 12 May 2023"), Some(ymd(2023, 5, 12)));
    }

    #[test]
    fn month_and_year_only() {
        assert_eq!(parse_loose("Date of stay: June 2022"), Some(ymd(2022, 6, 1)));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_loose(""), None);
        assert_eq!(parse_loose("3 weeks ago"), None);
        assert_eq!(parse_loose("February 30, 2023"), None);
    }
}
