// src/core/numbers.rs
use std::sync::LazyLock;

use regex::Regex;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());
static COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d,]*").unwrap());

/// First decimal number in `s` (`"Scored 8.4"` → 8.4).
pub fn first_number(s: &str) -> Option<f64> {
    NUMBER.find(s)?.as_str().parse().ok()
}

/// Numerator of a score written as `X/Y` or `X of Y …`.
pub fn numerator(s: &str) -> Option<f64> {
    let head = match s.find('/') {
        Some(i) => &s[..i],
        None => s.split(" of ").next().unwrap_or(s),
    };
    first_number(head)
}

/// Review count with thousands separators (`"1,234 reviews"` → 1234).
pub fn count(s: &str) -> Option<u64> {
    let m = COUNT.find(s)?;
    m.as_str().replace(',', "").parse().ok()
}

/// Permissive float coercion: the whole trimmed cell must be a finite number.
pub fn to_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whole nights from a numeric cell (`"3"`, `"3.0"`). Negative values are rejected.
pub fn to_nights(s: &str) -> Option<u32> {
    to_float(s).filter(|v| *v >= 0.0 && *v <= f64::from(u32::MAX)).map(|v| v.trunc() as u32)
}

/// Shortest decimal text that parses back to the same value (`9.0` → `"9"`).
pub fn fmt_number(v: f64) -> String {
    format!("{v}")
}
