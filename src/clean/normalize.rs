// src/clean/normalize.rs
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;

use crate::core::dates::parse_loose;
use crate::core::numbers::{count, first_number, to_float, to_nights};
use crate::error::{Error, ParseError, Result};
use crate::model::{NormalizedReview, Source, TravelerType};
use crate::store::DataSet;

/// How a source's traveler-type column is turned into a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TravelerRule {
    /// Free-text labels, bucketed by keyword.
    Keywords,
    /// The site already names categories; unknown labels fall back to keywords.
    Native,
    /// The site does not publish one.
    Absent,
}

/// Per-source knobs for the one shared normalizer.
#[derive(Clone, Copy, Debug)]
pub struct SourceProfile {
    pub source: Source,
    /// `(site label, canonical label)`, applied after lower-casing headers.
    pub renames: &'static [(&'static str, &'static str)],
    /// Multiplier onto the 0–10 scale.
    pub rating_scale: f64,
    pub traveler: TravelerRule,
}

const RENAMES: &[(&str, &str)] = &[
    ("review_text", "text"),
    ("traveler_name", "name"),
    ("review_rating", "rating"),
];

pub static BOOKING: SourceProfile = SourceProfile {
    source: Source::Booking,
    renames: RENAMES,
    rating_scale: 1.0,
    traveler: TravelerRule::Keywords,
};

pub static EXPEDIA: SourceProfile = SourceProfile {
    source: Source::Expedia,
    renames: RENAMES,
    rating_scale: 1.0,
    traveler: TravelerRule::Absent,
};

pub static TRIPADVISOR: SourceProfile = SourceProfile {
    source: Source::TripAdvisor,
    renames: RENAMES,
    rating_scale: 2.0,
    traveler: TravelerRule::Native,
};

pub fn profile_for(source: Source) -> &'static SourceProfile {
    match source {
        Source::Booking => &BOOKING,
        Source::Expedia => &EXPEDIA,
        Source::TripAdvisor => &TRIPADVISOR,
    }
}

/// Row counts through one source's normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub source: Option<Source>,
    pub loaded: usize,
    pub duplicates_removed: usize,
    pub null_rating_dropped: usize,
    /// Cells that could not be coerced (nulled, row kept).
    pub parse_failures: usize,
    pub kept: usize,
}

impl fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.source.map(|s| s.as_str()).unwrap_or("?");
        write!(
            f,
            "{name}: {} loaded, {} duplicate(s) removed, {} without rating dropped, {} kept",
            self.loaded, self.duplicates_removed, self.null_rating_dropped, self.kept
        )
    }
}

/// Column positions after renaming; only `text` and `rating` are mandatory.
struct Columns {
    text: usize,
    rating: usize,
    name: Option<usize>,
    date: Option<usize>,
    stay: Option<usize>,
    traveler: Option<usize>,
    title: Option<usize>,
    visited: Option<usize>,
    total_rating: Option<usize>,
    total_reviews: Option<usize>,
}

/// One source's raw table → normalized rows. Pure; `origin` only labels errors.
///
/// Order: headers are lower-cased and trimmed, site labels renamed, numbers and
/// dates coerced (failures become null), text trimmed, traveler type derived,
/// exact `(text, review_date, rating)` duplicates dropped, then rows without a
/// rating dropped.
pub fn normalize(
    profile: &SourceProfile,
    table: &DataSet,
    origin: &Path,
) -> Result<(Vec<NormalizedReview>, NormalizeReport)> {
    let headers: Vec<String> = table
        .headers
        .as_ref()
        .ok_or_else(|| Error::Schema { path: origin.to_path_buf(), reason: s!("no header row") })?
        .iter()
        .map(|h| {
            let h = h.trim().to_lowercase();
            profile
                .renames
                .iter()
                .find(|(from, _)| *from == h)
                .map(|(_, to)| s!(*to))
                .unwrap_or(h)
        })
        .collect();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let require = |name: &str| {
        find(name).ok_or_else(|| Error::Schema {
            path: origin.to_path_buf(),
            reason: format!("missing column `{name}`"),
        })
    };
    let cols = Columns {
        text: require("text")?,
        rating: require("rating")?,
        name: find("name"),
        date: find("review_date"),
        stay: find("length_of_stay"),
        traveler: find("traveler_type"),
        title: find("review_title"),
        visited: find("date_visited"),
        total_rating: find("total_rating"),
        total_reviews: find("total_reviews"),
    };

    let mut report = NormalizeReport {
        source: Some(profile.source),
        loaded: table.rows.len(),
        ..Default::default()
    };
    let mut seen: HashSet<(String, Option<NaiveDate>, Option<u64>)> = HashSet::new();
    let mut out = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let cell = |i: Option<usize>| i.and_then(|i| row.get(i)).map(|c| c.trim()).filter(|c| !c.is_empty());
        let mut failed = |e: ParseError| {
            logd!("{}: {e}", profile.source);
            report.parse_failures += 1;
        };

        let rating = coerce(cell(Some(cols.rating)), "rating", "a number", to_float)
            .unwrap_or_else(|e| { failed(e); None })
            .map(|r| r * profile.rating_scale);
        let review_date = coerce(cell(cols.date), "review_date", "a date", parse_loose)
            .unwrap_or_else(|e| { failed(e); None });
        let length_of_stay = coerce(cell(cols.stay), "length_of_stay", "whole nights", to_nights)
            .unwrap_or_else(|e| { failed(e); None });
        let total_rating = coerce(cell(cols.total_rating), "total_rating", "a number", first_number)
            .unwrap_or_else(|e| { failed(e); None })
            .map(|r| round1(r * profile.rating_scale));
        let total_reviews = coerce(cell(cols.total_reviews), "total_reviews", "a count", count)
            .unwrap_or_else(|e| { failed(e); None });

        let review = NormalizedReview {
            source: profile.source,
            text: s!(cell(Some(cols.text)).unwrap_or_default()),
            rating,
            name: cell(cols.name).map(String::from),
            review_date,
            length_of_stay,
            traveler_type: derive_traveler(profile.traveler, cell(cols.traveler)),
            title: cell(cols.title).map(String::from),
            date_visited: cell(cols.visited).map(String::from),
            total_rating,
            total_reviews,
        };

        if !seen.insert((review.text.clone(), review.review_date, review.rating.map(f64::to_bits))) {
            report.duplicates_removed += 1;
            continue;
        }
        out.push(review);
    }

    let before = out.len();
    out.retain(|r| r.rating.is_some());
    report.null_rating_dropped = before - out.len();
    report.kept = out.len();

    if report.duplicates_removed > 0 {
        logf!("{}: dropped {} duplicate row(s)", profile.source, report.duplicates_removed);
    }
    if report.null_rating_dropped > 0 {
        logf!("{}: dropped {} row(s) without a rating", profile.source, report.null_rating_dropped);
    }
    Ok((out, report))
}

/// Absent cell → `Ok(None)`; present but unreadable → `Err`.
fn coerce<T>(
    raw: Option<&str>,
    column: &'static str,
    expected: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> std::result::Result<Option<T>, ParseError> {
    match raw {
        None => Ok(None),
        Some(s) => parse(s)
            .map(Some)
            .ok_or_else(|| ParseError { column, raw: s!(s), expected }),
    }
}

fn derive_traveler(rule: TravelerRule, label: Option<&str>) -> Option<TravelerType> {
    let label = label?;
    match rule {
        TravelerRule::Absent => None,
        TravelerRule::Keywords => Some(TravelerType::from_keywords(label)),
        TravelerRule::Native => {
            Some(TravelerType::from_label(label).unwrap_or_else(|| TravelerType::from_keywords(label)))
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
