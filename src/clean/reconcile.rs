// src/clean/reconcile.rs
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;

use crate::model::{CleanReview, NormalizedReview, Source, TravelerType};

/// Counts for the end-of-run summary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub loaded: BTreeMap<Source, usize>,
    /// Rows dropped because a higher-priority source had the same review.
    pub cross_source_duplicates: BTreeMap<Source, usize>,
    /// Rows sharing the key with an earlier row of the same source (e.g. a re-rated review).
    pub same_source_duplicates: usize,
    pub before_cutoff: usize,
    pub undated: usize,
    pub final_count: usize,
}

impl ReconcileReport {
    pub fn cross_source_total(&self) -> usize {
        self.cross_source_duplicates.values().sum()
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (source, n) in &self.loaded {
            writeln!(f, "{source} reviews loaded: {n}")?;
        }
        writeln!(f, "Cross-source duplicates removed: {}", self.cross_source_total())?;
        for (source, n) in self.cross_source_duplicates.iter().filter(|(_, n)| **n > 0) {
            writeln!(f, "  from {source}: {n}")?;
        }
        if self.same_source_duplicates > 0 {
            writeln!(f, "Same-source key duplicates removed: {}", self.same_source_duplicates)?;
        }
        writeln!(f, "Dropped before cutoff: {}, undated: {}", self.before_cutoff, self.undated)?;
        write!(f, "Final review count: {}", self.final_count)
    }
}

/// Merge per-source tables into one dataset.
///
/// Rows are ordered by source priority (stable, so each source keeps its own
/// order); the first row per `(text, name, review_date)` wins. Rows dated before
/// `cutoff`, or not dated at all, are dropped. Residual nulls are filled and the
/// site-only columns fall away.
pub fn reconcile(
    tables: Vec<Vec<NormalizedReview>>,
    cutoff: NaiveDate,
) -> (Vec<CleanReview>, ReconcileReport) {
    let mut report = ReconcileReport::default();

    let mut rows: Vec<NormalizedReview> = tables.into_iter().flatten().collect();
    for r in &rows {
        *report.loaded.entry(r.source).or_default() += 1;
    }
    rows.sort_by_key(|r| std::cmp::Reverse(r.source.priority()));

    // key → source of the row that claimed it
    let mut seen: HashMap<(String, Option<String>, Option<NaiveDate>), Source> = HashMap::new();
    let mut out = Vec::with_capacity(rows.len());

    for r in rows {
        let key = (r.text.clone(), r.name.clone(), r.review_date);
        if let Some(&first) = seen.get(&key) {
            if first == r.source {
                report.same_source_duplicates += 1;
            } else {
                *report.cross_source_duplicates.entry(r.source).or_default() += 1;
            }
            continue;
        }
        seen.insert(key, r.source);
        let Some(review_date) = r.review_date else {
            report.undated += 1;
            continue;
        };
        if review_date < cutoff {
            report.before_cutoff += 1;
            continue;
        }
        let Some(rating) = r.rating else {
            continue;
        };
        out.push(CleanReview {
            source: r.source,
            text: r.text,
            rating,
            name: r.name,
            review_date,
            length_of_stay: r.length_of_stay.unwrap_or(0),
            traveler_type: r.traveler_type.unwrap_or(TravelerType::Unknown),
            total_rating: r.total_rating,
            total_reviews: r.total_reviews,
        });
    }

    report.final_count = out.len();
    logf!(
        "reconcile: {} in, {} cross-source and {} same-source duplicate(s), {} before cutoff, {} undated, {} out",
        report.loaded.values().sum::<usize>(),
        report.cross_source_total(),
        report.same_source_duplicates,
        report.before_cutoff,
        report.undated,
        report.final_count
    );
    (out, report)
}
