// src/store.rs
use std::{fs, path::Path};

use chrono::NaiveDate;

use crate::core::numbers::{fmt_number, to_float, to_nights};
use crate::csv::{parse_rows, split_header, SEP};
use crate::error::{Error, Result};
use crate::file;
use crate::model::{CleanReview, ListingTotals, RawField, RawReview, Source, TravelerType};

/// Column layout of `cleaned_reviews.csv`.
pub const CLEAN_COLUMNS: [&str; 9] = [
    "source", "text", "rating", "name", "review_date",
    "length_of_stay", "traveler_type", "total_rating", "total_reviews",
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Index of the first header equal to `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.as_ref()?.iter().position(|h| h == name)
    }
}

pub fn load_dataset(path: &Path) -> Result<DataSet> {
    let text = fs::read_to_string(path)?;
    let (headers, rows) = split_header(parse_rows(&text, SEP));
    Ok(DataSet { headers, rows })
}

pub fn save_dataset(path: &Path, ds: &DataSet) -> Result<()> {
    file::write_table(path, &ds.headers, &ds.rows).map(|_| ())
}

/* ---------------- Raw (per-source) tables ---------------- */

/// Adapter output: `source`, the site's own columns, then the listing totals on every row.
pub fn raw_dataset(
    source: Source,
    columns: &[RawField],
    reviews: &[RawReview],
    totals: &ListingTotals,
) -> DataSet {
    let mut headers = cols!["source"];
    headers.extend(columns.iter().map(|c| s!(c.column())));
    headers.extend(cols!["total_rating", "total_reviews"]);

    let total_rating = totals.rating.clone().unwrap_or_default();
    let total_reviews = totals.reviews.clone().unwrap_or_default();

    let rows = reviews
        .iter()
        .map(|r| {
            let mut row = vec![s!(source.as_str())];
            row.extend(columns.iter().map(|c| s!(r.get(*c).unwrap_or_default())));
            row.push(total_rating.clone());
            row.push(total_reviews.clone());
            row
        })
        .collect();

    DataSet { headers: Some(headers), rows }
}

/* ---------------- Cleaned dataset ---------------- */

pub fn clean_dataset(reviews: &[CleanReview]) -> DataSet {
    let rows = reviews
        .iter()
        .map(|r| {
            vec![
                s!(r.source.as_str()),
                r.text.clone(),
                fmt_number(r.rating),
                r.name.clone().unwrap_or_default(),
                r.review_date.format("%Y-%m-%d").to_string(),
                r.length_of_stay.to_string(),
                s!(r.traveler_type.as_str()),
                r.total_rating.map(fmt_number).unwrap_or_default(),
                r.total_reviews.map(|n| n.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    DataSet { headers: Some(CLEAN_COLUMNS.iter().map(|c| s!(*c)).collect()), rows }
}

/// Read `cleaned_reviews.csv` back. Rows that do not fit the schema are a data error.
pub fn load_cleaned(path: &Path) -> Result<Vec<CleanReview>> {
    let ds = load_dataset(path)?;
    let schema = |reason: String| Error::Schema { path: path.to_path_buf(), reason };

    let mut idx = [0usize; CLEAN_COLUMNS.len()];
    for (slot, name) in idx.iter_mut().zip(CLEAN_COLUMNS) {
        *slot = ds.column(name).ok_or_else(|| schema(format!("missing column `{name}`")))?;
    }
    let [source, text, rating, name, date, stay, traveler, total_rating, total_reviews] = idx;

    ds.rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cell = |c: usize| row.get(c).map(String::as_str).unwrap_or("");
            let line = i + 2;
            Ok(CleanReview {
                source: cell(source).parse().map_err(|e| schema(format!("line {line}: {e}")))?,
                text: s!(cell(text)),
                rating: to_float(cell(rating))
                    .ok_or_else(|| schema(format!("line {line}: rating {:?}", cell(rating))))?,
                name: Some(s!(cell(name))).filter(|n| !n.is_empty()),
                review_date: NaiveDate::parse_from_str(cell(date), "%Y-%m-%d")
                    .map_err(|e| schema(format!("line {line}: review_date: {e}")))?,
                length_of_stay: to_nights(cell(stay)).unwrap_or(0),
                traveler_type: TravelerType::from_label(cell(traveler)).unwrap_or(TravelerType::Unknown),
                total_rating: to_float(cell(total_rating)),
                total_reviews: cell(total_reviews).trim().parse().ok(),
            })
        })
        .collect()
}
