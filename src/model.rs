// src/model.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

/// Review sources, in no particular order. Use [`Source::priority`] for ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    Booking,
    Expedia,
    TripAdvisor,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Booking, Source::Expedia, Source::TripAdvisor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Booking => "Booking",
            Source::Expedia => "Expedia",
            Source::TripAdvisor => "TripAdvisor",
        }
    }

    /// Lower-case stem used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Source::Booking => "booking",
            Source::Expedia => "expedia",
            Source::TripAdvisor => "tripadvisor",
        }
    }

    /// Reconciliation rank; the higher copy of a duplicate survives.
    pub fn priority(&self) -> u8 {
        match self {
            Source::Booking => 3,
            Source::Expedia => 2,
            Source::TripAdvisor => 1,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.trim_end_matches("com") {
            "booking" => Ok(Source::Booking),
            "expedia" => Ok(Source::Expedia),
            "tripadvisor" => Ok(Source::TripAdvisor),
            _ => Err(format!("unknown source: {s}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TravelerType {
    Solo,
    Couple,
    Family,
    Group,
    Unknown,
}

impl TravelerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelerType::Solo => "Solo",
            TravelerType::Couple => "Couple",
            TravelerType::Family => "Family",
            TravelerType::Group => "Group",
            TravelerType::Unknown => "Unknown",
        }
    }

    /// Keyword bucketing, checked in priority order.
    pub fn from_keywords(label: &str) -> TravelerType {
        let l = label.to_lowercase();
        if l.contains("partner") {
            TravelerType::Couple
        } else if l.contains("family") {
            TravelerType::Family
        } else if l.contains("group") {
            TravelerType::Group
        } else {
            TravelerType::Solo
        }
    }

    /// Exact category names, including the plural/synonym labels some sites use.
    pub fn from_label(label: &str) -> Option<TravelerType> {
        match label.trim().to_lowercase().as_str() {
            "solo" | "business" => Some(TravelerType::Solo),
            "couple" | "couples" => Some(TravelerType::Couple),
            "family" | "families" => Some(TravelerType::Family),
            "group" | "friends" => Some(TravelerType::Group),
            "unknown" => Some(TravelerType::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for TravelerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields an adapter can pull off a review card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawField {
    Text,
    Rating,
    Name,
    Date,
    LengthOfStay,
    TravelerType,
    Title,
    DateVisited,
}

impl RawField {
    /// Column label in the per-source raw file.
    pub fn column(&self) -> &'static str {
        match self {
            RawField::Text => "review_text",
            RawField::Rating => "review_rating",
            RawField::Name => "traveler_name",
            RawField::Date => "review_date",
            RawField::LengthOfStay => "length_of_stay",
            RawField::TravelerType => "traveler_type",
            RawField::Title => "review_title",
            RawField::DateVisited => "date_visited",
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One review card as scraped. Every field is optional; a miss is a null.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawReview {
    pub text: Option<String>,
    pub rating: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub length_of_stay: Option<String>,
    pub traveler_type: Option<String>,
    pub title: Option<String>,
    pub date_visited: Option<String>,
}

impl RawReview {
    pub fn get(&self, field: RawField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: RawField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    fn slot(&self, field: RawField) -> &Option<String> {
        match field {
            RawField::Text => &self.text,
            RawField::Rating => &self.rating,
            RawField::Name => &self.name,
            RawField::Date => &self.date,
            RawField::LengthOfStay => &self.length_of_stay,
            RawField::TravelerType => &self.traveler_type,
            RawField::Title => &self.title,
            RawField::DateVisited => &self.date_visited,
        }
    }

    fn slot_mut(&mut self, field: RawField) -> &mut Option<String> {
        match field {
            RawField::Text => &mut self.text,
            RawField::Rating => &mut self.rating,
            RawField::Name => &mut self.name,
            RawField::Date => &mut self.date,
            RawField::LengthOfStay => &mut self.length_of_stay,
            RawField::TravelerType => &mut self.traveler_type,
            RawField::Title => &mut self.title,
            RawField::DateVisited => &mut self.date_visited,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == RawReview::default()
    }
}

/// Listing-level aggregates, scraped once per source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListingTotals {
    pub rating: Option<String>,
    pub reviews: Option<String>,
}

impl ListingTotals {
    /// Keep what we already have; fill gaps from `other`.
    pub fn merge(&mut self, other: ListingTotals) {
        if self.rating.is_none() {
            self.rating = other.rating;
        }
        if self.reviews.is_none() {
            self.reviews = other.reviews;
        }
    }
}

/// A review in the common schema, before cross-source reconciliation.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedReview {
    pub source: Source,
    pub text: String,
    /// 0–10 scale. `None` only between coercion and the null-rating drop.
    pub rating: Option<f64>,
    pub name: Option<String>,
    pub review_date: Option<NaiveDate>,
    pub length_of_stay: Option<u32>,
    pub traveler_type: Option<TravelerType>,
    pub title: Option<String>,
    pub date_visited: Option<String>,
    pub total_rating: Option<f64>,
    pub total_reviews: Option<u64>,
}

/// A row of the persisted, reconciled dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanReview {
    pub source: Source,
    pub text: String,
    pub rating: f64,
    pub name: Option<String>,
    pub review_date: NaiveDate,
    pub length_of_stay: u32,
    pub traveler_type: TravelerType,
    pub total_rating: Option<f64>,
    pub total_reviews: Option<u64>,
}

impl From<CleanReview> for NormalizedReview {
    fn from(r: CleanReview) -> Self {
        NormalizedReview {
            source: r.source,
            text: r.text,
            rating: Some(r.rating),
            name: r.name,
            review_date: Some(r.review_date),
            length_of_stay: Some(r.length_of_stay),
            traveler_type: Some(r.traveler_type),
            title: None,
            date_visited: None,
            total_rating: r.total_rating,
            total_reviews: r.total_reviews,
        }
    }
}
