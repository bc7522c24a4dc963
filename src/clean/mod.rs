// src/clean/mod.rs
//! Raw per-site tables → one reconciled dataset.
pub mod normalize;
pub mod reconcile;

pub use normalize::{normalize, profile_for, NormalizeReport, SourceProfile, TravelerRule};
pub use reconcile::{reconcile, ReconcileReport};
