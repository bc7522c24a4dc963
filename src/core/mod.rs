// src/core/mod.rs
pub mod awake;
pub mod dates;
pub mod numbers;
pub mod sanitize;
