//! Calculation logic for the Experience Consolidation Engine.
//!
//! This module contains the pure parts of the engine: the interval merger
//! that removes overlap between work periods, and the conversion of a merged
//! day count into months, years and display text.

mod duration;
mod interval_merge;

pub use duration::{
    DAYS_PER_MONTH, DAYS_PER_YEAR, ExperienceDuration, MONTHS_PER_YEAR, historical_summary,
};
pub use interval_merge::merge;
