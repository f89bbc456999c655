//! Core data models for the Experience Consolidation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod historical;
mod interval;
mod person;
mod summary;

pub use historical::HistoricalContractRecord;
pub use interval::{Interval, MergedIntervalSet, naive_total_days};
pub use person::{EmploymentRecord, NationalId, PersonRecord};
pub use summary::{ExperienceSummary, HistoricalSummary};
