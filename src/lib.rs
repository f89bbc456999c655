//! Experience Consolidation Engine
//!
//! This crate computes a person's total verifiable work experience from two
//! independent interval sources (the live application form and the historical
//! contract ledger), collapses overlapping periods so no day is counted
//! twice, and keeps one derived summary per person.

#![warn(missing_docs)]

pub mod aggregator;
pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod sources;
pub mod store;
