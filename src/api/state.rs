//! Application state for the Experience Consolidation Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::aggregator::ExperienceAggregator;

/// Shared application state.
///
/// Holds the aggregator, which owns the sources and the summary store.
#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<ExperienceAggregator>,
}

impl AppState {
    /// Creates a new application state around the aggregator.
    pub fn new(aggregator: ExperienceAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }

    /// Returns a shared handle to the aggregator.
    pub fn aggregator(&self) -> Arc<ExperienceAggregator> {
        Arc::clone(&self.aggregator)
    }
}
