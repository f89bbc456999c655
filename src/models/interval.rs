//! Interval model and the merged interval set.
//!
//! An [`Interval`] is a closed calendar-date range: both the start and the end
//! date are service days. A [`MergedIntervalSet`] is what the merger hands back,
//! sorted and disjoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A closed, inclusive range of calendar dates representing one continuous
/// period of work.
///
/// Construction through [`Interval::new`] does not validate ordering; the
/// merger rejects reversed intervals with [`EngineError::InvalidInterval`].
/// Use [`Interval::try_new`] to validate up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    /// The first worked day.
    pub start_date: NaiveDate,
    /// The last worked day.
    pub end_date: NaiveDate,
}

impl Interval {
    /// Creates an interval without checking that `start_date <= end_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Creates an interval, failing if it ends before it starts.
    ///
    /// # Examples
    ///
    /// ```
    /// use experience_engine::models::Interval;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
    /// assert!(Interval::try_new(start, end).is_err());
    /// assert!(Interval::try_new(end, start).is_ok());
    /// ```
    pub fn try_new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        let interval = Self::new(start_date, end_date);
        interval.validate()?;
        Ok(interval)
    }

    /// Checks the `start_date <= end_date` invariant.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start_date > self.end_date {
            return Err(EngineError::InvalidInterval {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Returns the number of worked days, counting both boundary days.
    ///
    /// # Examples
    ///
    /// ```
    /// use experience_engine::models::Interval;
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    /// assert_eq!(Interval::new(day, day).days(), 1);
    /// ```
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Returns true if `date` falls within the interval.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Sums [`Interval::days`] over the input without removing overlap.
pub fn naive_total_days(intervals: &[Interval]) -> i64 {
    intervals.iter().map(Interval::days).sum()
}

/// The canonical disjoint covering set produced by the interval merger.
///
/// Intervals are sorted ascending by start date and every interval starts
/// strictly after the previous one ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedIntervalSet {
    intervals: Vec<Interval>,
    total_days: i64,
}

impl MergedIntervalSet {
    /// Builds a set from intervals the merger has already made disjoint.
    pub(crate) fn from_disjoint(intervals: Vec<Interval>) -> Self {
        let total_days = naive_total_days(&intervals);
        Self {
            intervals,
            total_days,
        }
    }

    /// The merged intervals, ascending by start date.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Total worked days across the merged intervals.
    pub fn total_days(&self) -> i64 {
        self.total_days
    }

    /// Number of merged intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns true when no interval was supplied.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Consumes the set, returning the merged intervals.
    pub fn into_intervals(self) -> Vec<Interval> {
        self.intervals
    }
}
