//! Interval merging.
//!
//! Collapses overlapping, touching and calendar-adjacent intervals into the
//! minimal disjoint covering set so that no worked day is counted twice.

use chrono::Days;

use crate::error::EngineResult;
use crate::models::{Interval, MergedIntervalSet};

/// Merges intervals into the minimal set of disjoint intervals covering the
/// same days.
///
/// Input order does not matter and may contain duplicates or nested
/// intervals. The sweep runs over the intervals sorted by start date and
/// extends the current interval while the next one starts on or before the
/// day after the current end. Intervals that share a boundary day, or where
/// one contract ends the day before the next begins, describe one continuous
/// period.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInterval`](crate::error::EngineError::InvalidInterval)
/// for the first interval whose start date is after its end date. Nothing is
/// swapped or dropped.
///
/// # Examples
///
/// ```
/// use experience_engine::calculation::merge;
/// use experience_engine::models::Interval;
/// use chrono::NaiveDate;
///
/// let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// let merged = merge(&[
///     Interval::new(d(2020, 7, 1), d(2020, 12, 31)),
///     Interval::new(d(2020, 1, 1), d(2020, 6, 30)),
/// ])
/// .unwrap();
///
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged.total_days(), 366);
/// ```
pub fn merge(intervals: &[Interval]) -> EngineResult<MergedIntervalSet> {
    for interval in intervals {
        interval.validate()?;
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|i| i.start_date);

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    let mut iter = sorted.into_iter();

    let Some(mut current) = iter.next() else {
        return Ok(MergedIntervalSet::default());
    };

    for next in iter {
        if continues(&current, &next) {
            current.end_date = current.end_date.max(next.end_date);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    Ok(MergedIntervalSet::from_disjoint(merged))
}

/// True when `next` (sorted after `current`) starts no later than the day
/// after `current` ends.
fn continues(current: &Interval, next: &Interval) -> bool {
    match current.end_date.checked_add_days(Days::new(1)) {
        Some(day_after) => next.start_date <= day_after,
        // current ends on the last representable date, nothing can follow it
        None => true,
    }
}
