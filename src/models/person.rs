//! Person identifiers and form-sourced employment records.
//!
//! The identifier is a national-ID-like value that arrives as either a
//! string or an integer depending on the caller.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Interval;

/// A national-ID-like person identifier.
///
/// Deserializes from either a JSON/YAML number or a string. Lookups that need a
/// numeric key (the historical ledger) go through [`NationalId::as_number`];
/// everything else is keyed by [`NationalId::canonical`].
///
/// # Examples
///
/// ```
/// use experience_engine::models::NationalId;
///
/// assert_eq!(NationalId::from(" 00123 ").canonical(), "123");
/// assert_eq!(NationalId::from(123_i64).canonical(), NationalId::from("123").canonical());
/// assert_eq!(NationalId::from("AB-12").as_number(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NationalId {
    /// An identifier that arrived as an integer.
    Number(i64),
    /// An identifier that arrived as text.
    Text(String),
}

impl NationalId {
    /// Integer-parses the identifier. Non-numeric text yields `None`.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            NationalId::Number(n) => Some(*n),
            NationalId::Text(s) => s.trim().parse().ok(),
        }
    }

    /// The key used for person records and stored summaries.
    ///
    /// Numeric identifiers collapse to their integer form so that `"0042"`,
    /// `"42"` and `42` address the same person.
    pub fn canonical(&self) -> String {
        match self {
            NationalId::Number(n) => n.to_string(),
            NationalId::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => n.to_string(),
                Err(_) => s.trim().to_string(),
            },
        }
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl From<i64> for NationalId {
    fn from(value: i64) -> Self {
        NationalId::Number(value)
    }
}

impl From<&str> for NationalId {
    fn from(value: &str) -> Self {
        NationalId::Text(value.to_string())
    }
}

impl From<String> for NationalId {
    fn from(value: String) -> Self {
        NationalId::Text(value)
    }
}

/// One employment entry from the live application form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    /// The employer's name.
    pub employer: String,
    /// The position held, if entered.
    #[serde(default)]
    pub position: Option<String>,
    /// First day of the employment, if entered.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the employment, if entered.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl EmploymentRecord {
    /// Returns the record's interval, or `None` for an incomplete draft.
    pub fn interval(&self) -> Option<Interval> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(Interval::new(start, end)),
            _ => None,
        }
    }
}

/// An applicant as held by the person-record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// The person's identifier.
    pub national_id: NationalId,
    /// The person's full name.
    pub full_name: String,
    /// Employment entries from the form.
    #[serde(default)]
    pub employment: Vec<EmploymentRecord>,
}

impl PersonRecord {
    /// Complete employment intervals ordered by start date.
    ///
    /// Drafts missing either date are skipped. Reversed intervals are passed
    /// through untouched so the merger can reject them.
    pub fn form_intervals(&self) -> Vec<Interval> {
        let mut intervals: Vec<Interval> = self
            .employment
            .iter()
            .filter_map(EmploymentRecord::interval)
            .collect();
        intervals.sort_by_key(|i| i.start_date);
        intervals
    }
}
