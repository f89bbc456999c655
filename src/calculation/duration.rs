//! Day-count to years/months/days conversion.
//!
//! Uses the fixed 30-day month the historical ledger was originally
//! approximated with. This is not a calendar-accurate conversion. The stored
//! month and year totals divide by 30 only; the display breakdown first takes
//! whole 365-day years out, so a full calendar year reads "1 años y 0 meses".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ExperienceSummary, HistoricalSummary};

/// Days counted as one month.
pub const DAYS_PER_MONTH: i64 = 30;

/// Months counted as one year.
pub const MONTHS_PER_YEAR: i64 = 12;

/// Days counted as one year in the display breakdown.
pub const DAYS_PER_YEAR: i64 = 365;

/// A day count broken down into derived totals and display components.
///
/// # Example
///
/// ```
/// use experience_engine::calculation::ExperienceDuration;
///
/// let duration = ExperienceDuration::from_days(400);
/// assert_eq!(duration.total_months, 13);
/// assert_eq!(duration.years, 1);
/// assert_eq!(duration.months, 1);
/// assert_eq!(duration.days, 5);
/// assert_eq!(duration.display_text(), "1 años, 1 meses y 5 días");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceDuration {
    /// The input day count.
    pub total_days: i64,
    /// Whole months: `total_days / 30`.
    pub total_months: i64,
    /// `total_months / 12` rounded to two decimal places.
    pub total_years: Decimal,
    /// Whole 365-day years, for display.
    pub years: i64,
    /// Whole 30-day months left after the years, for display.
    pub months: i64,
    /// Days left after years and months, for display.
    pub days: i64,
}

impl ExperienceDuration {
    /// Breaks a non-negative day count down.
    pub fn from_days(total_days: i64) -> Self {
        let total_months = total_days / DAYS_PER_MONTH;
        let within_year = total_days % DAYS_PER_YEAR;
        Self {
            total_days,
            total_months,
            total_years: years_from_months(total_months),
            years: total_days / DAYS_PER_YEAR,
            months: within_year / DAYS_PER_MONTH,
            days: within_year % DAYS_PER_MONTH,
        }
    }

    /// Renders the duration as "{years} años, {months} meses y {days} días",
    /// dropping the days clause when there are no leftover days.
    pub fn display_text(&self) -> String {
        if self.days > 0 {
            format!(
                "{} años, {} meses y {} días",
                self.years, self.months, self.days
            )
        } else {
            format!("{} años y {} meses", self.years, self.months)
        }
    }

    /// Builds the persisted summary row for a person.
    pub fn to_summary(&self, person_id: impl Into<String>) -> ExperienceSummary {
        ExperienceSummary {
            person_id: person_id.into(),
            total_days: self.total_days,
            total_months: self.total_months,
            total_years: self.total_years,
            display_text: self.display_text(),
        }
    }
}

/// `months / 12` rounded to two places, always carrying a scale of two.
fn years_from_months(total_months: i64) -> Decimal {
    let mut years = (Decimal::from(total_months) / Decimal::from(MONTHS_PER_YEAR)).round_dp(2);
    years.rescale(2);
    years
}

/// Builds the historical-only display summary from a ledger row count and
/// merged day total.
pub fn historical_summary(count: usize, total_days: i64) -> HistoricalSummary {
    if count == 0 {
        return HistoricalSummary::empty();
    }

    HistoricalSummary {
        count,
        total_days,
        display_text: ExperienceDuration::from_days(total_days).display_text(),
        has_records: true,
    }
}
