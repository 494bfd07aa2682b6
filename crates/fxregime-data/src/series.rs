//! In-memory representation of one standardized indicator series.

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date (month granularity, normalized to the first of the month).
    pub date: NaiveDate,
    /// Observed value.
    pub value: f64,
}

impl Observation {
    /// Create an observation, snapping the date to the first of its month.
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date: month_start(date),
            value,
        }
    }
}

/// Normalize a date to the first day of its month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 always exists for a valid (year, month)
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// One indicator's monthly time series.
///
/// Observations are sorted ascending by date and dates are unique; both
/// properties are enforced at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    name: String,
    observations: Vec<Observation>,
}

impl MonthlySeries {
    /// Build a series from unordered observations.
    ///
    /// Sorts ascending by date and rejects duplicate dates. The `origin`
    /// string is only used to label errors (typically the source file path).
    pub fn from_observations(
        name: impl Into<String>,
        mut observations: Vec<Observation>,
        origin: &str,
    ) -> Result<Self> {
        let name = name.into();
        if observations.is_empty() {
            return Err(DataError::Empty(origin.to_string()));
        }
        observations.sort_by_key(|o| o.date);
        for pair in observations.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(DataError::DuplicateDate {
                    file: origin.to_string(),
                    date: pair[0].date,
                });
            }
        }
        Ok(Self { name, observations })
    }

    /// Indicator name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All observations, ascending by date.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Value at an exact date, if present.
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|i| self.observations[i].value)
    }

    /// First observation date.
    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    /// Last observation date.
    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_sorted_on_construction() {
        let obs = vec![
            Observation::new(date(2020, 3), 3.0),
            Observation::new(date(2020, 1), 1.0),
            Observation::new(date(2020, 2), 2.0),
        ];
        let series = MonthlySeries::from_observations("A", obs, "a.csv").unwrap();
        let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2020, 1), date(2020, 2), date(2020, 3)]);
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let obs = vec![
            Observation::new(date(2020, 1), 1.0),
            Observation::new(date(2020, 1), 2.0),
        ];
        let err = MonthlySeries::from_observations("A", obs, "a.csv").unwrap_err();
        assert!(matches!(err, DataError::DuplicateDate { .. }));
    }

    #[test]
    fn test_mid_month_dates_collapse_to_month_start() {
        let obs = Observation::new(NaiveDate::from_ymd_opt(2020, 5, 17).unwrap(), 9.0);
        assert_eq!(obs.date, date(2020, 5));
    }

    #[test]
    fn test_value_at() {
        let obs = vec![
            Observation::new(date(2020, 1), 1.0),
            Observation::new(date(2020, 2), 2.0),
        ];
        let series = MonthlySeries::from_observations("A", obs, "a.csv").unwrap();
        assert_eq!(series.value_at(date(2020, 2)), Some(2.0));
        assert_eq!(series.value_at(date(2020, 3)), None);
    }

    #[test]
    fn test_empty_rejected() {
        let err = MonthlySeries::from_observations("A", Vec::new(), "a.csv").unwrap_err();
        assert!(matches!(err, DataError::Empty(_)));
    }
}
