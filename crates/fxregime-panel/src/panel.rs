//! The aligned multi-indicator panel.
//!
//! A panel is an explicit schema: an ordered list of named `f64` columns
//! over one shared ascending date axis. Every cell is populated by
//! construction; column misses and length mismatches are typed errors at
//! the operation boundary rather than failures deep inside a computation.

use crate::error::{PanelError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One named, fully-populated column of the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Indicator name.
    pub name: String,
    /// One value per panel row.
    pub values: Vec<f64>,
}

/// The joined, multi-indicator monthly table all analyses consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl Panel {
    /// Create a panel from a date axis and matching columns.
    ///
    /// The axis must be strictly ascending and every column must have one
    /// value per date.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self> {
        let n_rows = dates.len();
        debug_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        for (idx, column) in columns.iter().enumerate() {
            if column.values.len() != n_rows {
                return Err(PanelError::LengthMismatch {
                    column: column.name.clone(),
                    expected: n_rows,
                    actual: column.values.len(),
                });
            }
            if columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(PanelError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { dates, columns })
    }

    /// The shared date axis, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the panel holds no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| PanelError::UnknownColumn(name.to_string()))
    }

    /// Append a computed column.
    ///
    /// Fails on duplicate names or a length that does not match the axis;
    /// the panel is left unchanged on error.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(PanelError::DuplicateColumn(name));
        }
        if values.len() != self.n_rows() {
            return Err(PanelError::LengthMismatch {
                column: name,
                expected: self.n_rows(),
                actual: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Row subset of the panel for the given row indices.
    ///
    /// Indices must be ascending; used by the regime splitter.
    pub(crate) fn take_rows(&self, indices: &[usize]) -> Self {
        let dates = indices.iter().map(|&i| self.dates[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: indices.iter().map(|&i| c.values[i]).collect(),
            })
            .collect();
        Self { dates, columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn sample_panel() -> Panel {
        Panel::new(
            vec![date(2020, 1), date(2020, 2)],
            vec![
                Column {
                    name: "A".into(),
                    values: vec![1.0, 2.0],
                },
                Column {
                    name: "B".into(),
                    values: vec![10.0, 20.0],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_column_lookup() {
        let panel = sample_panel();
        assert_eq!(panel.column("A").unwrap(), &[1.0, 2.0]);
        assert!(matches!(
            panel.column("Z"),
            Err(PanelError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Panel::new(
            vec![date(2020, 1), date(2020, 2)],
            vec![Column {
                name: "A".into(),
                values: vec![1.0],
            }],
        )
        .unwrap_err();
        assert!(matches!(err, PanelError::LengthMismatch { .. }));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut panel = sample_panel();
        let err = panel.add_column("A", vec![0.0, 0.0]).unwrap_err();
        assert!(matches!(err, PanelError::DuplicateColumn(_)));
    }

    #[test]
    fn test_add_column() {
        let mut panel = sample_panel();
        panel.add_column("C", vec![5.0, 6.0]).unwrap();
        assert_eq!(panel.column("C").unwrap(), &[5.0, 6.0]);
        assert_eq!(panel.column_names(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_take_rows() {
        let panel = sample_panel();
        let subset = panel.take_rows(&[1]);
        assert_eq!(subset.dates(), &[date(2020, 2)]);
        assert_eq!(subset.column("B").unwrap(), &[20.0]);
    }
}
