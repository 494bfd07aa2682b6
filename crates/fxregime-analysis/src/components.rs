//! Component contribution breakdown for an aggregate's period increase.
//!
//! Given the component series of an aggregate (e.g. the product-level
//! breakdown of M2), ranks which components drove the aggregate's change
//! over a period: per-component increase, and that increase as a share of
//! the summed increase across all components.

use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;
use fxregime_panel::Panel;
use serde::{Deserialize, Serialize};

/// One component's change over the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentContribution {
    /// Component column name.
    pub component: String,
    /// Level at the start date.
    pub start_value: f64,
    /// Level at the end date.
    pub end_value: f64,
    /// Absolute change, `end_value − start_value`.
    pub increase: f64,
    /// Share of the summed increase across all components, in percent.
    /// Negative for components that shrank while the total grew.
    pub share_pct: f64,
}

/// Ranked component contributions over a closed `[start, end]` period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    /// Period start (inclusive; must be on the panel axis).
    pub start: NaiveDate,
    /// Period end (inclusive; must be on the panel axis).
    pub end: NaiveDate,
    /// Summed increase across all components.
    pub total_increase: f64,
    /// Per-component contributions, sorted by increase descending.
    pub components: Vec<ComponentContribution>,
}

impl ContributionBreakdown {
    /// The `n` largest contributors.
    pub fn top(&self, n: usize) -> &[ComponentContribution] {
        &self.components[..n.min(self.components.len())]
    }
}

/// Rank the given component columns by their contribution to the summed
/// increase between two axis dates.
///
/// Both boundary dates must be present on the axis; an absent date is a
/// typed error naming the date. Shares are NaN when the summed increase is
/// exactly zero (the ranking by absolute increase still holds).
pub fn component_contributions(
    panel: &Panel,
    components: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ContributionBreakdown> {
    if components.is_empty() {
        return Err(AnalysisError::InvalidParameter(
            "component breakdown needs at least one component column".into(),
        ));
    }

    let start_idx = axis_index(panel, components, start)?;
    let end_idx = axis_index(panel, components, end)?;

    let mut entries = Vec::with_capacity(components.len());
    for component in components {
        let values = panel.column(component)?;
        let start_value = values[start_idx];
        let end_value = values[end_idx];
        entries.push(ComponentContribution {
            component: component.clone(),
            start_value,
            end_value,
            increase: end_value - start_value,
            share_pct: f64::NAN,
        });
    }

    let total_increase: f64 = entries.iter().map(|e| e.increase).sum();
    if total_increase != 0.0 {
        for entry in &mut entries {
            entry.share_pct = entry.increase / total_increase * 100.0;
        }
    }

    entries.sort_by(|a, b| {
        b.increase
            .partial_cmp(&a.increase)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(ContributionBreakdown {
        start,
        end,
        total_increase,
        components: entries,
    })
}

fn axis_index(panel: &Panel, components: &[String], date: NaiveDate) -> Result<usize> {
    panel
        .dates()
        .iter()
        .position(|&d| d == date)
        .ok_or_else(|| AnalysisError::MissingDate {
            column: components[0].clone(),
            date,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fxregime_panel::Column;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn panel(columns: Vec<(&str, Vec<f64>)>) -> Panel {
        let n = columns[0].1.len();
        let dates = (0..n)
            .map(|i| {
                date(2024, 11)
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap()
            })
            .collect();
        Panel::new(
            dates,
            columns
                .into_iter()
                .map(|(name, values)| Column {
                    name: name.into(),
                    values,
                })
                .collect(),
        )
        .unwrap()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_ranking_and_shares() {
        let p = panel(vec![
            ("DEPOSITS", vec![100.0, 120.0, 160.0]),
            ("FUNDS", vec![50.0, 55.0, 70.0]),
            ("BONDS", vec![30.0, 28.0, 20.0]),
        ]);
        let breakdown = component_contributions(
            &p,
            &cols(&["DEPOSITS", "FUNDS", "BONDS"]),
            date(2024, 11),
            date(2025, 1),
        )
        .unwrap();

        // +60 + 20 - 10
        assert_relative_eq!(breakdown.total_increase, 70.0, epsilon = 1e-12);
        assert_eq!(breakdown.components[0].component, "DEPOSITS");
        assert_eq!(breakdown.components[2].component, "BONDS");
        assert_relative_eq!(breakdown.components[0].share_pct, 60.0 / 70.0 * 100.0, epsilon = 1e-9);
        // A shrinking component carries a negative share
        assert!(breakdown.components[2].share_pct < 0.0);
        // Shares telescope back to 100% of the total
        let share_sum: f64 = breakdown.components.iter().map(|c| c.share_pct).sum();
        assert_relative_eq!(share_sum, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_top_truncates() {
        let p = panel(vec![
            ("A", vec![0.0, 3.0]),
            ("B", vec![0.0, 1.0]),
            ("C", vec![0.0, 2.0]),
        ]);
        let breakdown =
            component_contributions(&p, &cols(&["A", "B", "C"]), date(2024, 11), date(2024, 12))
                .unwrap();
        let top = breakdown.top(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].component, "A");
        assert_eq!(top[1].component, "C");
        assert_eq!(breakdown.top(99).len(), 3);
    }

    #[test]
    fn test_zero_total_yields_nan_shares() {
        let p = panel(vec![
            ("A", vec![10.0, 15.0]),
            ("B", vec![10.0, 5.0]),
        ]);
        let breakdown =
            component_contributions(&p, &cols(&["A", "B"]), date(2024, 11), date(2024, 12))
                .unwrap();
        assert_eq!(breakdown.total_increase, 0.0);
        assert!(breakdown.components.iter().all(|c| c.share_pct.is_nan()));
        // Ranking by absolute increase is unaffected
        assert_eq!(breakdown.components[0].component, "A");
    }

    #[test]
    fn test_missing_boundary_date_named() {
        let p = panel(vec![("A", vec![1.0, 2.0])]);
        let err = component_contributions(&p, &cols(&["A"]), date(2024, 11), date(2030, 1))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingDate { .. }));
    }

    #[test]
    fn test_no_components_rejected() {
        let p = panel(vec![("A", vec![1.0, 2.0])]);
        let err = component_contributions(&p, &[], date(2024, 11), date(2024, 12)).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter(_)));
    }
}
