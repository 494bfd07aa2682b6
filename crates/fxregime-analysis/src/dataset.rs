//! Panel-to-matrix conversion for the model engines.

use crate::error::{AnalysisError, Result};
use fxregime_panel::Panel;
use ndarray::{Array1, Array2};

/// Extract the feature columns of a panel as a rows × features matrix.
pub fn feature_matrix(panel: &Panel, features: &[String]) -> Result<Array2<f64>> {
    if panel.is_empty() {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    let n_rows = panel.n_rows();
    let mut matrix = Array2::zeros((n_rows, features.len()));
    for (j, feature) in features.iter().enumerate() {
        let values = panel.column(feature)?;
        for (i, &v) in values.iter().enumerate() {
            matrix[[i, j]] = v;
        }
    }
    Ok(matrix)
}

/// Extract the target column of a panel as a vector.
pub fn target_vector(panel: &Panel, target: &str) -> Result<Array1<f64>> {
    if panel.is_empty() {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(Array1::from_vec(panel.column(target)?.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fxregime_panel::Column;

    fn panel() -> Panel {
        Panel::new(
            vec![
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
            ],
            vec![
                Column {
                    name: "Y".into(),
                    values: vec![10.0, 20.0],
                },
                Column {
                    name: "A".into(),
                    values: vec![1.0, 2.0],
                },
                Column {
                    name: "B".into(),
                    values: vec![3.0, 4.0],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_feature_matrix_layout() {
        let m = feature_matrix(&panel(), &["A".into(), "B".into()]).unwrap();
        assert_eq!(m.shape(), &[2, 2]);
        assert_eq!(m[[0, 0]], 1.0);
        assert_eq!(m[[1, 1]], 4.0);
    }

    #[test]
    fn test_target_vector() {
        let y = target_vector(&panel(), "Y").unwrap();
        assert_eq!(y.to_vec(), vec![10.0, 20.0]);
    }

    #[test]
    fn test_unknown_column_is_error() {
        assert!(feature_matrix(&panel(), &["Z".into()]).is_err());
    }
}
