//! Regression tree used as the forest's base learner.

use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// One node of a fitted regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Tree-level fitting parameters, owned by the forest config.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) max_features: usize,
}

/// A fitted regression tree with MSE splits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegressionTree {
    root: Node,
    /// Total squared-error reduction attributed to each feature.
    importances: Vec<f64>,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `indices` (bootstrap sample).
    pub(crate) fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: Vec<usize>,
        params: &TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut importances = vec![0.0; x.ncols()];
        let root = build_node(x, y, indices, 0, params, rng, &mut importances);
        Self { root, importances }
    }

    /// Predict a single feature row.
    pub(crate) fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Unnormalized per-feature impurity decrease.
    pub(crate) fn importances(&self) -> &[f64] {
        &self.importances
    }
}

fn mean(y: &Array1<f64>, indices: &[usize]) -> f64 {
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

/// Sum of squared errors around the subset mean, via the sum/sum-of-squares
/// identity so split scans stay O(n) per feature.
fn sse(sum: f64, sum_sq: f64, n: f64) -> f64 {
    (sum_sq - sum * sum / n).max(0.0)
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    decrease: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

#[allow(clippy::too_many_arguments)]
fn build_node(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: Vec<usize>,
    depth: usize,
    params: &TreeParams,
    rng: &mut ChaCha8Rng,
    importances: &mut [f64],
) -> Node {
    let n = indices.len();
    let leaf_value = mean(y, &indices);

    let depth_exhausted = params.max_depth.is_some_and(|d| depth >= d);
    if n < params.min_samples_split || depth_exhausted {
        return Node::Leaf { value: leaf_value };
    }

    match find_best_split(x, y, &indices, params, rng) {
        Some(split) if split.decrease > 0.0 => {
            importances[split.feature] += split.decrease;
            let left = build_node(x, y, split.left, depth + 1, params, rng, importances);
            let right = build_node(x, y, split.right, depth + 1, params, rng, importances);
            Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        _ => Node::Leaf { value: leaf_value },
    }
}

fn find_best_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    params: &TreeParams,
    rng: &mut ChaCha8Rng,
) -> Option<BestSplit> {
    let n = indices.len() as f64;
    let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
    let total_sum_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
    let parent_sse = sse(total_sum, total_sum_sq, n);
    if parent_sse == 0.0 {
        return None;
    }

    // Random feature subset per split, like the forest's bagging of rows
    let mut features: Vec<usize> = (0..x.ncols()).collect();
    features.shuffle(rng);
    features.truncate(params.max_features.max(1));

    let mut best: Option<BestSplit> = None;

    for &feature in &features {
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| {
            x[[a, feature]]
                .partial_cmp(&x[[b, feature]])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_sum = 0.0;
        let mut left_sum_sq = 0.0;
        for k in 1..order.len() {
            let prev = order[k - 1];
            left_sum += y[prev];
            left_sum_sq += y[prev] * y[prev];

            let v_prev = x[[prev, feature]];
            let v_next = x[[order[k], feature]];
            if v_prev == v_next {
                continue;
            }
            if k < params.min_samples_leaf || order.len() - k < params.min_samples_leaf {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sum_sq = total_sum_sq - left_sum_sq;
            let decrease = parent_sse
                - sse(left_sum, left_sum_sq, k as f64)
                - sse(right_sum, right_sum_sq, (order.len() - k) as f64);

            if best.as_ref().is_none_or(|b| decrease > b.decrease) {
                best = Some(BestSplit {
                    feature,
                    threshold: (v_prev + v_next) / 2.0,
                    decrease,
                    left: order[..k].to_vec(),
                    right: order[k..].to_vec(),
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: 2,
        }
    }

    #[test]
    fn test_fits_a_step_function_exactly() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [10.0, 0.0], [11.0, 0.0]];
        let y = array![5.0, 5.0, 50.0, 50.0];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tree = RegressionTree::fit(&x, &y, vec![0, 1, 2, 3], &params(), &mut rng);

        assert_relative_eq!(tree.predict_row(x.row(0)), 5.0);
        assert_relative_eq!(tree.predict_row(x.row(3)), 50.0);
        // All signal is in feature 0
        assert!(tree.importances()[0] > 0.0);
        assert_eq!(tree.importances()[1], 0.0);
    }

    #[test]
    fn test_constant_target_yields_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tree = RegressionTree::fit(&x, &y, vec![0, 1, 2], &params(), &mut rng);

        assert_relative_eq!(tree.predict_row(x.row(1)), 4.0);
        assert!(tree.importances().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 2.0, 3.0, 100.0];
        let strict = TreeParams {
            min_samples_leaf: 2,
            max_features: 1,
            ..params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tree = RegressionTree::fit(&x, &y, vec![0, 1, 2, 3], &strict, &mut rng);

        // A leaf of one row (the outlier alone) is not allowed, so the
        // prediction for the outlier blends at least two rows.
        assert!(tree.predict_row(x.row(3)) < 100.0);
    }
}
