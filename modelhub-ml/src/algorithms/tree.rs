//! CART classification tree with Gini impurity.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A node of a fitted tree. Class values are indices into the forest's label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        class: usize,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features sampled as split candidates at each node.
    pub max_features: usize,
}

/// A fitted classification tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: TreeNode,
}

/// Borrowed training data shared by every node of a build.
struct TrainingView<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    n_features: usize,
}

struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree over the rows selected by `sample` (indices may repeat).
    pub fn fit<R: Rng + ?Sized>(
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let view = TrainingView {
            x,
            y,
            n_classes,
            n_features: x.first().map_or(0, Vec::len),
        };
        Self {
            root: grow(&view, sample, 0, params, rng),
        }
    }

    pub fn predict_row(&self, row: &[f64]) -> usize {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { class, .. } => return *class,
                TreeNode::Split {
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

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }
}

fn grow<R: Rng + ?Sized>(
    view: &TrainingView<'_>,
    sample: Vec<usize>,
    depth: usize,
    params: &TreeParams,
    rng: &mut R,
) -> TreeNode {
    let counts = class_counts(view, &sample);
    let leaf = TreeNode::Leaf {
        class: majority(&counts),
        samples: sample.len(),
    };

    let parent_impurity = gini(&counts, sample.len());
    let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
    if parent_impurity == 0.0 || depth_reached || sample.len() < params.min_samples_split {
        return leaf;
    }

    let Some(split) = best_split(view, &sample, parent_impurity, params.max_features, rng) else {
        return leaf;
    };

    let (left, right): (Vec<usize>, Vec<usize>) = sample
        .into_iter()
        .partition(|&i| view.x[i][split.feature] <= split.threshold);

    TreeNode::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(grow(view, left, depth + 1, params, rng)),
        right: Box::new(grow(view, right, depth + 1, params, rng)),
    }
}

/// Search `max_features` random features for the split with the lowest
/// weighted Gini impurity. If none of them improves on the parent, the
/// remaining features are tried in random order until one does.
fn best_split<R: Rng + ?Sized>(
    view: &TrainingView<'_>,
    sample: &[usize],
    parent_impurity: f64,
    max_features: usize,
    rng: &mut R,
) -> Option<Split> {
    let mut features: Vec<usize> = (0..view.n_features).collect();
    features.shuffle(rng);

    let mut best: Option<Split> = None;
    for (visited, &feature) in features.iter().enumerate() {
        if visited >= max_features && best.is_some() {
            break;
        }
        if let Some(candidate) = best_split_on(view, sample, feature) {
            let improves = candidate.impurity < parent_impurity - 1e-12;
            let better = best.as_ref().is_none_or(|b| candidate.impurity < b.impurity);
            if improves && better {
                best = Some(candidate);
            }
        }
    }
    best
}

fn best_split_on(view: &TrainingView<'_>, sample: &[usize], feature: usize) -> Option<Split> {
    let mut pairs: Vec<(f64, usize)> = sample
        .iter()
        .map(|&i| (view.x[i][feature], view.y[i]))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total = pairs.len();
    let mut right_counts = vec![0usize; view.n_classes];
    for &(_, class) in &pairs {
        right_counts[class] += 1;
    }
    let mut left_counts = vec![0usize; view.n_classes];

    let mut best: Option<Split> = None;
    for i in 0..total.saturating_sub(1) {
        let class = pairs[i].1;
        left_counts[class] += 1;
        right_counts[class] -= 1;

        let (value, next) = (pairs[i].0, pairs[i + 1].0);
        if value >= next {
            continue;
        }

        let n_left = i + 1;
        let n_right = total - n_left;
        let impurity = (n_left as f64 * gini(&left_counts, n_left)
            + n_right as f64 * gini(&right_counts, n_right))
            / total as f64;

        if best.as_ref().is_none_or(|b| impurity < b.impurity) {
            best = Some(Split {
                feature,
                threshold: value + (next - value) / 2.0,
                impurity,
            });
        }
    }
    best
}

fn class_counts(view: &TrainingView<'_>, sample: &[usize]) -> Vec<usize> {
    let mut counts = vec![0usize; view.n_classes];
    for &i in sample {
        counts[view.y[i]] += 1;
    }
    counts
}

/// Most frequent class; ties go to the lowest index.
pub(crate) fn majority(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .fold((0, 0), |(best, best_count), (class, &count)| {
            if count > best_count { (class, count) } else { (best, best_count) }
        })
        .0
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            max_features: 2,
        }
    }

    #[test]
    fn test_separable_data_fits_exactly() {
        let x = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![8.0, 0.0], vec![9.0, 0.0]];
        let y = vec![0, 0, 1, 1];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&x, &y, 2, (0..4).collect(), &params(), &mut rng);
        for (row, &label) in x.iter().zip(&y) {
            assert_eq!(tree.predict_row(row), label);
        }
        assert_eq!(tree.depth(), 1);
        match tree.root() {
            TreeNode::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 0);
                assert_eq!(*threshold, 5.0);
            }
            other => panic!("Expected split, got {:?}", other),
        }
    }

    #[test]
    fn test_pure_sample_is_leaf() {
        let x = vec![vec![1.0], vec![2.0]];
        let y = vec![1, 1];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&x, &y, 2, vec![0, 1], &params(), &mut rng);
        assert_eq!(
            tree.root(),
            &TreeNode::Leaf {
                class: 1,
                samples: 2
            }
        );
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let y = vec![0, 1, 0, 1, 0, 1, 0, 1];
        let mut rng = StdRng::seed_from_u64(7);
        let limited = TreeParams {
            max_depth: Some(2),
            ..params()
        };
        let tree = DecisionTree::fit(&x, &y, 2, (0..8).collect(), &limited, &mut rng);
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_identical_features_cannot_split() {
        let x = vec![vec![3.0], vec![3.0]];
        let y = vec![0, 1];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&x, &y, 2, vec![0, 1], &params(), &mut rng);
        assert_eq!(
            tree.root(),
            &TreeNode::Leaf {
                class: 0,
                samples: 2
            }
        );
    }

    #[test]
    fn test_majority_tie_breaks_low() {
        assert_eq!(majority(&[2, 2, 1]), 0);
        assert_eq!(majority(&[1, 3, 3]), 1);
    }
}
