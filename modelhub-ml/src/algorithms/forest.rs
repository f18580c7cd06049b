//! Bagged ensemble of classification trees.

use super::tree::{DecisionTree, TreeParams, majority};
use crate::config::TrainingConfig;
use crate::error::{MlError, MlResult};
use crate::features::FeatureMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A fitted random forest classifier.
///
/// Each tree is grown on a bootstrap sample and considers `sqrt(n_features)`
/// candidate features per split. Every random draw comes from a single
/// generator seeded from the configuration, so identical inputs produce
/// identical forests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Distinct label values, ascending. Trees predict indices into this list.
    classes: Vec<f64>,
    n_features: usize,
}

impl RandomForest {
    pub fn fit(x: &FeatureMatrix, labels: &[f64], config: &TrainingConfig) -> MlResult<Self> {
        if x.is_empty() {
            return Err(MlError::training("Cannot train on an empty dataset"));
        }
        if x.len() != labels.len() {
            return Err(MlError::training(format!(
                "Feature rows ({}) and labels ({}) differ in length",
                x.len(),
                labels.len()
            )));
        }
        if config.n_estimators == 0 {
            return Err(MlError::training("n_estimators must be at least 1"));
        }
        if let Some(bad) = labels.iter().find(|l| !l.is_finite()) {
            return Err(MlError::training(format!("Label {bad} is not a finite number")));
        }

        let n_features = x[0].len();
        let mut classes = labels.to_vec();
        classes.sort_by(f64::total_cmp);
        classes.dedup();

        let y: Vec<usize> = labels
            .iter()
            .map(|l| classes.partition_point(|c| c < l))
            .collect();

        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            max_features: ((n_features as f64).sqrt().floor() as usize).max(1),
        };

        let mut rng = StdRng::seed_from_u64(config.seed);
        let n = x.len();
        let trees = (0..config.n_estimators)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(x, &y, classes.len(), sample, &params, &mut rng)
            })
            .collect();

        Ok(Self {
            trees,
            classes,
            n_features,
        })
    }

    /// Majority vote of the trees for one standardized row.
    pub fn predict_row(&self, row: &[f64]) -> MlResult<f64> {
        if row.len() != self.n_features {
            return Err(MlError::invalid_input(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        let mut votes = vec![0usize; self.classes.len()];
        for tree in &self.trees {
            votes[tree.predict_row(row)] += 1;
        }
        Ok(self.classes[majority(&votes)])
    }

    pub fn predict(&self, x: &FeatureMatrix) -> MlResult<Vec<f64>> {
        x.iter().map(|row| self.predict_row(row)).collect()
    }

    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
