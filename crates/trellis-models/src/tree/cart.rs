//! CART decision tree classifier.
//!
//! Binary splits on single features chosen by Gini impurity reduction. The
//! fitted tree is stored as an index arena rather than boxed child pointers,
//! so prediction is a tight loop over a flat `Vec`.

use crate::error::{ModelError, Result};
use crate::traits::{Classifier, FittedClassifier};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Configuration for the decision tree classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeConfig {
    /// Maximum tree depth (default: 6)
    pub max_depth: usize,
    /// Minimum number of samples required to attempt a split (default: 2)
    pub min_samples_split: usize,
    /// Minimum Gini impurity reduction required to keep a split (default: 1e-7)
    pub min_gain: f64,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            min_samples_split: 2,
            min_gain: 1e-7,
        }
    }
}

/// Decision tree classifier hyperparameters.
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeClassifier {
    config: DecisionTreeConfig,
}

impl DecisionTreeClassifier {
    /// Create a classifier with the given configuration.
    pub fn new(config: DecisionTreeConfig) -> Result<Self> {
        if config.max_depth == 0 {
            return Err(ModelError::InvalidHyperparameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if config.min_samples_split < 2 {
            return Err(ModelError::InvalidHyperparameter(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// The active configuration.
    pub const fn config(&self) -> &DecisionTreeConfig {
        &self.config
    }
}

/// One node of the fitted tree arena.
#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted decision tree.
#[derive(Debug)]
pub(crate) struct FittedTree {
    nodes: Vec<TreeNode>,
    classes: Vec<String>,
    n_features: usize,
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&self, x: &Array2<f64>, y: &[String]) -> Result<Box<dyn FittedClassifier>> {
        if x.nrows() == 0 {
            return Err(ModelError::EmptyTraining);
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }

        let mut classes: Vec<String> = y.to_vec();
        classes.sort();
        classes.dedup();
        let encoded: Vec<usize> = y
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or(0))
            .collect();

        let mut builder = TreeBuilder {
            x,
            y: &encoded,
            n_classes: classes.len(),
            config: &self.config,
            nodes: Vec::new(),
        };
        let indices: Vec<usize> = (0..x.nrows()).collect();
        builder.grow(&indices, 0);
        log::debug!(
            "fitted decision tree: {} nodes, {} classes",
            builder.nodes.len(),
            classes.len()
        );

        Ok(Box::new(FittedTree {
            nodes: builder.nodes,
            classes,
            n_features: x.ncols(),
        }))
    }

    fn name(&self) -> &'static str {
        "decision_tree"
    }
}

impl FittedClassifier for FittedTree {
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>> {
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        let mut out = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            let mut node = 0;
            loop {
                match &self.nodes[node] {
                    TreeNode::Leaf { class } => {
                        out.push(self.classes[*class].clone());
                        break;
                    }
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        node = if row[*feature] <= *threshold { *left } else { *right };
                    }
                }
            }
        }
        Ok(out)
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    y: &'a [usize],
    n_classes: usize,
    config: &'a DecisionTreeConfig,
    nodes: Vec<TreeNode>,
}

impl TreeBuilder<'_> {
    /// Grow a subtree over the given sample indices; returns its arena index.
    fn grow(&mut self, indices: &[usize], depth: usize) -> usize {
        let counts = self.class_counts(indices);
        let parent_gini = gini(&counts, indices.len());

        let stop = depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || parent_gini == 0.0;

        let split = if stop { None } else { self.best_split(indices, parent_gini) };

        match split {
            Some((feature, threshold)) => {
                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| self.x[[i, feature]] <= threshold);
                let node = self.nodes.len();
                self.nodes.push(TreeNode::Leaf { class: 0 }); // placeholder until children exist
                let left = self.grow(&left_idx, depth + 1);
                let right = self.grow(&right_idx, depth + 1);
                self.nodes[node] = TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                };
                node
            }
            None => {
                let class = counts
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, count)| **count)
                    .map(|(class, _)| class)
                    .unwrap_or(0);
                self.nodes.push(TreeNode::Leaf { class });
                self.nodes.len() - 1
            }
        }
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }

    /// Best (feature, threshold) by Gini gain, or None when no split clears
    /// the configured minimum gain.
    fn best_split(&self, indices: &[usize], parent_gini: f64) -> Option<(usize, f64)> {
        let n = indices.len() as f64;
        let mut best: Option<(usize, f64)> = None;
        let mut best_gain = self.config.min_gain;

        for feature in 0..self.x.ncols() {
            let mut ordered: Vec<(f64, usize)> = indices
                .iter()
                .map(|&i| (self.x[[i, feature]], self.y[i]))
                .collect();
            ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let mut left_counts = vec![0usize; self.n_classes];
            let mut right_counts = self.class_counts(indices);

            for i in 0..ordered.len() - 1 {
                left_counts[ordered[i].1] += 1;
                right_counts[ordered[i].1] -= 1;

                // only split between distinct feature values
                if ordered[i].0 == ordered[i + 1].0 {
                    continue;
                }
                let n_left = (i + 1) as f64;
                let n_right = n - n_left;
                let weighted = (n_left / n) * gini(&left_counts, i + 1)
                    + (n_right / n) * gini(&right_counts, ordered.len() - i - 1);
                let gain = parent_gini - weighted;
                if gain > best_gain {
                    best_gain = gain;
                    best = Some((feature, (ordered[i].0 + ordered[i + 1].0) / 2.0));
                }
            }
        }
        best
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}
