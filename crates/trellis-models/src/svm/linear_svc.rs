//! Linear support vector classifier.
//!
//! Hinge-loss minimization with L2 regularization by stochastic subgradient
//! descent (Pegasos). Multiclass problems are handled one-vs-rest: one
//! weight vector per class, prediction by largest margin. Training is
//! deterministic under a fixed seed.

use crate::error::{ModelError, Result};
use crate::traits::{Classifier, FittedClassifier};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for the linear SVM classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvcConfig {
    /// L2 regularization strength (default: 0.01)
    pub lambda: f64,
    /// Number of passes over the training data (default: 100)
    pub epochs: usize,
    /// RNG seed for sample ordering (default: 0)
    pub seed: u64,
}

impl Default for LinearSvcConfig {
    fn default() -> Self {
        Self {
            lambda: 0.01,
            epochs: 100,
            seed: 0,
        }
    }
}

/// Linear SVM hyperparameters.
#[derive(Debug, Clone, Default)]
pub struct LinearSvc {
    config: LinearSvcConfig,
}

impl LinearSvc {
    /// Create a classifier with the given configuration.
    pub fn new(config: LinearSvcConfig) -> Result<Self> {
        if !config.lambda.is_finite() || config.lambda <= 0.0 {
            return Err(ModelError::InvalidHyperparameter(format!(
                "lambda must be finite and positive, got {}",
                config.lambda
            )));
        }
        if config.epochs == 0 {
            return Err(ModelError::InvalidHyperparameter(
                "epochs must be at least 1".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// The active configuration.
    pub const fn config(&self) -> &LinearSvcConfig {
        &self.config
    }

    /// Train one binary hinge-loss separator: `signs` holds ±1 per sample.
    fn train_binary(&self, x: &Array2<f64>, signs: &[f64], rng: &mut StdRng) -> (Array1<f64>, f64) {
        let (n, k) = x.dim();
        let lambda = self.config.lambda;
        let mut weights = Array1::<f64>::zeros(k);
        let mut bias = 0.0;
        let mut t: u64 = 0;

        for _ in 0..self.config.epochs {
            for _ in 0..n {
                t += 1;
                let i = rng.gen_range(0..n);
                let eta = 1.0 / (lambda * t as f64);
                let margin = signs[i] * (x.row(i).dot(&weights) + bias);
                weights.mapv_inplace(|w| w * (1.0 - eta * lambda));
                if margin < 1.0 {
                    weights.scaled_add(eta * signs[i], &x.row(i));
                    bias += eta * signs[i];
                }
            }
        }
        (weights, bias)
    }
}

/// A fitted one-vs-rest linear SVM.
#[derive(Debug)]
struct FittedSvc {
    /// One weight vector per class (a single one for binary problems)
    weights: Vec<Array1<f64>>,
    biases: Vec<f64>,
    classes: Vec<String>,
    n_features: usize,
}

impl Classifier for LinearSvc {
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
        if classes.len() < 2 {
            return Err(ModelError::InvalidHyperparameter(
                "training data must contain at least two classes".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut weights = Vec::new();
        let mut biases = Vec::new();

        if classes.len() == 2 {
            // single separator: positive margin means the second class
            let signs: Vec<f64> = y
                .iter()
                .map(|label| if *label == classes[1] { 1.0 } else { -1.0 })
                .collect();
            let (w, b) = self.train_binary(x, &signs, &mut rng);
            weights.push(w);
            biases.push(b);
        } else {
            for class in &classes {
                let signs: Vec<f64> = y
                    .iter()
                    .map(|label| if label == class { 1.0 } else { -1.0 })
                    .collect();
                let (w, b) = self.train_binary(x, &signs, &mut rng);
                weights.push(w);
                biases.push(b);
            }
        }
        log::debug!(
            "fitted linear svc: {} separators over {} features",
            weights.len(),
            x.ncols()
        );

        Ok(Box::new(FittedSvc {
            weights,
            biases,
            classes,
            n_features: x.ncols(),
        }))
    }

    fn name(&self) -> &'static str {
        "linear_svc"
    }
}

impl FittedClassifier for FittedSvc {
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>> {
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        let mut out = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            let class = if self.classes.len() == 2 {
                let margin = row.dot(&self.weights[0]) + self.biases[0];
                if margin >= 0.0 { 1 } else { 0 }
            } else {
                let mut best = 0;
                let mut best_margin = f64::NEG_INFINITY;
                for (c, (w, b)) in self.weights.iter().zip(&self.biases).enumerate() {
                    let margin = row.dot(w) + b;
                    if margin > best_margin {
                        best_margin = margin;
                        best = c;
                    }
                }
                best
            };
            out.push(self.classes[class].clone());
        }
        Ok(out)
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_binary_separable() {
        let x = array![
            [-1.0, -1.0],
            [-1.2, -0.8],
            [-0.9, -1.1],
            [1.0, 1.0],
            [1.2, 0.8],
            [0.9, 1.1]
        ];
        let y = labels(&["neg", "neg", "neg", "pos", "pos", "pos"]);
        let fitted = LinearSvc::default().fit(&x, &y).unwrap();
        assert_eq!(fitted.predict(&x).unwrap(), y);
        assert_eq!(fitted.classes(), &["neg".to_string(), "pos".to_string()]);
    }

    #[test]
    fn test_multiclass_one_vs_rest() {
        let x = array![
            [2.0, 0.0],
            [2.2, 0.1],
            [-2.0, 0.0],
            [-2.1, -0.1],
            [0.0, 2.0],
            [0.1, 2.2]
        ];
        let y = labels(&["right", "right", "left", "left", "up", "up"]);
        let fitted = LinearSvc::default().fit(&x, &y).unwrap();
        assert_eq!(fitted.predict(&x).unwrap(), y);
        assert_eq!(fitted.classes().len(), 3);
    }

    #[test]
    fn test_deterministic_under_seed() {
        let x = array![[-1.0], [-0.5], [0.5], [1.0]];
        let y = labels(&["a", "a", "b", "b"]);
        let model = LinearSvc::new(LinearSvcConfig {
            seed: 7,
            ..Default::default()
        })
        .unwrap();
        let first = model.fit(&x, &y).unwrap().predict(&x).unwrap();
        let second = model.fit(&x, &y).unwrap().predict(&x).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_single_class() {
        let x = array![[0.0], [1.0]];
        let y = labels(&["only", "only"]);
        assert!(LinearSvc::default().fit(&x, &y).is_err());
    }

    #[test]
    fn test_rejects_invalid_lambda() {
        assert!(
            LinearSvc::new(LinearSvcConfig {
                lambda: 0.0,
                ..Default::default()
            })
            .is_err()
        );
    }
}
