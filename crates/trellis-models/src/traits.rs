//! Trait seams between models and the network.
//!
//! A model value is a bag of hyperparameters; fitting produces a separate
//! fitted object. Keeping the two apart lets a learning network swap a
//! model's hyperparameters and replay training without rebuilding the graph.

use crate::error::Result;
use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;

/// A classifier's hyperparameters.
pub trait Classifier: Send + Sync {
    /// Fit on a feature matrix and aligned label vector.
    fn fit(&self, x: &Array2<f64>, y: &[String]) -> Result<Box<dyn FittedClassifier>>;

    /// Component name, as listed in the registry.
    fn name(&self) -> &'static str;
}

/// A trained classifier.
pub trait FittedClassifier: Send + Sync + std::fmt::Debug {
    /// Predict one label per input row.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>>;

    /// Classes seen during training, sorted.
    fn classes(&self) -> &[String];
}

/// A regressor's hyperparameters.
pub trait Regressor: Send + Sync {
    /// Fit on a feature matrix and aligned real-valued target.
    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Box<dyn FittedRegressor>>;

    /// Component name, as listed in the registry.
    fn name(&self) -> &'static str;
}

/// A trained regressor.
pub trait FittedRegressor: Send + Sync + std::fmt::Debug {
    /// Predict one real value per input row.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

/// An unsupervised transformer's hyperparameters.
pub trait Encoder: Send + Sync {
    /// Learn the transform from a frame.
    fn fit(&self, x: &DataFrame) -> Result<Box<dyn FittedEncoder>>;

    /// Component name, as listed in the registry.
    fn name(&self) -> &'static str;
}

/// A trained transformer.
pub trait FittedEncoder: Send + Sync {
    /// Apply the learned transform to a frame with the training schema.
    fn transform(&self, x: &DataFrame) -> Result<DataFrame>;
}
