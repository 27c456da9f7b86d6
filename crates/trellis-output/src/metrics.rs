//! Per-target evaluation metrics.

use ndarray::Array1;
use thiserror::Error;

/// Errors that can occur while computing a metric.
#[derive(Debug, Error)]
pub enum MetricError {
    /// Actual and predicted series have different lengths
    #[error("Length mismatch: {expected} actual values vs {actual} predictions")]
    LengthMismatch {
        /// Number of actual values
        expected: usize,
        /// Number of predictions
        actual: usize,
    },

    /// Metric over zero observations
    #[error("Cannot compute a metric over zero observations")]
    Empty,
}

/// Result type for metric computations.
pub type Result<T> = std::result::Result<T, MetricError>;

fn check_lengths(expected: usize, actual: usize) -> Result<()> {
    if expected == 0 {
        return Err(MetricError::Empty);
    }
    if expected != actual {
        return Err(MetricError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Fraction of predictions that differ from the actual label.
pub fn misclassification_rate(actual: &[String], predicted: &[String]) -> Result<f64> {
    check_lengths(actual.len(), predicted.len())?;
    let wrong = actual
        .iter()
        .zip(predicted)
        .filter(|(a, p)| a != p)
        .count();
    Ok(wrong as f64 / actual.len() as f64)
}

/// Fraction of predictions that match the actual label.
pub fn accuracy(actual: &[String], predicted: &[String]) -> Result<f64> {
    Ok(1.0 - misclassification_rate(actual, predicted)?)
}

/// Root mean squared error.
pub fn rmse(actual: &Array1<f64>, predicted: &Array1<f64>) -> Result<f64> {
    check_lengths(actual.len(), predicted.len())?;
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    Ok(mse.sqrt())
}

/// Mean absolute error.
pub fn mae(actual: &Array1<f64>, predicted: &Array1<f64>) -> Result<f64> {
    check_lengths(actual.len(), predicted.len())?;
    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64)
}
