//! Ridge regression.
//!
//! Closed-form L2-regularized least squares: solve
//! (XᵀX + λI) β = Xᵀy
//! by Cholesky decomposition. With an intercept, features and target are
//! centered first so the penalty does not shrink the intercept.

use crate::error::{ModelError, Result};
use crate::traits::{FittedRegressor, Regressor};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Configuration for the ridge regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeConfig {
    /// L2 penalty strength λ (default: 1.0)
    pub lambda: f64,
    /// Whether to fit an unpenalized intercept (default: true)
    pub fit_intercept: bool,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            fit_intercept: true,
        }
    }
}

/// Ridge regressor hyperparameters.
#[derive(Debug, Clone, Default)]
pub struct RidgeRegressor {
    config: RidgeConfig,
}

impl RidgeRegressor {
    /// Create a regressor with the given configuration.
    pub fn new(config: RidgeConfig) -> Result<Self> {
        if !config.lambda.is_finite() || config.lambda < 0.0 {
            return Err(ModelError::InvalidHyperparameter(format!(
                "lambda must be finite and non-negative, got {}",
                config.lambda
            )));
        }
        Ok(Self { config })
    }

    /// The active configuration.
    pub const fn config(&self) -> &RidgeConfig {
        &self.config
    }
}

/// A fitted ridge model.
#[derive(Debug)]
struct FittedRidge {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl Regressor for RidgeRegressor {
    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Box<dyn FittedRegressor>> {
        let (n, k) = x.dim();
        if n == 0 {
            return Err(ModelError::EmptyTraining);
        }
        if y.len() != n {
            return Err(ModelError::DimensionMismatch {
                expected: n,
                actual: y.len(),
            });
        }

        let (x_centered, y_centered, x_means, y_mean) = if self.config.fit_intercept {
            let x_means: Array1<f64> = (0..k).map(|j| x.column(j).mean().unwrap_or(0.0)).collect();
            let y_mean = y.mean().unwrap_or(0.0);
            let mut xc = x.clone();
            for j in 0..k {
                xc.column_mut(j).mapv_inplace(|v| v - x_means[j]);
            }
            (xc, y - y_mean, x_means, y_mean)
        } else {
            (x.clone(), y.clone(), Array1::zeros(k), 0.0)
        };

        // Normal equations with ridge penalty
        let mut gram = x_centered.t().dot(&x_centered);
        for j in 0..k {
            gram[[j, j]] += self.config.lambda;
        }
        let rhs = x_centered.t().dot(&y_centered);
        let coefficients = cholesky_solve(&gram, &rhs)?;
        let intercept = y_mean - x_means.dot(&coefficients);
        log::debug!("fitted ridge: {} coefficients, lambda {}", k, self.config.lambda);

        Ok(Box::new(FittedRidge {
            coefficients,
            intercept,
        }))
    }

    fn name(&self) -> &'static str {
        "ridge"
    }
}

impl FittedRegressor for FittedRidge {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

/// Solve `a·x = b` for symmetric positive-definite `a`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let k = a.nrows();
    let mut l = Array2::<f64>::zeros((k, k));

    for i in 0..k {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for p in 0..j {
                sum -= l[[i, p]] * l[[j, p]];
            }
            if i == j {
                if sum <= 0.0 {
                    return Err(ModelError::SingularMatrix);
                }
                l[[i, j]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }

    // Forward then back substitution
    let mut z = Array1::<f64>::zeros(k);
    for i in 0..k {
        let mut sum = b[i];
        for p in 0..i {
            sum -= l[[i, p]] * z[p];
        }
        z[i] = sum / l[[i, i]];
    }
    let mut x = Array1::<f64>::zeros(k);
    for i in (0..k).rev() {
        let mut sum = z[i];
        for p in i + 1..k {
            sum -= l[[p, i]] * x[p];
        }
        x[i] = sum / l[[i, i]];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_cholesky_solve_identity() {
        let a = array![[1.0, 0.0], [0.0, 1.0]];
        let b = array![3.0, -2.0];
        let x = cholesky_solve(&a, &b).unwrap();
        assert_relative_eq!(x[0], 3.0);
        assert_relative_eq!(x[1], -2.0);
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let a = array![[0.0, 0.0], [0.0, 0.0]];
        let b = array![1.0, 1.0];
        assert!(matches!(
            cholesky_solve(&a, &b).unwrap_err(),
            ModelError::SingularMatrix
        ));
    }

    #[test]
    fn test_recovers_linear_function() {
        // y = 2x + 1, tiny penalty
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 3.0, 5.0, 7.0, 9.0];
        let model = RidgeRegressor::new(RidgeConfig {
            lambda: 1e-8,
            fit_intercept: true,
        })
        .unwrap();
        let fitted = model.fit(&x, &y).unwrap();
        let predictions = fitted.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert_relative_eq!(*p, *t, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_larger_lambda_shrinks_coefficients() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![0.0, 2.0, 4.0, 6.0];
        let loose = RidgeRegressor::new(RidgeConfig {
            lambda: 1e-8,
            fit_intercept: true,
        })
        .unwrap();
        let tight = RidgeRegressor::new(RidgeConfig {
            lambda: 100.0,
            fit_intercept: true,
        })
        .unwrap();

        let probe = array![[10.0]];
        let far_loose = loose.fit(&x, &y).unwrap().predict(&probe).unwrap()[0];
        let far_tight = tight.fit(&x, &y).unwrap().predict(&probe).unwrap()[0];
        // shrunk slope pulls extreme predictions toward the mean
        assert!(far_tight < far_loose);
    }

    #[test]
    fn test_no_intercept_goes_through_origin() {
        let x = array![[1.0], [2.0]];
        let y = array![2.0, 4.0];
        let model = RidgeRegressor::new(RidgeConfig {
            lambda: 1e-8,
            fit_intercept: false,
        })
        .unwrap();
        let fitted = model.fit(&x, &y).unwrap();
        let at_zero = fitted.predict(&array![[0.0]]).unwrap();
        assert_relative_eq!(at_zero[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_lambda_is_ordinary_least_squares() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];
        let model = RidgeRegressor::new(RidgeConfig {
            lambda: 0.0,
            fit_intercept: true,
        })
        .unwrap();
        let fitted = model.fit(&x, &y).unwrap();
        let predictions = fitted.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert_relative_eq!(*p, *t, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rejects_negative_lambda() {
        assert!(
            RidgeRegressor::new(RidgeConfig {
                lambda: -1.0,
                fit_intercept: true,
            })
            .is_err()
        );
    }

    #[test]
    fn test_rejects_misaligned_target() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        let err = RidgeRegressor::default().fit(&x, &y).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { .. }));
    }
}
