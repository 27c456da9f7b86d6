//! Linear regression components.

pub mod ridge;

pub use ridge::{RidgeConfig, RidgeRegressor};
