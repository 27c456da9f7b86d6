//! Seeded synthetic dataset generator.
//!
//! Produces the three-target demonstration dataset: a 7-column feature table
//! (group `a`: five continuous columns, group `b`: one continuous and one
//! categorical column) and a row-aligned target table with a categorical
//! `y1`, a continuous `y2` and a categorical `y3`. Each target is a noisy
//! function of its feature group, so fitted components beat chance without
//! being perfect.

use crate::error::{DataError, Result};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Categories used for the `b2` feature column.
pub const B2_CATEGORIES: [&str; 3] = ["high", "low", "mid"];
/// Classes of the first target.
pub const Y1_CLASSES: [&str; 3] = ["blue", "green", "red"];
/// Classes of the third target.
pub const Y3_CLASSES: [&str; 2] = ["no", "yes"];

/// Configuration for the synthetic generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Number of rows to generate
    pub rows: usize,
    /// RNG seed; the same seed always yields the same dataset
    pub seed: u64,
    /// Amplitude of the additive noise on each target
    pub noise: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            rows: 200,
            seed: 42,
            noise: 0.1,
        }
    }
}

/// A generated feature table and its row-aligned target table.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// Feature frame: a1..a5 continuous, b1 continuous, b2 categorical
    pub features: DataFrame,
    /// Target frame: y1 categorical, y2 continuous, y3 categorical
    pub targets: DataFrame,
}

/// Generate a dataset according to the configuration.
pub fn generate(config: &SyntheticConfig) -> Result<SyntheticDataset> {
    if config.rows == 0 {
        return Err(DataError::EmptyFrame(
            "synthetic dataset of zero rows".to_string(),
        ));
    }
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.rows;

    let mut a: Vec<Vec<f64>> = vec![Vec::with_capacity(n); 5];
    let mut b1 = Vec::with_capacity(n);
    let mut b2 = Vec::with_capacity(n);
    let mut y1 = Vec::with_capacity(n);
    let mut y2 = Vec::with_capacity(n);
    let mut y3 = Vec::with_capacity(n);

    for _ in 0..n {
        let row: Vec<f64> = (0..5).map(|_| rng.gen_range(-1.0..1.0)).collect();
        for (column, value) in a.iter_mut().zip(&row) {
            column.push(*value);
        }
        let b1_value: f64 = rng.gen_range(-1.0..1.0);
        let b2_index = rng.gen_range(0..B2_CATEGORIES.len());
        b1.push(b1_value);
        b2.push(B2_CATEGORIES[b2_index]);

        // y1 partitions the a-group by a linear score
        let score1 = row[0] + 0.5 * row[1] - row[2] + config.noise * rng.gen_range(-1.0..1.0);
        let class1 = if score1 < -0.5 {
            Y1_CLASSES[0]
        } else if score1 < 0.5 {
            Y1_CLASSES[1]
        } else {
            Y1_CLASSES[2]
        };
        y1.push(class1);

        // y2 is linear in b1 and the b2 category level
        let level = b2_index as f64 - 1.0;
        y2.push(2.0 * b1_value + 0.75 * level + config.noise * rng.gen_range(-1.0..1.0));

        // y3 splits the a-group along a second direction
        let score3 = row[3] - row[4] + config.noise * rng.gen_range(-1.0..1.0);
        y3.push(if score3 > 0.0 { Y3_CLASSES[1] } else { Y3_CLASSES[0] });
    }

    let features = DataFrame::new(vec![
        Column::new("a1".into(), a[0].clone()),
        Column::new("a2".into(), a[1].clone()),
        Column::new("a3".into(), a[2].clone()),
        Column::new("a4".into(), a[3].clone()),
        Column::new("a5".into(), a[4].clone()),
        Column::new("b1".into(), b1),
        Column::new("b2".into(), b2),
    ])?;
    let targets = DataFrame::new(vec![
        Column::new("y1".into(), y1),
        Column::new("y2".into(), y2),
        Column::new("y3".into(), y3),
    ])?;

    Ok(SyntheticDataset { features, targets })
}

/// Split aligned feature and target frames into train and test partitions.
///
/// The first `1 - test_fraction` of rows become the training set. Rows are
/// generated independently, so a positional split is unbiased.
pub fn train_test_split(
    features: &DataFrame,
    targets: &DataFrame,
    test_fraction: f64,
) -> Result<(DataFrame, DataFrame, DataFrame, DataFrame)> {
    if features.height() != targets.height() {
        return Err(DataError::RowMisaligned {
            expected: features.height(),
            actual: targets.height(),
        });
    }
    if !(0.0..1.0).contains(&test_fraction) || features.height() < 2 {
        return Err(DataError::EmptyFrame(format!(
            "cannot split {} rows with test fraction {}",
            features.height(),
            test_fraction
        )));
    }
    let n = features.height();
    let n_test = ((n as f64) * test_fraction).round() as usize;
    let n_train = n - n_test;
    if n_train == 0 || n_test == 0 {
        return Err(DataError::EmptyFrame(format!(
            "split leaves an empty partition ({n_train} train / {n_test} test)"
        )));
    }
    Ok((
        features.slice(0, n_train),
        targets.slice(0, n_train),
        features.slice(n_train as i64, n_test),
        targets.slice(n_train as i64, n_test),
    ))
}
