//! One-hot encoding of categorical columns.
//!
//! Fitting learns the sorted category list of every categorical column in
//! the frame. Transforming replaces each categorical column with one `0.0` /
//! `1.0` indicator column per learned category, named `<column>_<category>`,
//! and passes continuous columns through unchanged. Column group order is
//! preserved.

use crate::error::{ModelError, Result};
use crate::traits::{Encoder, FittedEncoder};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use trellis_data::{DataError, SciType, scitype_of};

/// Configuration for the one-hot encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotConfig {
    /// When true (default), a category unseen at fit time is an error at
    /// transform time; when false it encodes as all zeros.
    pub strict: bool,
}

impl Default for OneHotConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// One-hot encoder hyperparameters.
#[derive(Debug, Clone, Default)]
pub struct OneHotEncoder {
    config: OneHotConfig,
}

impl OneHotEncoder {
    /// Create an encoder with the given configuration.
    pub const fn new(config: OneHotConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &OneHotConfig {
        &self.config
    }
}

/// A fitted one-hot encoder.
#[derive(Debug)]
struct FittedOneHot {
    /// Learned categories per categorical column, in frame order
    categories: Vec<(String, Vec<String>)>,
    /// All column names of the training frame, in order
    schema: Vec<String>,
    strict: bool,
}

impl Encoder for OneHotEncoder {
    fn fit(&self, x: &DataFrame) -> Result<Box<dyn FittedEncoder>> {
        if x.height() == 0 {
            return Err(ModelError::EmptyTraining);
        }
        let mut categories = Vec::new();
        for column in x.get_columns() {
            if scitype_of(column.dtype()) != SciType::Multiclass {
                continue;
            }
            if column.null_count() > 0 {
                return Err(DataError::NullValues(column.name().to_string()).into());
            }
            let unique: BTreeSet<String> = column
                .str()
                .map_err(DataError::from)?
                .into_no_null_iter()
                .map(|s| s.to_string())
                .collect();
            categories.push((column.name().to_string(), unique.into_iter().collect()));
        }
        log::debug!(
            "fitted one-hot encoder over {} categorical column(s)",
            categories.len()
        );
        Ok(Box::new(FittedOneHot {
            categories,
            schema: x
                .get_column_names()
                .iter()
                .map(|n| n.to_string())
                .collect(),
            strict: self.config.strict,
        }))
    }

    fn name(&self) -> &'static str {
        "one_hot"
    }
}

impl FittedOneHot {
    fn check_unseen(&self, x: &DataFrame) -> Result<()> {
        for (name, learned) in &self.categories {
            let column = x
                .column(name)
                .map_err(|_| DataError::ColumnNotFound(name.clone()))?;
            for value in column.str().map_err(DataError::from)?.into_no_null_iter() {
                if learned.binary_search(&value.to_string()).is_err() {
                    return Err(ModelError::UnknownCategory {
                        column: name.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl FittedEncoder for FittedOneHot {
    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        for name in &self.schema {
            if x.column(name).is_err() {
                return Err(DataError::ColumnNotFound(name.clone()).into());
            }
        }
        if self.strict {
            self.check_unseen(x)?;
        }

        let mut lf = x.clone().lazy();
        for (name, learned) in &self.categories {
            for category in learned {
                lf = lf.with_column(
                    when(col(name).eq(lit(category.as_str())))
                        .then(lit(1.0))
                        .otherwise(lit(0.0))
                        .alias(format!("{name}_{category}")),
                );
            }
        }

        // indicator columns replace their source, in place
        let mut selection: Vec<Expr> = Vec::new();
        for name in &self.schema {
            match self.categories.iter().find(|(c, _)| c == name) {
                Some((_, learned)) => {
                    for category in learned {
                        selection.push(col(format!("{name}_{category}")));
                    }
                }
                None => selection.push(col(name.as_str())),
            }
        }
        let out = lf.select(selection).collect().map_err(DataError::from)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_data::frame_scitypes;

    fn mixed_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("b1".into(), vec![0.5_f64, -0.5, 1.5]),
            Column::new("b2".into(), vec!["mid", "low", "high"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_transform_expands_categories() {
        let fitted = OneHotEncoder::default().fit(&mixed_frame()).unwrap();
        let out = fitted.transform(&mixed_frame()).unwrap();

        let names: Vec<&str> = out.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["b1", "b2_high", "b2_low", "b2_mid"]);

        // row 0 is "mid"
        let mid = out.column("b2_mid").unwrap().f64().unwrap();
        assert_eq!(mid.get(0), Some(1.0));
        assert_eq!(mid.get(1), Some(0.0));
    }

    #[test]
    fn test_transform_output_is_all_continuous() {
        let fitted = OneHotEncoder::default().fit(&mixed_frame()).unwrap();
        let out = fitted.transform(&mixed_frame()).unwrap();
        for (name, scitype) in frame_scitypes(&out) {
            assert_eq!(scitype, SciType::Continuous, "column {name}");
        }
    }

    #[test]
    fn test_strict_rejects_unseen_category() {
        let fitted = OneHotEncoder::default().fit(&mixed_frame()).unwrap();
        let unseen = DataFrame::new(vec![
            Column::new("b1".into(), vec![0.0_f64]),
            Column::new("b2".into(), vec!["extreme"]),
        ])
        .unwrap();
        let err = fitted.transform(&unseen).unwrap_err();
        assert!(matches!(err, ModelError::UnknownCategory { .. }));
    }

    #[test]
    fn test_lenient_encodes_unseen_as_zeros() {
        let encoder = OneHotEncoder::new(OneHotConfig { strict: false });
        let fitted = encoder.fit(&mixed_frame()).unwrap();
        let unseen = DataFrame::new(vec![
            Column::new("b1".into(), vec![0.0_f64]),
            Column::new("b2".into(), vec!["extreme"]),
        ])
        .unwrap();
        let out = fitted.transform(&unseen).unwrap();
        for category in ["high", "low", "mid"] {
            let indicator = out.column(&format!("b2_{category}")).unwrap().f64().unwrap();
            assert_eq!(indicator.get(0), Some(0.0));
        }
    }

    #[test]
    fn test_transform_missing_column() {
        let fitted = OneHotEncoder::default().fit(&mixed_frame()).unwrap();
        let narrow = DataFrame::new(vec![Column::new("b1".into(), vec![0.0_f64])]).unwrap();
        assert!(fitted.transform(&narrow).is_err());
    }

    #[test]
    fn test_all_continuous_frame_passes_through() {
        let df = DataFrame::new(vec![Column::new("x".into(), vec![1.0_f64, 2.0])]).unwrap();
        let fitted = OneHotEncoder::default().fit(&df).unwrap();
        let out = fitted.transform(&df).unwrap();
        assert_eq!(out, df);
    }

    #[test]
    fn test_fit_rejects_empty_frame() {
        let df = DataFrame::new(vec![Column::new("x".into(), Vec::<f64>::new())]).unwrap();
        assert!(OneHotEncoder::default().fit(&df).is_err());
    }
}
