//! Scientific types for frame columns.
//!
//! A scitype classifies a column by what it *means* rather than how it is
//! stored: a `Float64` column carries continuous measurements, a string
//! column carries class labels. Models declare the scitypes they accept and
//! the network checks compatibility before fitting.

use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic classification of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SciType {
    /// Real-valued measurement (float storage)
    Continuous,
    /// Categorical label (string storage)
    Multiclass,
    /// Non-negative integer count (integer storage)
    Count,
    /// Storage type with no scitype interpretation
    Unknown,
}

impl fmt::Display for SciType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Continuous => "Continuous",
            Self::Multiclass => "Multiclass",
            Self::Count => "Count",
            Self::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Classify a polars storage type.
pub const fn scitype_of(dtype: &DataType) -> SciType {
    match dtype {
        DataType::Float32 | DataType::Float64 => SciType::Continuous,
        DataType::String => SciType::Multiclass,
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => SciType::Count,
        _ => SciType::Unknown,
    }
}

/// Report the scitype of every column in order.
pub fn frame_scitypes(df: &DataFrame) -> Vec<(String, SciType)> {
    df.get_columns()
        .iter()
        .map(|c| (c.name().to_string(), scitype_of(c.dtype())))
        .collect()
}

/// Check that the named columns carry the expected scitypes.
///
/// Returns the first violation as a [`DataError::ScitypeMismatch`]; a missing
/// column is reported as [`DataError::ColumnNotFound`].
pub fn check_scitypes(df: &DataFrame, expected: &[(&str, SciType)]) -> Result<()> {
    for (name, want) in expected {
        let column = df
            .column(name)
            .map_err(|_| DataError::ColumnNotFound((*name).to_string()))?;
        let got = scitype_of(column.dtype());
        if got != *want {
            return Err(DataError::ScitypeMismatch {
                column: (*name).to_string(),
                expected: want.to_string(),
                actual: got.to_string(),
            });
        }
    }
    Ok(())
}

/// Names of all columns in the frame with the given scitype.
pub fn columns_with_scitype(df: &DataFrame, scitype: SciType) -> Vec<String> {
    frame_scitypes(df)
        .into_iter()
        .filter(|(_, s)| *s == scitype)
        .map(|(name, _)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("x".into(), vec![1.0_f64, 2.0]),
            Column::new("label".into(), vec!["a", "b"]),
            Column::new("n".into(), vec![3_i64, 4]),
        ])
        .unwrap()
    }

    #[test]
    fn test_scitype_of_storage_types() {
        assert_eq!(scitype_of(&DataType::Float64), SciType::Continuous);
        assert_eq!(scitype_of(&DataType::String), SciType::Multiclass);
        assert_eq!(scitype_of(&DataType::Int64), SciType::Count);
        assert_eq!(scitype_of(&DataType::Boolean), SciType::Unknown);
    }

    #[test]
    fn test_frame_scitypes() {
        let df = sample_frame();
        let scitypes = frame_scitypes(&df);
        assert_eq!(scitypes.len(), 3);
        assert_eq!(scitypes[0], ("x".to_string(), SciType::Continuous));
        assert_eq!(scitypes[1], ("label".to_string(), SciType::Multiclass));
        assert_eq!(scitypes[2], ("n".to_string(), SciType::Count));
    }

    #[test]
    fn test_check_scitypes_passes() {
        let df = sample_frame();
        let expected = [
            ("x", SciType::Continuous),
            ("label", SciType::Multiclass),
        ];
        assert!(check_scitypes(&df, &expected).is_ok());
    }

    #[test]
    fn test_check_scitypes_mismatch() {
        let df = sample_frame();
        let err = check_scitypes(&df, &[("x", SciType::Multiclass)]).unwrap_err();
        assert!(matches!(err, DataError::ScitypeMismatch { .. }));
    }

    #[test]
    fn test_check_scitypes_missing_column() {
        let df = sample_frame();
        let err = check_scitypes(&df, &[("absent", SciType::Continuous)]).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound(_)));
    }

    #[test]
    fn test_columns_with_scitype() {
        let df = sample_frame();
        assert_eq!(
            columns_with_scitype(&df, SciType::Continuous),
            vec!["x".to_string()]
        );
        assert_eq!(
            columns_with_scitype(&df, SciType::Multiclass),
            vec!["label".to_string()]
        );
    }
}
