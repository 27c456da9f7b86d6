//! Conversions between polars frames and ndarray containers.
//!
//! Models consume dense `ndarray` matrices and vectors; the network converts
//! at the frame boundary. All conversions reject null values.

use crate::error::{DataError, Result};
use crate::scitype::{SciType, scitype_of};
use ndarray::{Array1, Array2};
use polars::prelude::*;

/// Convert an all-numeric frame to a row-major matrix.
///
/// `Count` columns are cast to `f64`; `Multiclass` columns are rejected.
pub fn to_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    if df.width() == 0 {
        return Err(DataError::EmptyFrame("matrix of zero columns".to_string()));
    }
    let mut matrix = Array2::<f64>::zeros((df.height(), df.width()));
    for (j, column) in df.get_columns().iter().enumerate() {
        match scitype_of(column.dtype()) {
            SciType::Continuous | SciType::Count => {}
            other => {
                return Err(DataError::ScitypeMismatch {
                    column: column.name().to_string(),
                    expected: SciType::Continuous.to_string(),
                    actual: other.to_string(),
                });
            }
        }
        if column.null_count() > 0 {
            return Err(DataError::NullValues(column.name().to_string()));
        }
        let casted = column.cast(&DataType::Float64)?;
        for (i, value) in casted.f64()?.into_no_null_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }
    Ok(matrix)
}

/// Convert a matrix to a frame with the given column labels.
pub fn matrix_to_frame(matrix: &Array2<f64>, labels: &[&str]) -> Result<DataFrame> {
    if labels.len() != matrix.ncols() {
        return Err(DataError::InvalidSplit {
            requested: labels.len(),
            available: matrix.ncols(),
        });
    }
    let columns: Vec<Column> = labels
        .iter()
        .enumerate()
        .map(|(j, label)| Column::new((*label).into(), matrix.column(j).to_vec()))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Convert a continuous column to a dense vector.
pub fn to_reals(column: &Column) -> Result<Array1<f64>> {
    match scitype_of(column.dtype()) {
        SciType::Continuous | SciType::Count => {}
        other => {
            return Err(DataError::ScitypeMismatch {
                column: column.name().to_string(),
                expected: SciType::Continuous.to_string(),
                actual: other.to_string(),
            });
        }
    }
    if column.null_count() > 0 {
        return Err(DataError::NullValues(column.name().to_string()));
    }
    let casted = column.cast(&DataType::Float64)?;
    Ok(Array1::from_iter(casted.f64()?.into_no_null_iter()))
}

/// Convert a categorical column to a label vector.
pub fn to_labels(column: &Column) -> Result<Vec<String>> {
    let got = scitype_of(column.dtype());
    if got != SciType::Multiclass {
        return Err(DataError::ScitypeMismatch {
            column: column.name().to_string(),
            expected: SciType::Multiclass.to_string(),
            actual: got.to_string(),
        });
    }
    if column.null_count() > 0 {
        return Err(DataError::NullValues(column.name().to_string()));
    }
    Ok(column
        .str()?
        .into_no_null_iter()
        .map(|s| s.to_string())
        .collect())
}

/// Extract a named continuous column from a frame as a vector.
pub fn frame_reals(df: &DataFrame, name: &str) -> Result<Array1<f64>> {
    let column = df
        .column(name)
        .map_err(|_| DataError::ColumnNotFound(name.to_string()))?;
    to_reals(column)
}

/// Extract a named categorical column from a frame as labels.
pub fn frame_labels(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .map_err(|_| DataError::ColumnNotFound(name.to_string()))?;
    to_labels(column)
}

/// Pack a real vector into a named column.
pub fn reals_column(name: &str, values: &Array1<f64>) -> Column {
    Column::new(name.into(), values.to_vec())
}

/// Pack a label vector into a named column.
pub fn labels_column(name: &str, values: &[String]) -> Column {
    Column::new(name.into(), values.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn numeric_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("x1".into(), vec![1.0_f64, 2.0, 3.0]),
            Column::new("x2".into(), vec![4.0_f64, 5.0, 6.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_to_matrix_shape_and_values() {
        let matrix = to_matrix(&numeric_frame()).unwrap();
        assert_eq!(matrix.dim(), (3, 2));
        assert_relative_eq!(matrix[[0, 0]], 1.0);
        assert_relative_eq!(matrix[[2, 1]], 6.0);
    }

    #[test]
    fn test_to_matrix_casts_counts() {
        let df = DataFrame::new(vec![Column::new("n".into(), vec![1_i64, 2, 3])]).unwrap();
        let matrix = to_matrix(&df).unwrap();
        assert_relative_eq!(matrix[[1, 0]], 2.0);
    }

    #[test]
    fn test_to_matrix_rejects_labels() {
        let df = DataFrame::new(vec![Column::new("label".into(), vec!["a", "b"])]).unwrap();
        assert!(matches!(
            to_matrix(&df).unwrap_err(),
            DataError::ScitypeMismatch { .. }
        ));
    }

    #[test]
    fn test_matrix_round_trip() {
        let matrix = to_matrix(&numeric_frame()).unwrap();
        let df = matrix_to_frame(&matrix, &["x1", "x2"]).unwrap();
        assert_eq!(df.height(), 3);
        let back = to_matrix(&df).unwrap();
        assert_relative_eq!(back[[2, 0]], 3.0);
    }

    #[test]
    fn test_to_labels() {
        let column = Column::new("y".into(), vec!["red", "blue", "red"]);
        let labels = to_labels(&column).unwrap();
        assert_eq!(labels, vec!["red", "blue", "red"]);
    }

    #[test]
    fn test_to_labels_rejects_reals() {
        let column = Column::new("y".into(), vec![1.0_f64, 2.0]);
        assert!(matches!(
            to_labels(&column).unwrap_err(),
            DataError::ScitypeMismatch { .. }
        ));
    }

    #[test]
    fn test_to_reals_and_back() {
        let column = Column::new("y".into(), vec![0.5_f64, 1.5]);
        let reals = to_reals(&column).unwrap();
        assert_relative_eq!(reals[1], 1.5);
        let rebuilt = reals_column("y", &reals);
        assert_eq!(rebuilt.len(), 2);
    }
}
