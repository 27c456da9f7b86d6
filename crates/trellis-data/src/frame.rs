//! Column selection, splitting and merging glue.
//!
//! These are the reshaping operations a learning network is wired out of:
//! project a group of feature columns, slice a feature table into named
//! contiguous groups, and pack named columns back into a single frame.

use crate::error::{DataError, Result};
use polars::prelude::*;

/// Project the named columns, preserving the given order.
pub fn select_columns(df: &DataFrame, names: &[&str]) -> Result<DataFrame> {
    for name in names {
        if df.column(name).is_err() {
            return Err(DataError::ColumnNotFound((*name).to_string()));
        }
    }
    Ok(df.select(names.iter().copied())?)
}

/// Select a contiguous range of columns by position, optionally relabeling.
///
/// `labels`, when given, must have one entry per selected column.
pub fn select_range(
    df: &DataFrame,
    start: usize,
    end: usize,
    labels: Option<&[&str]>,
) -> Result<DataFrame> {
    if start >= end || end > df.width() {
        return Err(DataError::InvalidSplit {
            requested: end,
            available: df.width(),
        });
    }
    let mut columns: Vec<Column> = df.get_columns()[start..end].to_vec();
    if let Some(labels) = labels {
        if labels.len() != columns.len() {
            return Err(DataError::InvalidSplit {
                requested: labels.len(),
                available: columns.len(),
            });
        }
        for (column, label) in columns.iter_mut().zip(labels) {
            column.rename((*label).into());
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// Slice a frame into named contiguous column groups.
///
/// Group widths must sum to the frame's column count, so stacking the groups
/// back together reconstitutes the original frame.
pub fn split_groups(df: &DataFrame, groups: &[(&str, usize)]) -> Result<Vec<(String, DataFrame)>> {
    let total: usize = groups.iter().map(|(_, width)| width).sum();
    if total != df.width() {
        return Err(DataError::InvalidSplit {
            requested: total,
            available: df.width(),
        });
    }
    let mut out = Vec::with_capacity(groups.len());
    let mut offset = 0;
    for (name, width) in groups {
        let group = select_range(df, offset, offset + width, None)?;
        out.push(((*name).to_string(), group));
        offset += width;
    }
    Ok(out)
}

/// Pack named columns into a single frame.
///
/// All columns must have the same length.
pub fn merge_columns(columns: Vec<Column>) -> Result<DataFrame> {
    let Some(first) = columns.first() else {
        return Err(DataError::EmptyFrame("merge of zero columns".to_string()));
    };
    let expected = first.len();
    for column in &columns {
        if column.len() != expected {
            return Err(DataError::RowMisaligned {
                expected,
                actual: column.len(),
            });
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// Stack frames side by side into one frame.
///
/// All frames must have the same row count; column names must not collide.
pub fn hstack_frames(frames: &[DataFrame]) -> Result<DataFrame> {
    let Some(first) = frames.first() else {
        return Err(DataError::EmptyFrame("stack of zero frames".to_string()));
    };
    let mut out = first.clone();
    for frame in &frames[1..] {
        if frame.height() != first.height() {
            return Err(DataError::RowMisaligned {
                expected: first.height(),
                actual: frame.height(),
            });
        }
        out = out.hstack(frame.get_columns())?;
    }
    Ok(out)
}

/// Relabel every column of a frame, in order.
pub fn rename_columns(df: &DataFrame, labels: &[&str]) -> Result<DataFrame> {
    if labels.len() != df.width() {
        return Err(DataError::InvalidSplit {
            requested: labels.len(),
            available: df.width(),
        });
    }
    let mut columns = df.get_columns().to_vec();
    for (column, label) in columns.iter_mut().zip(labels) {
        column.rename((*label).into());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seven_column_frame() -> DataFrame {
        let columns: Vec<Column> = (0..7)
            .map(|i| {
                Column::new(
                    format!("c{i}").into(),
                    vec![i as f64, i as f64 + 1.0, i as f64 + 2.0],
                )
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_select_columns() {
        let df = seven_column_frame();
        let sub = select_columns(&df, &["c1", "c4"]).unwrap();
        assert_eq!(sub.width(), 2);
        assert_eq!(sub.get_column_names()[0].as_str(), "c1");
    }

    #[test]
    fn test_select_columns_missing() {
        let df = seven_column_frame();
        let err = select_columns(&df, &["c1", "nope"]).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound(_)));
    }

    #[test]
    fn test_select_range_with_labels() {
        let df = seven_column_frame();
        let sub = select_range(&df, 0, 2, Some(&["a1", "a2"])).unwrap();
        assert_eq!(sub.width(), 2);
        assert_eq!(sub.get_column_names()[0].as_str(), "a1");
        assert_eq!(sub.get_column_names()[1].as_str(), "a2");
    }

    #[test]
    fn test_select_range_out_of_bounds() {
        let df = seven_column_frame();
        assert!(select_range(&df, 5, 9, None).is_err());
        assert!(select_range(&df, 3, 3, None).is_err());
    }

    #[test]
    fn test_split_five_two_reconstitutes_seven() {
        let df = seven_column_frame();
        let groups = split_groups(&df, &[("a", 5), ("b", 2)]).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1.width(), 5);
        assert_eq!(groups[1].1.width(), 2);

        let frames: Vec<DataFrame> = groups.into_iter().map(|(_, f)| f).collect();
        let rebuilt = hstack_frames(&frames).unwrap();
        assert_eq!(rebuilt.width(), 7);
        assert_eq!(rebuilt.height(), df.height());
        assert_eq!(
            rebuilt.get_column_names(),
            df.get_column_names(),
            "stacked groups must reconstitute all original columns"
        );
    }

    #[test]
    fn test_split_groups_bad_widths() {
        let df = seven_column_frame();
        let err = split_groups(&df, &[("a", 5), ("b", 3)]).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidSplit {
                requested: 8,
                available: 7
            }
        ));
    }

    #[test]
    fn test_merge_columns() {
        let merged = merge_columns(vec![
            Column::new("y1".into(), vec!["a", "b", "a"]),
            Column::new("y2".into(), vec![1.0_f64, 2.0, 3.0]),
            Column::new("y3".into(), vec!["x", "x", "y"]),
        ])
        .unwrap();
        assert_eq!(merged.width(), 3);
        assert_eq!(merged.height(), 3);
        let names: Vec<&str> = merged.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["y1", "y2", "y3"]);
    }

    #[test]
    fn test_merge_columns_misaligned() {
        let err = merge_columns(vec![
            Column::new("y1".into(), vec!["a", "b"]),
            Column::new("y2".into(), vec![1.0_f64]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::RowMisaligned {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_merge_columns_empty() {
        assert!(matches!(
            merge_columns(vec![]).unwrap_err(),
            DataError::EmptyFrame(_)
        ));
    }

    #[test]
    fn test_rename_columns() {
        let df = seven_column_frame();
        let renamed = rename_columns(&df, &["a", "b", "c", "d", "e", "f", "g"]).unwrap();
        assert_eq!(renamed.get_column_names()[6].as_str(), "g");
    }
}
