//! Pure frame operations usable as network nodes.

use crate::error::{NetworkError, Result};
use crate::value::{Value, ValueKind};
use polars::prelude::DataFrame;
use trellis_data::{frame_labels, frame_reals, select_columns, select_range};

/// A stateless frame-to-value operation.
#[derive(Debug, Clone)]
pub enum FrameOp {
    /// Project the named columns
    SelectNames(Vec<String>),
    /// Select a contiguous column range, optionally relabeling
    SelectRange {
        /// First column index (inclusive)
        start: usize,
        /// Last column index (exclusive)
        end: usize,
        /// Replacement labels, one per selected column
        labels: Option<Vec<String>>,
    },
    /// Extract a continuous column as a real vector
    ExtractReals(String),
    /// Extract a categorical column as a label vector
    ExtractLabels(String),
}

impl FrameOp {
    /// Apply the operation to an upstream value; `node` names the consumer
    /// for diagnostics.
    pub fn apply(&self, node: &str, input: &Value) -> Result<Value> {
        let Some(df) = input.as_frame() else {
            return Err(NetworkError::ValueKind {
                node: node.to_string(),
                expected: ValueKind::Frame.to_string(),
                actual: input.kind().to_string(),
            });
        };
        self.apply_frame(df)
    }

    fn apply_frame(&self, df: &DataFrame) -> Result<Value> {
        let out = match self {
            Self::SelectNames(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                Value::Frame(select_columns(df, &names)?)
            }
            Self::SelectRange { start, end, labels } => {
                let labels: Option<Vec<&str>> = labels
                    .as_ref()
                    .map(|l| l.iter().map(String::as_str).collect());
                Value::Frame(select_range(df, *start, *end, labels.as_deref())?)
            }
            Self::ExtractReals(name) => Value::Reals(frame_reals(df, name)?),
            Self::ExtractLabels(name) => Value::Labels(frame_labels(df, name)?),
        };
        Ok(out)
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::SelectNames(names) => format!("select[{}]", names.join(",")),
            Self::SelectRange { start, end, .. } => format!("select[{start}..{end}]"),
            Self::ExtractReals(name) => format!("reals[{name}]"),
            Self::ExtractLabels(name) => format!("labels[{name}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn input() -> Value {
        Value::Frame(
            DataFrame::new(vec![
                Column::new("x1".into(), vec![1.0_f64, 2.0]),
                Column::new("x2".into(), vec![3.0_f64, 4.0]),
                Column::new("label".into(), vec!["a", "b"]),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_select_names() {
        let op = FrameOp::SelectNames(vec!["x2".to_string()]);
        let out = op.apply("n", &input()).unwrap();
        assert_eq!(out.as_frame().unwrap().width(), 1);
    }

    #[test]
    fn test_select_range_relabels() {
        let op = FrameOp::SelectRange {
            start: 0,
            end: 2,
            labels: Some(vec!["u".to_string(), "v".to_string()]),
        };
        let out = op.apply("n", &input()).unwrap();
        let names: Vec<String> = out
            .as_frame()
            .unwrap()
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["u", "v"]);
    }

    #[test]
    fn test_extract_reals_and_labels() {
        let reals = FrameOp::ExtractReals("x1".to_string())
            .apply("n", &input())
            .unwrap();
        assert_eq!(reals.kind(), ValueKind::Reals);

        let labels = FrameOp::ExtractLabels("label".to_string())
            .apply("n", &input())
            .unwrap();
        assert_eq!(labels.as_labels().unwrap(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_rejects_non_frame_input() {
        let op = FrameOp::ExtractReals("x1".to_string());
        let err = op.apply("n", &Value::Labels(vec![])).unwrap_err();
        assert!(matches!(err, NetworkError::ValueKind { .. }));
    }
}
