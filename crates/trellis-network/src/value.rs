//! Values flowing along network edges.

use ndarray::Array1;
use polars::prelude::DataFrame;
use std::fmt;

/// A value produced by a node.
#[derive(Debug, Clone)]
pub enum Value {
    /// A tabular frame
    Frame(DataFrame),
    /// A real-valued vector (regression target or prediction)
    Reals(Array1<f64>),
    /// A label vector (classification target or prediction)
    Labels(Vec<String>),
}

/// The kind of a [`Value`], for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Tabular frame
    Frame,
    /// Real vector
    Reals,
    /// Label vector
    Labels,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Frame => "Frame",
            Self::Reals => "Reals",
            Self::Labels => "Labels",
        };
        write!(f, "{name}")
    }
}

impl Value {
    /// The kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Frame(_) => ValueKind::Frame,
            Self::Reals(_) => ValueKind::Reals,
            Self::Labels(_) => ValueKind::Labels,
        }
    }

    /// Number of rows the value spans.
    pub fn n_rows(&self) -> usize {
        match self {
            Self::Frame(df) => df.height(),
            Self::Reals(v) => v.len(),
            Self::Labels(v) => v.len(),
        }
    }

    /// Borrow as a frame, if it is one.
    pub const fn as_frame(&self) -> Option<&DataFrame> {
        match self {
            Self::Frame(df) => Some(df),
            _ => None,
        }
    }

    /// Borrow as a real vector, if it is one.
    pub const fn as_reals(&self) -> Option<&Array1<f64>> {
        match self {
            Self::Reals(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a label vector, if it is one.
    pub fn as_labels(&self) -> Option<&[String]> {
        match self {
            Self::Labels(v) => Some(v),
            _ => None,
        }
    }
}

impl From<DataFrame> for Value {
    fn from(df: DataFrame) -> Self {
        Self::Frame(df)
    }
}

impl From<Array1<f64>> for Value {
    fn from(v: Array1<f64>) -> Self {
        Self::Reals(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::Labels(v)
    }
}
