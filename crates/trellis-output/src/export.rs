//! Prediction export to CSV and JSON.

use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use trellis_data::{SciType, scitype_of, to_labels, to_reals};

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame could not be read as prediction columns
    #[error("Data error: {0}")]
    Data(#[from] trellis_data::DataError),

    /// Invalid format error
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format
    Csv,

    /// Compact JSON format
    Json,

    /// Pretty-printed JSON format
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// A single prediction cell: real for regression, label for classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    /// Regression output
    Real(f64),
    /// Classification output
    Label(String),
}

impl CellValue {
    fn render(&self) -> String {
        match self {
            Self::Real(v) => v.to_string(),
            Self::Label(v) => v.clone(),
        }
    }
}

/// A prediction frame flattened for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionExport {
    /// Name of the model that produced the predictions
    pub model: String,

    /// Export timestamp
    pub timestamp: DateTime<Utc>,

    /// Output column names, in frame order
    pub columns: Vec<String>,

    /// Row-major prediction values
    pub rows: Vec<Vec<CellValue>>,
}

impl PredictionExport {
    /// Flatten a prediction frame.
    ///
    /// Categorical columns export as labels, numeric columns as reals;
    /// anything else is rejected.
    pub fn from_frame(model: &str, df: &DataFrame) -> Result<Self, ExportError> {
        let mut columns = Vec::with_capacity(df.width());
        let mut by_column: Vec<Vec<CellValue>> = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            columns.push(column.name().to_string());
            let cells = if scitype_of(column.dtype()) == SciType::Multiclass {
                to_labels(column)?.into_iter().map(CellValue::Label).collect()
            } else {
                to_reals(column)?.into_iter().map(CellValue::Real).collect()
            };
            by_column.push(cells);
        }

        let rows = (0..df.height())
            .map(|i| by_column.iter().map(|c| c[i].clone()).collect())
            .collect();
        Ok(Self {
            model: model.to_string(),
            timestamp: Utc::now(),
            columns,
            rows,
        })
    }

    /// Number of exported rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        log::info!("wrote {} export to {}", format.extension(), path.display());
        Ok(())
    }
}

impl Exporter for PredictionExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(&self.columns)?;
                for row in &self.rows {
                    wtr.write_record(row.iter().map(CellValue::render))?;
                }
                let bytes = wtr
                    .into_inner()
                    .map_err(|e| e.into_error())
                    .map_err(ExportError::from)?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for EvaluationReportExport<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for score in &self.0.scores {
                    wtr.serialize(score)?;
                }
                let bytes = wtr
                    .into_inner()
                    .map_err(|e| e.into_error())
                    .map_err(ExportError::from)?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self.0)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self.0)?),
        }
    }
}

/// Borrow of an [`crate::report::EvaluationReport`] for export.
#[derive(Debug)]
pub struct EvaluationReportExport<'a>(pub &'a crate::report::EvaluationReport);

/// Write a prediction frame to disk in the given format.
pub fn export_predictions(
    model: &str,
    df: &DataFrame,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    PredictionExport::from_frame(model, df)?.export_to_file(path, format)
}
