#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/trellis-ml/trellis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod metrics;
pub mod report;

pub use export::{
    CellValue, EvaluationReportExport, ExportError, ExportFormat, Exporter, PredictionExport,
    export_predictions,
};
pub use metrics::{MetricError, accuracy, mae, misclassification_rate, rmse};
pub use report::{EvaluationReport, ReportError, TargetScore};
