//! Evaluation reports for composite models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One metric value for one target column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetScore {
    /// Target column name
    pub target: String,

    /// Metric name, e.g. `misclassification_rate` or `rmse`
    pub metric: String,

    /// Metric value on the held-out rows
    pub value: f64,
}

impl TargetScore {
    /// Create a new score entry.
    pub fn new(target: &str, metric: &str, value: f64) -> Self {
        Self {
            target: target.to_string(),
            metric: metric.to_string(),
            value,
        }
    }
}

impl fmt::Display for TargetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {:.4}", self.target, self.metric, self.value)
    }
}

/// Held-out evaluation of a composite model, one score per target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Name of the evaluated model
    pub model: String,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,

    /// Number of training rows
    pub n_train: usize,

    /// Number of held-out rows
    pub n_test: usize,

    /// Per-target metric values
    pub scores: Vec<TargetScore>,
}

impl EvaluationReport {
    /// Create an empty report for a model.
    pub fn new(model: &str, n_train: usize, n_test: usize) -> Self {
        Self {
            model: model.to_string(),
            timestamp: Utc::now(),
            n_train,
            n_test,
            scores: Vec::new(),
        }
    }

    /// Record a score.
    pub fn push_score(&mut self, target: &str, metric: &str, value: f64) {
        self.scores.push(TargetScore::new(target, metric, value));
    }

    /// Look up a score by target and metric name.
    pub fn score(&self, target: &str, metric: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.target == target && s.metric == metric)
            .map(|s| s.value)
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nEvaluation: {}\n", self.model));
        output.push_str(&format!(
            "Rows: {} train / {} test\n",
            self.n_train, self.n_test
        ));
        output.push_str(&"=".repeat(56));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:<24} {:>12}\n",
            "Target", "Metric", "Value"
        ));
        output.push_str(&"-".repeat(56));
        output.push('\n');
        for score in &self.scores {
            output.push_str(&format!(
                "{:<16} {:<24} {:>12.4}\n",
                score.target, score.metric, score.value
            ));
        }
        output.push_str(&"=".repeat(56));
        output.push('\n');
        output
    }

    /// Format as a markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("## Evaluation: {}\n\n", self.model));
        output.push_str(&format!(
            "Rows: {} train / {} test\n\n",
            self.n_train, self.n_test
        ));
        output.push_str("| Target | Metric | Value |\n");
        output.push_str("|--------|--------|-------|\n");
        for score in &self.scores {
            output.push_str(&format!(
                "| {} | {} | {:.4} |\n",
                score.target, score.metric, score.value
            ));
        }
        output
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}
