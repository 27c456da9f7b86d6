//! Trellis CLI binary.
//!
//! Runs the three-target composite demo end to end and lists the available
//! component models.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use trellis::data::{SyntheticConfig, frame_labels, frame_reals, generate, train_test_split};
use trellis::models::{
    DecisionTreeClassifier, LinearSvc, ModelKind, OneHotEncoder, RidgeConfig, RidgeRegressor,
    available_models, models_by_kind,
};
use trellis::network::{Model, Value};
use trellis::output::{
    EvaluationReport, ExportFormat, export_predictions, misclassification_rate, rmse,
};
use trellis::three_target_composite;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Trellis: composite models from learning networks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the three-target composite on synthetic data
    Demo {
        /// Number of synthetic rows to generate
        #[arg(long, default_value = "200")]
        rows: usize,

        /// RNG seed for the generator
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Fraction of rows held out for testing
        #[arg(long, default_value = "0.3")]
        test_fraction: f64,

        /// Export format for held-out predictions
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,

        /// Write held-out predictions to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the available component models
    Models {
        /// Filter by component kind
        #[arg(long, value_enum)]
        kind: Option<Kind>,
    },
}

/// Prediction export formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Comma-separated values
    Csv,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    PrettyJson,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::PrettyJson => Self::PrettyJson,
        }
    }
}

/// Component kinds, mirroring the registry.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Classifier,
    Regressor,
    Encoder,
}

impl From<Kind> for ModelKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Classifier => Self::Classifier,
            Kind::Regressor => Self::Regressor,
            Kind::Encoder => Self::Encoder,
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            rows,
            seed,
            test_fraction,
            format,
            output,
        } => run_demo(rows, seed, test_fraction, format.into(), output.as_deref()),
        Commands::Models { kind } => {
            run_models(kind.map(Into::into));
            Ok(())
        }
    }
}

fn run_demo(
    rows: usize,
    seed: u64,
    test_fraction: f64,
    format: ExportFormat,
    output: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SyntheticConfig {
        rows,
        seed,
        ..Default::default()
    };
    let dataset = generate(&config)?;
    println!("Features ({} rows):", dataset.features.height());
    println!("{}", dataset.features.head(Some(5)));
    println!("Targets:");
    println!("{}", dataset.targets.head(Some(5)));

    let (train_x, train_y, test_x, test_y) =
        train_test_split(&dataset.features, &dataset.targets, test_fraction)?;
    log::info!(
        "split {} rows into {} train / {} test",
        rows,
        train_x.height(),
        test_x.height()
    );

    let (mut composite, machines) = three_target_composite(
        DecisionTreeClassifier::default(),
        OneHotEncoder::default(),
        RidgeRegressor::default(),
        LinearSvc::default(),
    )?;
    composite.fit(&train_x, &train_y)?;

    // peek at an intermediate node: the one-hot encoded b-group
    if let Some(encoded) = composite.network().node_named("encoded_b") {
        let x_source = composite
            .network()
            .node_named("x")
            .ok_or("missing feature source")?;
        let value = composite
            .network()
            .evaluate(encoded, &[(x_source, Value::Frame(test_x.clone()))])?;
        if let Some(frame) = value.as_frame() {
            println!("Encoded feature group b:");
            println!("{}", frame.head(Some(5)));
        }
    }

    let predictions = composite.predict(&test_x)?;
    println!("Held-out predictions:");
    println!("{}", predictions.head(Some(5)));

    let report = evaluate(&test_y, &predictions, train_x.height())?;
    println!("{report}");

    // replay the network with a heavier ridge penalty; only the regressor
    // and its downstream nodes retrain
    let replay_lambda = 100.0;
    composite.update_model(
        machines.ridge,
        Model::Regressor(Box::new(RidgeRegressor::new(RidgeConfig {
            lambda: replay_lambda,
            fit_intercept: true,
        })?)),
    )?;
    composite.fit(&train_x, &train_y)?;
    let replayed = composite.predict(&test_x)?;
    let replay_report = evaluate(&test_y, &replayed, train_x.height())?;

    println!("After setting ridge lambda = {replay_lambda} and refitting:");
    let metric = |r: &EvaluationReport, target: &str, name: &str| {
        r.score(target, name).unwrap_or(f64::NAN)
    };
    println!(
        "  y2 rmse: {:.4} -> {:.4}",
        metric(&report, "y2", "rmse"),
        metric(&replay_report, "y2", "rmse")
    );
    println!(
        "  y1 misclassification (unchanged): {:.4} -> {:.4}",
        metric(&report, "y1", "misclassification_rate"),
        metric(&replay_report, "y1", "misclassification_rate")
    );

    if let Some(path) = output {
        export_predictions("three_target_composite", &predictions, path, format)?;
        println!("Predictions written to {}", path.display());
    }
    Ok(())
}

fn evaluate(
    actual: &polars::prelude::DataFrame,
    predicted: &polars::prelude::DataFrame,
    n_train: usize,
) -> Result<EvaluationReport, Box<dyn std::error::Error>> {
    let mut report = EvaluationReport::new("three_target_composite", n_train, actual.height());
    report.push_score(
        "y1",
        "misclassification_rate",
        misclassification_rate(&frame_labels(actual, "y1")?, &frame_labels(predicted, "y1")?)?,
    );
    report.push_score(
        "y2",
        "rmse",
        rmse(&frame_reals(actual, "y2")?, &frame_reals(predicted, "y2")?)?,
    );
    report.push_score(
        "y3",
        "misclassification_rate",
        misclassification_rate(&frame_labels(actual, "y3")?, &frame_labels(predicted, "y3")?)?,
    );
    Ok(report)
}

fn run_models(kind: Option<ModelKind>) {
    let models = kind.map_or_else(available_models, models_by_kind);
    println!(
        "{:<16} {:<12} {:<52} Hyperparameters",
        "Name", "Kind", "Description"
    );
    println!("{}", "-".repeat(100));
    for info in models {
        println!(
            "{:<16} {:<12} {:<52} {}",
            info.name,
            format!("{:?}", info.kind),
            info.description,
            info.hyperparameters.join(", ")
        );
    }
}
