//! Fits the sales revenue pipeline from a CSV and writes the artifact the
//! server loads at startup.

use anyhow::{Result, bail};
use clap::Parser;
use revcast::application::ml::RevenuePredictor;
use revcast::application::ml::pipeline_trainer::{
    TrainerParams, fit_pipeline, read_training_csv, save_pipeline,
};
use revcast::domain::ml::feature_registry::FeatureTable;
use revcast::domain::sales::CompleteFeatureRecord;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to training data CSV (twelve feature columns plus SaleRevenue)
    #[arg(long, default_value = "data/sales_training.csv")]
    input: PathBuf,

    /// Path to output pipeline artifact
    #[arg(long, default_value = "best_pipeline_model.json")]
    output: PathBuf,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 100)]
    n_trees: usize,

    /// Maximum depth of trees
    #[arg(long, default_value_t = 10)]
    max_depth: u16,

    /// Minimum samples required to split an internal node
    #[arg(long, default_value_t = 5)]
    min_split: usize,

    /// Disable train/test split (train on 100% of data). Use after validation.
    #[arg(long)]
    no_split: bool,

    /// Version label stored in the artifact (default: UTC timestamp)
    #[arg(long)]
    model_version: Option<String>,
}

/// RMSE, MAE and R² of the pipeline on held-out rows
fn evaluate(model: &dyn RevenuePredictor, test: &[(CompleteFeatureRecord, f64)]) -> Result<()> {
    let mut predictions = Vec::with_capacity(test.len());
    for (features, _) in test {
        let output = model.predict(&FeatureTable::from_record(features))?;
        match output.first() {
            Some(value) => predictions.push(*value),
            None => bail!("Pipeline returned no prediction during evaluation"),
        }
    }

    let n = test.len() as f64;
    let sq_err: f64 = predictions
        .iter()
        .zip(test)
        .map(|(p, (_, t))| (p - t).powi(2))
        .sum();
    let mae: f64 = predictions
        .iter()
        .zip(test)
        .map(|(p, (_, t))| (p - t).abs())
        .sum::<f64>()
        / n;
    let mean_y = test.iter().map(|(_, t)| t).sum::<f64>() / n;
    let var_y = test.iter().map(|(_, t)| (t - mean_y).powi(2)).sum::<f64>() / n;
    let r2 = if var_y > 0.0 {
        1.0 - (sq_err / n) / var_y
    } else {
        0.0
    };

    info!(
        "OOS Test (n={}): RMSE={:.4}, MAE={:.4}, R²={:.4}",
        test.len(),
        (sq_err / n).sqrt(),
        mae,
        r2
    );
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();

    info!("Loading training data from {:?}", args.input);
    let examples = read_training_csv(&args.input)?;
    if examples.is_empty() {
        bail!("No labeled rows found in {:?}", args.input);
    }

    let split = if args.no_split || examples.len() < 10 {
        if !args.no_split {
            warn!("Only {} rows; training on all of them", examples.len());
        }
        examples.len()
    } else {
        (examples.len() as f64 * 0.8).floor() as usize
    };
    let (train, test) = examples.split_at(split);

    let params = TrainerParams {
        n_trees: args.n_trees,
        max_depth: args.max_depth,
        min_split: args.min_split,
    };
    let version = args
        .model_version
        .unwrap_or_else(|| chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string());

    info!(
        "Training Random Forest pipeline on {} samples (Trees: {}, Depth: {}, MinSplit: {})...",
        train.len(),
        params.n_trees,
        params.max_depth,
        params.min_split
    );
    let pipeline = fit_pipeline(train, &params, &version)?;

    if !test.is_empty() {
        evaluate(&pipeline, test)?;
    }

    save_pipeline(&pipeline, &args.output)?;
    info!("Pipeline {} saved to {:?}", version, args.output);
    Ok(())
}
