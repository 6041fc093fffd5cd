use super::smartcore_pipeline::{CategoricalEncoder, SalesPipeline, encode_row};
use crate::domain::ml::feature_registry::{
    CUSTOMER_SEGMENT, FEATURE_NAMES, FeatureTable, IS_PROMOTION_APPLIED, PRODUCT_CATEGORY,
    REGION,
};
use crate::domain::sales::feature_record::{CompleteFeatureRecord, FeatureRecord, Promotion, Region};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{info, warn};

/// Columns that are one-hot encoded; every other feature is fed as a number.
pub const CATEGORICAL_COLUMNS: &[&str] =
    &[PRODUCT_CATEGORY, REGION, CUSTOMER_SEGMENT, IS_PROMOTION_APPLIED];

/// One row of training data: the twelve features plus the observed revenue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrainingRecord {
    pub product_category: String,
    pub region: Region,
    pub customer_segment: String,
    pub is_promotion_applied: Promotion,
    pub production_cost: f64,
    pub marketing_spend: f64,
    pub seasonal_demand_index: f64,
    pub competitor_price: f64,
    pub customer_rating: f64,
    pub economic_index: f64,
    pub store_count: u32,
    #[serde(default)]
    pub price_competitiveness: Option<f64>,
    pub sale_revenue: f64,
}

impl TrainingRecord {
    /// Features resolved the same way the service resolves them, plus the target
    pub fn into_example(self) -> (CompleteFeatureRecord, f64) {
        let target = self.sale_revenue;
        let features = FeatureRecord {
            product_category: self.product_category,
            region: self.region,
            customer_segment: self.customer_segment,
            is_promotion_applied: self.is_promotion_applied,
            production_cost: self.production_cost,
            marketing_spend: self.marketing_spend,
            seasonal_demand_index: self.seasonal_demand_index,
            competitor_price: self.competitor_price,
            customer_rating: self.customer_rating,
            economic_index: self.economic_index,
            store_count: self.store_count,
            price_competitiveness: self.price_competitiveness,
        };
        (features.resolve(), target)
    }
}

/// Random forest hyper-parameters
#[derive(Debug, Clone)]
pub struct TrainerParams {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_split: usize,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_split: 5,
        }
    }
}

/// Reads a CSV with the twelve feature columns and a `SaleRevenue` column.
/// Rows with a non-finite target are skipped.
pub fn read_training_csv(path: &Path) -> Result<Vec<(CompleteFeatureRecord, f64)>> {
    let file = File::open(path).with_context(|| format!("opening training data {:?}", path))?;
    let mut rdr = csv::Reader::from_reader(BufReader::new(file));

    let mut examples = Vec::new();
    for (line, result) in rdr.deserialize::<TrainingRecord>().enumerate() {
        let record = result.with_context(|| format!("parsing training row {}", line + 1))?;
        if !record.sale_revenue.is_finite() {
            warn!("Skipping training row {}: non-finite SaleRevenue", line + 1);
            continue;
        }
        examples.push(record.into_example());
    }
    Ok(examples)
}

/// Fits encoders and the forest on the given examples.
pub fn fit_pipeline(
    examples: &[(CompleteFeatureRecord, f64)],
    params: &TrainerParams,
    model_version: &str,
) -> Result<SalesPipeline> {
    if examples.is_empty() {
        anyhow::bail!("No training examples");
    }

    let tables: Vec<FeatureTable> = examples
        .iter()
        .map(|(features, _)| FeatureTable::from_record(features))
        .collect();

    let categorical: Vec<CategoricalEncoder> = CATEGORICAL_COLUMNS
        .iter()
        .map(|column| {
            CategoricalEncoder::fit(
                column,
                tables
                    .iter()
                    .filter_map(|t| t.get(column).and_then(|v| v.as_text())),
            )
        })
        .collect();

    let numeric: Vec<String> = FEATURE_NAMES
        .iter()
        .filter(|name| !CATEGORICAL_COLUMNS.contains(*name))
        .map(|name| name.to_string())
        .collect();

    let x: Vec<Vec<f64>> = tables
        .iter()
        .map(|table| encode_row(&categorical, &numeric, table))
        .collect::<Result<_, _>>()
        .map_err(|e| anyhow!("Encoding error: {}", e))?;
    let y: Vec<f64> = examples.iter().map(|(_, target)| *target).collect();

    let x_matrix = DenseMatrix::from_2d_vec(&x).map_err(|e| anyhow!("Matrix error: {}", e))?;
    let forest_params = RandomForestRegressorParameters::default()
        .with_n_trees(params.n_trees)
        .with_max_depth(params.max_depth)
        .with_min_samples_split(params.min_split);
    let regressor = RandomForestRegressor::fit(&x_matrix, &y, forest_params)
        .map_err(|e| anyhow!("Training error: {}", e))?;

    info!(
        "Fitted pipeline on {} rows ({} trees, {} encoded columns)",
        examples.len(),
        params.n_trees,
        x.first().map(Vec::len).unwrap_or(0)
    );

    Ok(SalesPipeline::new(
        model_version.to_string(),
        categorical,
        numeric,
        regressor,
    ))
}

/// Writes the pipeline as JSON, creating parent directories as needed.
pub fn save_pipeline(pipeline: &SalesPipeline, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {:?}", parent))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating artifact {:?}", path))?;
    serde_json::to_writer(BufWriter::new(file), pipeline)
        .with_context(|| format!("writing artifact {:?}", path))?;
    Ok(())
}
