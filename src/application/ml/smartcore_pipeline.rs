use super::predictor::RevenuePredictor;
use crate::domain::errors::{ArtifactError, ModelError};
use crate::domain::ml::feature_registry::{FeatureTable, FeatureValue};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::Path;

/// Bumped whenever the on-disk layout of [`SalesPipeline`] changes.
pub const PIPELINE_FORMAT_VERSION: u32 = 1;

pub type ForestRegressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// One-hot encoder for a single text column.
/// Categories not seen during training encode as all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    pub column: String,
    pub categories: Vec<String>,
}

impl CategoricalEncoder {
    pub fn fit<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut categories: Vec<String> = values.into_iter().map(str::to_string).collect();
        categories.sort();
        categories.dedup();
        Self {
            column: column.to_string(),
            categories,
        }
    }

    fn encode_into(&self, table: &FeatureTable, row: &mut Vec<f64>) -> Result<(), ModelError> {
        let value = table
            .get(&self.column)
            .ok_or_else(|| ModelError::MissingColumn {
                column: self.column.clone(),
            })?
            .as_text()
            .ok_or_else(|| ModelError::TypeMismatch {
                column: self.column.clone(),
                expected: "text",
            })?;

        row.extend(
            self.categories
                .iter()
                .map(|c| if c == value { 1.0 } else { 0.0 }),
        );
        Ok(())
    }
}

/// Encodes a table as one numeric row: one-hot blocks first, then numeric columns.
pub fn encode_row(
    categorical: &[CategoricalEncoder],
    numeric: &[String],
    table: &FeatureTable,
) -> Result<Vec<f64>, ModelError> {
    let mut row = Vec::new();
    for encoder in categorical {
        encoder.encode_into(table, &mut row)?;
    }
    for column in numeric {
        let value = match table.get(column) {
            Some(FeatureValue::Number(n)) => *n,
            Some(FeatureValue::Text(_)) => {
                return Err(ModelError::TypeMismatch {
                    column: column.clone(),
                    expected: "number",
                });
            }
            None => {
                return Err(ModelError::MissingColumn {
                    column: column.clone(),
                });
            }
        };
        row.push(value);
    }
    Ok(row)
}

/// Serialized regression pipeline: column encoders plus a SmartCore random forest.
#[derive(Serialize, Deserialize)]
pub struct SalesPipeline {
    pub format_version: u32,
    #[serde(default)]
    pub model_version: String,
    pub categorical: Vec<CategoricalEncoder>,
    pub numeric: Vec<String>,
    regressor: ForestRegressor,
}

impl SalesPipeline {
    pub fn new(
        model_version: String,
        categorical: Vec<CategoricalEncoder>,
        numeric: Vec<String>,
        regressor: ForestRegressor,
    ) -> Self {
        Self {
            format_version: PIPELINE_FORMAT_VERSION,
            model_version,
            categorical,
            numeric,
            regressor,
        }
    }

    /// Reads and deserializes the artifact (serde_json).
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let buffer = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let pipeline: SalesPipeline =
            serde_json::from_slice(&buffer).map_err(|source| ArtifactError::Deserialize {
                path: path.to_path_buf(),
                source,
            })?;

        if pipeline.format_version != PIPELINE_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: pipeline.format_version,
                expected: PIPELINE_FORMAT_VERSION,
            });
        }

        Ok(pipeline)
    }

    /// Number of encoded input columns the forest expects
    pub fn width(&self) -> usize {
        self.categorical
            .iter()
            .map(|e| e.categories.len())
            .sum::<usize>()
            + self.numeric.len()
    }
}

impl RevenuePredictor for SalesPipeline {
    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>, ModelError> {
        let row = encode_row(&self.categorical, &self.numeric, table)?;
        let input_matrix =
            DenseMatrix::from_2d_vec(&vec![row]).map_err(|e| ModelError::Backend {
                reason: format!("Matrix creation failed: {}", e),
            })?;

        self.regressor
            .predict(&input_matrix)
            .map_err(|e| ModelError::Backend {
                reason: format!("Forest prediction failed: {}", e),
            })
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest pipeline"
    }

    fn version(&self) -> &str {
        &self.model_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::feature_registry::{CUSTOMER_RATING, PRODUCT_CATEGORY, REGION, STORE_COUNT};

    fn table() -> FeatureTable {
        FeatureTable::default()
            .with_column(PRODUCT_CATEGORY, FeatureValue::Text("Toys".to_string()))
            .with_column(REGION, FeatureValue::Text("West".to_string()))
            .with_column(CUSTOMER_RATING, FeatureValue::Number(4.2))
            .with_column(STORE_COUNT, FeatureValue::Number(12.0))
    }

    fn encoders() -> Vec<CategoricalEncoder> {
        vec![
            CategoricalEncoder::fit(PRODUCT_CATEGORY, ["Toys", "Clothing", "Toys"]),
            CategoricalEncoder::fit(REGION, ["North", "West"]),
        ]
    }

    #[test]
    fn test_encoder_fit_sorts_and_dedups() {
        let encoder = CategoricalEncoder::fit(PRODUCT_CATEGORY, ["Toys", "Clothing", "Toys"]);
        assert_eq!(encoder.categories, vec!["Clothing", "Toys"]);
    }

    #[test]
    fn test_encode_row_layout() {
        let numeric = vec![CUSTOMER_RATING.to_string(), STORE_COUNT.to_string()];
        let row = encode_row(&encoders(), &numeric, &table()).unwrap();
        assert_eq!(row, vec![0.0, 1.0, 0.0, 1.0, 4.2, 12.0]);
    }

    #[test]
    fn test_unknown_category_encodes_as_zeros() {
        let numeric: Vec<String> = Vec::new();
        let table = table().with_column(REGION, FeatureValue::Text("East".to_string()));
        let row = encode_row(&encoders(), &numeric, &table).unwrap();
        assert_eq!(row, vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let numeric = vec!["EconomicIndex".to_string()];
        let err = encode_row(&encoders(), &numeric, &table()).unwrap_err();
        assert!(matches!(err, ModelError::MissingColumn { column } if column == "EconomicIndex"));
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let numeric = vec![REGION.to_string()];
        let err = encode_row(&[], &numeric, &table()).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { expected: "number", .. }));

        let table = table().with_column(PRODUCT_CATEGORY, FeatureValue::Number(3.0));
        let err = encode_row(&encoders(), &[], &table).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { expected: "text", .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SalesPipeline::load(Path::new("non_existent_pipeline.json")).err().unwrap();
        assert!(matches!(err, ArtifactError::NotFound { .. }));
    }
}
