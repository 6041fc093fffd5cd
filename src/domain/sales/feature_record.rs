use serde::{Deserialize, Serialize};

/// Product categories the pipeline was trained on.
/// Other values are accepted but the model's behavior for them is undefined.
pub const KNOWN_PRODUCT_CATEGORIES: &[&str] = &["Electronics", "Clothing", "Furniture", "Toys"];

/// Sales region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::North, Region::South, Region::East, Region::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == label)
    }
}

/// Whether a promotion was running for the product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Promotion {
    Yes,
    No,
}

impl Promotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Promotion::Yes => "Yes",
            Promotion::No => "No",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Yes" => Some(Promotion::Yes),
            "No" => Some(Promotion::No),
            _ => None,
        }
    }
}

/// A validated feature record, before the derived feature is resolved.
///
/// `price_competitiveness` is `None` when the caller did not supply it;
/// an explicit `Some(0.0)` is a real value and is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureRecord {
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
}

impl FeatureRecord {
    pub fn has_known_category(&self) -> bool {
        KNOWN_PRODUCT_CATEGORIES.contains(&self.product_category.as_str())
    }
}

/// A feature record with every field populated; the only shape the model sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompleteFeatureRecord {
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
    pub price_competitiveness: f64,
}
