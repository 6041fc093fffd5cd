use crate::domain::sales::feature_record::CompleteFeatureRecord;

pub const PRODUCT_CATEGORY: &str = "ProductCategory";
pub const REGION: &str = "Region";
pub const CUSTOMER_SEGMENT: &str = "CustomerSegment";
pub const IS_PROMOTION_APPLIED: &str = "IsPromotionApplied";
pub const PRODUCTION_COST: &str = "ProductionCost";
pub const MARKETING_SPEND: &str = "MarketingSpend";
pub const SEASONAL_DEMAND_INDEX: &str = "SeasonalDemandIndex";
pub const COMPETITOR_PRICE: &str = "CompetitorPrice";
pub const CUSTOMER_RATING: &str = "CustomerRating";
pub const ECONOMIC_INDEX: &str = "EconomicIndex";
pub const STORE_COUNT: &str = "StoreCount";
pub const PRICE_COMPETITIVENESS: &str = "PriceCompetitiveness";

/// Ordered list of feature names.
/// This order MUST match the column order of the training data.
/// Any change here is a breaking change for saved pipelines.
pub const FEATURE_NAMES: &[&str] = &[
    PRODUCT_CATEGORY,
    REGION,
    CUSTOMER_SEGMENT,
    IS_PROMOTION_APPLIED,
    PRODUCTION_COST,
    MARKETING_SPEND,
    SEASONAL_DEMAND_INDEX,
    COMPETITOR_PRICE,
    CUSTOMER_RATING,
    ECONOMIC_INDEX,
    STORE_COUNT,
    PRICE_COMPETITIVENESS,
];

/// Name of the regression target in training data
pub const TARGET_NAME: &str = "SaleRevenue";

/// A single cell of the feature table
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Text(String),
    Number(f64),
}

impl FeatureValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            FeatureValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(_) => None,
        }
    }
}

/// Single-row table of named columns handed to the model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureTable {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureTable {
    pub fn from_record(record: &CompleteFeatureRecord) -> Self {
        let columns = vec![
            (PRODUCT_CATEGORY, FeatureValue::Text(record.product_category.clone())),
            (REGION, FeatureValue::Text(record.region.as_str().to_string())),
            (CUSTOMER_SEGMENT, FeatureValue::Text(record.customer_segment.clone())),
            (
                IS_PROMOTION_APPLIED,
                FeatureValue::Text(record.is_promotion_applied.as_str().to_string()),
            ),
            (PRODUCTION_COST, FeatureValue::Number(record.production_cost)),
            (MARKETING_SPEND, FeatureValue::Number(record.marketing_spend)),
            (SEASONAL_DEMAND_INDEX, FeatureValue::Number(record.seasonal_demand_index)),
            (COMPETITOR_PRICE, FeatureValue::Number(record.competitor_price)),
            (CUSTOMER_RATING, FeatureValue::Number(record.customer_rating)),
            (ECONOMIC_INDEX, FeatureValue::Number(record.economic_index)),
            (STORE_COUNT, FeatureValue::Number(f64::from(record.store_count))),
            (
                PRICE_COMPETITIVENESS,
                FeatureValue::Number(record.price_competitiveness),
            ),
        ];

        Self {
            columns: columns
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn with_column(mut self, name: &str, value: FeatureValue) -> Self {
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name.to_string(), value)),
        }
        self
    }

    #[cfg(test)]
    pub fn without_column(mut self, name: &str) -> Self {
        self.columns.retain(|(n, _)| n != name);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
