use super::feature_record::{CompleteFeatureRecord, FeatureRecord};

/// How far our price sits below the competitor's (negative when we are more expensive).
pub fn derive_price_competitiveness(competitor_price: f64, production_cost: f64) -> f64 {
    competitor_price - production_cost
}

impl FeatureRecord {
    /// Fills in PriceCompetitiveness when it was not supplied. Total for any numeric input.
    pub fn resolve(self) -> CompleteFeatureRecord {
        let price_competitiveness = self.price_competitiveness.unwrap_or_else(|| {
            derive_price_competitiveness(self.competitor_price, self.production_cost)
        });

        CompleteFeatureRecord {
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
            price_competitiveness,
        }
    }

    /// True when resolving will compute PriceCompetitiveness rather than keep a supplied value
    pub fn needs_derivation(&self) -> bool {
        self.price_competitiveness.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::feature_record::{Promotion, Region};

    fn record(price_competitiveness: Option<f64>) -> FeatureRecord {
        FeatureRecord {
            product_category: "Furniture".to_string(),
            region: Region::East,
            customer_segment: "High Income".to_string(),
            is_promotion_applied: Promotion::Yes,
            production_cost: 536.05,
            marketing_spend: 189.27,
            seasonal_demand_index: 1.15,
            competitor_price: 220.83,
            customer_rating: 4.03,
            economic_index: 146.22,
            store_count: 52,
            price_competitiveness,
        }
    }

    #[test]
    fn test_missing_value_is_derived() {
        let resolved = record(None).resolve();
        assert!((resolved.price_competitiveness - (-315.22)).abs() < 1e-9);
    }

    #[test]
    fn test_supplied_value_is_kept() {
        let resolved = record(Some(-100.5)).resolve();
        assert_eq!(resolved.price_competitiveness, -100.5);
    }

    #[test]
    fn test_explicit_zero_is_not_treated_as_absent() {
        let input = record(Some(0.0));
        assert!(!input.needs_derivation());
        assert_eq!(input.resolve().price_competitiveness, 0.0);
    }

    #[test]
    fn test_derivation_over_a_grid() {
        for competitor in [0.0, 0.01, 12.5, 999.99, 1e6] {
            for cost in [0.0, 3.3, 250.0, 1e5] {
                let mut input = record(None);
                input.competitor_price = competitor;
                input.production_cost = cost;
                let resolved = input.resolve();
                assert!((resolved.price_competitiveness - (competitor - cost)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_other_fields_untouched() {
        let input = record(None);
        let resolved = input.clone().resolve();
        assert_eq!(resolved.product_category, input.product_category);
        assert_eq!(resolved.store_count, input.store_count);
        assert_eq!(resolved.customer_rating, input.customer_rating);
    }
}
