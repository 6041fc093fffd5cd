use super::feature_record::{FeatureRecord, Promotion, Region};
use crate::domain::errors::ValidationReport;
use crate::domain::ml::feature_registry::{
    COMPETITOR_PRICE, CUSTOMER_RATING, CUSTOMER_SEGMENT, ECONOMIC_INDEX, FEATURE_NAMES,
    IS_PROMOTION_APPLIED, MARKETING_SPEND, PRICE_COMPETITIVENESS, PRODUCT_CATEGORY,
    PRODUCTION_COST, REGION, SEASONAL_DEMAND_INDEX, STORE_COUNT,
};
use serde_json::{Map, Value};
use tracing::debug;

const FIELD_REQUIRED: &str = "field required";

/// Numeric bound a field must satisfy
#[derive(Debug, Clone, Copy)]
enum Bound {
    NonNegative,
    Positive,
    Between(f64, f64),
}

impl Bound {
    fn check(self, value: f64) -> Result<(), String> {
        match self {
            Bound::NonNegative if value < 0.0 => Err("must be >= 0".to_string()),
            Bound::Positive if value <= 0.0 => Err("must be > 0".to_string()),
            Bound::Between(lo, hi) if value < lo || value > hi => {
                Err(format!("must be between {} and {}", lo, hi))
            }
            _ => Ok(()),
        }
    }
}

/// Turns a raw transport payload into a typed [`FeatureRecord`].
///
/// Rejects data that is missing, of the wrong type, or outside the declared
/// bounds. All violations are collected so the caller sees every offending
/// field at once. Numeric strings and integral floats are coerced the way a
/// lax JSON schema would; unknown extra keys are ignored.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates any JSON value; anything other than an object is rejected as `body`.
    pub fn validate_value(payload: &Value) -> Result<FeatureRecord, ValidationReport> {
        match payload.as_object() {
            Some(map) => Self::validate(map),
            None => {
                let mut report = ValidationReport::default();
                report.push("body", "expected a JSON object");
                Err(report)
            }
        }
    }

    pub fn validate(payload: &Map<String, Value>) -> Result<FeatureRecord, ValidationReport> {
        let mut report = ValidationReport::default();

        let product_category = required_string(payload, PRODUCT_CATEGORY, &mut report);
        let region = required_string(payload, REGION, &mut report).and_then(|label| {
            let region = Region::from_label(label.trim());
            if region.is_none() {
                report.push(REGION, "must be one of North, South, East, West");
            }
            region
        });
        let customer_segment = required_string(payload, CUSTOMER_SEGMENT, &mut report);
        let is_promotion_applied =
            required_string(payload, IS_PROMOTION_APPLIED, &mut report).and_then(|label| {
                let promotion = Promotion::from_label(label.trim());
                if promotion.is_none() {
                    report.push(IS_PROMOTION_APPLIED, "must be Yes or No");
                }
                promotion
            });

        let production_cost =
            required_number(payload, PRODUCTION_COST, Bound::NonNegative, &mut report);
        let marketing_spend =
            required_number(payload, MARKETING_SPEND, Bound::NonNegative, &mut report);
        let seasonal_demand_index =
            required_number(payload, SEASONAL_DEMAND_INDEX, Bound::Positive, &mut report);
        let competitor_price =
            required_number(payload, COMPETITOR_PRICE, Bound::NonNegative, &mut report);
        let customer_rating =
            required_number(payload, CUSTOMER_RATING, Bound::Between(1.0, 5.0), &mut report);
        let economic_index =
            required_number(payload, ECONOMIC_INDEX, Bound::NonNegative, &mut report);
        let store_count = required_count(payload, STORE_COUNT, &mut report);
        let price_competitiveness = optional_number(payload, PRICE_COMPETITIVENESS, &mut report);

        for key in payload.keys() {
            if !FEATURE_NAMES.contains(&key.as_str()) {
                debug!("Ignoring unknown payload field '{}'", key);
            }
        }

        let (
            Some(product_category),
            Some(region),
            Some(customer_segment),
            Some(is_promotion_applied),
            Some(production_cost),
            Some(marketing_spend),
            Some(seasonal_demand_index),
            Some(competitor_price),
            Some(customer_rating),
            Some(economic_index),
            Some(store_count),
            Some(price_competitiveness),
        ) = (
            product_category,
            region,
            customer_segment,
            is_promotion_applied,
            production_cost,
            marketing_spend,
            seasonal_demand_index,
            competitor_price,
            customer_rating,
            economic_index,
            store_count,
            price_competitiveness,
        )
        else {
            return Err(report);
        };

        if !report.is_empty() {
            return Err(report);
        }

        Ok(FeatureRecord {
            product_category,
            region,
            customer_segment,
            is_promotion_applied,
            production_cost,
            marketing_spend,
            seasonal_demand_index,
            competitor_price,
            customer_rating,
            economic_index,
            store_count,
            price_competitiveness,
        })
    }
}

/// Present, non-null string, kept verbatim. Free-form labels may be empty.
fn required_string(
    payload: &Map<String, Value>,
    field: &str,
    report: &mut ValidationReport,
) -> Option<String> {
    match payload.get(field) {
        None | Some(Value::Null) => {
            report.push(field, FIELD_REQUIRED);
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            report.push(field, "expected a string");
            None
        }
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn checked_number(value: &Value, field: &str, report: &mut ValidationReport) -> Option<f64> {
    match coerce_number(value) {
        Some(n) if n.is_finite() => Some(n),
        Some(_) => {
            report.push(field, "must be a finite number");
            None
        }
        None => {
            report.push(field, "expected a number");
            None
        }
    }
}

fn required_number(
    payload: &Map<String, Value>,
    field: &str,
    bound: Bound,
    report: &mut ValidationReport,
) -> Option<f64> {
    let value = match payload.get(field) {
        None | Some(Value::Null) => {
            report.push(field, FIELD_REQUIRED);
            return None;
        }
        Some(value) => value,
    };

    let number = checked_number(value, field, report)?;
    match bound.check(number) {
        Ok(()) => Some(number),
        Err(reason) => {
            report.push(field, reason);
            None
        }
    }
}

/// Outer `None` means the field was invalid; `Some(None)` means it was absent or null.
fn optional_number(
    payload: &Map<String, Value>,
    field: &str,
    report: &mut ValidationReport,
) -> Option<Option<f64>> {
    match payload.get(field) {
        None | Some(Value::Null) => Some(None),
        Some(value) => {
            let number = checked_number(value, field, report)?;
            Some(Some(number))
        }
    }
}

/// Positive integer. Accepts `52`, `52.0` and `"52"`; rejects `52.5` and `0`.
fn required_count(
    payload: &Map<String, Value>,
    field: &str,
    report: &mut ValidationReport,
) -> Option<u32> {
    let value = match payload.get(field) {
        None | Some(Value::Null) => {
            report.push(field, FIELD_REQUIRED);
            return None;
        }
        Some(value) => value,
    };

    let number = match coerce_number(value) {
        Some(n) if n.is_finite() && n.fract() == 0.0 => n,
        _ => {
            report.push(field, "expected an integer");
            return None;
        }
    };

    if number <= 0.0 {
        report.push(field, "must be a positive integer");
        return None;
    }
    if number > f64::from(u32::MAX) {
        report.push(field, "is too large");
        return None;
    }

    Some(number as u32)
}
