pub mod derivation;
pub mod feature_record;
pub mod prediction;
pub mod validation;

pub use feature_record::{CompleteFeatureRecord, FeatureRecord, Promotion, Region};
pub use prediction::PredictionResult;
pub use validation::SchemaValidator;
