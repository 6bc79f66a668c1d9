//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! Records are serializable and implement strict validation.

mod error;
mod prediction;
mod record;
pub mod schema;

pub use error::ModelError;
pub use prediction::{PredictionResult, RiskThresholds, RiskTier};
pub use record::{
    InputRecord, Measurements, VariantAMeasurements, VariantBMeasurements, MAX_DAYS, MAX_RAIN,
};
pub use schema::{NumericFieldSpec, NumericKind, SchemaVersion};
