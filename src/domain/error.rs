//! Errors raised by encoder and classifier calls.

/// Error type for a single encode or predict call.
///
/// These are per-request failures: the pipeline stays usable afterwards.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Expected {expected} categorical values, got {actual}")]
    CategoricalArity { expected: usize, actual: usize },

    #[error("Unknown category {value:?} for column {column}")]
    UnknownCategory { column: String, value: String },

    #[error("Feature vector has {actual} columns, classifier expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Feature {index} is not a finite number")]
    NonFiniteFeature { index: usize },

    #[error("Classifier returned an invalid probability: {0}")]
    InvalidProbability(f64),
}
