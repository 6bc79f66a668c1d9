//! Encoder port: Trait for the externally trained categorical encoder.
//!
//! The encoding scheme (one-hot, ordinal, ...) is a property of the artifact.
//! Callers rely only on the contract below.

use crate::domain::ModelError;

/// Trait for categorical encoding.
///
/// Implementations guarantee:
/// - `transform` is deterministic for a given artifact
/// - the output length is always `output_width()`
/// - values are consumed in column order (Orchard, Variety)
pub trait CategoricalEncoder: Send + Sync {
    /// Number of numeric columns produced by `transform`.
    fn output_width(&self) -> usize;

    /// Encode one row of categorical values.
    ///
    /// # Errors
    /// Returns `ModelError::CategoricalArity` if the value count differs from the column count.
    /// Returns `ModelError::UnknownCategory` if a value was not seen at fit time and the
    /// artifact does not tolerate unknowns.
    fn transform(&self, values: &[&str]) -> Result<Vec<f64>, ModelError>;

    /// Fitted categories of `column`, when the artifact exposes them.
    fn categories(&self, _column: &str) -> Option<&[String]> {
        None
    }
}
