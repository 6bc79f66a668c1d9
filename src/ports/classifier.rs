//! Classifier port: Trait for the externally trained binary classifier.

use crate::domain::ModelError;

/// Trait for probabilistic binary classification.
pub trait ProbabilityClassifier: Send + Sync {
    /// Width of the feature vector the classifier was trained on.
    fn n_features(&self) -> usize;

    /// Probability of class 1 for one feature vector.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if `features.len() != n_features()`.
    /// Returns `ModelError::NonFiniteFeature` if any feature is NaN or infinite.
    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError>;
}
