//! Ports layer: Trait definitions for external artifacts.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the offline-trained model artifacts.

mod classifier;
mod encoder;

pub use classifier::ProbabilityClassifier;
pub use encoder::CategoricalEncoder;
