//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the artifact formats produced by the offline
//! training pipeline:
//! - `encoder`: one-hot / ordinal categorical encoders
//! - `classifier`: logistic regression / random forest classifiers
//! - `loader`: startup loading, digest verification and compatibility checks

pub mod classifier;
pub mod encoder;
pub mod loader;

// Re-export artifact error for lib.rs
pub use loader::ArtifactError;
