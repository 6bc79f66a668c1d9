//! # HullRot
//!
//! Almond hull rot risk predictor.
//!
//! This crate provides:
//! - Loading of an externally trained categorical encoder and binary classifier
//! - Deterministic feature assembly from one orchard/weather record
//! - Traffic-light risk tiers and a single-row CSV export
//! - Terminal UI data-entry form
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (records, schema versions, risk tiers)
//! - `ports`: Trait definitions for the encoder and classifier artifacts
//! - `adapters`: Concrete artifact formats and the startup loader
//! - `application`: Feature assembly, risk prediction and export
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{InputRecord, PredictionResult, RiskTier, SchemaVersion};

/// Result type for HullRot operations
pub type Result<T> = std::result::Result<T, HullRotError>;

/// Main error type for HullRot
#[derive(Debug, thiserror::Error)]
pub enum HullRotError {
    #[error("Artifact loading failed: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Model call failed: {0}")]
    Model(#[from] domain::ModelError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
