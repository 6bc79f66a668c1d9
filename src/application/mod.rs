//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assembler;
mod export;
mod inference;

pub use assembler::{EncodedFeatureVector, FeatureAssembler};
pub use export::{ExportRow, ResultExporter, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
pub use inference::{Assessment, RiskService};
