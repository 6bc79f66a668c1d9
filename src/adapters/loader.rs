//! Artifact loader: startup deserialization of the encoder and classifier.
//!
//! The artifact directory holds two files with fixed names:
//! - `encoder.json`: fitted categorical encoder (see `adapters::encoder`)
//! - `hr_risk_model.json`: binary classifier (see `adapters::classifier`)
//!
//! An optional `manifest.json` binds both files by SHA-256 digest. When it is
//! present every listed digest must match; when absent a warning is logged.
//!
//! Any failure here is fatal: the caller must not accept input afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::classifier::ExportedClassifier;
use crate::adapters::encoder::ExportedEncoder;
use crate::domain::schema::CATEGORICAL_COLUMNS;
use crate::domain::SchemaVersion;
use crate::ports::{CategoricalEncoder, ProbabilityClassifier};

/// File name of the encoder artifact.
pub const ENCODER_FILE: &str = "encoder.json";

/// File name of the classifier artifact.
pub const CLASSIFIER_FILE: &str = "hr_risk_model.json";

/// File name of the optional integrity manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Supported manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    #[error("Artifact not found: {0:?}")]
    Missing(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Integrity check failed: {0}")]
    Integrity(String),

    #[error("Incompatible {artifact}: {reason}")]
    Incompatible {
        artifact: &'static str,
        reason: String,
    },
}

/// Digest manifest written by the `write_manifest` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    /// Unix timestamp (seconds) when the manifest was written.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// File name -> lowercase hex SHA-256 digest.
    pub files: BTreeMap<String, String>,
}

/// Lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Encoder and classifier, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub encoder: Arc<ExportedEncoder>,
    pub classifier: Arc<ExportedClassifier>,
}

/// Loads and cross-checks the two artifacts for one schema version.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    dir: PathBuf,
    schema: SchemaVersion,
}

impl ArtifactLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, schema: SchemaVersion) -> Self {
        Self {
            dir: dir.into(),
            schema,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load, verify and cross-check both artifacts.
    ///
    /// # Errors
    /// Returns error if either artifact is missing, corrupt, fails the manifest
    /// check, or does not fit the schema version.
    pub fn load(&self) -> Result<LoadedArtifacts, ArtifactError> {
        if !self.dir.is_dir() {
            return Err(ArtifactError::DirectoryNotFound(self.dir.clone()));
        }

        // Each artifact is read once; the digest and the parse see the same bytes.
        let encoder_path = self.dir.join(ENCODER_FILE);
        let classifier_path = self.dir.join(CLASSIFIER_FILE);
        let encoder_bytes = read_bytes(&encoder_path)?;
        let classifier_bytes = read_bytes(&classifier_path)?;

        self.verify_manifest(&[
            (ENCODER_FILE, encoder_bytes.as_slice()),
            (CLASSIFIER_FILE, classifier_bytes.as_slice()),
        ])?;

        let encoder: ExportedEncoder = parse_json(&encoder_path, &encoder_bytes)?;
        encoder
            .validate(&CATEGORICAL_COLUMNS)
            .map_err(|reason| ArtifactError::Incompatible {
                artifact: ENCODER_FILE,
                reason,
            })?;

        let classifier: ExportedClassifier = parse_json(&classifier_path, &classifier_bytes)?;
        classifier
            .validate()
            .map_err(|reason| ArtifactError::Incompatible {
                artifact: CLASSIFIER_FILE,
                reason,
            })?;

        let numeric = self.schema.numeric_field_count();
        let expected = encoder.output_width() + numeric;
        if classifier.n_features() != expected {
            return Err(ArtifactError::Incompatible {
                artifact: CLASSIFIER_FILE,
                reason: format!(
                    "classifier expects {} features, but the encoder produces {} columns and {} has {} numeric fields ({} total)",
                    classifier.n_features(),
                    encoder.output_width(),
                    self.schema,
                    numeric,
                    expected
                ),
            });
        }

        tracing::info!(
            dir = %self.dir.display(),
            schema = %self.schema,
            encoder_width = encoder.output_width(),
            classifier = %classifier.describe(),
            "Loaded model artifacts"
        );

        Ok(LoadedArtifacts {
            encoder: Arc::new(encoder),
            classifier: Arc::new(classifier),
        })
    }

    /// Check `artifacts` (name, bytes already read) and any other listed file against the manifest.
    fn verify_manifest(&self, artifacts: &[(&str, &[u8])]) -> Result<(), ArtifactError> {
        let manifest_path = self.dir.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            tracing::warn!(
                "No {} in {:?}; loading artifacts without digest verification",
                MANIFEST_FILE,
                self.dir
            );
            return Ok(());
        }

        let manifest: ArtifactManifest = parse_json(&manifest_path, &read_bytes(&manifest_path)?)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactError::Integrity(format!(
                "Unsupported manifest version: {}",
                manifest.version
            )));
        }

        for required in [ENCODER_FILE, CLASSIFIER_FILE] {
            if !manifest.files.contains_key(required) {
                return Err(ArtifactError::Integrity(format!(
                    "{MANIFEST_FILE} does not bind {required}"
                )));
            }
        }

        for (rel, expected_hex) in &manifest.files {
            if rel.contains(['/', '\\']) || rel == ".." {
                return Err(ArtifactError::Integrity(format!(
                    "{MANIFEST_FILE} references a path outside the artifact directory: {rel}"
                )));
            }
            let digest = match artifacts.iter().find(|(name, _)| *name == rel.as_str()) {
                Some((_, bytes)) => sha256_hex(bytes),
                None => sha256_hex(&read_bytes(&self.dir.join(rel))?),
            };
            if !digest.eq_ignore_ascii_case(expected_hex.trim()) {
                return Err(ArtifactError::Integrity(format!(
                    "File hash mismatch for {rel}"
                )));
            }
        }

        tracing::info!("Artifact digests verified against {}", MANIFEST_FILE);
        Ok(())
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing(path.to_path_buf())
        } else {
            ArtifactError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn parse_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
