//! Runtime configuration from `HULLROT_*` environment variables.
//!
//! | Variable             | Default       |
//! |----------------------|---------------|
//! | `HULLROT_MODEL_DIR`  | `models`      |
//! | `HULLROT_SCHEMA`     | `a`           |
//! | `HULLROT_EXPORT_DIR` | `.`           |
//! | `HULLROT_LOG_MODE`   | `auto`        |
//! | `HULLROT_LOG_FILE`   | `hullrot.log` |

use std::path::PathBuf;

use crate::domain::SchemaVersion;
use crate::HullRotError;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(&self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

impl std::str::FromStr for LogMode {
    type Err = HullRotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(HullRotError::Config(format!(
                "Unknown log mode '{other}' (expected auto, file or stdout)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding `encoder.json` and `hr_risk_model.json`
    pub model_dir: PathBuf,
    pub schema: SchemaVersion,
    /// Directory the CSV export is written to
    pub export_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            schema: SchemaVersion::A,
            export_dir: PathBuf::from("."),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("hullrot.log"),
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unrecognized value.
    pub fn from_env() -> Result<Self, HullRotError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset or blank variables keep their default.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unrecognized value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HullRotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get("HULLROT_MODEL_DIR") {
            config.model_dir = PathBuf::from(dir);
        }
        if let Some(schema) = get("HULLROT_SCHEMA") {
            config.schema = schema
                .parse()
                .map_err(|e| HullRotError::Config(format!("HULLROT_SCHEMA: {e}")))?;
        }
        if let Some(dir) = get("HULLROT_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(mode) = get("HULLROT_LOG_MODE") {
            config.log_mode = mode.parse()?;
        }
        if let Some(file) = get("HULLROT_LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("Should load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.schema, SchemaVersion::A);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HULLROT_MODEL_DIR", "/srv/models/b"),
            ("HULLROT_SCHEMA", "variant_b"),
            ("HULLROT_EXPORT_DIR", "/tmp/out"),
            ("HULLROT_LOG_MODE", "STDOUT"),
            ("HULLROT_LOG_FILE", "/var/log/hullrot.log"),
        ]))
        .expect("Should load");

        assert_eq!(config.model_dir, PathBuf::from("/srv/models/b"));
        assert_eq!(config.schema, SchemaVersion::B);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/var/log/hullrot.log"));
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config =
            AppConfig::from_lookup(lookup(&[("HULLROT_SCHEMA", "  ")])).expect("Should load");
        assert_eq!(config.schema, SchemaVersion::A);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("HULLROT_SCHEMA", "c")])),
            Err(HullRotError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("HULLROT_LOG_MODE", "syslog")])),
            Err(HullRotError::Config(_))
        ));
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
