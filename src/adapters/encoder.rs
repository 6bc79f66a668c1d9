//! Encoder adapter: categorical encoders exported from the training pipeline.
//!
//! `encoder.json` carries the fitted categories per column and the encoding
//! scheme. Two schemes are supported:
//!
//! - `one_hot`: one indicator block per column, concatenated in column order
//! - `ordinal`: one category index per column
//!
//! ```json
//! {
//!   "kind": "one_hot",
//!   "handle_unknown": "ignore",
//!   "columns": [
//!     { "name": "Orchard", "categories": ["Belvedere", "Capay"] },
//!     { "name": "Variety", "categories": ["NP", "Monterey"] }
//!   ]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::ModelError;
use crate::ports::CategoricalEncoder;

/// One fitted categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedColumn {
    pub name: String,
    pub categories: Vec<String>,
}

impl EncodedColumn {
    fn position(&self, value: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == value)
    }
}

/// Behavior of the one-hot encoder for values unseen at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Reject the row
    #[default]
    Error,
    /// Emit an all-zero block for the column
    Ignore,
}

/// Encoder parameters exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedEncoder {
    OneHot {
        columns: Vec<EncodedColumn>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Ordinal {
        columns: Vec<EncodedColumn>,
        #[serde(default)]
        unknown_value: Option<f64>,
    },
}

impl ExportedEncoder {
    fn fitted_columns(&self) -> &[EncodedColumn] {
        match self {
            Self::OneHot { columns, .. } | Self::Ordinal { columns, .. } => columns,
        }
    }

    /// Check the fitted columns against the expected column names.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self, expected_columns: &[&str]) -> Result<(), String> {
        let columns = self.fitted_columns();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        if names != expected_columns {
            return Err(format!(
                "Encoder columns {names:?} do not match expected {expected_columns:?}"
            ));
        }

        for column in columns {
            if column.categories.is_empty() {
                return Err(format!("Encoder column {} has no categories", column.name));
            }
            let mut seen = HashSet::new();
            for category in &column.categories {
                if !seen.insert(category.as_str()) {
                    return Err(format!(
                        "Encoder column {} lists category {:?} twice",
                        column.name, category
                    ));
                }
            }
        }

        if let Self::Ordinal {
            unknown_value: Some(v),
            ..
        } = self
        {
            if !v.is_finite() {
                return Err("Ordinal unknown_value must be finite".into());
            }
        }

        Ok(())
    }

    fn unknown(column: &EncodedColumn, value: &str) -> ModelError {
        ModelError::UnknownCategory {
            column: column.name.clone(),
            value: value.to_string(),
        }
    }
}

impl CategoricalEncoder for ExportedEncoder {
    fn output_width(&self) -> usize {
        match self {
            Self::OneHot { columns, .. } => columns.iter().map(|c| c.categories.len()).sum(),
            Self::Ordinal { columns, .. } => columns.len(),
        }
    }

    fn transform(&self, values: &[&str]) -> Result<Vec<f64>, ModelError> {
        let columns = self.fitted_columns();
        if values.len() != columns.len() {
            return Err(ModelError::CategoricalArity {
                expected: columns.len(),
                actual: values.len(),
            });
        }

        let mut out = Vec::with_capacity(self.output_width());
        match self {
            Self::OneHot { handle_unknown, .. } => {
                for (column, value) in columns.iter().zip(values) {
                    let hot = match (column.position(value), handle_unknown) {
                        (Some(i), _) => Some(i),
                        (None, HandleUnknown::Ignore) => None,
                        (None, HandleUnknown::Error) => return Err(Self::unknown(column, value)),
                    };
                    out.extend((0..column.categories.len()).map(|i| {
                        if Some(i) == hot {
                            1.0
                        } else {
                            0.0
                        }
                    }));
                }
            }
            Self::Ordinal { unknown_value, .. } => {
                for (column, value) in columns.iter().zip(values) {
                    let encoded = match (column.position(value), unknown_value) {
                        (Some(i), _) => i as f64,
                        (None, Some(fallback)) => *fallback,
                        (None, None) => return Err(Self::unknown(column, value)),
                    };
                    out.push(encoded);
                }
            }
        }

        Ok(out)
    }

    fn categories(&self, column: &str) -> Option<&[String]> {
        self.fitted_columns()
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.categories.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::CATEGORICAL_COLUMNS;

    fn columns() -> Vec<EncodedColumn> {
        vec![
            EncodedColumn {
                name: "Orchard".into(),
                categories: vec!["Belvedere".into(), "Capay".into(), "Durham".into()],
            },
            EncodedColumn {
                name: "Variety".into(),
                categories: vec!["NP".into(), "Monterey".into()],
            },
        ]
    }

    fn one_hot(handle_unknown: HandleUnknown) -> ExportedEncoder {
        ExportedEncoder::OneHot {
            columns: columns(),
            handle_unknown,
        }
    }

    #[test]
    fn test_one_hot_transform() {
        let encoder = one_hot(HandleUnknown::Error);
        assert_eq!(encoder.output_width(), 5);
        let out = encoder.transform(&["Capay", "Monterey"]).expect("Should encode");
        assert_eq!(out, vec![0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_unknown_ignored() {
        let encoder = one_hot(HandleUnknown::Ignore);
        let out = encoder.transform(&["Nowhere", "NP"]).expect("Should encode");
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_one_hot_unknown_rejected() {
        let encoder = one_hot(HandleUnknown::Error);
        let err = encoder.transform(&["Belvedere", "Butte"]).unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownCategory {
                column: "Variety".into(),
                value: "Butte".into()
            }
        );
    }

    #[test]
    fn test_ordinal_transform() {
        let encoder = ExportedEncoder::Ordinal {
            columns: columns(),
            unknown_value: Some(-1.0),
        };
        assert_eq!(encoder.output_width(), 2);
        assert_eq!(
            encoder.transform(&["Durham", "Other"]).expect("Should encode"),
            vec![2.0, -1.0]
        );
    }

    #[test]
    fn test_arity_checked() {
        let encoder = one_hot(HandleUnknown::Ignore);
        assert_eq!(
            encoder.transform(&["Belvedere"]).unwrap_err(),
            ModelError::CategoricalArity {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_parse_exported_json() {
        let json = r#"{
            "kind": "one_hot",
            "handle_unknown": "ignore",
            "columns": [
                {"name": "Orchard", "categories": ["Belvedere"]},
                {"name": "Variety", "categories": ["NP", "Price"]}
            ]
        }"#;
        let encoder: ExportedEncoder = serde_json::from_str(json).expect("Should parse");
        assert!(encoder.validate(&CATEGORICAL_COLUMNS).is_ok());
        assert_eq!(
            encoder.categories("Variety"),
            Some(&["NP".to_string(), "Price".to_string()][..])
        );
    }

    #[test]
    fn test_validate_rejects_bad_columns() {
        let swapped = ExportedEncoder::Ordinal {
            columns: columns().into_iter().rev().collect(),
            unknown_value: None,
        };
        assert!(swapped.validate(&CATEGORICAL_COLUMNS).is_err());

        let mut dup = columns();
        dup[1].categories.push("NP".into());
        let dup = ExportedEncoder::OneHot {
            columns: dup,
            handle_unknown: HandleUnknown::Error,
        };
        assert!(dup.validate(&CATEGORICAL_COLUMNS).is_err());
    }
}
