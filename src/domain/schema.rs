//! Schema versions of the assessment form.
//!
//! Two feature layouts were trained against. Each version fixes the numeric
//! field set, its labels and defaults, and the tier thresholds.

use serde::{Deserialize, Serialize};

use super::prediction::RiskThresholds;

/// Column name of the first categorical attribute, as fitted by the encoder.
pub const ORCHARD_COLUMN: &str = "Orchard";

/// Column name of the second categorical attribute, as fitted by the encoder.
pub const VARIETY_COLUMN: &str = "Variety";

/// Categorical columns in the order they are passed to the encoder.
pub const CATEGORICAL_COLUMNS: [&str; 2] = [ORCHARD_COLUMN, VARIETY_COLUMN];

/// Varieties offered by the Variant A form.
pub const VARIANT_A_VARIETIES: [&str; 5] = ["NP", "Monterey", "Carina", "Price", "Unknown"];

/// How a numeric field is entered and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Rain amount in mm or ml
    Rain,
    /// Whole number of days
    DayCount,
}

/// Static description of one numeric input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericFieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: NumericKind,
    pub default: f64,
}

const fn rain(key: &'static str, label: &'static str, default: f64) -> NumericFieldSpec {
    NumericFieldSpec {
        key,
        label,
        kind: NumericKind::Rain,
        default,
    }
}

const fn days(key: &'static str, label: &'static str, default: f64) -> NumericFieldSpec {
    NumericFieldSpec {
        key,
        label,
        kind: NumericKind::DayCount,
        default,
    }
}

/// Variant A numeric fields, in record (form and export) order.
pub const VARIANT_A_FIELDS: [NumericFieldSpec; 7] = [
    rain("rain_total_ml", "Total Rain Since Jan (ml)", 20.0),
    rain("rain_jan_mm", "Rain in January (mm)", 10.0),
    rain("rain_feb_mm", "Rain in February (mm)", 5.0),
    rain("rain_last_event_mm", "Rain in Last Event (<5 days) (mm)", 2.0),
    days("days_over_35c", "Days Over 35°C", 8.0),
    days("days_over_40c", "Days Over 40°C", 3.0),
    days("rainy_days", "No. of Rainy Days Since Jan", 5.0),
];

/// Variant B numeric fields, in record (form and export) order.
pub const VARIANT_B_FIELDS: [NumericFieldSpec; 6] = [
    rain("rain_total_mm", "Total Rain Since Jan (mm)", 20.0),
    rain("rain_spring_mm", "Rain in Spring (Mar-May) (mm)", 8.0),
    rain("rain_last_event_mm", "Rain in Last Event (<5 days) (mm)", 2.0),
    days("rainy_days", "No. of Rainy Days Since Jan", 5.0),
    days("rainy_days_spring", "No. of Rainy Days in Spring", 2.0),
    days("days_since_rain", "Days Since Last Rain", 7.0),
];

/// One of the two trained feature layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Free-text orchard, 5 varieties, 7 numeric fields, tiers at 0.2 / 0.5
    A,
    /// Enumerated orchards and varieties, 6 numeric fields, tiers at 0.3 / 0.6
    B,
}

impl SchemaVersion {
    /// Numeric fields in record order.
    #[must_use]
    pub fn numeric_fields(&self) -> &'static [NumericFieldSpec] {
        match self {
            Self::A => &VARIANT_A_FIELDS,
            Self::B => &VARIANT_B_FIELDS,
        }
    }

    #[must_use]
    pub fn numeric_field_count(&self) -> usize {
        self.numeric_fields().len()
    }

    #[must_use]
    pub fn thresholds(&self) -> RiskThresholds {
        match self {
            Self::A => RiskThresholds::new(0.2, 0.5),
            Self::B => RiskThresholds::new(0.3, 0.6),
        }
    }

    /// Whether the orchard is typed freely rather than picked from the encoder's categories.
    #[must_use]
    pub fn free_text_orchard(&self) -> bool {
        matches!(self, Self::A)
    }

    /// Default orchard for free-text forms.
    #[must_use]
    pub fn default_orchard(&self) -> Option<&'static str> {
        match self {
            Self::A => Some("Belvedere"),
            Self::B => None,
        }
    }

    /// Fixed variety list; `None` means the list comes from the encoder artifact.
    #[must_use]
    pub fn fixed_varieties(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::A => Some(&VARIANT_A_VARIETIES),
            Self::B => None,
        }
    }

    /// Whether the result screen draws the banded 0-100 gauge.
    #[must_use]
    pub fn shows_gauge(&self) -> bool {
        matches!(self, Self::B)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "variant_a" => Ok(Self::A),
            "b" | "variant_b" => Ok(Self::B),
            other => Err(format!("Unknown schema version {other:?} (expected a or b)")),
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "Variant A"),
            Self::B => write!(f, "Variant B"),
        }
    }
}
