//! Assessment records for hull rot risk prediction.
//!
//! One record per submission: two categorical attributes plus the numeric
//! measurements of the active schema version.

use serde::{Deserialize, Serialize};

use super::schema::{NumericKind, SchemaVersion};

/// Upper bound accepted for any rain measurement.
pub const MAX_RAIN: f64 = 10_000.0;

/// Upper bound accepted for any day count.
pub const MAX_DAYS: u32 = 366;

/// Variant A measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAMeasurements {
    /// Total rain since January (ml)
    pub rain_total_ml: f64,

    /// Rain in January (mm)
    pub rain_jan_mm: f64,

    /// Rain in February (mm)
    pub rain_feb_mm: f64,

    /// Rain in the last event, within 5 days (mm)
    pub rain_last_event_mm: f64,

    /// Days with a maximum above 35°C
    pub days_over_35c: u32,

    /// Days with a maximum above 40°C
    pub days_over_40c: u32,

    /// Rainy days since January
    pub rainy_days: u32,
}

impl Default for VariantAMeasurements {
    fn default() -> Self {
        Self {
            rain_total_ml: 20.0,
            rain_jan_mm: 10.0,
            rain_feb_mm: 5.0,
            rain_last_event_mm: 2.0,
            days_over_35c: 8,
            days_over_40c: 3,
            rainy_days: 5,
        }
    }
}

impl VariantAMeasurements {
    /// Values in record order (see `VARIANT_A_FIELDS`).
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.rain_total_ml,
            self.rain_jan_mm,
            self.rain_feb_mm,
            self.rain_last_event_mm,
            f64::from(self.days_over_35c),
            f64::from(self.days_over_40c),
            f64::from(self.rainy_days),
        ]
    }

    /// Values in the column order the classifier was trained on.
    #[must_use]
    pub fn model_columns(&self) -> Vec<f64> {
        vec![
            f64::from(self.days_over_40c),
            f64::from(self.days_over_35c),
            self.rain_total_ml,
            f64::from(self.rainy_days),
            self.rain_last_event_mm,
            self.rain_jan_mm,
            self.rain_feb_mm,
        ]
    }

    /// Create measurements from values in record order.
    ///
    /// # Errors
    /// Returns error if the vector length is not 7 or a day count is not a whole number.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        let specs = SchemaVersion::A.numeric_fields();
        if v.len() != specs.len() {
            return Err(format!("Expected {} values, got {}", specs.len(), v.len()));
        }

        Ok(Self {
            rain_total_ml: v[0],
            rain_jan_mm: v[1],
            rain_feb_mm: v[2],
            rain_last_event_mm: v[3],
            days_over_35c: day_count(specs[4].label, v[4])?,
            days_over_40c: day_count(specs[5].label, v[5])?,
            rainy_days: day_count(specs[6].label, v[6])?,
        })
    }
}

/// Variant B measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantBMeasurements {
    /// Total rain since January (mm)
    pub rain_total_mm: f64,

    /// Rain from March to May (mm)
    pub rain_spring_mm: f64,

    /// Rain in the last event, within 5 days (mm)
    pub rain_last_event_mm: f64,

    /// Rainy days since January
    pub rainy_days: u32,

    /// Rainy days from March to May
    pub rainy_days_spring: u32,

    /// Days since the last rain
    pub days_since_rain: u32,
}

impl Default for VariantBMeasurements {
    fn default() -> Self {
        Self {
            rain_total_mm: 20.0,
            rain_spring_mm: 8.0,
            rain_last_event_mm: 2.0,
            rainy_days: 5,
            rainy_days_spring: 2,
            days_since_rain: 7,
        }
    }
}

impl VariantBMeasurements {
    /// Values in record order (see `VARIANT_B_FIELDS`).
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.rain_total_mm,
            self.rain_spring_mm,
            self.rain_last_event_mm,
            f64::from(self.rainy_days),
            f64::from(self.rainy_days_spring),
            f64::from(self.days_since_rain),
        ]
    }

    /// Values in the column order the classifier was trained on.
    #[must_use]
    pub fn model_columns(&self) -> Vec<f64> {
        vec![
            f64::from(self.rainy_days),
            f64::from(self.rainy_days_spring),
            f64::from(self.days_since_rain),
            self.rain_total_mm,
            self.rain_spring_mm,
            self.rain_last_event_mm,
        ]
    }

    /// Create measurements from values in record order.
    ///
    /// # Errors
    /// Returns error if the vector length is not 6 or a day count is not a whole number.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        let specs = SchemaVersion::B.numeric_fields();
        if v.len() != specs.len() {
            return Err(format!("Expected {} values, got {}", specs.len(), v.len()));
        }

        Ok(Self {
            rain_total_mm: v[0],
            rain_spring_mm: v[1],
            rain_last_event_mm: v[2],
            rainy_days: day_count(specs[3].label, v[3])?,
            rainy_days_spring: day_count(specs[4].label, v[4])?,
            days_since_rain: day_count(specs[5].label, v[5])?,
        })
    }
}

fn day_count(label: &str, value: f64) -> Result<u32, String> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(format!("{label}: {value} is not a whole number of days"));
    }
    Ok(value as u32)
}

/// Numeric part of a record, one variant per schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Measurements {
    A(VariantAMeasurements),
    B(VariantBMeasurements),
}

impl Measurements {
    /// Default measurements for a schema version.
    #[must_use]
    pub fn defaults(schema: SchemaVersion) -> Self {
        match schema {
            SchemaVersion::A => Self::A(VariantAMeasurements::default()),
            SchemaVersion::B => Self::B(VariantBMeasurements::default()),
        }
    }

    /// Build measurements of `schema` from values in record order.
    ///
    /// # Errors
    /// Returns error if the values do not fit the schema.
    pub fn from_vec(schema: SchemaVersion, v: &[f64]) -> Result<Self, String> {
        match schema {
            SchemaVersion::A => VariantAMeasurements::from_vec(v).map(Self::A),
            SchemaVersion::B => VariantBMeasurements::from_vec(v).map(Self::B),
        }
    }

    #[must_use]
    pub fn schema(&self) -> SchemaVersion {
        match self {
            Self::A(_) => SchemaVersion::A,
            Self::B(_) => SchemaVersion::B,
        }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Self::A(m) => m.to_vec(),
            Self::B(m) => m.to_vec(),
        }
    }

    #[must_use]
    pub fn model_columns(&self) -> Vec<f64> {
        match self {
            Self::A(m) => m.model_columns(),
            Self::B(m) => m.model_columns(),
        }
    }
}

/// One assessment instance entered through the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub orchard: String,
    pub variety: String,
    pub measurements: Measurements,
}

impl InputRecord {
    #[must_use]
    pub fn new(
        orchard: impl Into<String>,
        variety: impl Into<String>,
        measurements: Measurements,
    ) -> Self {
        Self {
            orchard: orchard.into(),
            variety: variety.into(),
            measurements,
        }
    }

    #[must_use]
    pub fn schema(&self) -> SchemaVersion {
        self.measurements.schema()
    }

    /// Categorical values in encoder column order (Orchard, Variety).
    #[must_use]
    pub fn categorical_values(&self) -> [&str; 2] {
        [self.orchard.as_str(), self.variety.as_str()]
    }

    /// Numeric values in the classifier's column order.
    #[must_use]
    pub fn numeric_columns(&self) -> Vec<f64> {
        self.measurements.model_columns()
    }

    /// Validate that all fields are within accepted ranges.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.orchard.trim().is_empty() {
            errors.push("Orchard must not be empty".to_string());
        }
        if self.variety.trim().is_empty() {
            errors.push("Variety must not be empty".to_string());
        }

        let specs = self.schema().numeric_fields();
        for (spec, value) in specs.iter().zip(self.measurements.to_vec()) {
            match spec.kind {
                NumericKind::Rain => {
                    if !value.is_finite() || !(0.0..=MAX_RAIN).contains(&value) {
                        errors.push(format!(
                            "{} {} out of range [0, {}]",
                            spec.label, value, MAX_RAIN
                        ));
                    }
                }
                NumericKind::DayCount => {
                    if value > f64::from(MAX_DAYS) {
                        errors.push(format!(
                            "{} {} out of range [0, {}]",
                            spec.label, value, MAX_DAYS
                        ));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn belvedere() -> InputRecord {
        InputRecord::new(
            "Belvedere",
            "NP",
            Measurements::A(VariantAMeasurements::default()),
        )
    }

    #[test]
    fn test_variant_a_model_column_order() {
        let m = VariantAMeasurements {
            rain_total_ml: 1.0,
            rain_jan_mm: 2.0,
            rain_feb_mm: 3.0,
            rain_last_event_mm: 4.0,
            days_over_35c: 5,
            days_over_40c: 6,
            rainy_days: 7,
        };
        assert_eq!(m.model_columns(), vec![6.0, 5.0, 1.0, 7.0, 4.0, 2.0, 3.0]);
        assert_eq!(m.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_variant_b_model_column_order() {
        let m = VariantBMeasurements {
            rain_total_mm: 1.0,
            rain_spring_mm: 2.0,
            rain_last_event_mm: 3.0,
            rainy_days: 4,
            rainy_days_spring: 5,
            days_since_rain: 6,
        };
        assert_eq!(m.model_columns(), vec![4.0, 5.0, 6.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_defaults_match_field_specs() {
        for schema in [SchemaVersion::A, SchemaVersion::B] {
            let defaults: Vec<f64> = schema.numeric_fields().iter().map(|f| f.default).collect();
            assert_eq!(Measurements::defaults(schema).to_vec(), defaults);
        }
    }

    #[test]
    fn test_from_vec_roundtrip() {
        let v = vec![20.0, 10.0, 5.0, 2.0, 8.0, 3.0, 5.0];
        let m = Measurements::from_vec(SchemaVersion::A, &v).expect("Should parse");
        assert_eq!(m, Measurements::A(VariantAMeasurements::default()));
    }

    #[test]
    fn test_from_vec_rejects_fractional_days() {
        let v = vec![20.0, 10.0, 5.0, 2.0, 8.5, 3.0, 5.0];
        let err = Measurements::from_vec(SchemaVersion::A, &v).unwrap_err();
        assert!(err.contains("Days Over 35°C"));
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Measurements::from_vec(SchemaVersion::B, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(belvedere().validate().is_ok());

        let mut invalid = belvedere();
        invalid.orchard = "  ".to_string();
        if let Measurements::A(m) = &mut invalid.measurements {
            m.rain_jan_mm = -1.0;
            m.rainy_days = 400;
        }
        let errors = invalid.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_categorical_values_order() {
        assert_eq!(belvedere().categorical_values(), ["Belvedere", "NP"]);
    }
}
