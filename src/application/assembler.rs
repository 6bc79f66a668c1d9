//! Feature assembly: InputRecord -> encoded feature vector.

use std::sync::Arc;

use crate::domain::{InputRecord, ModelError};
use crate::ports::CategoricalEncoder;

/// Fixed-width classifier input: encoder output, then numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatureVector(Vec<f64>);

impl EncodedFeatureVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds feature vectors with a shared, read-only encoder.
pub struct FeatureAssembler<E>
where
    E: CategoricalEncoder,
{
    encoder: Arc<E>,
}

impl<E> FeatureAssembler<E>
where
    E: CategoricalEncoder,
{
    pub fn new(encoder: Arc<E>) -> Self {
        Self { encoder }
    }

    /// Encode (Orchard, Variety) and append the numeric fields in model column order.
    ///
    /// # Errors
    /// Returns error if the encoder rejects the categorical values.
    pub fn assemble(&self, record: &InputRecord) -> Result<EncodedFeatureVector, ModelError> {
        let mut features = self.encoder.transform(&record.categorical_values())?;
        if features.len() != self.encoder.output_width() {
            return Err(ModelError::ShapeMismatch {
                expected: self.encoder.output_width(),
                actual: features.len(),
            });
        }
        features.extend(record.numeric_columns());

        tracing::debug!(
            "Assembled {} features ({} encoded, {} numeric)",
            features.len(),
            self.encoder.output_width(),
            record.schema().numeric_field_count()
        );

        Ok(EncodedFeatureVector(features))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{Measurements, VariantAMeasurements, VariantBMeasurements};

    /// Stub encoder returning a fixed marker block regardless of input.
    pub(crate) struct MarkerEncoder {
        pub marker: Vec<f64>,
    }

    impl CategoricalEncoder for MarkerEncoder {
        fn output_width(&self) -> usize {
            self.marker.len()
        }

        fn transform(&self, values: &[&str]) -> Result<Vec<f64>, ModelError> {
            if values.len() != 2 {
                return Err(ModelError::CategoricalArity {
                    expected: 2,
                    actual: values.len(),
                });
            }
            if values[1] == "Rejected" {
                return Err(ModelError::UnknownCategory {
                    column: "Variety".into(),
                    value: values[1].into(),
                });
            }
            Ok(self.marker.clone())
        }
    }

    fn marker_assembler() -> FeatureAssembler<MarkerEncoder> {
        FeatureAssembler::new(Arc::new(MarkerEncoder {
            marker: vec![-7.0, -8.0, -9.0],
        }))
    }

    #[test]
    fn test_encoded_block_precedes_numeric_fields() {
        let record = InputRecord::new(
            "Belvedere",
            "NP",
            Measurements::A(VariantAMeasurements {
                rain_total_ml: 1.0,
                rain_jan_mm: 2.0,
                rain_feb_mm: 3.0,
                rain_last_event_mm: 4.0,
                days_over_35c: 5,
                days_over_40c: 6,
                rainy_days: 7,
            }),
        );

        let vector = marker_assembler().assemble(&record).expect("Should assemble");
        assert_eq!(
            vector.as_slice(),
            &[-7.0, -8.0, -9.0, 6.0, 5.0, 1.0, 7.0, 4.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_variant_b_width() {
        let assembler = marker_assembler();
        let record = InputRecord::new(
            "Capay",
            "Butte",
            Measurements::B(VariantBMeasurements::default()),
        );
        let vector = assembler.assemble(&record).expect("Should assemble");
        // 3 marker columns + 6 numeric fields
        assert_eq!(vector.len(), 9);
    }

    #[test]
    fn test_deterministic() {
        let assembler = marker_assembler();
        let record = InputRecord::new(
            "Belvedere",
            "NP",
            Measurements::A(VariantAMeasurements::default()),
        );
        let a = assembler.assemble(&record).expect("Should assemble");
        let b = assembler.assemble(&record).expect("Should assemble");
        assert_eq!(a, b);
    }

    #[test]
    fn test_encoder_error_propagates() {
        let record = InputRecord::new(
            "Belvedere",
            "Rejected",
            Measurements::A(VariantAMeasurements::default()),
        );
        assert!(matches!(
            marker_assembler().assemble(&record),
            Err(ModelError::UnknownCategory { .. })
        ));
    }
}
