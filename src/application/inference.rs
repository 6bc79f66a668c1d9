//! Risk service: Orchestrates one hull rot prediction.
//!
//! This service coordinates:
//! - Record validation against the active schema version
//! - Feature assembly
//! - The classifier call
//! - Tier mapping

use std::sync::Arc;

use crate::application::assembler::{EncodedFeatureVector, FeatureAssembler};
use crate::domain::{InputRecord, ModelError, PredictionResult, SchemaVersion};
use crate::ports::{CategoricalEncoder, ProbabilityClassifier};
use crate::HullRotError;

/// A record together with the prediction made for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub record: InputRecord,
    pub result: PredictionResult,
}

/// Service for running risk predictions.
///
/// Holds the encoder and classifier loaded at startup; both are shared
/// read-only and never replaced.
pub struct RiskService<E, C>
where
    E: CategoricalEncoder,
    C: ProbabilityClassifier,
{
    schema: SchemaVersion,
    encoder: Arc<E>,
    assembler: FeatureAssembler<E>,
    classifier: Arc<C>,
}

impl<E, C> RiskService<E, C>
where
    E: CategoricalEncoder,
    C: ProbabilityClassifier,
{
    /// Create a new risk service.
    pub fn new(schema: SchemaVersion, encoder: Arc<E>, classifier: Arc<C>) -> Self {
        Self {
            schema,
            assembler: FeatureAssembler::new(encoder.clone()),
            encoder,
            classifier,
        }
    }

    #[must_use]
    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    #[must_use]
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Assemble the feature vector for a validated record.
    ///
    /// # Errors
    /// Returns error if the record is invalid or the encoder rejects it.
    pub fn features(&self, record: &InputRecord) -> Result<EncodedFeatureVector, HullRotError> {
        self.check_record(record)?;
        Ok(self.assembler.assemble(record)?)
    }

    /// Run the full pipeline on one record.
    ///
    /// Performs:
    /// 1. Validate the record
    /// 2. Assemble features
    /// 3. Obtain the class-1 probability
    /// 4. Map it to a tier
    ///
    /// # Errors
    /// Returns error if any step fails. The service stays usable afterwards.
    pub fn predict(&self, record: &InputRecord) -> Result<PredictionResult, HullRotError> {
        tracing::debug!("Step 1-2: Validating and assembling features...");
        let features = self.features(record)?;

        let expected = self.classifier.n_features();
        if features.len() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: features.len(),
            }
            .into());
        }

        tracing::debug!("Step 3: Running classifier...");
        let probability = self.classifier.predict_probability(features.as_slice())?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::InvalidProbability(probability).into());
        }

        tracing::debug!("Step 4: Mapping probability to tier...");
        let result = PredictionResult::new(probability, self.schema.thresholds());

        tracing::info!(
            "Prediction complete: schema={}, probability={:.3}, tier={}",
            self.schema.as_str(),
            result.probability,
            result.risk_tier
        );

        Ok(result)
    }

    /// Predict and keep the record alongside the result (for display and export).
    ///
    /// # Errors
    /// Returns error if prediction fails.
    pub fn assess(&self, record: InputRecord) -> Result<Assessment, HullRotError> {
        let result = self.predict(&record)?;
        Ok(Assessment { record, result })
    }

    fn check_record(&self, record: &InputRecord) -> Result<(), HullRotError> {
        if record.schema() != self.schema {
            return Err(HullRotError::Validation(format!(
                "Record uses {} but the loaded model expects {}",
                record.schema(),
                self.schema
            )));
        }
        record
            .validate()
            .map_err(|errors| HullRotError::Validation(errors.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::assembler::tests::MarkerEncoder;
    use crate::domain::{Measurements, RiskTier, VariantAMeasurements, VariantBMeasurements};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub classifier returning a fixed probability and counting calls.
    struct FixedClassifier {
        n_features: usize,
        probability: f64,
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new(n_features: usize, probability: f64) -> Self {
            Self {
                n_features,
                probability,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ProbabilityClassifier for FixedClassifier {
        fn n_features(&self) -> usize {
            self.n_features
        }

        fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if features.len() != self.n_features {
                return Err(ModelError::ShapeMismatch {
                    expected: self.n_features,
                    actual: features.len(),
                });
            }
            Ok(self.probability)
        }
    }

    fn service(
        schema: SchemaVersion,
        n_features: usize,
        probability: f64,
    ) -> RiskService<MarkerEncoder, FixedClassifier> {
        RiskService::new(
            schema,
            Arc::new(MarkerEncoder {
                marker: vec![1.0, 0.0],
            }),
            Arc::new(FixedClassifier::new(n_features, probability)),
        )
    }

    fn variant_a_record() -> InputRecord {
        InputRecord::new(
            "Belvedere",
            "NP",
            Measurements::A(VariantAMeasurements::default()),
        )
    }

    #[test]
    fn test_predict_variant_a_tier() {
        let svc = service(SchemaVersion::A, 9, 0.4567);
        let result = svc.predict(&variant_a_record()).expect("Should predict");
        assert_eq!(result.risk_tier, RiskTier::Medium);
        assert!((result.probability - 0.4567).abs() < f64::EPSILON);
    }

    #[test]
    fn test_predict_variant_b_tier() {
        let svc = service(SchemaVersion::B, 8, 0.29);
        let record = InputRecord::new(
            "Capay",
            "Butte",
            Measurements::B(VariantBMeasurements::default()),
        );
        let result = svc.predict(&record).expect("Should predict");
        assert_eq!(result.risk_tier, RiskTier::Low);
    }

    #[test]
    fn test_schema_mismatch_rejected_before_inference() {
        let svc = service(SchemaVersion::B, 8, 0.5);
        let err = svc.predict(&variant_a_record()).unwrap_err();
        assert!(matches!(err, HullRotError::Validation(_)));
        assert_eq!(svc.classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_record_rejected_before_inference() {
        let svc = service(SchemaVersion::A, 9, 0.5);
        let mut record = variant_a_record();
        if let Measurements::A(m) = &mut record.measurements {
            m.rain_total_ml = f64::INFINITY;
        }
        assert!(matches!(
            svc.predict(&record),
            Err(HullRotError::Validation(_))
        ));
        assert_eq!(svc.classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_shape_mismatch_surfaces_error() {
        let svc = service(SchemaVersion::A, 12, 0.5);
        let err = svc.predict(&variant_a_record()).unwrap_err();
        assert!(matches!(
            err,
            HullRotError::Model(ModelError::ShapeMismatch {
                expected: 12,
                actual: 9
            })
        ));
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let svc = service(SchemaVersion::A, 9, 1.5);
        assert!(matches!(
            svc.predict(&variant_a_record()),
            Err(HullRotError::Model(ModelError::InvalidProbability(_)))
        ));
    }

    #[test]
    fn test_service_usable_after_error() {
        let svc = service(SchemaVersion::A, 9, 0.7);
        let mut bad = variant_a_record();
        bad.variety = "Rejected".into();
        assert!(svc.predict(&bad).is_err());

        let result = svc.predict(&variant_a_record()).expect("Should predict");
        assert_eq!(result.risk_tier, RiskTier::High);
    }

    #[test]
    fn test_idempotent() {
        let svc = service(SchemaVersion::A, 9, 0.123456789);
        let record = variant_a_record();
        let a = svc.predict(&record).expect("Should predict");
        let b = svc.predict(&record).expect("Should predict");
        assert_eq!(a.probability.to_bits(), b.probability.to_bits());
        assert_eq!(a.risk_tier, b.risk_tier);
    }

    #[test]
    fn test_shipped_artifacts_end_to_end() {
        use crate::adapters::loader::ArtifactLoader;

        let loaded = ArtifactLoader::new("models", SchemaVersion::A)
            .load()
            .expect("Should load");
        let svc = RiskService::new(SchemaVersion::A, loaded.encoder, loaded.classifier);
        let result = svc.predict(&variant_a_record()).expect("Should predict");
        assert_eq!(result.display_probability(), "0.35");
        assert_eq!(result.risk_tier, RiskTier::Medium);

        // Free-text orchards outside the fitted list are tolerated.
        let mut elsewhere = variant_a_record();
        elsewhere.orchard = "Nowhere Ranch".into();
        assert!(svc.predict(&elsewhere).is_ok());

        let loaded = ArtifactLoader::new("models/variant_b", SchemaVersion::B)
            .load()
            .expect("Should load");
        let svc = RiskService::new(SchemaVersion::B, loaded.encoder, loaded.classifier);
        let record = InputRecord::new(
            "Capay",
            "Butte",
            Measurements::B(VariantBMeasurements::default()),
        );
        let result = svc.predict(&record).expect("Should predict");
        assert_eq!(result.risk_tier, RiskTier::Low);
        assert!((result.probability - 0.2946).abs() < 1e-3);
    }

    #[test]
    fn test_assess_keeps_record() {
        let svc = service(SchemaVersion::A, 9, 0.1);
        let assessment = svc.assess(variant_a_record()).expect("Should assess");
        assert_eq!(assessment.record, variant_a_record());
        assert_eq!(assessment.result.risk_tier, RiskTier::Low);
    }
}
