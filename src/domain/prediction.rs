//! Prediction result types.
//!
//! Represents the output of the hull rot classifier and its traffic-light tier.

use serde::{Deserialize, Serialize};

/// Discrete risk tier derived from the hull rot probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    /// Green light
    Low,
    /// Amber light
    Medium,
    /// Red light
    High,
}

impl RiskTier {
    /// Label used on screen and in the CSV export.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - Standard monitoring",
            Self::Medium => "Medium risk - Scout blocks and review irrigation",
            Self::High => "High risk - Consider hull split management now",
        }
    }

    /// Get the associated traffic-light color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),    // Emerald (#10B981)
            Self::Medium => (251, 191, 36), // Amber (#FBBF24)
            Self::High => (244, 63, 94),    // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Cut points separating the three tiers.
///
/// `p < medium` is Low, `medium <= p < high` is Medium, `p >= high` is High.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
}

impl RiskThresholds {
    #[must_use]
    pub const fn new(medium: f64, high: f64) -> Self {
        Self { medium, high }
    }

    /// Map a probability to its tier. Display and export both go through here.
    #[must_use]
    pub fn classify(&self, probability: f64) -> RiskTier {
        if probability < self.medium {
            RiskTier::Low
        } else if probability < self.high {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }
}

/// Result of one inference call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Class-1 probability (0.0 to 1.0)
    pub probability: f64,

    /// Tier under the thresholds of the active schema version
    pub risk_tier: RiskTier,
}

impl PredictionResult {
    /// Create a result, classifying the probability with `thresholds`.
    #[must_use]
    pub fn new(probability: f64, thresholds: RiskThresholds) -> Self {
        Self {
            probability,
            risk_tier: thresholds.classify(probability),
        }
    }

    /// Probability rounded to 3 decimal places, as exported. Ties go to even.
    #[must_use]
    pub fn rounded_probability(&self) -> f64 {
        round_to(self.probability, 3)
    }

    /// Probability as shown on screen (2 decimal places).
    #[must_use]
    pub fn display_probability(&self) -> String {
        format!("{:.2}", self.probability)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
