//! Classifier adapter: binary classifiers exported from the training pipeline.
//!
//! `hr_risk_model.json` is tagged by `kind`:
//!
//! - `logistic_regression`: `sigmoid(intercept + coefficients . x)`
//! - `random_forest`: mean over trees of the class-1 share at the reached leaf
//!
//! Split nodes send a sample left when `x[feature] <= threshold`, matching
//! the convention of the exporting library.

use serde::{Deserialize, Serialize};

use crate::domain::ModelError;
use crate::ports::ProbabilityClassifier;

/// A node of an exported decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class weights `[class 0, class 1]` (counts or fractions)
        value: Vec<f64>,
    },
}

/// One exported decision tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {i} splits on feature {feature}, model has {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i} has a non-finite threshold"));
                    }
                    // Children strictly after their parent: traversal always terminates.
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {i} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != 2 {
                        return Err(format!(
                            "leaf {i} has {} class weights, expected 2",
                            value.len()
                        ));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(format!("leaf {i} has a negative or non-finite weight"));
                    }
                    if value[0] + value[1] <= 0.0 {
                        return Err(format!("leaf {i} has zero total weight"));
                    }
                }
            }
        }

        Ok(())
    }

    /// Class-1 share at the leaf reached by `features`.
    ///
    /// `None` if the tree is malformed; `validate` rules that out for loaded artifacts.
    fn class_one_share(&self, features: &[f64]) -> Option<f64> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx)? {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if *features.get(*feature)? <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => {
                    let [w0, w1] = value.as_slice() else {
                        return None;
                    };
                    return Some(w1 / (w0 + w1));
                }
            }
        }
        None
    }
}

/// Classifier parameters exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedClassifier {
    LogisticRegression {
        n_features: usize,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        n_features: usize,
        trees: Vec<DecisionTree>,
    },
}

impl ExportedClassifier {
    /// Check internal consistency of the exported parameters.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::LogisticRegression {
                n_features,
                coefficients,
                intercept,
            } => {
                if *n_features == 0 {
                    return Err("n_features must be positive".into());
                }
                if coefficients.len() != *n_features {
                    return Err(format!(
                        "{} coefficients for {} features",
                        coefficients.len(),
                        n_features
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("coefficients and intercept must be finite".into());
                }
            }
            Self::RandomForest { n_features, trees } => {
                if *n_features == 0 {
                    return Err("n_features must be positive".into());
                }
                if trees.is_empty() {
                    return Err("random forest has no trees".into());
                }
                for (t, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features)
                        .map_err(|e| format!("tree {t}: {e}"))?;
                }
            }
        }
        Ok(())
    }

    /// Short description for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::LogisticRegression { n_features, .. } => {
                format!("logistic_regression(n_features={n_features})")
            }
            Self::RandomForest { n_features, trees } => {
                format!(
                    "random_forest(n_features={n_features}, n_trees={})",
                    trees.len()
                )
            }
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl ProbabilityClassifier for ExportedClassifier {
    fn n_features(&self) -> usize {
        match self {
            Self::LogisticRegression { n_features, .. } | Self::RandomForest { n_features, .. } => {
                *n_features
            }
        }
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: features.len(),
            });
        }
        if let Some(index) = features.iter().position(|x| !x.is_finite()) {
            return Err(ModelError::NonFiniteFeature { index });
        }

        let probability = match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
                ..
            } => {
                let z: f64 = coefficients
                    .iter()
                    .zip(features)
                    .map(|(c, x)| c * x)
                    .sum::<f64>()
                    + intercept;
                sigmoid(z)
            }
            Self::RandomForest { trees, .. } => {
                let mut total = 0.0;
                for tree in trees {
                    total += tree
                        .class_one_share(features)
                        .ok_or(ModelError::InvalidProbability(f64::NAN))?;
                }
                total / trees.len() as f64
            }
        };

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::InvalidProbability(probability));
        }
        Ok(probability)
    }
}
