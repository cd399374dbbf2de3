//! Signal schema definitions
//!
//! Declares which signals are compared, in which order, and how much each
//! one contributes to the composite score. The first signal is used as-is;
//! every later signal is min-max normalized across the pair set.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the conventional primary signal (perceptual video hash)
pub const HASH_SIGNAL: &str = "hash";
/// Name of the conventional secondary signal (video fingerprint)
pub const FINGERPRINT_SIGNAL: &str = "fingerprint";

/// Ordered list of signals with their weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalSchema {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Signals in evaluation order; position 0 is never normalized
    pub signals: Vec<SignalConfig>,

    /// What to do when a normalized signal has no spread across pairs
    #[serde(default)]
    pub degenerate: DegeneratePolicy,
}

fn default_version() -> u32 {
    1
}

impl Default for SignalSchema {
    /// `hash` weighted 0.7 followed by `fingerprint` weighted 0.3
    fn default() -> Self {
        Self::new(vec![
            SignalConfig::new(HASH_SIGNAL, 0.7),
            SignalConfig::new(FINGERPRINT_SIGNAL, 0.3),
        ])
    }
}

impl SignalSchema {
    pub fn new(signals: Vec<SignalConfig>) -> Self {
        Self {
            version: 1,
            signals,
            degenerate: DegeneratePolicy::default(),
        }
    }

    /// Build a schema from parallel name and weight lists
    pub fn from_parts<S: AsRef<str>>(names: &[S], weights: &[f64]) -> Result<Self, SchemaError> {
        if names.len() != weights.len() {
            return Err(SchemaError::WeightCountMismatch {
                signals: names.len(),
                weights: weights.len(),
            });
        }

        let signals = names
            .iter()
            .zip(weights)
            .map(|(name, weight)| SignalConfig::new(name.as_ref(), *weight))
            .collect();
        Ok(Self::new(signals))
    }

    #[must_use]
    pub fn with_degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }

    /// Check the schema before any comparison runs
    ///
    /// Weights are not rescaled. A sum away from 1.0 is allowed and only logged.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.signals.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for signal in &self.signals {
            if signal.name.is_empty() {
                return Err(SchemaError::EmptySignalName);
            }
            if !seen.insert(signal.name.as_str()) {
                return Err(SchemaError::DuplicateSignal(signal.name.clone()));
            }
            if !signal.weight.is_finite() || signal.weight < 0.0 {
                return Err(SchemaError::InvalidWeight(signal.name.clone()));
            }
        }

        if let DegeneratePolicy::Constant(value) = self.degenerate {
            if !value.is_finite() {
                return Err(SchemaError::InvalidDegenerateConstant);
            }
        }

        let weight_sum = self.weight_sum();
        if (weight_sum - 1.0).abs() > 0.001 {
            tracing::warn!("Signal weights sum to {:.4}, not 1.0", weight_sum);
        }

        Ok(())
    }

    pub fn weight_sum(&self) -> f64 {
        self.signals.iter().map(|s| s.weight).sum()
    }

    pub fn names(&self) -> Vec<&str> {
        self.signals.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.signals.iter().map(|s| s.weight).collect()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.signals.iter().position(|s| s.name == name)
    }
}

/// One signal of the schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalConfig {
    pub name: String,

    /// Contribution of this signal to the composite score
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl SignalConfig {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Fallback for a normalized signal whose scores are all equal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case", tag = "policy", content = "value")]
pub enum DegeneratePolicy {
    /// Keep the raw scores unchanged
    #[default]
    PassThrough,
    /// Replace every score with a fixed value
    Constant(f64),
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema must declare at least one signal")]
    EmptySchema,

    #[error("Signal names cannot be empty")]
    EmptySignalName,

    #[error("Signal '{0}' is declared more than once")]
    DuplicateSignal(String),

    #[error("Signal '{0}' has a negative or non-finite weight")]
    InvalidWeight(String),

    #[error("Expected one weight per signal: {signals} signals, {weights} weights")]
    WeightCountMismatch { signals: usize, weights: usize },

    #[error("Degenerate fallback constant must be finite")]
    InvalidDegenerateConstant,
}

impl From<SchemaError> for vidsim_core::Error {
    fn from(e: SchemaError) -> Self {
        vidsim_core::Error::Schema(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema() {
        let schema = SignalSchema::default();
        assert_eq!(schema.names(), vec!["hash", "fingerprint"]);
        assert_eq!(schema.weights(), vec![0.7, 0.3]);
        assert_eq!(schema.degenerate, DegeneratePolicy::PassThrough);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_from_parts_length_mismatch() {
        let err = SignalSchema::from_parts(&["hash", "fingerprint"], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::WeightCountMismatch { signals: 2, weights: 1 }
        );
    }

    #[test]
    fn test_empty_schema_error() {
        let schema = SignalSchema::new(Vec::new());
        assert_eq!(schema.validate(), Err(SchemaError::EmptySchema));
    }

    #[test]
    fn test_negative_weight_error() {
        let schema = SignalSchema::from_parts(&["hash"], &[-0.5]).unwrap();
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_duplicate_signal_error() {
        let schema = SignalSchema::from_parts(&["hash", "hash"], &[0.5, 0.5]).unwrap();
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateSignal("hash".to_string()))
        );
    }

    #[test]
    fn test_weights_not_rescaled() {
        let schema = SignalSchema::from_parts(&["hash", "fingerprint"], &[2.0, 2.0]).unwrap();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.weights(), vec![2.0, 2.0]);
        assert!((schema.weight_sum() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_constant_rejected() {
        let schema = SignalSchema::default().with_degenerate(DegeneratePolicy::Constant(f64::NAN));
        assert_eq!(schema.validate(), Err(SchemaError::InvalidDegenerateConstant));
    }

    #[test]
    fn test_serde_roundtrip() {
        let schema = SignalSchema::default().with_degenerate(DegeneratePolicy::Constant(0.5));
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: SignalSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, parsed);
    }

    #[test]
    fn test_serde_defaults() {
        let parsed: SignalSchema =
            serde_json::from_str(r#"{"signals":[{"name":"hash"}]}"#).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.signals[0].weight, 1.0);
        assert_eq!(parsed.degenerate, DegeneratePolicy::PassThrough);
    }
}
