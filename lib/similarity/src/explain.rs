//! Explainability for pair results
//!
//! Output structures that show how each composite score was built, plus
//! summary statistics over a whole aggregation pass.

use crate::schema::SignalSchema;
use serde::Serialize;
use std::collections::BTreeMap;
use vidsim_core::PairResult;

/// Default tolerance, in percent, for calling a pair similar
pub const DEFAULT_SIMILAR_PERCENTAGE: f64 = 15.0;

/// Composite score at or above which a pair counts as similar
///
/// A `similar_percentage` of 15 accepts pairs that differ by at most 15%,
/// i.e. a composite of at least 0.85.
pub fn similarity_threshold(similar_percentage: f64) -> f64 {
    1.0 - similar_percentage.clamp(0.0, 100.0) / 100.0
}

pub fn is_similar(result: &PairResult, similar_percentage: f64) -> bool {
    result.composite >= similarity_threshold(similar_percentage)
}

/// One signal's part in a composite score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignalContribution {
    pub signal: String,
    /// Comparator output
    pub raw: f64,
    /// Score after normalization, as used in the composite
    pub score: f64,
    /// `score * weight`
    pub contribution: f64,
}

/// A pair result with per-signal weighted contributions
///
/// Contributions are listed in schema order.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedPair {
    pub pair: String,
    pub first: usize,
    pub second: usize,
    pub composite: f64,
    pub similar: bool,
    pub explain: Vec<SignalContribution>,
}

impl ExplainedPair {
    pub fn from_result(result: &PairResult, schema: &SignalSchema, similar_percentage: f64) -> Self {
        let explain = schema
            .signals
            .iter()
            .enumerate()
            .map(|(position, signal)| {
                let score = result.scores.get(position).copied().unwrap_or(0.0);
                SignalContribution {
                    signal: signal.name.clone(),
                    raw: result.raw.get(position).copied().unwrap_or(0.0),
                    score,
                    contribution: score * signal.weight,
                }
            })
            .collect();

        Self {
            pair: result.pair_id(),
            first: result.first(),
            second: result.second(),
            composite: result.composite,
            similar: is_similar(result, similar_percentage),
            explain,
        }
    }

    /// Contribution of the named signal, if the schema has it
    pub fn contribution(&self, signal: &str) -> Option<&SignalContribution> {
        self.explain.iter().find(|c| c.signal == signal)
    }

    pub fn from_results(
        results: &[PairResult],
        schema: &SignalSchema,
        similar_percentage: f64,
    ) -> Vec<Self> {
        results
            .iter()
            .map(|r| Self::from_result(r, schema, similar_percentage))
            .collect()
    }
}

/// Summary statistics for an aggregation pass
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityStats {
    pub pair_count: usize,
    /// Pairs whose comparison failed, per signal name
    pub failures: BTreeMap<String, usize>,
    pub min_composite: f64,
    pub max_composite: f64,
    pub avg_composite: f64,
    pub threshold: f64,
    pub similar_count: usize,
}

impl SimilarityStats {
    /// Compute stats from pair results
    pub fn compute(results: &[PairResult], schema: &SignalSchema, similar_percentage: f64) -> Self {
        let threshold = similarity_threshold(similar_percentage);
        let failures = schema
            .signals
            .iter()
            .enumerate()
            .map(|(position, signal)| {
                let count = results
                    .iter()
                    .filter(|r| r.failed.get(position).copied().unwrap_or(false))
                    .count();
                (signal.name.clone(), count)
            })
            .collect();

        if results.is_empty() {
            return Self {
                pair_count: 0,
                failures,
                min_composite: 0.0,
                max_composite: 0.0,
                avg_composite: 0.0,
                threshold,
                similar_count: 0,
            };
        }

        let composites: Vec<f64> = results.iter().map(|r| r.composite).collect();
        let min_composite = composites.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_composite = composites.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg_composite = composites.iter().sum::<f64>() / composites.len() as f64;
        let similar_count = composites.iter().filter(|c| **c >= threshold).count();

        Self {
            pair_count: results.len(),
            failures,
            min_composite,
            max_composite,
            avg_composite,
            threshold,
            similar_count,
        }
    }
}
