//! Pairwise similarity aggregation
//!
//! Scores every unordered pair of items under each signal of a schema, then
//! normalizes and combines the per-signal scores into a composite score.
//! Runs in three strict phases: collect raw scores for all pairs, normalize
//! each signal after the first, then combine with the schema weights.

use crate::compare::compare;
use crate::normalize::{min_max, Normalized};
use crate::schema::{SchemaError, SignalSchema};
use vidsim_core::{pair_count, pairs, Item, PairKey, PairResult};

/// Computes pair results for a set of items under a signal schema
#[derive(Debug, Clone)]
pub struct Aggregator {
    schema: SignalSchema,
}

impl Aggregator {
    /// Create an aggregator after validating the schema
    pub fn new(schema: SignalSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        Ok(Self { schema })
    }

    /// Get a reference to the schema
    pub fn schema(&self) -> &SignalSchema {
        &self.schema
    }

    /// Score all unordered pairs of `items`
    ///
    /// Items are addressed by position in the slice, so `items[k].index`
    /// must equal `k` for pair ids to line up with item indices. Results
    /// come back in lexicographic pair order. Comparator failures are
    /// recorded as 0.0 and never abort the pass.
    pub fn aggregate(&self, items: &[Item]) -> Vec<PairResult> {
        debug_assert!(
            items.iter().enumerate().all(|(k, item)| item.index == k),
            "item indices must match their positions"
        );
        let keys: Vec<PairKey> = pairs(items.len()).collect();
        if keys.is_empty() {
            return Vec::new();
        }

        let signal_count = self.schema.len();

        // Phase 1: raw scores, one column per signal
        let mut raw: Vec<Vec<f64>> = Vec::with_capacity(signal_count);
        let mut failed: Vec<Vec<bool>> = Vec::with_capacity(signal_count);
        for signal in &self.schema.signals {
            let (scores, failures) = collect_signal(items, &keys, &signal.name);
            raw.push(scores);
            failed.push(failures);
        }

        // Phase 2: signal 0 stays raw, later signals are normalized over all pairs
        let mut scores: Vec<Vec<f64>> = Vec::with_capacity(signal_count);
        let mut normalized: Vec<bool> = Vec::with_capacity(signal_count);
        for (position, column) in raw.iter().enumerate() {
            if position == 0 {
                scores.push(column.clone());
                normalized.push(false);
                continue;
            }

            match min_max(column, self.schema.degenerate) {
                Normalized::Scaled(values) => {
                    scores.push(values);
                    normalized.push(true);
                }
                Normalized::Degenerate(values) => {
                    tracing::warn!(
                        "Signal '{}' has no spread across {} pairs, using {:?} fallback",
                        self.schema.signals[position].name,
                        keys.len(),
                        self.schema.degenerate
                    );
                    scores.push(values);
                    normalized.push(false);
                }
            }
        }

        // Phase 3: weighted composite per pair
        let weights = self.schema.weights();
        keys.into_iter()
            .enumerate()
            .map(|(row, key)| {
                let pair_raw: Vec<f64> = raw.iter().map(|c| c[row]).collect();
                let pair_scores: Vec<f64> = scores.iter().map(|c| c[row]).collect();
                let pair_failed: Vec<bool> = failed.iter().map(|c| c[row]).collect();
                let composite: f64 = pair_scores
                    .iter()
                    .zip(&weights)
                    .map(|(score, weight)| score * weight)
                    .sum();

                PairResult {
                    key,
                    raw: pair_raw,
                    scores: pair_scores,
                    normalized: normalized.clone(),
                    failed: pair_failed,
                    composite,
                }
            })
            .collect()
    }
}

/// Compare every pair under one signal, recording failures as 0.0
fn collect_signal(items: &[Item], keys: &[PairKey], signal: &str) -> (Vec<f64>, Vec<bool>) {
    let mut scores = Vec::with_capacity(keys.len());
    let mut failures = Vec::with_capacity(keys.len());

    for key in keys {
        let a = items[key.first].code(signal);
        let b = items[key.second].code(signal);
        match compare(a, b) {
            Ok(score) => {
                scores.push(score);
                failures.push(false);
            }
            Err(e) => {
                tracing::debug!("Comparison {} on '{}' failed: {}", key, signal, e);
                scores.push(0.0);
                failures.push(true);
            }
        }
    }

    debug_assert_eq!(scores.len(), pair_count(items.len()));
    (scores, failures)
}

/// Score all unordered pairs of `items` under parallel signal and weight lists
///
/// Fails only on a malformed signal/weight configuration. For fewer than two
/// items the result is empty.
pub fn aggregate<S: AsRef<str>>(
    items: &[Item],
    signal_types: &[S],
    weights: &[f64],
) -> Result<Vec<PairResult>, SchemaError> {
    let schema = SignalSchema::from_parts(signal_types, weights)?;
    Ok(Aggregator::new(schema)?.aggregate(items))
}
