//! Min-max normalization of a signal's scores across a pair set

use crate::schema::DegeneratePolicy;

/// Outcome of normalizing one signal's score vector
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Scores rescaled to [0.0, 1.0]
    Scaled(Vec<f64>),
    /// All scores were equal; the fallback policy produced these values
    Degenerate(Vec<f64>),
}

impl Normalized {
    pub fn values(&self) -> &[f64] {
        match self {
            Normalized::Scaled(v) | Normalized::Degenerate(v) => v,
        }
    }

    pub fn into_values(self) -> Vec<f64> {
        match self {
            Normalized::Scaled(v) | Normalized::Degenerate(v) => v,
        }
    }

    pub fn is_scaled(&self) -> bool {
        matches!(self, Normalized::Scaled(_))
    }
}

/// Rescale `raw` with `(x - min) / (max - min)`
///
/// When `max == min` (including a single value) the spread is zero and
/// `policy` decides the output. An empty input yields an empty `Scaled`.
pub fn min_max(raw: &[f64], policy: DegeneratePolicy) -> Normalized {
    if raw.is_empty() {
        return Normalized::Scaled(Vec::new());
    }

    let (min, max) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });

    let range = max - min;
    if range == 0.0 {
        let values = match policy {
            DegeneratePolicy::PassThrough => raw.to_vec(),
            DegeneratePolicy::Constant(c) => vec![c; raw.len()],
        };
        return Normalized::Degenerate(values);
    }

    Normalized::Scaled(raw.iter().map(|x| (x - min) / range).collect())
}
