use serde::{Deserialize, Serialize};
use std::fmt;

/// Unordered pair of item indices, always stored with `first < second`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub first: usize,
    pub second: usize,
}

impl PairKey {
    /// Create a key from two distinct indices in any order
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// All unordered pairs of `0..n` in lexicographic order
///
/// Yields `n * (n - 1) / 2` keys: `(0,1), (0,2), .., (0,n-1), (1,2), ..`.
pub fn pairs(n: usize) -> impl Iterator<Item = PairKey> {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| PairKey { first: i, second: j }))
}

/// Number of unordered pairs for `n` items
#[inline]
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Scores for one pair of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    pub key: PairKey,
    /// Comparator output per signal, in signal order
    pub raw: Vec<f64>,
    /// Score after normalization per signal; equals `raw` where not normalized
    pub scores: Vec<f64>,
    /// Whether min-max normalization was applied per signal
    pub normalized: Vec<bool>,
    /// Whether the comparator failed per signal (raw recorded as 0.0)
    pub failed: Vec<bool>,
    /// Weighted sum of `scores`
    pub composite: f64,
}

impl PairResult {
    #[inline]
    pub fn first(&self) -> usize {
        self.key.first
    }

    #[inline]
    pub fn second(&self) -> usize {
        self.key.second
    }

    /// The `"{i}-{j}"` pair identifier
    pub fn pair_id(&self) -> String {
        self.key.to_string()
    }
}
