//! # vidsim Similarity
//!
//! Code comparison and pairwise similarity aggregation.
//!
//! ## Features
//!
//! - **Code comparison**: Hamming ratio for equal-length codes, bigram Dice score otherwise
//! - **Signal schema**: Ordered signals with weights and a degenerate-normalization policy
//! - **Aggregation**: All unordered pairs, min-max normalization, weighted composite
//! - **Explainability**: Per-signal contributions and summary statistics
//!
//! ## Example
//!
//! ```rust
//! use vidsim_core::Item;
//! use vidsim_similarity::{aggregate, compare};
//!
//! assert_eq!(compare("1010", "1011").unwrap(), 0.75);
//!
//! let items = vec![
//!     Item::new(0, "a.mp4").with_code("hash", "1010"),
//!     Item::new(1, "b.mp4").with_code("hash", "1011"),
//!     Item::new(2, "c.mp4").with_code("hash", "0000"),
//! ];
//! let results = aggregate(&items, &["hash"], &[1.0]).unwrap();
//!
//! assert_eq!(results.len(), 3);
//! assert_eq!(results[0].pair_id(), "0-1");
//! assert_eq!(results[0].composite, 0.75);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Items     │────>│  compare    │────>│  min_max    │────>│  composite  │
//! │ (codes)     │     │ (per pair)  │     │ (signal≥1)  │     │ (weights)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                                    │
//!                                                             ┌─────────────┐
//!                                                             │  Explain    │
//!                                                             │  (stats)    │
//!                                                             └─────────────┘
//! ```

pub mod aggregate;
pub mod compare;
pub mod explain;
pub mod normalize;
pub mod schema;

pub use aggregate::{aggregate, Aggregator};
pub use compare::{bigram_similarity, bigrams, compare, hamming_similarity, ComparisonError};
pub use explain::{
    is_similar, similarity_threshold, ExplainedPair, SignalContribution, SimilarityStats,
    DEFAULT_SIMILAR_PERCENTAGE,
};
pub use normalize::{min_max, Normalized};
pub use schema::{
    DegeneratePolicy, SchemaError, SignalConfig, SignalSchema, FINGERPRINT_SIGNAL, HASH_SIGNAL,
};
