//! # vidsim
//!
//! Batch video similarity scoring.
//!
//! vidsim takes a list of videos (URLs or local paths), obtains a perceptual
//! code per video for each configured signal, and scores every pair of
//! videos with a weighted composite of per-signal similarities.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install vidsim
//! vidsim URL_list.csv --cache-dir ./cache --similar-percentage 10
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use vidsim::prelude::*;
//!
//! let items = vec![
//!     Item::new(0, "a.mp4").with_code("hash", "1010").with_code("fingerprint", "abcdef"),
//!     Item::new(1, "b.mp4").with_code("hash", "1011").with_code("fingerprint", "abcde"),
//!     Item::new(2, "c.mp4").with_code("hash", "0000").with_code("fingerprint", "xyz"),
//! ];
//!
//! let aggregator = Aggregator::new(SignalSchema::default()).unwrap();
//! let results = aggregator.aggregate(&items);
//!
//! assert_eq!(results.len(), 3);
//! assert_eq!(results[0].pair_id(), "0-1");
//! ```
//!
//! ## Crate Structure
//!
//! - [`vidsim-core`](https://docs.rs/vidsim-core) - Data model (Code, Item, PairResult)
//! - [`vidsim-similarity`](https://docs.rs/vidsim-similarity) - Comparator, aggregator, stats
//! - [`vidsim-pipeline`](https://docs.rs/vidsim-pipeline) - Source lists, acquisition, extraction, export
//!
//! ## Scoring
//!
//! - **Equal-length codes**: Hamming ratio `(L - mismatches) / L`
//! - **Different lengths**: bigram Dice score, case-insensitive
//! - **First signal**: used raw
//! - **Later signals**: min-max normalized across all pairs
//! - **Composite**: weighted sum, default weights `[0.7, 0.3]`

// Re-export core types
pub use vidsim_core::{pair_count, pairs, Code, Error, Item, PairKey, PairResult, Result};

// Re-export similarity engine
pub use vidsim_similarity::{
    aggregate, compare, Aggregator, ComparisonError, DegeneratePolicy, ExplainedPair,
    SchemaError, SignalConfig, SignalSchema, SimilarityStats,
};

// Re-export pipeline
pub use vidsim_pipeline::{ExportFormat, Pipeline, PipelineConfig, RunReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        aggregate, compare, Aggregator, Code, DegeneratePolicy, Error, Item, PairKey, PairResult,
        Pipeline, PipelineConfig, Result, SignalConfig, SignalSchema, SimilarityStats,
    };
}
