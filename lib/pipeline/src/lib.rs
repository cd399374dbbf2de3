//! # vidsim Pipeline
//!
//! Batch pipeline around the similarity engine: loads a source list,
//! acquires videos, obtains codes from external extractor programs, scores
//! every pair and exports the results.

pub mod acquire;
pub mod cache;
pub mod config;
pub mod export;
pub mod extract;
pub mod retry;
pub mod runner;
pub mod source;

pub use acquire::{Acquired, Acquirer};
pub use config::{ExportFormat, ExtractorConfig, PipelineConfig};
pub use extract::{parse_output, CommandExtractor};
pub use retry::{retry, RetryPolicy};
pub use runner::{Pipeline, RunReport};
pub use source::{load_sources, parse_sources, SourceEntry};
