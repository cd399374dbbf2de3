//! Pipeline configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use vidsim_core::{Error, Result};
use vidsim_similarity::{SignalSchema, DEFAULT_SIMILAR_PERCENTAGE, FINGERPRINT_SIGNAL, HASH_SIGNAL};

/// Placeholder in extractor arguments replaced by the local video path
pub const INPUT_PLACEHOLDER: &str = "{input}";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where downloaded videos are stored
    pub cache_dir: PathBuf,
    /// Where result files are written
    pub export_dir: PathBuf,
    pub export_video_detail: bool,
    pub export_comparison: bool,
    pub export_format: ExportFormat,
    /// Delete downloaded videos once the run is finished
    pub remove_cache: bool,
    /// Maximum composite difference, in percent, for a pair to count as similar
    pub similar_percentage: f64,
    /// Items acquired and extracted at the same time
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub schema: SignalSchema,
    /// One extractor per signal name
    pub extractors: BTreeMap<String, ExtractorConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let mut extractors = BTreeMap::new();
        extractors.insert(
            HASH_SIGNAL.to_string(),
            ExtractorConfig::new("videohash", vec![INPUT_PLACEHOLDER.to_string()]),
        );
        extractors.insert(
            FINGERPRINT_SIGNAL.to_string(),
            ExtractorConfig::new("fpcalc", vec![INPUT_PLACEHOLDER.to_string()])
                .with_line_prefix("FINGERPRINT="),
        );

        Self {
            cache_dir: PathBuf::from("./cache"),
            export_dir: PathBuf::from("./cache"),
            export_video_detail: true,
            export_comparison: true,
            export_format: ExportFormat::Csv,
            remove_cache: true,
            similar_percentage: DEFAULT_SIMILAR_PERCENTAGE,
            concurrency: 4,
            retry: RetryPolicy::default(),
            schema: SignalSchema::default(),
            extractors,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.schema.validate()?;

        if self.concurrency == 0 {
            return Err(Error::InvalidConfig("concurrency must be at least 1".into()));
        }
        if self.retry.attempts == 0 {
            return Err(Error::InvalidConfig("retry.attempts must be at least 1".into()));
        }
        if !(0.0..=100.0).contains(&self.similar_percentage) {
            return Err(Error::InvalidConfig(format!(
                "similar_percentage must be within 0..=100, got {}",
                self.similar_percentage
            )));
        }
        for (signal, extractor) in &self.extractors {
            if extractor.program.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "extractor for '{}' has no program",
                    signal
                )));
            }
        }
        for name in self.schema.names() {
            if !self.extractors.contains_key(name) {
                tracing::warn!(
                    "No extractor configured for signal '{}'; only precomputed codes will be used",
                    name
                );
            }
        }

        Ok(())
    }
}

/// External program that prints a code for a video file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractorConfig {
    pub program: String,
    /// Arguments; `{input}` is replaced by the video path
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Take the code from the first output line starting with this prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_prefix: Option<String>,
    /// Kill the program after this many seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_args() -> Vec<String> {
    vec![INPUT_PLACEHOLDER.to_string()]
}

fn default_timeout_secs() -> u64 {
    300
}

impl ExtractorConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            line_prefix: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    #[must_use]
    pub fn with_line_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.line_prefix = Some(prefix.into());
        self
    }

    /// Arguments with the input placeholder substituted
    pub fn render_args(&self, input: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace(INPUT_PLACEHOLDER, &input))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// `video_detail.csv` and `comparison_result.csv`
    #[default]
    Csv,
    /// A single `report.json`
    Json,
}
