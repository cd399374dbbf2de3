//! End-to-end batch run
//!
//! sources -> acquisition -> extraction -> aggregation -> export -> cleanup.
//! Aggregation starts only once every item's codes are resolved.

use crate::acquire::{Acquired, Acquirer};
use crate::cache::remove_downloads;
use crate::config::{ExportFormat, PipelineConfig};
use crate::export::{write_comparison, write_json_report, write_video_detail};
use crate::extract::CommandExtractor;
use crate::source::{load_sources, SourceEntry};
use anyhow::{Context, Result};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use vidsim_core::{Code, Item, PairResult};
use vidsim_similarity::{Aggregator, SimilarityStats};

/// What a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub items: Vec<Item>,
    pub pairs: Vec<PairResult>,
    pub stats: SimilarityStats,
    /// Files written by the export phase
    pub exports: Vec<PathBuf>,
    /// Downloaded files removed by cache cleanup
    pub removed: usize,
}

pub struct Pipeline {
    config: PipelineConfig,
    acquirer: Acquirer,
    extractors: HashMap<String, CommandExtractor>,
    aggregator: Aggregator,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let acquirer = Acquirer::new(&config.cache_dir, config.retry);
        let extractors = config
            .extractors
            .iter()
            .map(|(signal, cfg)| (signal.clone(), CommandExtractor::new(signal, cfg.clone())))
            .collect();
        let aggregator = Aggregator::new(config.schema.clone())?;

        Ok(Self {
            config,
            acquirer,
            extractors,
            aggregator,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every phase for the source list at `sources`
    pub async fn run<P: AsRef<Path>>(&self, sources: P) -> Result<RunReport> {
        let sources = sources.as_ref();
        let entries = load_sources(sources)
            .with_context(|| format!("Failed to load source list {:?}", sources))?;
        info!("Loaded {} sources from {:?}", entries.len(), sources);

        self.run_entries(entries).await
    }

    /// Run every phase for already loaded source entries
    pub async fn run_entries(&self, entries: Vec<SourceEntry>) -> Result<RunReport> {
        let start = Instant::now();
        let (items, acquired) = self.resolve(entries).await;
        info!("Resolved codes for {} items in {:?}", items.len(), start.elapsed());

        let start = Instant::now();
        let pairs = self.aggregator.aggregate(&items);
        let stats = SimilarityStats::compute(
            &pairs,
            self.aggregator.schema(),
            self.config.similar_percentage,
        );
        info!(
            "Compared {} pairs in {:?}, {} similar",
            stats.pair_count,
            start.elapsed(),
            stats.similar_count
        );

        let exports = self.export(&items, &pairs, &stats)?;
        for path in &exports {
            info!("Exported {:?}", path);
        }

        let removed = if self.config.remove_cache {
            let removed = remove_downloads(&acquired, self.acquirer.cache_dir());
            info!("Removed {} cached videos", removed);
            removed
        } else {
            0
        };

        Ok(RunReport {
            items,
            pairs,
            stats,
            exports,
            removed,
        })
    }

    /// Acquire and extract every entry, keeping input order
    async fn resolve(&self, entries: Vec<SourceEntry>) -> (Vec<Item>, Vec<Acquired>) {
        let resolved: Vec<(Item, Option<Acquired>)> = stream::iter(entries.into_iter().enumerate())
            .map(|(index, entry)| self.resolve_item(index, entry))
            .buffered(self.config.concurrency)
            .collect()
            .await;

        let mut items = Vec::with_capacity(resolved.len());
        let mut acquired = Vec::new();
        for (item, acq) in resolved {
            items.push(item);
            acquired.extend(acq);
        }
        (items, acquired)
    }

    async fn resolve_item(&self, index: usize, entry: SourceEntry) -> (Item, Option<Acquired>) {
        let schema = self.aggregator.schema();
        let mut item = Item::new(index, entry.source.clone());

        let mut pending = Vec::new();
        for (position, signal) in schema.signals.iter().enumerate() {
            match entry.precomputed(position) {
                Some(code) => item.set_code(signal.name.clone(), code.clone()),
                None => pending.push(signal.name.clone()),
            }
        }

        if pending.is_empty() {
            return (item, None);
        }

        let acquired = match self.acquirer.acquire(index, &entry.source).await {
            Ok(acquired) => acquired,
            Err(e) => {
                warn!("Item {} ({}) could not be acquired: {:#}", index, entry.source, e);
                for signal in pending {
                    item.set_code(signal, Code::missing());
                }
                return (item, None);
            }
        };
        item.path = Some(acquired.path().to_path_buf());

        for signal in pending {
            let code = match self.extractors.get(&signal) {
                Some(extractor) => {
                    extractor
                        .extract_or_missing(acquired.path(), &self.config.retry)
                        .await
                }
                None => {
                    warn!("No extractor for '{}', item {} gets an empty code", signal, index);
                    Code::missing()
                }
            };
            item.set_code(signal, code);
        }

        (item, Some(acquired))
    }

    fn export(
        &self,
        items: &[Item],
        pairs: &[PairResult],
        stats: &SimilarityStats,
    ) -> Result<Vec<PathBuf>> {
        let dir = &self.config.export_dir;
        let schema = self.aggregator.schema();
        let similar_percentage = self.config.similar_percentage;
        let mut written = Vec::new();

        match self.config.export_format {
            ExportFormat::Csv => {
                if self.config.export_video_detail {
                    written.push(write_video_detail(dir, items, schema)?);
                }
                if self.config.export_comparison {
                    written.push(write_comparison(dir, pairs, schema, similar_percentage)?);
                }
            }
            ExportFormat::Json => {
                if self.config.export_video_detail || self.config.export_comparison {
                    written.push(write_json_report(
                        dir,
                        items,
                        pairs,
                        schema,
                        stats,
                        similar_percentage,
                    )?);
                }
            }
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::source::parse_sources;
    use std::collections::BTreeMap;
    use vidsim_similarity::SignalSchema;

    fn config(dir: &Path) -> PipelineConfig {
        PipelineConfig {
            cache_dir: dir.join("cache"),
            export_dir: dir.join("out"),
            retry: crate::retry::RetryPolicy::new(1, 0),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_precomputed_codes_skip_acquisition() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.schema = SignalSchema::from_parts(&["hash"], &[1.0]).unwrap();
        let pipeline = Pipeline::new(config).unwrap();

        let entries = parse_sources("missing-a.mp4,1010\nmissing-b.mp4,1011\nmissing-c.mp4,0000\n")
            .unwrap();
        let report = pipeline.run_entries(entries).await.unwrap();

        assert_eq!(report.items.len(), 3);
        assert!(report.items.iter().all(|i| i.path.is_none()));
        let composites: Vec<f64> = report.pairs.iter().map(|p| p.composite).collect();
        assert_eq!(composites, vec![0.75, 0.5, 0.25]);
        assert_eq!(report.exports.len(), 2);
        assert_eq!(report.removed, 0);
    }

    #[tokio::test]
    async fn test_unreachable_source_gets_empty_codes() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config(dir.path())).unwrap();

        let entries = parse_sources("a.mp4,1010,abcd\nnowhere/b.mp4\n").unwrap();
        let report = pipeline.run_entries(entries).await.unwrap();

        assert_eq!(report.pairs.len(), 1);
        let item = &report.items[1];
        assert_eq!(item.code("hash"), "");
        assert_eq!(item.code("fingerprint"), "");
        // "1010" vs "" and "abcd" vs "" both score 0.0 on the bigram path
        assert_eq!(report.pairs[0].raw, vec![0.0, 0.0]);
    }

    fn local_videos(dir: &Path) -> (PathBuf, PathBuf) {
        let a = dir.join("a.mp4");
        let b = dir.join("b.mp4");
        std::fs::write(&a, b"first").unwrap();
        std::fs::write(&b, b"second").unwrap();
        (a, b)
    }

    fn echo_extractor(code: &str) -> ExtractorConfig {
        ExtractorConfig::new("echo", vec![format!("CODE={}", code)]).with_line_prefix("CODE=")
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_local_sources_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = local_videos(dir.path());

        let mut config = config(dir.path());
        config.schema = SignalSchema::from_parts(&["hash"], &[1.0]).unwrap();
        config.extractors = BTreeMap::from([("hash".to_string(), echo_extractor("1010"))]);
        let pipeline = Pipeline::new(config).unwrap();

        let entries = parse_sources(&format!("{}\n{}\n", a.display(), b.display())).unwrap();
        let report = pipeline.run_entries(entries).await.unwrap();

        let codes: Vec<&str> = report.items.iter().map(|i| i.code("hash")).collect();
        assert_eq!(codes, ["1010", "1010"]);
        assert_eq!(report.items[0].path, Some(std::fs::canonicalize(&a).unwrap()));
        assert_eq!(report.items[1].path, Some(std::fs::canonicalize(&b).unwrap()));
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.pairs[0].composite, 1.0);

        // Local files are never treated as cache
        assert_eq!(report.removed, 0);
        assert!(a.exists());
        assert!(b.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_without_extractor_gets_empty_code() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = local_videos(dir.path());

        let mut config = config(dir.path());
        config.extractors = BTreeMap::from([("hash".to_string(), echo_extractor("1010"))]);
        let pipeline = Pipeline::new(config).unwrap();

        let entries = parse_sources(&format!("{}\n{}\n", a.display(), b.display())).unwrap();
        let report = pipeline.run_entries(entries).await.unwrap();

        for item in &report.items {
            assert_eq!(item.code("hash"), "1010");
            assert!(item.codes.contains_key("fingerprint"));
            assert_eq!(item.code("fingerprint"), "");
        }

        let pair = &report.pairs[0];
        assert_eq!(pair.failed, vec![false, true]);
        assert_eq!(pair.raw, vec![1.0, 0.0]);
        assert!((pair.composite - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.concurrency = 0;
        assert!(Pipeline::new(config).is_err());
    }
}
