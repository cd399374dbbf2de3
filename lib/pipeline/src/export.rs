//! Result export
//!
//! CSV files mirror the per-video details and the pair results in pair
//! order; the JSON report bundles both with summary statistics.

use anyhow::{Context, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use vidsim_core::{Item, PairResult};
use vidsim_similarity::{is_similar, ExplainedPair, SignalSchema, SimilarityStats};

pub const VIDEO_DETAIL_FILE: &str = "video_detail.csv";
pub const COMPARISON_FILE: &str = "comparison_result.csv";
pub const REPORT_FILE: &str = "report.json";

/// Quote a CSV field when it contains a separator, quote or line break
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, fields: &[S]) -> std::io::Result<()> {
    let row: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_field(f.as_ref())).collect();
    writeln!(writer, "{}", row.join(","))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export dir {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    Ok(BufWriter::new(file))
}

/// `index,source,path,<signal>...`, one row per item
pub fn write_video_detail(dir: &Path, items: &[Item], schema: &SignalSchema) -> Result<PathBuf> {
    let path = dir.join(VIDEO_DETAIL_FILE);
    let mut writer = create(&path)?;

    let mut header = vec!["index".to_string(), "source".to_string(), "path".to_string()];
    header.extend(schema.names().iter().map(|s| s.to_string()));
    write_row(&mut writer, &header)?;

    for item in items {
        let mut row = vec![
            item.index.to_string(),
            item.source.clone(),
            item.path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ];
        row.extend(schema.names().iter().map(|s| item.code(s).to_string()));
        write_row(&mut writer, &row)?;
    }

    writer.flush()?;
    Ok(path)
}

/// `vid1_idx,vid2_idx,pair,<signal>_raw...,<signal>_score...,composite,similar`
pub fn write_comparison(
    dir: &Path,
    results: &[PairResult],
    schema: &SignalSchema,
    similar_percentage: f64,
) -> Result<PathBuf> {
    let path = dir.join(COMPARISON_FILE);
    let mut writer = create(&path)?;
    let names = schema.names();

    let mut header = vec!["vid1_idx".to_string(), "vid2_idx".to_string(), "pair".to_string()];
    header.extend(names.iter().map(|s| format!("{}_raw", s)));
    header.extend(names.iter().map(|s| format!("{}_score", s)));
    header.push("composite".to_string());
    header.push("similar".to_string());
    write_row(&mut writer, &header)?;

    for result in results {
        let mut row = vec![
            result.first().to_string(),
            result.second().to_string(),
            result.pair_id(),
        ];
        row.extend(result.raw.iter().map(|v| v.to_string()));
        row.extend(result.scores.iter().map(|v| v.to_string()));
        row.push(result.composite.to_string());
        row.push(is_similar(result, similar_percentage).to_string());
        write_row(&mut writer, &row)?;
    }

    writer.flush()?;
    Ok(path)
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    signals: &'a SignalSchema,
    stats: &'a SimilarityStats,
    items: &'a [Item],
    pairs: Vec<ExplainedPair>,
}

pub fn write_json_report(
    dir: &Path,
    items: &[Item],
    results: &[PairResult],
    schema: &SignalSchema,
    stats: &SimilarityStats,
    similar_percentage: f64,
) -> Result<PathBuf> {
    let path = dir.join(REPORT_FILE);
    let mut writer = create(&path)?;

    let report = Report {
        signals: schema,
        stats,
        items,
        pairs: ExplainedPair::from_results(results, schema, similar_percentage),
    };
    serde_json::to_writer_pretty(&mut writer, &report).context("Failed to serialize report")?;
    writer.flush()?;
    Ok(path)
}
