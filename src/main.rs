use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vidsim_pipeline::{ExportFormat, Pipeline, PipelineConfig};

/// Pairwise similarity scoring for a batch of videos
#[derive(Parser, Debug)]
#[command(name = "vidsim")]
#[command(about = "Score every pair of videos in a list by perceptual similarity", long_about = None)]
struct Args {
    /// CSV list of video URLs or paths, optionally followed by precomputed codes
    sources: PathBuf,

    /// JSON pipeline config (signals, weights, extractors)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for downloaded videos
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Directory for result files
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Result file format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Keep downloaded videos after the run
    #[arg(long)]
    keep_cache: bool,

    /// Maximum difference, in percent, for a pair to count as similar
    #[arg(long)]
    similar_percentage: Option<f64>,

    /// Videos processed at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

impl Args {
    fn into_config(self) -> anyhow::Result<(PathBuf, PipelineConfig)> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(dir) = self.cache_dir {
            config.cache_dir = dir;
        }
        if let Some(dir) = self.export_dir {
            config.export_dir = dir;
        }
        if let Some(format) = self.format {
            config.export_format = format.into();
        }
        if self.keep_cache {
            config.remove_cache = false;
        }
        if let Some(p) = self.similar_percentage {
            config.similar_percentage = p;
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }

        Ok((self.sources, config))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting vidsim v{}", env!("CARGO_PKG_VERSION"));

    let (sources, config) = args.into_config()?;
    info!("Signals: {:?}", config.schema.names());
    info!("Weights: {:?}", config.schema.weights());
    info!("Cache directory: {:?}", config.cache_dir);
    info!("Export directory: {:?}", config.export_dir);

    let pipeline = Pipeline::new(config)?;
    let report = pipeline.run(&sources).await?;

    info!(
        "Done: {} videos, {} pairs, {} similar (threshold {:.3})",
        report.items.len(),
        report.stats.pair_count,
        report.stats.similar_count,
        report.stats.threshold
    );
    println!("{}", serde_json::to_string_pretty(&report.stats)?);

    Ok(())
}
