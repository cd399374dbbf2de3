//! Video acquisition
//!
//! Local sources are resolved in place; HTTP(S) sources are downloaded into
//! the cache directory as `{index}.{ext}`.

use crate::retry::{retry, RetryPolicy};
use crate::source::is_remote;
use anyhow::{anyhow, Context, Result};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Extension used when a URL does not reveal one
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Where an item's video ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquired {
    /// An existing local file, never removed by cache cleanup
    Local(PathBuf),
    /// A file downloaded into the cache directory
    Downloaded(PathBuf),
}

impl Acquired {
    pub fn path(&self) -> &Path {
        match self {
            Acquired::Local(p) | Acquired::Downloaded(p) => p,
        }
    }

    pub fn is_downloaded(&self) -> bool {
        matches!(self, Acquired::Downloaded(_))
    }
}

pub struct Acquirer {
    client: reqwest::Client,
    cache_dir: PathBuf,
    retry: RetryPolicy,
}

impl Acquirer {
    pub fn new<P: AsRef<Path>>(cache_dir: P, retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_dir: cache_dir.as_ref().to_path_buf(),
            retry,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Make the video for source `index` available on disk
    pub async fn acquire(&self, index: usize, source: &str) -> Result<Acquired> {
        if !is_remote(source) {
            let path = tokio::fs::canonicalize(source)
                .await
                .with_context(|| format!("Local source not found: {}", source))?;
            return Ok(Acquired::Local(path));
        }

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .with_context(|| format!("Failed to create cache dir {:?}", self.cache_dir))?;

        let target = self.cache_path(index, source);
        let label = format!("Download of {}", source);
        retry(&self.retry, &label, || self.download(source, &target)).await?;

        tracing::debug!("Downloaded {} to {:?}", source, target);
        Ok(Acquired::Downloaded(target))
    }

    /// Cache location for a downloaded source
    pub fn cache_path(&self, index: usize, source: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", index, url_extension(source)))
    }

    async fn download(&self, url: &str, target: &Path) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to download video: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Failed to download video: HTTP {}", response.status()));
        }

        let written = write_body(response, target).await;
        if written.is_err() {
            let _ = tokio::fs::remove_file(target).await;
        }
        written
    }
}

/// Stream a response body to `target` chunk by chunk
async fn write_body(response: reqwest::Response, target: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(target)
        .await
        .with_context(|| format!("Failed to create {:?}", target))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| anyhow!("Failed to read video data: {}", e))?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {:?}", target))?;
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to write {:?}", target))?;
    Ok(())
}

/// File extension of the last URL path segment, or `mp4`
pub fn url_extension(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .and_then(|segment| {
            segment
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
        })
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
