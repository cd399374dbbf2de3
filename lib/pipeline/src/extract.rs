//! Code extraction through external programs
//!
//! Each signal is backed by a program that receives the video path and
//! prints the code on stdout, e.g. a perceptual video hasher or `fpcalc`.

use crate::config::ExtractorConfig;
use crate::retry::{retry, RetryPolicy};
use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use vidsim_core::Code;

#[derive(Debug, Clone)]
pub struct CommandExtractor {
    signal: String,
    config: ExtractorConfig,
}

impl CommandExtractor {
    pub fn new(signal: impl Into<String>, config: ExtractorConfig) -> Self {
        Self {
            signal: signal.into(),
            config,
        }
    }

    pub fn signal(&self) -> &str {
        &self.signal
    }

    /// Run the program once and parse its output
    pub async fn extract(&self, input: &Path) -> Result<Code> {
        let args = self.config.render_args(input);
        let program = &self.config.program;

        let mut command = Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| anyhow!("{} timed out after {}s", program, self.config.timeout_secs))?
            .with_context(|| format!("Failed to run {}", program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{} exited with {}: {}", program, output.status, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_output(&stdout, self.config.line_prefix.as_deref())
            .ok_or_else(|| anyhow!("{} printed no code for {:?}", program, input))
    }

    /// Run with retries; gives up with the empty code
    pub async fn extract_or_missing(&self, input: &Path, policy: &RetryPolicy) -> Code {
        let label = format!("Extracting '{}' from {:?}", self.signal, input);
        match retry(policy, &label, || self.extract(input)).await {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!("{} gave up: {:#}", label, e);
                Code::missing()
            }
        }
    }
}

/// Pick the code out of an extractor's stdout
///
/// Without a prefix the first non-blank line is the code. With a prefix the
/// code is the rest of the first line carrying it.
pub fn parse_output(stdout: &str, line_prefix: Option<&str>) -> Option<Code> {
    let code = match line_prefix {
        Some(prefix) => stdout
            .lines()
            .find_map(|line| line.trim().strip_prefix(prefix).map(str::trim)),
        None => stdout.lines().map(str::trim).find(|line| !line.is_empty()),
    };

    code.filter(|c| !c.is_empty()).map(Code::from)
}
