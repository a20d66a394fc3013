//! Slither subprocess invocation.
//!
//! Slither's exit status is not meaningful for us: it exits non-zero whenever
//! a detector fires, and useful output shows up on either stream. Every run
//! therefore returns whatever was captured; only a failure to spawn is an
//! error.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Substrings that mark summary-mode stderr as worth keeping.
const INFORMATIVE_STDERR: &[&str] = &["contracts in source files", "Source lines of code", "Number of"];

/// Invocation modes used by the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlitherMode {
    /// `--print human-summary`: aggregate metrics.
    Summary,
    /// No flags: one line per detector hit.
    Full,
    /// `--checklist`: long-form markdown report.
    Checklist,
}

impl SlitherMode {
    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Summary => &["--print", "human-summary"],
            Self::Full => &[],
            Self::Checklist => &["--checklist"],
        }
    }
}

impl std::fmt::Display for SlitherMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Full => write!(f, "full"),
            Self::Checklist => write!(f, "checklist"),
        }
    }
}

/// Captured streams of one run.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Runs the configured Slither executable against uploaded files.
#[derive(Debug, Clone)]
pub struct SlitherRunner {
    bin: String,
    max_output_bytes: usize,
}

impl SlitherRunner {
    pub fn new(bin: impl Into<String>, max_output_bytes: usize) -> Self {
        Self {
            bin: bin.into(),
            max_output_bytes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.slither_bin.clone(), config.slither_max_output_bytes)
    }

    /// Run one mode against `file`. The path is passed as a single argument, never through a shell.
    ///
    /// At most `max_output_bytes` of each stream is kept in memory; the rest
    /// is drained and discarded so the child never blocks on a full pipe.
    pub async fn run(&self, file: &Path, mode: SlitherMode) -> Result<ToolOutput, AppError> {
        let mut child = Command::new(&self.bin)
            .arg(file)
            .args(mode.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AppError::ExternalTool(format!("Failed to spawn {} ({mode} mode): {e}", self.bin))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::Internal("Slither stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AppError::Internal("Slither stderr was not captured".to_string()))?;

        let (stdout, stderr, status) = tokio::try_join!(
            read_capped(stdout, self.max_output_bytes),
            read_capped(stderr, self.max_output_bytes),
            child.wait(),
        )
        .map_err(|e| AppError::ExternalTool(format!("Failed to collect {mode} output: {e}")))?;

        let result = ToolOutput {
            stdout: decode_capped(&stdout, self.max_output_bytes),
            stderr: decode_capped(&stderr, self.max_output_bytes),
            exit_code: status.code(),
        };

        tracing::debug!(
            mode = %mode,
            exit_code = ?result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "Slither run finished"
        );

        Ok(result)
    }

    /// Summary-mode output: stdout, plus stderr only when it carries summary lines.
    pub async fn summary(&self, file: &Path) -> Result<String, AppError> {
        let out = self.run(file, SlitherMode::Summary).await?;
        let combined = combine_summary(&out);
        if combined.trim().is_empty() {
            return Err(AppError::ExternalTool(
                "No output received from Slither analysis".to_string(),
            ));
        }
        Ok(combined)
    }

    /// Full-mode output: stdout and stderr concatenated, unfiltered.
    pub async fn full(&self, file: &Path) -> Result<String, AppError> {
        let out = self.run(file, SlitherMode::Full).await?;
        Ok(out.stdout + &out.stderr)
    }

    /// Checklist report: stdout, else stderr, else empty. Never fails.
    pub async fn checklist(&self, file: &Path) -> String {
        match self.run(file, SlitherMode::Checklist).await {
            Ok(out) if !out.stdout.is_empty() => out.stdout,
            Ok(out) => out.stderr,
            Err(e) => {
                tracing::warn!(error = %e, "Checklist report unavailable");
                String::new()
            }
        }
    }

    /// Version string reported by `slither --version`, used by the readiness probe.
    pub async fn version(&self) -> Result<String, AppError> {
        let output = Command::new(&self.bin)
            .arg("--version")
            .output()
            .await
            .map_err(|e| AppError::ExternalTool(format!("Failed to spawn {}: {e}", self.bin)))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn combine_summary(out: &ToolOutput) -> String {
    let mut combined = out.stdout.clone();
    if !out.stderr.is_empty() {
        if is_informative(&out.stderr) {
            combined.push('\n');
            combined.push_str(&out.stderr);
        } else {
            tracing::debug!(stderr = %out.stderr, "Discarding summary-mode stderr");
        }
    }
    combined
}

fn is_informative(stderr: &str) -> bool {
    INFORMATIVE_STDERR.iter().any(|marker| stderr.contains(marker))
}

/// Read up to `max` bytes from a pipe, then drain whatever is left.
async fn read_capped<R>(mut reader: R, max: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut kept = Vec::new();
    (&mut reader).take(max as u64).read_to_end(&mut kept).await?;

    let discarded = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    if discarded > 0 {
        tracing::warn!(limit = max, discarded, "Slither output truncated");
    }
    Ok(kept)
}

/// Lossy UTF-8 decode, truncated to at most `max` bytes on a char boundary.
fn decode_capped(bytes: &[u8], max: usize) -> String {
    let mut text = String::from_utf8_lossy(bytes).into_owned();
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}
