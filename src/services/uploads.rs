//! Upload area for contract sources awaiting analysis.
//!
//! Files are stored under generated names so concurrent uploads never collide
//! and client-supplied names never reach the filesystem as paths.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::Rng;
use tokio::io::AsyncWriteExt;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Accepted source extension, compared case-insensitively.
pub const CONTRACT_EXTENSION: &str = "sol";

/// Multipart field carrying the contract file.
pub const CONTRACT_FIELD: &str = "contractFile";

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.max_upload_bytes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if it does not exist.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Reject client file names without the contract extension.
    pub fn validate_name(&self, original_name: &str) -> Result<(), AppError> {
        let has_extension = original_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(CONTRACT_EXTENSION));
        if !has_extension {
            return Err(AppError::Validation(format!(
                "Only .{CONTRACT_EXTENSION} files are allowed"
            )));
        }
        Ok(())
    }

    fn validate_size(&self, len: usize) -> Result<(), AppError> {
        if len > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the maximum size of {} bytes",
                self.max_bytes
            )));
        }
        Ok(())
    }

    /// Validate and persist an uploaded file, returning its generated name.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<String, AppError> {
        self.validate_name(original_name)?;
        self.validate_size(data.len())?;

        let filename = generate_name(original_name);
        let path = self.dir.join(&filename);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;

        tracing::info!(filename = %filename, bytes = data.len(), "Contract file stored");
        Ok(filename)
    }

    /// Resolve a generated name to an existing file inside the upload area.
    pub async fn locate(&self, filename: &str) -> Result<PathBuf, AppError> {
        let not_found = || AppError::NotFound("Contract file not found".to_string());

        if !is_plain_file_name(filename) {
            return Err(not_found());
        }

        let path = self.dir.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(not_found()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file. Failures are logged only.
    pub async fn remove(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::info!(path = %path.display(), "Cleaned up contract file"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to clean up contract file"),
        }
    }

    /// Delete every file in the upload area concurrently. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "Upload sweep failed");
                return 0;
            }
        };

        let mut paths = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => paths.push(entry.path()),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Upload sweep stopped listing early");
                    break;
                }
            }
        }

        let results = futures::future::join_all(paths.iter().map(tokio::fs::remove_file)).await;

        let mut removed = 0;
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Sweep failed to delete file"),
            }
        }
        removed
    }
}

/// `<stem>-<unix millis>-<random>.sol`, with the stem reduced to a safe charset.
pub fn generate_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);
    let mut safe: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.is_empty() {
        safe = "contract".to_string();
    }

    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{safe}-{millis}-{suffix}.{CONTRACT_EXTENSION}")
}

/// A bare file name: no separators and no parent references.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\', '\0'])
        && name != "."
        && !name.contains("..")
}
