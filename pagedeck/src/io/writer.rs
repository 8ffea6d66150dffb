//! Writing assembled output to disk.
//!
//! Writes are atomic by default: the buffer goes to a temporary sibling
//! file which is renamed over the target, so a crash mid-write never
//! leaves a truncated PDF behind.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PagedeckError, Result};

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStats {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStats {
    /// Format file size as a human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes output byte buffers to disk.
pub struct OutputWriter {
    atomic: bool,
}

impl OutputWriter {
    /// Create a writer with atomic writes enabled.
    pub fn new() -> Self {
        Self { atomic: true }
    }

    /// Create a writer without atomic writes (faster, less safe).
    pub fn non_atomic() -> Self {
        Self { atomic: false }
    }

    /// Write a byte buffer to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be created or written.
    pub async fn save(&self, bytes: &[u8], path: &Path) -> Result<()> {
        let _stats = self.save_with_stats(bytes, path).await?;
        Ok(())
    }

    /// Write a byte buffer and return statistics about the operation.
    pub async fn save_with_stats(&self, bytes: &[u8], path: &Path) -> Result<WriteStats> {
        let start = Instant::now();

        let write_path = if self.atomic {
            path.with_extension("tmp")
        } else {
            path.to_path_buf()
        };

        tokio::fs::write(&write_path, bytes).await.map_err(|e| {
            PagedeckError::FailedToCreateOutput {
                path: write_path.clone(),
                source: e,
            }
        })?;

        if self.atomic {
            tokio::fs::rename(&write_path, path)
                .await
                .map_err(|e| PagedeckError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }

        Ok(WriteStats {
            write_time: start.elapsed(),
            file_size: bytes.len() as u64,
            output_path: path.to_path_buf(),
        })
    }

    /// Check whether the output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    /// Remove an output file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn remove_if_exists(&self, path: &Path) -> Result<()> {
        if self.exists(path).await {
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| PagedeckError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format file size as human-readable string.
fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
