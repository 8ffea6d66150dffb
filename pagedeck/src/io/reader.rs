//! Opening PDF files from disk.
//!
//! Supports sequential and parallel loading with per-file results, so one
//! unreadable file in a batch does not discard the others. Results always
//! come back in input order regardless of completion order.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::document::DocumentHandle;
use crate::error::{PagedeckError, Result};

/// A document opened from a file, with load metadata.
#[derive(Debug)]
pub struct OpenedDocument {
    /// The parsed document handle.
    pub handle: DocumentHandle,

    /// Path to the source file.
    pub path: PathBuf,

    /// Time taken to read and parse.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// Result of opening one file.
pub type OpenResult = Result<OpenedDocument>;

/// Statistics for a batch open operation.
#[derive(Debug, Clone)]
pub struct LoadStats {
    /// Number of files successfully opened.
    pub success_count: usize,

    /// Number of files that failed to open.
    pub failure_count: usize,

    /// Wall-clock time for the whole batch.
    pub total_time: Duration,

    /// Total pages across successfully opened files.
    pub total_pages: usize,

    /// Total size of successfully opened files.
    pub total_size: u64,
}

impl LoadStats {
    fn from_results(results: &[OpenResult], total_time: Duration) -> Self {
        let mut success_count = 0;
        let mut failure_count = 0;
        let mut total_pages = 0;
        let mut total_size = 0;

        for result in results {
            match result {
                Ok(opened) => {
                    success_count += 1;
                    total_pages += opened.handle.page_count();
                    total_size += opened.file_size;
                }
                Err(_) => failure_count += 1,
            }
        }

        Self {
            success_count,
            failure_count,
            total_time,
            total_pages,
            total_size,
        }
    }

    /// Format total size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Opens PDF files into document handles.
#[derive(Debug, Clone, Default)]
pub struct DocumentReader;

impl DocumentReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Open a single PDF file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not point to a readable file, or
    /// if the bytes fail to parse (see [`DocumentHandle::parse`]).
    pub async fn open(&self, path: &Path) -> Result<OpenedDocument> {
        let start = Instant::now();

        if !path.exists() {
            return Err(PagedeckError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(PagedeckError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PagedeckError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?;

        let file_size = bytes.len() as u64;
        let handle = DocumentHandle::open(bytes).await?;

        Ok(OpenedDocument {
            handle,
            path: path.to_path_buf(),
            load_time: start.elapsed(),
            file_size,
        })
    }

    /// Open multiple files one at a time, in order.
    pub async fn open_sequential(&self, paths: &[PathBuf]) -> Vec<OpenResult> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            results.push(self.open(path).await);
        }
        results
    }

    /// Open multiple files concurrently.
    ///
    /// Results are returned in input order, not completion order; callers
    /// rely on position to pair results with their paths.
    pub async fn open_parallel(&self, paths: &[PathBuf], workers: usize) -> Vec<OpenResult> {
        use futures::stream::{self, StreamExt};

        let workers = workers.max(1);

        let tasks = paths.iter().enumerate().map(|(index, path)| {
            let path = path.clone();
            let reader = self.clone();
            async move { (index, reader.open(&path).await) }
        });

        let mut indexed: Vec<(usize, OpenResult)> = stream::iter(tasks)
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    /// Open all files with automatic parallelization.
    ///
    /// Small batches load sequentially to skip the task overhead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pagedeck::io::DocumentReader;
    /// # use std::path::PathBuf;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = DocumentReader::new();
    /// let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
    /// let (results, stats) = reader.open_all(&paths, 4).await;
    /// println!("opened {} of {} files", stats.success_count, paths.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open_all(
        &self,
        paths: &[PathBuf],
        max_workers: usize,
    ) -> (Vec<OpenResult>, LoadStats) {
        let start = Instant::now();

        let results = if paths.len() <= 3 {
            self.open_sequential(paths).await
        } else {
            self.open_parallel(paths, max_workers).await
        };

        let stats = LoadStats::from_results(&results, start.elapsed());
        (results, stats)
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
