//! File I/O for pagedeck.
//!
//! The engine itself works on byte buffers; this module is the file-backed
//! rim around it:
//! - Opening PDF files into [`crate::document::DocumentHandle`]s, with
//!   parallel loading for multi-document operations
//! - Writing assembled output buffers to disk atomically
//!
//! # Examples
//!
//! ```no_run
//! use pagedeck::io::{DocumentReader, OutputWriter};
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let reader = DocumentReader::new();
//! let opened = reader.open(Path::new("input.pdf")).await?;
//! println!("{} pages", opened.handle.page_count());
//!
//! let writer = OutputWriter::new();
//! writer.save(&bytes, Path::new("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{DocumentReader, LoadStats, OpenResult, OpenedDocument};
pub use writer::{OutputWriter, WriteStats};

use std::path::Path;

use crate::document::DocumentHandle;
use crate::error::Result;

/// Open a PDF file into a document handle.
///
/// Convenience function for the single-file case.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid PDF.
pub async fn open_document(path: &Path) -> Result<DocumentHandle> {
    let reader = DocumentReader::new();
    let opened = reader.open(path).await?;
    Ok(opened.handle)
}

/// Write an assembled byte buffer to a file.
///
/// Convenience function using atomic writes.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn write_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    let writer = OutputWriter::new();
    writer.save(bytes, path).await
}
