//! Error types for pagedeck.
//!
//! All engine operations return [`PagedeckError`]. The taxonomy separates
//! four failure classes:
//!
//! - **Parse errors**: input bytes are not an openable PDF.
//! - **Range errors**: an index or position is outside the sequence. These
//!   indicate a caller defect; the engine rejects instead of clamping.
//! - **Invalid operations**: structurally well-formed but semantically
//!   illegal requests (removing every page, an incomplete reorder list).
//!   These carry enough detail for an actionable message.
//! - **Serialization errors**: internal consistency failures while writing
//!   the output document.
//!
//! File-level variants back the async reader and writer in [`crate::io`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentId;

/// Result type alias for pagedeck operations.
pub type Result<T> = std::result::Result<T, PagedeckError>;

/// Main error type for pagedeck operations.
#[derive(Debug, Error)]
pub enum PagedeckError {
    /// Input bytes could not be parsed as a PDF document.
    #[error("failed to parse PDF: {reason}\n  Hint: select a valid, unencrypted PDF file")]
    Parse {
        /// Reason reported by the parser.
        reason: String,
    },

    /// The document is encrypted and cannot be edited.
    #[error(
        "document is encrypted and cannot be edited\n  \
         Hint: unlock the document first, then re-open the decrypted bytes"
    )]
    Encrypted,

    /// An index or position falls outside the page sequence.
    #[error("index {index} is out of range for a sequence of {len} page(s)")]
    IndexOutOfRange {
        /// The offending zero-based index.
        index: usize,
        /// Length of the sequence at the time of the request.
        len: usize,
    },

    /// A semantically illegal request on a well-formed sequence.
    #[error("{reason}")]
    InvalidOperation {
        /// Description of what made the request illegal.
        reason: String,
    },

    /// A rotation value that does not normalize to 0, 90, 180 or 270.
    #[error("invalid rotation {degrees}: rotations must be a multiple of 90 degrees")]
    InvalidRotation {
        /// The rejected value, in degrees.
        degrees: i64,
    },

    /// A reorder list that does not mention every page.
    #[error("reorder list is incomplete: missing page number(s) {}", join_pages(.missing))]
    PermutationMissing {
        /// 1-based page numbers absent from the list.
        missing: Vec<usize>,
    },

    /// A reorder list that mentions a page more than once.
    #[error("reorder list repeats page number(s) {}", join_pages(.duplicates))]
    PermutationDuplicate {
        /// 1-based page numbers that appear more than once.
        duplicates: Vec<usize>,
    },

    /// A free-text page list that could not be parsed.
    #[error("invalid page list entry '{entry}': {reason}")]
    PageList {
        /// The offending fragment of the input.
        entry: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A sequence entry references a document that is not in the registry.
    ///
    /// This is a programming invariant violation: sequences must only be
    /// serialized against registries that still hold every source they
    /// reference.
    #[error("source document {id} is missing from the registry\n  Hint: re-open the file and rebuild the sequence")]
    MissingSource {
        /// Identifier of the absent document.
        id: DocumentId,
    },

    /// Writing the output document failed.
    #[error("serialization failed: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// Input file was not found.
    #[error("file not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file could not be read.
    #[error("cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwriting is not allowed.
    #[error(
        "output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Output file could not be created.
    #[error("failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file could not be written.
    #[error("failed to write output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl PagedeckError {
    /// Create a Parse error.
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    /// Create an IndexOutOfRange error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an InvalidOperation error.
    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the request rather than the input
    /// document.
    ///
    /// Request errors leave the sequence untouched and can be retried with
    /// corrected parameters; the others require re-opening the source.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::InvalidOperation { .. }
                | Self::InvalidRotation { .. }
                | Self::PermutationMissing { .. }
                | Self::PermutationDuplicate { .. }
                | Self::PageList { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parse { .. } | Self::Encrypted => 3,
            Self::IndexOutOfRange { .. }
            | Self::InvalidOperation { .. }
            | Self::InvalidRotation { .. }
            | Self::PermutationMissing { .. }
            | Self::PermutationDuplicate { .. }
            | Self::PageList { .. } => 1,
            Self::MissingSource { .. } | Self::Serialization { .. } => 6,
            Self::FileNotFound { .. } | Self::NotAFile { .. } | Self::FileNotAccessible { .. } => 2,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } | Self::FailedToWrite { .. } | Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}

/// Render a page-number list as "3" or "3, 7, 9".
fn join_pages(pages: &[usize]) -> String {
    pages
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
