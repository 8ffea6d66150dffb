//! pagedeck - Edit the page sequence of PDF documents.
//!
//! This library models an opened PDF as an immutable source of pages and an
//! ordered, editable sequence of page references. Transforms never mutate a
//! sequence in place: every operation returns a new sequence, so holding a
//! reference to an earlier state is always safe (and undo is a matter of
//! keeping old values around). A finished sequence is assembled back into a
//! standalone PDF byte buffer.
//!
//! Supported operations:
//!
//! - Page removal and extraction by selection
//! - Reordering by swap, drag-and-drop move, or a full permutation
//! - Per-page and whole-document rotation
//! - Blank page insertion
//! - Splicing entire documents at arbitrary positions
//! - Concatenating any number of documents
//!
//! # Examples
//!
//! ## Reverse a document
//!
//! ```no_run
//! use pagedeck::assemble::Assembler;
//! use pagedeck::document::{DocumentHandle, DocumentRegistry};
//! use pagedeck::sequence::PageSequence;
//! use pagedeck::ops;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let handle = DocumentHandle::open(bytes).await?;
//! let sequence = PageSequence::from_document(&handle);
//!
//! let order: Vec<usize> = (1..=sequence.len()).rev().collect();
//! let reversed = ops::apply_permutation(&sequence, &order)?;
//!
//! let mut registry = DocumentRegistry::new();
//! registry.insert(handle);
//!
//! let bytes = Assembler::new().serialize(&reversed, &registry).await?;
//! println!("produced {} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Combine two documents
//!
//! ```no_run
//! use pagedeck::assemble::Assembler;
//! use pagedeck::document::{DocumentHandle, DocumentRegistry};
//! use pagedeck::sequence::PageSequence;
//! use pagedeck::ops;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let first = DocumentHandle::open(a).await?;
//! let second = DocumentHandle::open(b).await?;
//!
//! let combined = ops::merge(&[
//!     PageSequence::from_document(&first),
//!     PageSequence::from_document(&second),
//! ])?;
//!
//! let mut registry = DocumentRegistry::new();
//! registry.insert(first);
//! registry.insert(second);
//!
//! let bytes = Assembler::new().serialize(&combined, &registry).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod document;
pub mod error;
pub mod input;
pub mod io;
pub mod ops;
pub mod page;
pub mod sequence;

// Re-export commonly used types
pub use document::{DocumentHandle, DocumentId, DocumentRegistry};
pub use error::{PagedeckError, Result};
pub use page::{PageRef, PageSize, PageSource, Rotation};
pub use sequence::PageSequence;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
