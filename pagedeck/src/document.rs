//! Opened source documents.
//!
//! A [`DocumentHandle`] is the parsed, read-only representation of one input
//! PDF: the object model plus the page facts (count, sizes) the editing
//! layer needs. Handles are immutable once constructed: all editing happens
//! on page sequences, and re-opening the bytes is the only way to "reset".
//!
//! A [`DocumentRegistry`] holds every handle an editing session still
//! references, keyed by [`DocumentId`], and is handed to the assembler
//! together with the finished sequence.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use lopdf::{Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::{PagedeckError, Result};
use crate::page::{DEFAULT_PAGE_SIZE, PageSize};

/// Opaque identifier of an opened document, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(u64);

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

impl DocumentId {
    fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc-{}", self.0)
    }
}

/// An opened, parsed, immutable source PDF.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    id: DocumentId,
    document: Document,
    byte_length: usize,
    page_count: usize,
    page_sizes: Vec<PageSize>,
}

impl DocumentHandle {
    /// Parse a PDF byte buffer into a handle.
    ///
    /// # Errors
    ///
    /// Returns [`PagedeckError::Parse`] if the buffer is not a well-formed
    /// PDF or has no pages, and [`PagedeckError::Encrypted`] if the document
    /// is password-protected. Encrypted inputs must be unlocked elsewhere;
    /// this engine only accepts already-decrypted bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let document = Document::load_mem(bytes).map_err(|e| {
            let reason = e.to_string();
            if reason.contains("encrypt") || reason.contains("password") {
                PagedeckError::Encrypted
            } else {
                PagedeckError::parse(reason)
            }
        })?;

        if document.is_encrypted() {
            return Err(PagedeckError::Encrypted);
        }

        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(PagedeckError::parse("document has no pages"));
        }

        let page_sizes = pages
            .values()
            .map(|&page_id| media_box(&document, page_id).unwrap_or(DEFAULT_PAGE_SIZE))
            .collect();

        Ok(Self {
            id: DocumentId::next(),
            byte_length: bytes.len(),
            page_count: pages.len(),
            page_sizes,
            document,
        })
    }

    /// Open a PDF byte buffer asynchronously.
    ///
    /// Parsing is CPU-bound and proportional to document size, so it runs
    /// on the blocking thread pool rather than the async runtime.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pagedeck::document::DocumentHandle;
    /// # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
    /// let handle = DocumentHandle::open(bytes).await?;
    /// println!("{} pages", handle.page_count());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open(bytes: Vec<u8>) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::parse(&bytes))
            .await
            .map_err(|e| PagedeckError::other(format!("parse task failed: {e}")))?
    }

    /// Identifier of this handle.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Size of the original byte buffer.
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Size of one page, by zero-based index.
    pub fn page_size(&self, index: usize) -> Option<PageSize> {
        self.page_sizes.get(index).copied()
    }

    /// Sizes of all pages, in page order.
    pub fn page_sizes(&self) -> &[PageSize] {
        &self.page_sizes
    }

    /// Parsed object model, for the assembler.
    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    /// Build a serializable summary of this document.
    pub fn summary(&self) -> DocumentSummary {
        let version = self.document.version.split_once('.').map(|(major, minor)| {
            (
                major.parse::<u8>().unwrap_or_default(),
                minor.parse::<u8>().unwrap_or_default(),
            )
        });

        DocumentSummary {
            page_count: self.page_count,
            byte_length: self.byte_length,
            version,
            object_count: self.document.objects.len(),
            page_sizes: self.page_sizes.clone(),
        }
    }
}

/// Summary facts about an opened document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// Number of pages.
    pub page_count: usize,

    /// Size of the source byte buffer.
    pub byte_length: usize,

    /// PDF version (major, minor).
    pub version: Option<(u8, u8)>,

    /// Number of objects in the document.
    pub object_count: usize,

    /// Per-page dimensions in points.
    pub page_sizes: Vec<PageSize>,
}

/// The set of opened documents an editing session still holds.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    handles: HashMap<DocumentId, DocumentHandle>,
}

impl DocumentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle, returning its identifier.
    pub fn insert(&mut self, handle: DocumentHandle) -> DocumentId {
        let id = handle.id();
        self.handles.insert(id, handle);
        id
    }

    /// Look up a handle by identifier.
    pub fn get(&self, id: DocumentId) -> Option<&DocumentHandle> {
        self.handles.get(&id)
    }

    /// Check whether a handle is present.
    pub fn contains(&self, id: DocumentId) -> bool {
        self.handles.contains_key(&id)
    }

    /// Drop a handle, returning it if it was present.
    pub fn remove(&mut self, id: DocumentId) -> Option<DocumentHandle> {
        self.handles.remove(&id)
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Resolve a page's MediaBox, following Parent inheritance.
///
/// The box may live on the page itself or any ancestor Pages node, and may
/// be an indirect reference. Returns None when no ancestor carries one.
fn media_box(doc: &Document, page_id: ObjectId) -> Option<PageSize> {
    const MAX_DEPTH: usize = 16;

    let mut current = page_id;
    for _ in 0..MAX_DEPTH {
        let dict = doc.get_object(current).ok()?.as_dict().ok()?;

        if let Ok(raw) = dict.get(b"MediaBox") {
            let resolved = match raw {
                Object::Reference(id) => doc.get_object(*id).ok()?,
                other => other,
            };
            if let Object::Array(rect) = resolved
                && rect.len() >= 4
            {
                let x0 = rect[0].as_float().ok()?;
                let y0 = rect[1].as_float().ok()?;
                let x1 = rect[2].as_float().ok()?;
                let y1 = rect[3].as_float().ok()?;
                return Some(PageSize::new((x1 - x0).abs(), (y1 - y0).abs()));
            }
            return None;
        }

        match dict.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent) => current = parent,
            Err(_) => return None,
        }
    }

    None
}
