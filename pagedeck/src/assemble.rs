//! Assembly of a finished page sequence into a new PDF document.
//!
//! The assembler copies every referenced page out of its source document
//! into a freshly created output document, in sequence order, applying each
//! entry's rotation and synthesizing blank pages where the sequence asks
//! for them. The result is a standalone byte buffer; the caller decides
//! what to do with it (offer a download, write a file).
//!
//! Guarantees:
//! - output page count equals the sequence length exactly
//! - output page order equals entry order exactly
//! - each output page's `/Rotate` equals the entry's rotation exactly
//! - attributes a source page inherits from its page tree (`Resources`,
//!   `MediaBox`, `CropBox`) are written onto the page itself, since the
//!   source tree does not survive assembly

use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;
use std::time::{Duration, Instant};

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::document::{DocumentId, DocumentRegistry};
use crate::error::{PagedeckError, Result};
use crate::page::{PageSize, PageSource};
use crate::sequence::PageSequence;

/// Compression level for the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - preserves exact structure.
    None,
    /// Balanced compression - good trade-off between size and time.
    #[default]
    Standard,
    /// Maximum compression - smallest output, longest processing.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PagedeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PagedeckError::invalid_operation(format!(
                "invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Info-dictionary metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputMetadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl OutputMetadata {
    /// Create metadata from optional strings, dropping blank values.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let clean = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            title: clean(title),
            author: clean(author),
            subject: clean(subject),
            keywords: clean(keywords),
        }
    }

    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }
}

/// Options for assembling the output document.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Compression level for the output.
    pub compression: CompressionLevel,

    /// Metadata to set on the output.
    pub metadata: OutputMetadata,
}

/// Statistics about an assembly.
#[derive(Debug, Clone)]
pub struct AssembleStats {
    /// Number of pages written.
    pub page_count: usize,

    /// How many of them were synthesized blank pages.
    pub blank_pages: usize,

    /// Number of distinct source documents referenced.
    pub sources_used: usize,

    /// Size of the output buffer in bytes.
    pub output_size: usize,

    /// Time taken to assemble.
    pub elapsed: Duration,
}

/// Assembles page sequences into standalone PDF byte buffers.
pub struct Assembler {
    options: AssembleOptions,
}

impl Assembler {
    /// Create an assembler with default options.
    pub fn new() -> Self {
        Self {
            options: AssembleOptions::default(),
        }
    }

    /// Create an assembler with custom options.
    pub fn with_options(options: AssembleOptions) -> Self {
        Self { options }
    }

    /// Create an assembler that skips compression (faster, larger output).
    pub fn without_compression() -> Self {
        Self {
            options: AssembleOptions {
                compression: CompressionLevel::None,
                ..Default::default()
            },
        }
    }

    /// Assemble a sequence into a PDF byte buffer.
    ///
    /// # Errors
    ///
    /// [`PagedeckError::InvalidOperation`] for an empty sequence,
    /// [`PagedeckError::MissingSource`] when an entry references a document
    /// absent from `sources`, and [`PagedeckError::Serialization`] for
    /// failures while writing the output.
    pub fn assemble(&self, seq: &PageSequence, sources: &DocumentRegistry) -> Result<Vec<u8>> {
        self.assemble_with_stats(seq, sources)
            .map(|(bytes, _)| bytes)
    }

    /// Assemble a sequence and return statistics about the operation.
    pub fn assemble_with_stats(
        &self,
        seq: &PageSequence,
        sources: &DocumentRegistry,
    ) -> Result<(Vec<u8>, AssembleStats)> {
        let start = Instant::now();

        if seq.is_empty() {
            return Err(PagedeckError::invalid_operation(
                "cannot write an empty document; the sequence has no pages",
            ));
        }

        let mut output = Document::with_version("1.7");
        let pages_id = output.new_object_id();

        let imported = import_sources(&mut output, seq, sources)?;

        // The first entry referencing a source page adopts the imported
        // object in place; repeat references get a fresh copy so each
        // entry keeps independent rotation and parent links.
        let mut adopted: HashSet<ObjectId> = HashSet::new();
        let mut kids: Vec<Object> = Vec::with_capacity(seq.len());
        let mut blank_pages = 0;

        for entry in seq.entries() {
            let rotation = Object::Integer(entry.rotation.as_degrees());

            let page_id = match entry.source {
                PageSource::Document { source, index } => {
                    let page_number = index as u32 + 1;
                    let copied_id = imported
                        .get(&source)
                        .and_then(|pages| pages.get(&page_number))
                        .copied()
                        .ok_or_else(|| {
                            PagedeckError::serialization(format!(
                                "page {page_number} not found in source {source}"
                            ))
                        })?;

                    if adopted.insert(copied_id) {
                        // Reparenting severs the page's chain into the
                        // source tree, which is pruned below; anything an
                        // ancestor held for this page must move onto the
                        // page dictionary first.
                        let inherited = inherited_attributes(&output, copied_id);
                        match output.get_object_mut(copied_id) {
                            Ok(Object::Dictionary(dict)) => {
                                for (key, value) in inherited {
                                    dict.set(key, value);
                                }
                                if !dict.has(b"MediaBox") {
                                    dict.set("MediaBox", media_box_rect(entry.size));
                                }
                                dict.set("Parent", Object::Reference(pages_id));
                                dict.set("Rotate", rotation);
                            }
                            _ => {
                                return Err(PagedeckError::serialization(format!(
                                    "source page {page_number} of {source} is not a dictionary"
                                )));
                            }
                        }
                        copied_id
                    } else {
                        let mut dict = match output.get_object(copied_id) {
                            Ok(Object::Dictionary(dict)) => dict.clone(),
                            _ => {
                                return Err(PagedeckError::serialization(format!(
                                    "source page {page_number} of {source} is not a dictionary"
                                )));
                            }
                        };
                        dict.set("Parent", Object::Reference(pages_id));
                        dict.set("Rotate", rotation);
                        output.add_object(Object::Dictionary(dict))
                    }
                }
                PageSource::Blank => {
                    blank_pages += 1;
                    let mut dict = dictionary! {
                        "Type" => "Page",
                        "MediaBox" => media_box_rect(entry.size),
                    };
                    dict.set("Parent", Object::Reference(pages_id));
                    dict.set("Rotate", rotation);
                    output.add_object(Object::Dictionary(dict))
                }
            };

            kids.push(Object::Reference(page_id));
        }

        output.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => seq.len() as i64,
            }),
        );

        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);

        self.apply_metadata(&mut output);

        // Drop everything the copied sources brought along that the output
        // does not reference (their catalogs, page trees, orphaned pages).
        output.prune_objects();

        match self.options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => {
                output.compress();
            }
            CompressionLevel::Maximum => {
                output.compress();
                output.prune_objects();
            }
        }

        // Always renumber for consistency
        output.renumber_objects();

        let mut buffer = Vec::new();
        output
            .save_to(&mut buffer)
            .map_err(|e| PagedeckError::serialization(format!("failed to write output: {e}")))?;

        let stats = AssembleStats {
            page_count: seq.len(),
            blank_pages,
            sources_used: imported.len(),
            output_size: buffer.len(),
            elapsed: start.elapsed(),
        };

        Ok((buffer, stats))
    }

    /// Assemble asynchronously.
    ///
    /// Assembly is CPU-bound and proportional to the content size of the
    /// referenced pages, so it runs on the blocking thread pool. The inputs
    /// are snapshotted; later edits to the registry do not affect an
    /// in-flight serialization.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pagedeck::assemble::Assembler;
    /// # use pagedeck::document::DocumentRegistry;
    /// # use pagedeck::sequence::PageSequence;
    /// # async fn example(seq: PageSequence, registry: DocumentRegistry)
    /// #     -> Result<(), Box<dyn std::error::Error>> {
    /// let bytes = Assembler::new().serialize(&seq, &registry).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn serialize(
        &self,
        seq: &PageSequence,
        sources: &DocumentRegistry,
    ) -> Result<Vec<u8>> {
        let assembler = Self {
            options: self.options.clone(),
        };
        let seq = seq.clone();
        let sources = sources.clone();

        tokio::task::spawn_blocking(move || assembler.assemble(&seq, &sources))
            .await
            .map_err(|e| PagedeckError::other(format!("assembly task failed: {e}")))?
    }

    /// Set Info-dictionary metadata on the output.
    fn apply_metadata(&self, output: &mut Document) {
        use lopdf::StringFormat;

        let metadata = &self.options.metadata;
        let mut info = lopdf::Dictionary::new();

        if let Some(ref title) = metadata.title {
            info.set(
                "Title",
                Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
            );
        }
        if let Some(ref author) = metadata.author {
            info.set(
                "Author",
                Object::String(author.as_bytes().to_vec(), StringFormat::Literal),
            );
        }
        if let Some(ref subject) = metadata.subject {
            info.set(
                "Subject",
                Object::String(subject.as_bytes().to_vec(), StringFormat::Literal),
            );
        }
        if let Some(ref keywords) = metadata.keywords {
            info.set(
                "Keywords",
                Object::String(keywords.as_bytes().to_vec(), StringFormat::Literal),
            );
        }

        info.set(
            "Producer",
            Object::String(
                format!("{} {}", crate::NAME, crate::VERSION).into_bytes(),
                StringFormat::Literal,
            ),
        );

        let info_id = output.add_object(Object::Dictionary(info));
        output.trailer.set("Info", Object::Reference(info_id));
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy every source document the sequence references into the output,
/// renumbered above the output's current id space.
///
/// Returns, per source, the map from 1-based page number to the copied
/// page's object id.
fn import_sources(
    output: &mut Document,
    seq: &PageSequence,
    sources: &DocumentRegistry,
) -> Result<HashMap<DocumentId, BTreeMap<u32, ObjectId>>> {
    let mut imported = HashMap::new();
    let mut max_id = output.max_id;

    for entry in seq.entries() {
        let PageSource::Document { source, .. } = entry.source else {
            continue;
        };
        if imported.contains_key(&source) {
            continue;
        }

        let handle = sources
            .get(source)
            .ok_or(PagedeckError::MissingSource { id: source })?;

        let mut doc = handle.document().clone();
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;

        let page_map = doc.get_pages();
        output.objects.extend(doc.objects);
        imported.insert(source, page_map);
    }

    output.max_id = max_id;
    Ok(imported)
}

/// Attributes a copied page inherits from its ancestor Pages nodes.
///
/// Walks the Parent chain for each inheritable key the page does not carry
/// itself and returns the nearest ancestor's value. References stay valid:
/// the referenced objects were imported with the source and are reachable
/// again once the page dictionary points at them directly.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(&'static str, Object)> {
    const INHERITABLE: [&str; 3] = ["Resources", "MediaBox", "CropBox"];
    const MAX_DEPTH: usize = 16;

    let mut found = Vec::new();

    'keys: for key in INHERITABLE {
        let mut current = page_id;
        for depth in 0..MAX_DEPTH {
            let Some(dict) = doc
                .get_object(current)
                .ok()
                .and_then(|obj| obj.as_dict().ok())
            else {
                continue 'keys;
            };

            if let Ok(value) = dict.get(key.as_bytes()) {
                // The page's own entry needs no copying
                if depth > 0 {
                    found.push((key, value.clone()));
                }
                continue 'keys;
            }

            match dict.get(b"Parent").and_then(|p| p.as_reference()) {
                Ok(parent) => current = parent,
                Err(_) => continue 'keys,
            }
        }
    }

    found
}

/// MediaBox rectangle for a page of the given size.
fn media_box_rect(size: PageSize) -> Vec<Object> {
    vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(size.width),
        Object::Real(size.height),
    ]
}
