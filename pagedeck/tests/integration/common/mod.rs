//! Shared helpers for integration tests.
//!
//! Test documents are built in memory with lopdf; each page's content
//! stream carries an identifiable marker so assertions can verify which
//! source page ended up where in the output.

use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use pagedeck::document::DocumentHandle;

/// Build a PDF byte buffer with `pages` pages, each marked
/// `<marker>-Page-<n>` in its content stream.
pub fn pdf_bytes(pages: usize, marker: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..pages)
        .map(|n| {
            let content = format!("BT /F1 12 Tf 50 700 Td ({marker}-Page-{}) Tj ET", n + 1);
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Open a freshly built test document.
pub fn handle(pages: usize, marker: &str) -> DocumentHandle {
    DocumentHandle::parse(&pdf_bytes(pages, marker)).unwrap()
}

/// Build a PDF whose pages inherit MediaBox and Resources from the Pages
/// node instead of carrying their own.
pub fn pdf_bytes_inherited(pages: usize, marker: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = (0..pages)
        .map(|n| {
            let content = format!("BT /F1 12 Tf 50 700 Td ({marker}-Page-{}) Tj ET", n + 1);
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => font_id,
                },
            },
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Content markers of an assembled document, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).unwrap_or_default();
            String::from_utf8_lossy(&content).to_string()
        })
        .collect()
}

/// Effective /Rotate of each page, in page order. Missing means 0.
pub fn page_rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            doc.get_object(page_id)
                .and_then(|obj| obj.as_dict())
                .and_then(|dict| dict.get(b"Rotate"))
                .and_then(|rotate| rotate.as_i64())
                .unwrap_or(0)
        })
        .collect()
}

/// Assert that each output page carries the expected marker, in order.
pub fn assert_markers(bytes: &[u8], expected: &[&str]) {
    let markers = page_markers(bytes);
    assert_eq!(
        markers.len(),
        expected.len(),
        "page count mismatch: got {} pages, expected {}",
        markers.len(),
        expected.len()
    );
    for (position, (marker, want)) in markers.iter().zip(expected).enumerate() {
        assert!(
            marker.contains(want),
            "page {position}: expected marker {want}, content was {marker:?}"
        );
    }
}
