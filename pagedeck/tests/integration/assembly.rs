//! Assembly guarantees: page count, order, rotation, blank pages.

use pagedeck::assemble::{AssembleOptions, Assembler, CompressionLevel, OutputMetadata};
use pagedeck::document::{DocumentHandle, DocumentRegistry};
use pagedeck::error::PagedeckError;
use pagedeck::ops;
use pagedeck::page::PageSize;
use pagedeck::sequence::PageSequence;

use crate::common::{assert_markers, handle, page_rotations};

#[test]
fn identity_round_trip_preserves_count_and_rotation() {
    let src = handle(5, "Doc");
    let seq = PageSequence::from_document(&src);

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let bytes = Assembler::without_compression()
        .assemble(&seq, &registry)
        .unwrap();

    assert_markers(
        &bytes,
        &[
            "Doc-Page-1",
            "Doc-Page-2",
            "Doc-Page-3",
            "Doc-Page-4",
            "Doc-Page-5",
        ],
    );
    assert_eq!(page_rotations(&bytes), vec![0, 0, 0, 0, 0]);
}

#[test]
fn output_reopens_as_a_valid_source() {
    // The output of one editing session must be usable as the input of the
    // next.
    let src = handle(3, "Doc");
    let seq = PageSequence::from_document(&src);
    let reversed = ops::apply_permutation(&seq, &[3, 2, 1]).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let bytes = Assembler::new().assemble(&reversed, &registry).unwrap();

    let reopened = DocumentHandle::parse(&bytes).unwrap();
    assert_eq!(reopened.page_count(), 3);

    let second_seq = PageSequence::from_document(&reopened);
    let mut second_registry = DocumentRegistry::new();
    second_registry.insert(reopened);

    let second_bytes = Assembler::without_compression()
        .assemble(&ops::apply_permutation(&second_seq, &[3, 2, 1]).unwrap(), &second_registry)
        .unwrap();

    // Reversed twice equals the original order
    assert_markers(&second_bytes, &["Doc-Page-1", "Doc-Page-2", "Doc-Page-3"]);
}

#[test]
fn per_entry_rotation_written_exactly() {
    let src = handle(4, "Doc");
    let mut seq = PageSequence::from_document(&src);
    seq = ops::set_rotation(&seq, 1, 90).unwrap();
    seq = ops::set_rotation(&seq, 2, 180).unwrap();
    seq = ops::set_rotation(&seq, 3, 270).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let bytes = Assembler::without_compression()
        .assemble(&seq, &registry)
        .unwrap();

    assert_eq!(page_rotations(&bytes), vec![0, 90, 180, 270]);
}

#[test]
fn blank_pages_between_content_pages() {
    let src = handle(2, "Doc");
    let seq = PageSequence::from_document(&src);
    let with_blank =
        ops::insert_blank_at(&seq, 1, Some(PageSize::new(300.0, 400.0))).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let bytes = Assembler::without_compression()
        .assemble(&with_blank, &registry)
        .unwrap();

    let reopened = DocumentHandle::parse(&bytes).unwrap();
    assert_eq!(reopened.page_count(), 3);

    let blank_size = reopened.page_size(1).unwrap();
    assert_eq!(blank_size.width, 300.0);
    assert_eq!(blank_size.height, 400.0);

    // Neighbors kept their content
    let markers = crate::common::page_markers(&bytes);
    assert!(markers[0].contains("Doc-Page-1"));
    assert!(markers[2].contains("Doc-Page-2"));
}

#[test]
fn inherited_attributes_survive_reparenting() {
    // MediaBox and Resources live on the source's Pages node; the pages
    // inherit them. Assembly reparents each page into a fresh tree, so
    // both must land on the page dictionaries themselves.
    let bytes = crate::common::pdf_bytes_inherited(2, "Inh");
    let src = DocumentHandle::parse(&bytes).unwrap();
    assert_eq!(src.page_size(0).unwrap().width, 612.0);

    let seq = PageSequence::from_document(&src);
    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let out = Assembler::without_compression()
        .assemble(&seq, &registry)
        .unwrap();

    let reopened = DocumentHandle::parse(&out).unwrap();
    assert_eq!(reopened.page_size(0).unwrap().width, 612.0);
    assert_eq!(reopened.page_size(1).unwrap().height, 792.0);

    let doc = lopdf::Document::load_mem(&out).unwrap();
    for (_, page_id) in doc.get_pages() {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert!(page.has(b"MediaBox"));

        // The font referenced through the copied Resources survived pruning
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let font_ref = resources
            .get(b"Font")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"F1")
            .unwrap()
            .as_reference()
            .unwrap();
        let font = doc.get_object(font_ref).unwrap().as_dict().unwrap();
        assert!(font.has(b"BaseFont"));
    }

    assert_markers(&out, &["Inh-Page-1", "Inh-Page-2"]);
}

#[test]
fn every_compression_level_produces_a_loadable_document() {
    let src = handle(4, "Doc");
    let seq = PageSequence::from_document(&src);

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    for compression in [
        CompressionLevel::None,
        CompressionLevel::Standard,
        CompressionLevel::Maximum,
    ] {
        let assembler = Assembler::with_options(AssembleOptions {
            compression,
            ..Default::default()
        });
        let bytes = assembler.assemble(&seq, &registry).unwrap();
        let reopened = DocumentHandle::parse(&bytes).unwrap();
        assert_eq!(reopened.page_count(), 4, "level {compression:?}");
    }
}

#[test]
fn metadata_lands_in_the_output() {
    let src = handle(1, "Doc");
    let seq = PageSequence::from_document(&src);

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let assembler = Assembler::with_options(AssembleOptions {
        compression: CompressionLevel::None,
        metadata: OutputMetadata::new(
            Some("Spliced".to_string()),
            Some("pagedeck tests".to_string()),
            Some("integration".to_string()),
            Some("pdf,pages".to_string()),
        ),
    });
    let bytes = assembler.assemble(&seq, &registry).unwrap();

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_object(info_id).unwrap().as_dict().unwrap();

    assert_eq!(
        info.get(b"Title").unwrap().as_str().unwrap(),
        b"Spliced".as_slice()
    );
    assert_eq!(
        info.get(b"Author").unwrap().as_str().unwrap(),
        b"pagedeck tests".as_slice()
    );
}

#[test]
fn serializing_a_sequence_without_its_source_fails() {
    let src = handle(2, "Doc");
    let seq = PageSequence::from_document(&src);
    drop(src);

    let result = Assembler::new().assemble(&seq, &DocumentRegistry::new());
    assert!(matches!(result, Err(PagedeckError::MissingSource { .. })));
}

#[tokio::test]
async fn async_serialize_matches_sync_assemble() {
    let src = handle(3, "Doc");
    let seq = PageSequence::from_document(&src);

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let assembler = Assembler::without_compression();
    let sync_bytes = assembler.assemble(&seq, &registry).unwrap();
    let async_bytes = assembler.serialize(&seq, &registry).await.unwrap();

    assert_eq!(
        DocumentHandle::parse(&sync_bytes).unwrap().page_count(),
        DocumentHandle::parse(&async_bytes).unwrap().page_count()
    );
}
