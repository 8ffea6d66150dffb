//! Document splicing and merging, end to end.

use pagedeck::assemble::Assembler;
use pagedeck::document::DocumentRegistry;
use pagedeck::ops;
use pagedeck::sequence::PageSequence;

use crate::common::{assert_markers, handle};

#[test]
fn single_splice_inserts_whole_document() {
    let base = handle(3, "Base");
    let other = handle(2, "Ins");
    let seq = PageSequence::from_document(&base);

    let spliced = ops::splice_document_at(&seq, 1, &other).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(base);
    registry.insert(other);

    let bytes = Assembler::without_compression()
        .assemble(&spliced, &registry)
        .unwrap();

    assert_markers(
        &bytes,
        &[
            "Base-Page-1",
            "Ins-Page-1",
            "Ins-Page-2",
            "Base-Page-2",
            "Base-Page-3",
        ],
    );
}

#[test]
fn batch_splice_anchors_resolve_against_original_numbering() {
    // Five-page base; insert A after page 1 and B after page 3. The B
    // anchor means "after what the user saw as page 3", even though A's
    // two pages land first.
    let base = handle(5, "Base");
    let insert_a = handle(2, "A");
    let insert_b = handle(2, "B");
    let seq = PageSequence::from_document(&base);

    // Submitted in reverse order; anchors still resolve correctly
    let spliced =
        ops::splice_documents_at(&seq, &[(3, &insert_b), (1, &insert_a)]).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(base);
    registry.insert(insert_a);
    registry.insert(insert_b);

    let bytes = Assembler::without_compression()
        .assemble(&spliced, &registry)
        .unwrap();

    assert_markers(
        &bytes,
        &[
            "Base-Page-1",
            "A-Page-1",
            "A-Page-2",
            "Base-Page-2",
            "Base-Page-3",
            "B-Page-1",
            "B-Page-2",
            "Base-Page-4",
            "Base-Page-5",
        ],
    );
}

#[test]
fn anchor_zero_inserts_before_the_first_page() {
    let base = handle(2, "Base");
    let cover = handle(1, "Cover");
    let seq = PageSequence::from_document(&base);

    let spliced = ops::splice_documents_at(&seq, &[(0, &cover)]).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(base);
    registry.insert(cover);

    let bytes = Assembler::without_compression()
        .assemble(&spliced, &registry)
        .unwrap();

    assert_markers(&bytes, &["Cover-Page-1", "Base-Page-1", "Base-Page-2"]);
}

#[test]
fn inserts_sharing_an_anchor_keep_submission_order() {
    let base = handle(2, "Base");
    let first = handle(1, "First");
    let second = handle(1, "Second");
    let seq = PageSequence::from_document(&base);

    let spliced =
        ops::splice_documents_at(&seq, &[(1, &first), (1, &second)]).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(base);
    registry.insert(first);
    registry.insert(second);

    let bytes = Assembler::without_compression()
        .assemble(&spliced, &registry)
        .unwrap();

    assert_markers(
        &bytes,
        &["Base-Page-1", "First-Page-1", "Second-Page-1", "Base-Page-2"],
    );
}

#[test]
fn merge_concatenates_documents_in_order() {
    let first = handle(2, "A");
    let second = handle(1, "B");
    let third = handle(2, "C");

    let merged = ops::merge(&[
        PageSequence::from_document(&first),
        PageSequence::from_document(&second),
        PageSequence::from_document(&third),
    ])
    .unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(first);
    registry.insert(second);
    registry.insert(third);

    let bytes = Assembler::without_compression()
        .assemble(&merged, &registry)
        .unwrap();

    assert_markers(
        &bytes,
        &["A-Page-1", "A-Page-2", "B-Page-1", "C-Page-1", "C-Page-2"],
    );
}

#[test]
fn merge_then_edit_then_assemble() {
    // Combine two documents, drop a page, rotate another: the sequence
    // layer composes freely across sources.
    let first = handle(2, "A");
    let second = handle(2, "B");

    let merged = ops::merge(&[
        PageSequence::from_document(&first),
        PageSequence::from_document(&second),
    ])
    .unwrap();

    let trimmed = ops::remove_at(&merged, &[1usize].into_iter().collect()).unwrap();
    let rotated = ops::set_rotation(&trimmed, 2, 90).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(first);
    registry.insert(second);

    let bytes = Assembler::without_compression()
        .assemble(&rotated, &registry)
        .unwrap();

    assert_markers(&bytes, &["A-Page-1", "B-Page-1", "B-Page-2"]);
    assert_eq!(crate::common::page_rotations(&bytes), vec![0, 0, 90]);
}
