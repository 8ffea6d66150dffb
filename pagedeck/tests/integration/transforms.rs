//! Transform semantics, exercised end to end through assembly.

use std::collections::BTreeSet;

use pagedeck::assemble::Assembler;
use pagedeck::document::DocumentRegistry;
use pagedeck::error::PagedeckError;
use pagedeck::ops;
use pagedeck::page::Rotation;
use pagedeck::sequence::PageSequence;
use rstest::rstest;

use crate::common::{assert_markers, handle};

fn indices(values: &[usize]) -> BTreeSet<usize> {
    values.iter().copied().collect()
}

#[test]
fn swap_preserves_page_count_and_content() {
    let src = handle(4, "Doc");
    let seq = PageSequence::from_document(&src);
    let swapped = ops::swap(&seq, 0, 2).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let bytes = Assembler::without_compression()
        .assemble(&swapped, &registry)
        .unwrap();

    assert_markers(
        &bytes,
        &["Doc-Page-3", "Doc-Page-2", "Doc-Page-1", "Doc-Page-4"],
    );
}

#[test]
fn move_to_uses_post_removal_positions() {
    let src = handle(4, "Doc");
    let seq = PageSequence::from_document(&src);
    // Drag the first page onto the last slot
    let moved = ops::move_to(&seq, 0, 3).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let bytes = Assembler::without_compression()
        .assemble(&moved, &registry)
        .unwrap();

    assert_markers(
        &bytes,
        &["Doc-Page-2", "Doc-Page-3", "Doc-Page-4", "Doc-Page-1"],
    );
}

#[test]
fn extract_is_order_stable() {
    let src = handle(4, "Doc");
    let seq = PageSequence::from_document(&src);

    // {2, 0} extracts as [0, 2], never [2, 0]
    let extracted = ops::extract(&seq, &indices(&[2, 0])).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let bytes = Assembler::without_compression()
        .assemble(&extracted, &registry)
        .unwrap();

    assert_markers(&bytes, &["Doc-Page-1", "Doc-Page-3"]);
}

#[test]
fn removal_cannot_empty_the_document() {
    let src = handle(3, "Doc");
    let seq = PageSequence::from_document(&src);

    let all = indices(&[0, 1, 2]);
    let result = ops::remove_at(&seq, &all);
    assert!(matches!(result, Err(PagedeckError::InvalidOperation { .. })));
    // The input sequence is untouched
    assert_eq!(seq.len(), 3);

    let all_but_one = indices(&[0, 2]);
    let remaining = ops::remove_at(&seq, &all_but_one).unwrap();
    assert_eq!(remaining.len(), 1);
}

#[rstest]
#[case(&[1, 2, 3], &[4])]
#[case(&[1, 2], &[3, 4])]
#[case(&[4], &[1, 2, 3])]
fn permutation_names_missing_pages(#[case] order: &[usize], #[case] expected_missing: &[usize]) {
    let src = handle(4, "Doc");
    let seq = PageSequence::from_document(&src);

    match ops::apply_permutation(&seq, order) {
        Err(PagedeckError::PermutationMissing { missing }) => {
            assert_eq!(missing, expected_missing);
        }
        other => panic!("expected PermutationMissing, got {other:?}"),
    }
}

#[rstest]
#[case(&[1, 1, 2, 3], &[1])]
#[case(&[2, 2, 3, 3], &[2, 3])]
fn permutation_names_duplicated_pages(
    #[case] order: &[usize],
    #[case] expected_duplicates: &[usize],
) {
    let src = handle(4, "Doc");
    let seq = PageSequence::from_document(&src);

    match ops::apply_permutation(&seq, order) {
        Err(PagedeckError::PermutationDuplicate { duplicates }) => {
            assert_eq!(duplicates, expected_duplicates);
        }
        other => panic!("expected PermutationDuplicate, got {other:?}"),
    }
}

#[test]
fn full_permutation_reverses_document() {
    let src = handle(4, "Doc");
    let seq = PageSequence::from_document(&src);
    let reversed = ops::apply_permutation(&seq, &[4, 3, 2, 1]).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.insert(src);

    let bytes = Assembler::without_compression()
        .assemble(&reversed, &registry)
        .unwrap();

    assert_markers(
        &bytes,
        &["Doc-Page-4", "Doc-Page-3", "Doc-Page-2", "Doc-Page-1"],
    );
}

#[rstest]
#[case(90, Rotation::Clockwise90)]
#[case(180, Rotation::Rotate180)]
#[case(270, Rotation::Clockwise270)]
#[case(360, Rotation::None)]
#[case(450, Rotation::Clockwise90)]
#[case(-90, Rotation::Clockwise270)]
fn set_rotation_normalizes(#[case] degrees: i64, #[case] expected: Rotation) {
    let src = handle(1, "Doc");
    let seq = PageSequence::from_document(&src);

    let rotated = ops::set_rotation(&seq, 0, degrees).unwrap();
    assert_eq!(rotated.entries()[0].rotation, expected);
}

#[test]
fn four_quarter_turns_return_to_start() {
    let src = handle(2, "Doc");
    let mut seq = PageSequence::from_document(&src);

    for _ in 0..4 {
        seq = ops::rotate_by(&seq, 1, 90).unwrap();
    }
    assert_eq!(seq.entries()[1].rotation, Rotation::None);
}

#[test]
fn reset_is_idempotent_after_any_rotations() {
    let src = handle(3, "Doc");
    let mut seq = PageSequence::from_document(&src);

    seq = ops::rotate_all(&seq, 180).unwrap();
    seq = ops::rotate_by(&seq, 0, 90).unwrap();
    seq = ops::set_rotation(&seq, 2, 270).unwrap();

    let reset = ops::reset_rotations(&seq);
    assert!(
        reset
            .entries()
            .iter()
            .all(|entry| entry.rotation == Rotation::None)
    );

    // Resetting again changes nothing
    let reset_twice = ops::reset_rotations(&reset);
    assert_eq!(reset_twice.entries(), reset.entries());
}

#[test]
fn failed_operations_leave_sequence_unchanged() {
    let src = handle(3, "Doc");
    let seq = PageSequence::from_document(&src);
    let before = seq.clone();

    assert!(ops::swap(&seq, 0, 9).is_err());
    assert!(ops::move_to(&seq, 9, 0).is_err());
    assert!(ops::set_rotation(&seq, 0, 45).is_err());
    assert!(ops::remove_at(&seq, &indices(&[7])).is_err());
    assert!(ops::apply_permutation(&seq, &[1, 2]).is_err());
    assert!(ops::insert_blank_at(&seq, 9, None).is_err());

    assert_eq!(seq, before);
}
