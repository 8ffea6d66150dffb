//! Page sequence transforms.
//!
//! Every function here takes a sequence by reference and returns a new one.
//! Index arguments are validated before any change is computed, so a failed
//! call leaves the caller's sequence exactly as it was; operations are
//! atomic by construction.
//!
//! Positions come in two flavors:
//!
//! - **Entry indices** are zero-based positions of existing pages, valid in
//!   `0..len`.
//! - **Insert positions** sit between pages, valid in `0..=len` (0 inserts
//!   before the first page, `len` appends).
//!
//! Batch splicing ([`splice_documents_at`]) resolves every anchor against
//! the sequence as it was when the batch was requested, never against the
//! partially-spliced result. "After page 3" means after what the user saw
//! as page 3, no matter how many pages earlier anchors inserted.

use std::collections::BTreeSet;

use crate::document::DocumentHandle;
use crate::error::{PagedeckError, Result};
use crate::page::{DEFAULT_PAGE_SIZE, PageRef, PageSize, Rotation};
use crate::sequence::PageSequence;

/// Drop every entry whose position is in `indices`.
///
/// An empty set is a valid no-op. Removing every page is rejected: the
/// output document must keep at least one page.
///
/// # Errors
///
/// [`PagedeckError::IndexOutOfRange`] for any position outside the
/// sequence; [`PagedeckError::InvalidOperation`] when `indices` covers the
/// whole sequence.
pub fn remove_at(seq: &PageSequence, indices: &BTreeSet<usize>) -> Result<PageSequence> {
    check_indices(seq, indices)?;

    if indices.len() >= seq.len() {
        return Err(PagedeckError::invalid_operation(
            "cannot remove all pages; at least one page must remain",
        ));
    }

    let entries = seq
        .entries()
        .iter()
        .enumerate()
        .filter(|(position, _)| !indices.contains(position))
        .map(|(_, entry)| *entry)
        .collect();

    Ok(PageSequence::from_entries(entries))
}

/// Drop the currently selected entries.
pub fn remove_selected(seq: &PageSequence) -> Result<PageSequence> {
    remove_at(seq, &seq.selection().clone())
}

/// Build a standalone sequence containing only the entries at `indices`.
///
/// Entries keep their original relative order regardless of how the
/// selection was made: extracting {2, 0} from a four-page sequence yields
/// pages [0, 2], never [2, 0].
///
/// # Errors
///
/// [`PagedeckError::InvalidOperation`] when `indices` is empty;
/// [`PagedeckError::IndexOutOfRange`] for any position outside the
/// sequence.
pub fn extract(seq: &PageSequence, indices: &BTreeSet<usize>) -> Result<PageSequence> {
    if indices.is_empty() {
        return Err(PagedeckError::invalid_operation(
            "no pages selected; select at least one page to extract",
        ));
    }
    check_indices(seq, indices)?;

    // BTreeSet iterates ascending, which is exactly the order rule.
    let entries = indices.iter().map(|&index| seq.entries()[index]).collect();

    Ok(PageSequence::from_entries(entries))
}

/// Extract the currently selected entries into a standalone sequence.
pub fn extract_selected(seq: &PageSequence) -> Result<PageSequence> {
    extract(seq, &seq.selection().clone())
}

/// Exchange the entries at positions `i` and `j`.
///
/// A valid no-op when `i == j`.
pub fn swap(seq: &PageSequence, i: usize, j: usize) -> Result<PageSequence> {
    check_index(seq, i)?;
    check_index(seq, j)?;

    let mut entries = seq.entries().to_vec();
    entries.swap(i, j);

    Ok(PageSequence::from_entries(entries))
}

/// Move the entry at `from` to position `to`.
///
/// Drag-and-drop semantics: the entry is removed first, and `to` addresses
/// the list after that removal. Both positions must be in `0..len`.
pub fn move_to(seq: &PageSequence, from: usize, to: usize) -> Result<PageSequence> {
    check_index(seq, from)?;
    check_index(seq, to)?;

    let mut entries = seq.entries().to_vec();
    let entry = entries.remove(from);
    entries.insert(to, entry);

    Ok(PageSequence::from_entries(entries))
}

/// Reorder the whole sequence by an explicit 1-based page-number list.
///
/// `order[k]` names the current page that should end up at position `k`.
/// The list must be a complete permutation of `1..=len`: every page exactly
/// once.
///
/// # Errors
///
/// [`PagedeckError::PermutationDuplicate`] naming repeated page numbers,
/// [`PagedeckError::PermutationMissing`] naming absent ones, and
/// [`PagedeckError::InvalidOperation`] for page numbers outside `1..=len`.
///
/// # Examples
///
/// ```no_run
/// # use pagedeck::{ops, sequence::PageSequence};
/// # fn example(seq: &PageSequence) -> pagedeck::Result<()> {
/// // Reverse a four-page document
/// let reversed = ops::apply_permutation(seq, &[4, 3, 2, 1])?;
/// # Ok(())
/// # }
/// ```
pub fn apply_permutation(seq: &PageSequence, order: &[usize]) -> Result<PageSequence> {
    let len = seq.len();

    let mut seen = vec![false; len + 1];
    let mut duplicates = Vec::new();

    for &page_number in order {
        if page_number == 0 || page_number > len {
            return Err(PagedeckError::invalid_operation(format!(
                "page number {page_number} is out of range for a {len}-page document"
            )));
        }
        if seen[page_number] {
            if !duplicates.contains(&page_number) {
                duplicates.push(page_number);
            }
        } else {
            seen[page_number] = true;
        }
    }

    if !duplicates.is_empty() {
        duplicates.sort_unstable();
        return Err(PagedeckError::PermutationDuplicate { duplicates });
    }

    let missing: Vec<usize> = (1..=len).filter(|&page| !seen[page]).collect();
    if !missing.is_empty() {
        return Err(PagedeckError::PermutationMissing { missing });
    }

    let entries = order
        .iter()
        .map(|&page_number| seq.entries()[page_number - 1])
        .collect();

    Ok(PageSequence::from_entries(entries))
}

/// Set one entry's rotation to an absolute value in degrees.
pub fn set_rotation(seq: &PageSequence, index: usize, degrees: i64) -> Result<PageSequence> {
    check_index(seq, index)?;
    let rotation = Rotation::from_degrees(degrees)?;

    let mut entries = seq.entries().to_vec();
    entries[index].rotation = rotation;

    Ok(PageSequence::from_entries(entries))
}

/// Adjust one entry's rotation by a delta in degrees.
pub fn rotate_by(seq: &PageSequence, index: usize, delta: i64) -> Result<PageSequence> {
    check_index(seq, index)?;
    let rotation = seq.entries()[index].rotation.rotated_by(delta)?;

    let mut entries = seq.entries().to_vec();
    entries[index].rotation = rotation;

    Ok(PageSequence::from_entries(entries))
}

/// Apply the same absolute rotation to every entry.
pub fn rotate_all(seq: &PageSequence, degrees: i64) -> Result<PageSequence> {
    let rotation = Rotation::from_degrees(degrees)?;

    let entries = seq
        .entries()
        .iter()
        .map(|entry| {
            let mut entry = *entry;
            entry.rotation = rotation;
            entry
        })
        .collect();

    Ok(PageSequence::from_entries(entries))
}

/// Reset every entry's rotation to 0.
///
/// The bulk rotate-to-zero case; infallible, unlike [`rotate_all`].
pub fn reset_rotations(seq: &PageSequence) -> PageSequence {
    let entries = seq
        .entries()
        .iter()
        .map(|entry| {
            let mut entry = *entry;
            entry.rotation = Rotation::None;
            entry
        })
        .collect();

    PageSequence::from_entries(entries)
}

/// Insert a blank page at an insert position in `0..=len`.
///
/// When `size` is `None`, the blank page takes the size of the first page
/// in the sequence, falling back to A4 for an empty sequence.
pub fn insert_blank_at(
    seq: &PageSequence,
    position: usize,
    size: Option<PageSize>,
) -> Result<PageSequence> {
    check_insert_position(seq, position)?;

    let size = size
        .or_else(|| seq.entries().first().map(|entry| entry.size))
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let mut entries = seq.entries().to_vec();
    entries.insert(position, PageRef::blank(size));

    Ok(PageSequence::from_entries(entries))
}

/// Insert all pages of another document at an insert position in `0..=len`.
///
/// The spliced pages keep their internal order and come in with rotation 0.
pub fn splice_document_at(
    seq: &PageSequence,
    position: usize,
    other: &DocumentHandle,
) -> Result<PageSequence> {
    check_insert_position(seq, position)?;

    let mut entries = Vec::with_capacity(seq.len() + other.page_count());
    entries.extend_from_slice(&seq.entries()[..position]);
    entries.extend(document_entries(other));
    entries.extend_from_slice(&seq.entries()[position..]);

    Ok(PageSequence::from_entries(entries))
}

/// Insert several documents, each anchored "after page k" of the original
/// sequence.
///
/// Anchors are 1-based page numbers of the sequence as it is now; anchor 0
/// inserts before the first page, anchor `len` after the last. All anchors
/// are resolved against that original numbering; they are sorted and
/// applied ascending precisely so that earlier insertions can never shift
/// the meaning of later ones. Documents sharing an anchor keep their given
/// order.
///
/// # Errors
///
/// [`PagedeckError::IndexOutOfRange`] for any anchor beyond `len`.
pub fn splice_documents_at(
    seq: &PageSequence,
    inserts: &[(usize, &DocumentHandle)],
) -> Result<PageSequence> {
    let len = seq.len();
    for &(anchor, _) in inserts {
        if anchor > len {
            return Err(PagedeckError::out_of_range(anchor, len + 1));
        }
    }

    let mut sorted = inserts.to_vec();
    sorted.sort_by_key(|&(anchor, _)| anchor);

    let added: usize = sorted.iter().map(|&(_, handle)| handle.page_count()).sum();
    let mut entries = Vec::with_capacity(len + added);

    let mut pending = sorted.into_iter().peekable();
    for boundary in 0..=len {
        while let Some(&(anchor, handle)) = pending.peek()
            && anchor == boundary
        {
            entries.extend(document_entries(handle));
            pending.next();
        }
        if boundary < len {
            entries.push(seq.entries()[boundary]);
        }
    }

    Ok(PageSequence::from_entries(entries))
}

/// Concatenate several sequences in array order.
///
/// # Errors
///
/// [`PagedeckError::InvalidOperation`] when `sequences` is empty.
pub fn merge(sequences: &[PageSequence]) -> Result<PageSequence> {
    if sequences.is_empty() {
        return Err(PagedeckError::invalid_operation(
            "no documents to combine",
        ));
    }

    let entries = sequences
        .iter()
        .flat_map(|seq| seq.entries().iter().copied())
        .collect();

    Ok(PageSequence::from_entries(entries))
}

fn document_entries(handle: &DocumentHandle) -> impl Iterator<Item = PageRef> + '_ {
    (0..handle.page_count()).map(|index| {
        let size = handle.page_size(index).unwrap_or(DEFAULT_PAGE_SIZE);
        PageRef::from_document(handle.id(), index, size)
    })
}

fn check_index(seq: &PageSequence, index: usize) -> Result<()> {
    if index >= seq.len() {
        return Err(PagedeckError::out_of_range(index, seq.len()));
    }
    Ok(())
}

fn check_indices(seq: &PageSequence, indices: &BTreeSet<usize>) -> Result<()> {
    // BTreeSet: the last element is the largest
    if let Some(&max) = indices.iter().next_back()
        && max >= seq.len()
    {
        return Err(PagedeckError::out_of_range(max, seq.len()));
    }
    Ok(())
}

fn check_insert_position(seq: &PageSequence, position: usize) -> Result<()> {
    if position > seq.len() {
        return Err(PagedeckError::out_of_range(position, seq.len() + 1));
    }
    Ok(())
}
