//! The ordered page sequence under edit.
//!
//! One [`PageSequence`] exists per editing session. It is the target
//! document's page order: entry order is output order. The transforms in
//! [`crate::ops`] consume a sequence by reference and return a new one, so
//! any value you hold on to stays exactly as it was; that persistence is
//! also what makes the engine safe to share across tasks without locks.
//!
//! The selection is UI-facing scratch state for the removal and extraction
//! flows. It indexes the current entry order, so transforms drop it rather
//! than carry stale indices into the result.

use std::collections::BTreeSet;

use crate::document::DocumentHandle;
use crate::error::{PagedeckError, Result};
use crate::page::{DEFAULT_PAGE_SIZE, PageRef};

/// The ordered, editable page list of the target document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSequence {
    entries: Vec<PageRef>,
    selection: BTreeSet<usize>,
}

impl PageSequence {
    /// Create the identity sequence over an opened document.
    ///
    /// Every source page appears once, in original order, with rotation 0.
    pub fn from_document(handle: &DocumentHandle) -> Self {
        let entries = (0..handle.page_count())
            .map(|index| {
                let size = handle.page_size(index).unwrap_or(DEFAULT_PAGE_SIZE);
                PageRef::from_document(handle.id(), index, size)
            })
            .collect();

        Self {
            entries,
            selection: BTreeSet::new(),
        }
    }

    /// Build a sequence directly from entries. Transform-internal.
    pub(crate) fn from_entries(entries: Vec<PageRef>) -> Self {
        Self {
            entries,
            selection: BTreeSet::new(),
        }
    }

    /// The entries, in output order.
    pub fn entries(&self) -> &[PageRef] {
        &self.entries
    }

    /// One entry by position.
    pub fn entry(&self, index: usize) -> Option<&PageRef> {
        self.entries.get(index)
    }

    /// Number of pages in the sequence.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the sequence has no pages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a position to the selection.
    ///
    /// # Errors
    ///
    /// Fails with [`PagedeckError::IndexOutOfRange`] for positions outside
    /// the sequence; the selection is left unchanged.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.selection.insert(index);
        Ok(())
    }

    /// Remove a position from the selection.
    pub fn deselect(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.selection.remove(&index);
        Ok(())
    }

    /// Toggle a position in the selection, returning the new state.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        if self.selection.remove(&index) {
            Ok(false)
        } else {
            self.selection.insert(index);
            Ok(true)
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The selected positions, ascending.
    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(PagedeckError::out_of_range(index, self.entries.len()));
        }
        Ok(())
    }
}
