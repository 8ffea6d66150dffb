//! Parsing of user-entered page lists.
//!
//! Free-text inputs like `"1-3,5"` or `"3,1,2,4"` are parsed and validated
//! here, at the boundary, and never carried as strings into the transform
//! layer. Page numbers are 1-based in this module, since that is what users
//! type, and converted to zero-based indices on the way out.

use std::collections::BTreeSet;

use crate::error::{PagedeckError, Result};

/// A parsed page selection.
///
/// Supports individual pages and inclusive ranges:
/// - `"1"` - single page
/// - `"1-5"` - range of pages
/// - `"1,3,5"` - multiple individual pages
/// - `"1-5,10-15"` - combination of ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    items: Vec<SelectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SelectionItem {
    Single(u32),
    Range(u32, u32),
}

impl PageSelection {
    /// Parse a page selection string.
    ///
    /// # Errors
    ///
    /// Returns [`PagedeckError::PageList`] for empty input, non-numeric
    /// entries, page number 0, or reversed ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagedeck::input::PageSelection;
    ///
    /// let selection = PageSelection::parse("1-3,5").unwrap();
    /// assert!(selection.contains(2));
    /// assert!(selection.contains(5));
    /// assert!(!selection.contains(4));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let mut items = Vec::new();

        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page_number(start.trim(), part)?;
                let end = parse_page_number(end.trim(), part)?;

                if start > end {
                    return Err(PagedeckError::PageList {
                        entry: part.to_string(),
                        reason: format!("start page {start} is after end page {end}"),
                    });
                }
                items.push(SelectionItem::Range(start, end));
            } else {
                items.push(SelectionItem::Single(parse_page_number(part, part)?));
            }
        }

        if items.is_empty() {
            return Err(PagedeckError::PageList {
                entry: input.to_string(),
                reason: "page list is empty".to_string(),
            });
        }

        Ok(Self { items })
    }

    /// Check whether a 1-based page number is selected.
    pub fn contains(&self, page: u32) -> bool {
        self.items.iter().any(|item| match item {
            SelectionItem::Single(p) => *p == page,
            SelectionItem::Range(start, end) => page >= *start && page <= *end,
        })
    }

    /// The largest page number mentioned in the selection.
    pub fn max_page(&self) -> u32 {
        self.items
            .iter()
            .map(|item| match item {
                SelectionItem::Single(p) => *p,
                SelectionItem::Range(_, end) => *end,
            })
            .max()
            .unwrap_or(0)
    }

    /// Resolve the selection into zero-based indices for a document of
    /// `page_count` pages.
    ///
    /// # Errors
    ///
    /// Fails with [`PagedeckError::IndexOutOfRange`] if the selection
    /// mentions a page beyond the document; out-of-range input is
    /// rejected, never clamped.
    pub fn to_indices(&self, page_count: usize) -> Result<BTreeSet<usize>> {
        let max = self.max_page() as usize;
        if max > page_count {
            return Err(PagedeckError::out_of_range(max - 1, page_count));
        }

        Ok((1..=page_count as u32)
            .filter(|&page| self.contains(page))
            .map(|page| (page - 1) as usize)
            .collect())
    }
}

/// Parse a comma-separated reorder list like `"3,1,2,4"`.
///
/// Purely syntactic: returns the 1-based page numbers in the order given.
/// Completeness (every page exactly once) is checked by
/// [`crate::ops::apply_permutation`], which knows the sequence length.
///
/// # Errors
///
/// Returns [`PagedeckError::PageList`] for empty input or entries that are
/// not positive integers.
pub fn parse_order(input: &str) -> Result<Vec<usize>> {
    let mut order = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        order.push(parse_page_number(part, part)? as usize);
    }

    if order.is_empty() {
        return Err(PagedeckError::PageList {
            entry: input.to_string(),
            reason: "page list is empty".to_string(),
        });
    }

    Ok(order)
}

fn parse_page_number(text: &str, entry: &str) -> Result<u32> {
    let page: u32 = text.parse().map_err(|_| PagedeckError::PageList {
        entry: entry.to_string(),
        reason: format!("'{text}' is not a page number"),
    })?;

    if page == 0 {
        return Err(PagedeckError::PageList {
            entry: entry.to_string(),
            reason: "page numbers are 1-based; 0 is not a page".to_string(),
        });
    }

    Ok(page)
}
