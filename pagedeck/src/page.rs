//! Page-level types: sizes, rotations, and page references.
//!
//! A [`PageRef`] is one entry in a page sequence. It either points into an
//! opened source document or stands for a generated blank page, and carries
//! the presentation attributes (rotation, size) that the assembler writes
//! into the output.

use serde::{Deserialize, Serialize};

use crate::document::DocumentId;
use crate::error::{PagedeckError, Result};

/// Default page size for blank pages when no other size applies: A4.
pub const DEFAULT_PAGE_SIZE: PageSize = PageSize {
    width: 595.28,
    height: 841.89,
};

/// Page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSize {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl PageSize {
    /// Create a page size from width and height in points.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Page rotation, restricted to the four values PDF viewers honor.
///
/// Every mutation normalizes into this set; arbitrary angles are rejected
/// rather than rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// Rotate 90 degrees clockwise.
    Clockwise90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    Clockwise270,
}

impl Rotation {
    /// Parse a rotation from degrees, normalizing mod 360.
    ///
    /// Negative values and values beyond a full turn are accepted: `-90`
    /// normalizes to 270, `450` to 90. Values that are not a multiple of
    /// 90 fail with [`PagedeckError::InvalidRotation`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pagedeck::page::Rotation;
    ///
    /// assert_eq!(Rotation::from_degrees(450).unwrap(), Rotation::Clockwise90);
    /// assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::Clockwise270);
    /// assert!(Rotation::from_degrees(45).is_err());
    /// ```
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::None),
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Clockwise270),
            _ => Err(PagedeckError::InvalidRotation { degrees }),
        }
    }

    /// Get rotation as degrees.
    pub fn as_degrees(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// Add a delta in degrees and normalize into the canonical set.
    pub fn rotated_by(self, delta: i64) -> Result<Self> {
        Self::from_degrees(self.as_degrees() + delta)
    }
}

/// Where a page's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// A page of an opened source document.
    Document {
        /// Identifier of the source document.
        source: DocumentId,
        /// Zero-based index into the source's original page list.
        index: usize,
    },
    /// A generated blank page.
    Blank,
}

/// One entry in a page sequence.
///
/// The source identity is fixed at creation; rotation and (for blank pages)
/// size are the mutable presentation attributes. For document pages the
/// size is read from the source at open time and cached here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRef {
    /// Content origin of this page.
    pub source: PageSource,
    /// Rotation applied to this page in the output.
    pub rotation: Rotation,
    /// Page dimensions in points.
    pub size: PageSize,
}

impl PageRef {
    /// Create a reference to a page of an opened document.
    pub fn from_document(source: DocumentId, index: usize, size: PageSize) -> Self {
        Self {
            source: PageSource::Document { source, index },
            rotation: Rotation::None,
            size,
        }
    }

    /// Create a blank page of the given size.
    pub fn blank(size: PageSize) -> Self {
        Self {
            source: PageSource::Blank,
            rotation: Rotation::None,
            size,
        }
    }

    /// Check whether this entry is a generated blank page.
    pub fn is_blank(&self) -> bool {
        matches!(self.source, PageSource::Blank)
    }
}
