//! Defines the geometry of pixel buffers.
use core::ops::Range;

use crate::format::{self, PixelFormat};

/// A box of pixels, given by its bounds along each axis.
///
/// Bounds are half-open, `left..right` and so on. An inverted axis has an extent of zero, layouts
/// reject such volumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelVolume {
    pub left: u32,
    pub top: u32,
    pub front: u32,
    pub right: u32,
    pub bottom: u32,
    pub back: u32,
}

/// The layout of pixels within a buffer.
///
/// This describes a sub-volume of a larger allocation. The allocation consists of slices of
/// `slice_pitch` elements, each consisting of rows of `row_pitch` elements. Pitches are counted
/// in elements of the format, not bytes.
///
/// An inner invariant is that the addressed volume fits within the pitches, and that its total
/// byte length fits into a `usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelLayout {
    pub(crate) volume: PixelVolume,
    pub(crate) row_pitch: usize,
    pub(crate) slice_pitch: usize,
    pub(crate) format: PixelFormat,
}

/// Error that occurs when constructing a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutError {
    kind: LayoutErrorKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LayoutErrorKind {
    InvertedBounds,
    RowPitch,
    SlicePitch,
    Extent,
    OutOfMemory,
}

impl PixelVolume {
    /// A volume starting at the origin.
    pub const fn with_extent(width: u32, height: u32, depth: u32) -> Self {
        PixelVolume {
            left: 0,
            top: 0,
            front: 0,
            right: width,
            bottom: height,
            back: depth,
        }
    }

    /// Extent along x.
    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Extent along y.
    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Extent along z.
    pub const fn depth(&self) -> u32 {
        self.back.saturating_sub(self.front)
    }

    /// Whether the volume contains no pixel.
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0 || self.depth() == 0
    }

    /// Check if another volume lies within this one.
    pub const fn contains(&self, other: &PixelVolume) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.front >= self.front
            && other.right <= self.right
            && other.bottom <= self.bottom
            && other.back <= self.back
    }

    const fn is_ordered(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom && self.front <= self.back
    }
}

impl PixelLayout {
    /// A consecutive layout of a full image.
    pub fn new(
        width: u32,
        height: u32,
        depth: u32,
        format: PixelFormat,
    ) -> Result<Self, LayoutError> {
        let row_pitch = width as usize;
        let slice_pitch = row_pitch
            .checked_mul(height as usize)
            .ok_or(LayoutError::OUT_OF_MEMORY)?;

        Self::with_pitches(
            PixelVolume::with_extent(width, height, depth),
            row_pitch,
            slice_pitch,
            format,
        )
    }

    /// A layout of a volume within a padded allocation.
    ///
    /// The row pitch must at least cover the right bound of the volume, the slice pitch must at
    /// least cover all rows up to the bottom bound. Block compressed formats are only described
    /// as whole, consecutive images starting at the origin.
    pub fn with_pitches(
        volume: PixelVolume,
        row_pitch: usize,
        slice_pitch: usize,
        format: PixelFormat,
    ) -> Result<Self, LayoutError> {
        if !volume.is_ordered() {
            return Err(LayoutError::INVERTED_BOUNDS);
        }

        if row_pitch < volume.right as usize {
            return Err(LayoutError::ROW_PITCH);
        }

        let rows = row_pitch
            .checked_mul(volume.bottom as usize)
            .ok_or(LayoutError::OUT_OF_MEMORY)?;
        if volume.back > 1 && slice_pitch < rows {
            return Err(LayoutError::SLICE_PITCH);
        }

        let layout = PixelLayout {
            volume,
            row_pitch,
            slice_pitch,
            format,
        };

        if format.is_compressed() {
            let whole = PixelVolume::with_extent(volume.width(), volume.height(), volume.depth());
            if volume != whole || !layout.is_consecutive() {
                return Err(LayoutError::EXTENT);
            }
        }

        Self::validate(layout).ok_or(LayoutError::OUT_OF_MEMORY)
    }

    /// The same memory, reinterpreted as another format of equal element size.
    pub(crate) fn with_format(self, format: PixelFormat) -> Self {
        debug_assert_eq!(self.format.element_bytes(), format.element_bytes());
        PixelLayout { format, ..self }
    }

    /// A layout of a sub-volume, with the same pitches.
    ///
    /// The volume is given relative to the allocation, not to the current volume.
    pub fn sub_layout(&self, volume: PixelVolume) -> Result<Self, LayoutError> {
        if !volume.is_ordered() {
            return Err(LayoutError::INVERTED_BOUNDS);
        }

        if !self.volume.contains(&volume) {
            return Err(LayoutError::EXTENT);
        }

        if self.format.is_compressed() && volume != self.volume {
            return Err(LayoutError::EXTENT);
        }

        Ok(PixelLayout { volume, ..*self })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn volume(&self) -> PixelVolume {
        self.volume
    }

    pub fn width(&self) -> u32 {
        self.volume.width()
    }

    pub fn height(&self) -> u32 {
        self.volume.height()
    }

    pub fn depth(&self) -> u32 {
        self.volume.depth()
    }

    /// Elements from one row to the next.
    pub fn row_pitch(&self) -> usize {
        self.row_pitch
    }

    /// Elements from one slice to the next.
    pub fn slice_pitch(&self) -> usize {
        self.slice_pitch
    }

    /// Elements between the end of one row and the start of the next.
    pub fn row_skip(&self) -> usize {
        self.row_pitch - self.width() as usize
    }

    /// Elements between the end of the last row of a slice and the start of the next slice.
    pub fn slice_skip(&self) -> usize {
        self.slice_pitch
            .saturating_sub(self.height() as usize * self.row_pitch)
    }

    /// Whether the volume is stored without any padding.
    pub fn is_consecutive(&self) -> bool {
        let width = self.width() as usize;
        self.row_pitch == width && self.slice_pitch == width * self.height() as usize
    }

    /// Byte size of the volume when stored consecutively.
    pub fn consecutive_size(&self) -> usize {
        // No overflow due to inner invariant, no error as the layout was validated.
        format::memory_size(self.width(), self.height(), self.depth(), self.format).unwrap_or(0)
    }

    /// The byte offset of the element at the given position of the allocation.
    pub fn byte_offset(&self, x: u32, y: u32, z: u32) -> usize {
        let elements = x as usize + y as usize * self.row_pitch + z as usize * self.slice_pitch;
        elements * self.format.element_bytes()
    }

    /// The byte offset of the first element of the volume.
    pub fn origin_offset(&self) -> usize {
        let PixelVolume {
            left, top, front, ..
        } = self.volume;
        self.byte_offset(left, top, front)
    }

    /// The number of bytes a buffer needs to contain the volume.
    pub fn byte_len(&self) -> usize {
        if self.format.is_compressed() {
            return self.consecutive_size();
        }

        if self.volume.is_empty() {
            return 0;
        }

        let PixelVolume {
            right,
            bottom,
            back,
            ..
        } = self.volume;
        self.byte_offset(right - 1, bottom - 1, back - 1) + self.format.element_bytes()
    }

    /// The byte offset of an element, relative to the origin of the volume.
    pub(crate) fn offset_in_volume(&self, x: u32, y: u32, z: u32) -> usize {
        let PixelVolume {
            left, top, front, ..
        } = self.volume;
        self.byte_offset(left + x, top + y, front + z)
    }

    /// The bytes of one row of the volume.
    pub(crate) fn row(&self, y: u32, z: u32) -> Range<usize> {
        let start = self.offset_in_volume(0, y, z);
        start..start + self.width() as usize * self.format.element_bytes()
    }

    /// Byte ranges of each row of the volume, slice by slice.
    pub(crate) fn rows(&self) -> impl Iterator<Item = Range<usize>> {
        let layout = *self;
        (0..self.depth()).flat_map(move |z| (0..layout.height()).map(move |y| layout.row(y, z)))
    }

    fn validate(this: Self) -> Option<Self> {
        let PixelVolume {
            right,
            bottom,
            back,
            ..
        } = this.volume;

        let elements = (right as usize)
            .checked_add((bottom as usize).checked_mul(this.row_pitch)?)?
            .checked_add((back as usize).checked_mul(this.slice_pitch)?)?;
        let bytes = elements.checked_mul(this.format.element_bytes().max(1))?;

        let compressed = format::memory_size(right, bottom, back, this.format).ok()?;
        Some(this).filter(|_| bytes.max(compressed) < isize::MAX as usize)
    }
}

impl LayoutError {
    const INVERTED_BOUNDS: Self = LayoutError {
        kind: LayoutErrorKind::InvertedBounds,
    };
    const ROW_PITCH: Self = LayoutError {
        kind: LayoutErrorKind::RowPitch,
    };
    const SLICE_PITCH: Self = LayoutError {
        kind: LayoutErrorKind::SlicePitch,
    };
    const EXTENT: Self = LayoutError {
        kind: LayoutErrorKind::Extent,
    };
    const OUT_OF_MEMORY: Self = LayoutError {
        kind: LayoutErrorKind::OutOfMemory,
    };
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self.kind {
            LayoutErrorKind::InvertedBounds => "volume bounds are inverted",
            LayoutErrorKind::RowPitch => "row pitch is smaller than the volume",
            LayoutErrorKind::SlicePitch => "slice pitch is smaller than the volume",
            LayoutErrorKind::Extent => "volume is not representable",
            LayoutErrorKind::OutOfMemory => "layout does not fit into memory",
        })
    }
}

impl core::error::Error for LayoutError {}
