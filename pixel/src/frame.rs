//! Byte-buffer based pixel boxes.
use alloc::vec;
use alloc::vec::Vec;

use crate::codec;
use crate::color::Color;
use crate::error::PixelError;
use crate::format::PixelFormat;
use crate::layout::{LayoutError, PixelLayout, PixelVolume};

/// An owned buffer of pixels.
///
/// The buffer covers the whole allocation described by its layout, including any padding
/// between rows and slices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelData {
    layout: PixelLayout,
    bytes: Vec<u8>,
}

/// A borrowed view of pixels in external memory.
///
/// The byte slice starts at the allocation origin, the layout's volume selects the pixels within
/// it.
#[derive(Clone, Copy, Debug)]
pub struct PixelRef<'data> {
    layout: PixelLayout,
    bytes: &'data [u8],
}

/// A mutable borrowed view of pixels in external memory.
#[derive(Debug)]
pub struct PixelMut<'data> {
    layout: PixelLayout,
    bytes: &'data mut [u8],
}

impl PixelData {
    /// Allocate a zeroed buffer for the layout.
    ///
    /// # Usage
    ///
    /// ```
    /// use image_pixel::{PixelData, PixelFormat, PixelLayout};
    ///
    /// let layout = PixelLayout::new(32, 32, 1, PixelFormat::R8G8B8A8)?;
    /// let data = PixelData::new(layout);
    /// assert_eq!(data.as_bytes().len(), 32 * 32 * 4);
    /// # Ok::<(), image_pixel::LayoutError>(())
    /// ```
    pub fn new(layout: PixelLayout) -> Self {
        PixelData {
            layout,
            bytes: vec![0; layout.byte_len()],
        }
    }

    /// Adopt an existing buffer.
    ///
    /// Fails if the buffer does not cover the layout. Any excess is kept as is.
    pub fn with_bytes(layout: PixelLayout, bytes: Vec<u8>) -> Result<Self, PixelError> {
        PixelError::check_len(layout.byte_len(), bytes.len())?;
        Ok(PixelData { layout, bytes })
    }

    pub fn layout(&self) -> &PixelLayout {
        &self.layout
    }

    pub fn format(&self) -> PixelFormat {
        self.layout.format
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn as_ref(&self) -> PixelRef<'_> {
        PixelRef {
            layout: self.layout,
            bytes: &self.bytes,
        }
    }

    pub fn as_mut(&mut self) -> PixelMut<'_> {
        PixelMut {
            layout: self.layout,
            bytes: &mut self.bytes,
        }
    }
}

impl<'data> PixelRef<'data> {
    /// View a byte slice through a layout.
    pub fn new(layout: PixelLayout, bytes: &'data [u8]) -> Result<Self, PixelError> {
        PixelError::check_len(layout.byte_len(), bytes.len())?;
        Ok(PixelRef { layout, bytes })
    }

    pub fn layout(&self) -> &PixelLayout {
        &self.layout
    }

    pub fn format(&self) -> PixelFormat {
        self.layout.format
    }

    /// All bytes of the underlying allocation.
    pub fn as_bytes(&self) -> &'data [u8] {
        self.bytes
    }

    /// A view of a part of the same memory.
    ///
    /// The volume is relative to the allocation, like the view's own volume.
    pub fn sub_view(&self, volume: PixelVolume) -> Result<Self, LayoutError> {
        Ok(PixelRef {
            layout: self.layout.sub_layout(volume)?,
            bytes: self.bytes,
        })
    }

    /// Read the pixel at a position relative to the volume's origin.
    pub fn color_at(&self, x: u32, y: u32, z: u32) -> Result<Color, PixelError> {
        let offset = element_offset(&self.layout, x, y, z)?;
        codec::unpack_color(self.layout.format, &self.bytes[offset..])
    }

    /// The same memory in another format of identical element size.
    pub(crate) fn with_format(self, format: PixelFormat) -> Self {
        PixelRef {
            layout: self.layout.with_format(format),
            ..self
        }
    }
}

impl<'data> PixelMut<'data> {
    /// View a mutable byte slice through a layout.
    pub fn new(layout: PixelLayout, bytes: &'data mut [u8]) -> Result<Self, PixelError> {
        PixelError::check_len(layout.byte_len(), bytes.len())?;
        Ok(PixelMut { layout, bytes })
    }

    pub fn layout(&self) -> &PixelLayout {
        &self.layout
    }

    pub fn format(&self) -> PixelFormat {
        self.layout.format
    }

    pub fn as_bytes(&self) -> &[u8] {
        &*self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    /// Borrow as an immutable view.
    pub fn as_ref(&self) -> PixelRef<'_> {
        PixelRef {
            layout: self.layout,
            bytes: &*self.bytes,
        }
    }

    /// Reborrow, for passing the view on without giving it up.
    pub fn reborrow(&mut self) -> PixelMut<'_> {
        PixelMut {
            layout: self.layout,
            bytes: &mut *self.bytes,
        }
    }

    /// A mutable view of a part of the same memory.
    pub fn sub_view_mut(self, volume: PixelVolume) -> Result<Self, LayoutError> {
        Ok(PixelMut {
            layout: self.layout.sub_layout(volume)?,
            bytes: self.bytes,
        })
    }

    pub fn color_at(&self, x: u32, y: u32, z: u32) -> Result<Color, PixelError> {
        self.as_ref().color_at(x, y, z)
    }

    /// Write the pixel at a position relative to the volume's origin.
    pub fn set_color_at(&mut self, color: Color, x: u32, y: u32, z: u32) -> Result<(), PixelError> {
        let offset = element_offset(&self.layout, x, y, z)?;
        codec::pack_color(color, self.layout.format, &mut self.bytes[offset..])
    }

    pub(crate) fn with_format(self, format: PixelFormat) -> Self {
        PixelMut {
            layout: self.layout.with_format(format),
            ..self
        }
    }
}

impl<'data> From<PixelMut<'data>> for PixelRef<'data> {
    fn from(view: PixelMut<'data>) -> Self {
        PixelRef {
            layout: view.layout,
            bytes: view.bytes,
        }
    }
}

fn element_offset(layout: &PixelLayout, x: u32, y: u32, z: u32) -> Result<usize, PixelError> {
    if layout.format.is_compressed() {
        return Err(PixelError::not_implemented("single pixel access of", layout.format));
    }

    if x >= layout.width() || y >= layout.height() || z >= layout.depth() {
        return Err(PixelError::InvalidParameters("pixel position outside of the volume"));
    }

    Ok(layout.offset_in_volume(x, y, z))
}
