//! Pixel formats of a texture pipeline and the conversions between them.
//!
//! Every format is described by a static catalog entry: its element size, channel bit layout,
//! and some flags. On top of that the crate offers packing of single colors, bulk conversion of
//! whole pixel boxes, and resampling of boxes with nearest or bilinear filtering.
//!
//! Block compressed and depth formats are described but can only be copied, not converted.
//!
//! # Usage
//!
//! Pixel boxes are either owned, [`PixelData`], or borrowed from some other buffer. Each is
//! described by a [`PixelLayout`] that places a volume of pixels within rows and slices:
//!
//! ```
//! use image_pixel::{PixelData, PixelFormat, PixelLayout};
//!
//! let layout = PixelLayout::new(64, 64, 1, PixelFormat::B8G8R8A8)?;
//! let frame = PixelData::new(layout);
//! assert_eq!(frame.as_bytes().len(), 64 * 64 * 4);
//! # Ok::<(), image_pixel::LayoutError>(())
//! ```
//!
//! Converting and resampling work on views of such boxes:
//!
//! ```
//! use image_pixel::{convert, scale, Filter, PixelData, PixelFormat, PixelLayout};
//!
//! let layout = PixelLayout::new(64, 64, 1, PixelFormat::R8G8B8)?;
//! let rgb = PixelData::new(layout);
//!
//! let layout = PixelLayout::new(64, 64, 1, PixelFormat::Float16Rgba)?;
//! let mut half = PixelData::new(layout);
//! convert(&rgb.as_ref(), &mut half.as_mut())?;
//!
//! let layout = PixelLayout::new(16, 16, 1, PixelFormat::R8G8B8)?;
//! let mut thumbnail = PixelData::new(layout);
//! scale(&rgb.as_ref(), &mut thumbnail.as_mut(), Filter::Bilinear)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

/// Fixed point and bit-field helpers.
pub mod bits;
/// Packing and unpacking of single pixels.
pub mod codec;
mod color;
mod convert;
mod error;
/// The catalog of pixel formats.
pub mod format;
mod frame;
mod layout;
mod scale;

#[cfg(test)]
mod tests;

pub use self::color::{apply_gamma, Color};
pub use self::convert::convert;
pub use self::error::PixelError;
pub use self::format::{describe, is_valid_extent, max_mipmaps, memory_size, PixelFormat};
pub use self::frame::{PixelData, PixelMut, PixelRef};
pub use self::layout::{LayoutError, PixelLayout, PixelVolume};
pub use self::scale::{scale, Filter};
