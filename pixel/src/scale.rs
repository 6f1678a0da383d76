//! Resampling of pixel boxes to a different extent.
//!
//! Source positions are tracked in 16.48 fixed point, starting half a source pixel into the
//! image so that destination pixels sample at their centers. The integer part of a position must
//! therefore fit into 16 bits.
use crate::bits;
use crate::codec;
use crate::color::Color;
use crate::convert::convert;
use crate::error::PixelError;
use crate::format::PixelFormat;
use crate::frame::{PixelData, PixelMut, PixelRef};
use crate::layout::PixelLayout;

/// The filter used when resampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Copy the source pixel closest to each destination pixel.
    #[default]
    Nearest,
    /// Blend the neighboring source pixels by their distance.
    Bilinear,
}

/// Largest extent that fits the integer part of the fixed point positions.
const MAX_SOURCE_EXTENT: u32 = 0xFFFF;

type Kernel = fn(&PixelRef, &mut PixelMut) -> Result<(), PixelError>;

/// Resample the pixels of one box into another box.
///
/// Sampling is relative to the origin of the source volume, the whole destination volume is
/// written. The formats may differ, in which case pixels are converted after resampling (or while
/// blending, for the filters that go through [`Color`]).
///
/// # Usage
///
/// ```
/// use image_pixel::{scale, Filter, PixelData, PixelFormat, PixelLayout};
///
/// let layout = PixelLayout::new(2, 2, 1, PixelFormat::R8G8B8A8)?;
/// let small = PixelData::with_bytes(layout, vec![255; 16])?;
///
/// let layout = PixelLayout::new(8, 8, 1, PixelFormat::R8G8B8A8)?;
/// let mut large = PixelData::new(layout);
///
/// scale(&small.as_ref(), &mut large.as_mut(), Filter::Bilinear)?;
/// assert!(large.as_bytes().iter().all(|&b| b == 255));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Panics
///
/// If either format is not accessible, see [`PixelFormat::is_accessible`].
pub fn scale(src: &PixelRef, dst: &mut PixelMut, filter: Filter) -> Result<(), PixelError> {
    assert!(
        src.format().is_accessible(),
        "can not resample from {}",
        src.format()
    );
    assert!(
        dst.format().is_accessible(),
        "can not resample into {}",
        dst.format()
    );

    let (from, into) = (*src.layout(), *dst.layout());
    if into.volume().is_empty() {
        return Ok(());
    }

    if from.volume().is_empty() {
        return Err(PixelError::InvalidParameters("resampling an empty source"));
    }

    if from.width().max(from.height()).max(from.depth()) > MAX_SOURCE_EXTENT {
        return Err(PixelError::InvalidParameters(
            "source extent exceeds the resampling range",
        ));
    }

    use PixelFormat::*;
    match filter {
        Filter::Nearest => through_source_format(src, dst, nearest_by_size),
        Filter::Bilinear => match from.format() {
            R8G8 | R8G8B8 | B8G8R8 | R8G8B8A8 | B8G8R8A8 | A8B8G8R8 | A8R8G8B8 | X8B8G8R8
            | X8R8G8B8 => through_source_format(src, dst, linear_bytes_by_size),
            Float32Rgb | Float32Rgba if matches!(into.format(), Float32Rgb | Float32Rgba) => {
                tracing::trace!(kernel = "linear_f32", "resampling pixels");
                linear_f32(src, dst);
                Ok(())
            }
            _ => linear(src, dst),
        },
    }
}

/// Run a kernel that keeps the source format, converting afterwards if necessary.
fn through_source_format(
    src: &PixelRef,
    dst: &mut PixelMut,
    kernel: Kernel,
) -> Result<(), PixelError> {
    if src.format() == dst.format() {
        return kernel(src, dst);
    }

    let into = dst.layout();
    let (width, height, depth) = (into.width(), into.height(), into.depth());
    let layout = PixelLayout::new(width, height, depth, src.format())
        .map_err(|_| PixelError::InvalidParameters("temporary buffer is not representable"))?;

    tracing::debug!(
        format = src.format().name(),
        width,
        height,
        depth,
        "allocating temporary pixel buffer"
    );

    let mut temp = PixelData::new(layout);
    kernel(src, &mut temp.as_mut())?;
    convert(&temp.as_ref(), dst)
}

/// Source positions for each destination pixel along one axis.
fn positions(src_extent: u32, dst_extent: u32) -> impl Iterator<Item = u64> {
    let step = (u64::from(src_extent) << 48) / u64::from(dst_extent);
    let start = (step >> 1).saturating_sub(1);
    (0..u64::from(dst_extent)).map(move |i| start + i * step)
}

/// The two neighbors of a position and the weight of the second one.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Tap<W> {
    near: u32,
    far: u32,
    weight: W,
}

impl Tap<f32> {
    /// With 16 bits of fraction.
    fn new(position: u64, extent: u32) -> Self {
        let temp = ((position >> 32) as u32).saturating_sub(0x8000);
        let near = temp >> 16;
        Tap {
            near,
            far: (near + 1).min(extent - 1),
            weight: (temp & 0xFFFF) as f32 / 65536.0,
        }
    }
}

impl Tap<u32> {
    /// With 12 bits of fraction.
    fn new(position: u64, extent: u32) -> Self {
        let temp = ((position >> 36) as u32).saturating_sub(0x800);
        let near = temp >> 12;
        Tap {
            near,
            far: (near + 1).min(extent - 1),
            weight: temp & 0xFFF,
        }
    }
}

/// The eight neighbors of a position with their blend weights.
fn corners(x: Tap<f32>, y: Tap<f32>, z: Tap<f32>) -> [(u32, u32, u32, f32); 8] {
    let (wx, wy, wz) = (x.weight, y.weight, z.weight);
    [
        (x.near, y.near, z.near, (1.0 - wx) * (1.0 - wy) * (1.0 - wz)),
        (x.far, y.near, z.near, wx * (1.0 - wy) * (1.0 - wz)),
        (x.near, y.far, z.near, (1.0 - wx) * wy * (1.0 - wz)),
        (x.far, y.far, z.near, wx * wy * (1.0 - wz)),
        (x.near, y.near, z.far, (1.0 - wx) * (1.0 - wy) * wz),
        (x.far, y.near, z.far, wx * (1.0 - wy) * wz),
        (x.near, y.far, z.far, (1.0 - wx) * wy * wz),
        (x.far, y.far, z.far, wx * wy * wz),
    ]
}

fn nearest_by_size(src: &PixelRef, dst: &mut PixelMut) -> Result<(), PixelError> {
    let size = src.format().element_bytes();
    tracing::trace!(kernel = "nearest", size, "resampling pixels");

    match size {
        1 => nearest::<1>(src, dst),
        2 => nearest::<2>(src, dst),
        3 => nearest::<3>(src, dst),
        4 => nearest::<4>(src, dst),
        6 => nearest::<6>(src, dst),
        8 => nearest::<8>(src, dst),
        12 => nearest::<12>(src, dst),
        16 => nearest::<16>(src, dst),
        _ => unreachable!("no accessible format has {size} byte elements"),
    }

    Ok(())
}

/// Copy raw elements of `N` bytes, both sides must have the same format.
fn nearest<const N: usize>(src: &PixelRef, dst: &mut PixelMut) {
    let (from, into) = (*src.layout(), *dst.layout());
    let (bytes_in, bytes_out) = (src.as_bytes(), dst.as_bytes_mut());

    for (z, pos_z) in (0..).zip(positions(from.depth(), into.depth())) {
        let sz = (pos_z >> 48) as u32;

        for (y, pos_y) in (0..).zip(positions(from.height(), into.height())) {
            let sy = (pos_y >> 48) as u32;
            let row = &mut bytes_out[into.row(y, z)];

            for (texel, pos_x) in row
                .chunks_exact_mut(N)
                .zip(positions(from.width(), into.width()))
            {
                let offset = from.offset_in_volume((pos_x >> 48) as u32, sy, sz);
                texel.copy_from_slice(&bytes_in[offset..offset + N]);
            }
        }
    }
}

fn linear_bytes_by_size(src: &PixelRef, dst: &mut PixelMut) -> Result<(), PixelError> {
    if src.layout().depth() > 1 || dst.layout().depth() > 1 {
        return linear(src, dst);
    }

    let size = src.format().element_bytes();
    tracing::trace!(kernel = "linear_bytes", size, "resampling pixels");

    match size {
        1 => linear_bytes::<1>(src, dst),
        2 => linear_bytes::<2>(src, dst),
        3 => linear_bytes::<3>(src, dst),
        4 => linear_bytes::<4>(src, dst),
        _ => unreachable!("no byte format has {size} byte elements"),
    }

    Ok(())
}

/// Blend `N` channels of one byte each, in a single slice.
///
/// Weights have 12 bits of fraction, the four products of an output sum up to `1 << 24`.
fn linear_bytes<const N: usize>(src: &PixelRef, dst: &mut PixelMut) {
    let (from, into) = (*src.layout(), *dst.layout());
    let (bytes_in, bytes_out) = (src.as_bytes(), dst.as_bytes_mut());

    for (y, pos_y) in (0..).zip(positions(from.height(), into.height())) {
        let ty = Tap::<u32>::new(pos_y, from.height());
        let row = &mut bytes_out[into.row(y, 0)];

        for (texel, pos_x) in row
            .chunks_exact_mut(N)
            .zip(positions(from.width(), into.width()))
        {
            let tx = Tap::<u32>::new(pos_x, from.width());
            let (wx, wy) = (tx.weight, ty.weight);

            let samples = [
                (tx.near, ty.near, (0x1000 - wx) * (0x1000 - wy)),
                (tx.far, ty.near, wx * (0x1000 - wy)),
                (tx.near, ty.far, (0x1000 - wx) * wy),
                (tx.far, ty.far, wx * wy),
            ]
            .map(|(x, y, weight)| (from.offset_in_volume(x, y, 0), weight));

            for (k, channel) in texel.iter_mut().enumerate() {
                let accum: u32 = samples
                    .iter()
                    .map(|&(offset, weight)| u32::from(bytes_in[offset + k]) * weight)
                    .sum();
                // Round to nearest.
                *channel = ((accum + 0x80_0000) >> 24) as u8;
            }
        }
    }
}

/// Blend 32-bit float RGB or RGBA without going through the codec.
///
/// If either side lacks alpha only color channels are blended and alpha is opaque.
fn linear_f32(src: &PixelRef, dst: &mut PixelMut) {
    let (from, into) = (*src.layout(), *dst.layout());
    let (bytes_in, bytes_out) = (src.as_bytes(), dst.as_bytes_mut());

    let channels_in = from.format().component_count();
    let channels_out = into.format().component_count();
    let channels = if channels_in == 3 || channels_out == 3 {
        3
    } else {
        4
    };

    for (z, pos_z) in (0..).zip(positions(from.depth(), into.depth())) {
        let tz = Tap::<f32>::new(pos_z, from.depth());

        for (y, pos_y) in (0..).zip(positions(from.height(), into.height())) {
            let ty = Tap::<f32>::new(pos_y, from.height());
            let row = &mut bytes_out[into.row(y, z)];

            for (texel, pos_x) in row
                .chunks_exact_mut(4 * channels_out)
                .zip(positions(from.width(), into.width()))
            {
                let tx = Tap::<f32>::new(pos_x, from.width());
                let mut accum = [0.0f32; 4];

                for (sx, sy, sz, weight) in corners(tx, ty, tz) {
                    let sample = &bytes_in[from.offset_in_volume(sx, sy, sz)..];
                    for (c, value) in accum.iter_mut().enumerate().take(channels) {
                        *value += bits::read_f32(sample, c) * weight;
                    }
                }

                if channels == 3 {
                    accum[3] = 1.0;
                }

                for (c, &value) in accum.iter().enumerate().take(channels_out) {
                    bits::write_f32(texel, c, value);
                }
            }
        }
    }
}

/// Blend through the color codec, for any pair of formats.
fn linear(src: &PixelRef, dst: &mut PixelMut) -> Result<(), PixelError> {
    let (from, into) = (*src.layout(), *dst.layout());
    codec::check_supported(from.format())?;
    codec::check_supported(into.format())?;
    tracing::trace!(
        kernel = "linear",
        from = from.format().name(),
        into = into.format().name(),
        "resampling pixels"
    );

    let (bytes_in, bytes_out) = (src.as_bytes(), dst.as_bytes_mut());
    let size_out = into.format().element_bytes();

    for (z, pos_z) in (0..).zip(positions(from.depth(), into.depth())) {
        let tz = Tap::<f32>::new(pos_z, from.depth());

        for (y, pos_y) in (0..).zip(positions(from.height(), into.height())) {
            let ty = Tap::<f32>::new(pos_y, from.height());
            let row = &mut bytes_out[into.row(y, z)];

            for (texel, pos_x) in row
                .chunks_exact_mut(size_out)
                .zip(positions(from.width(), into.width()))
            {
                let tx = Tap::<f32>::new(pos_x, from.width());
                let mut accum = Color::TRANSPARENT;

                for (sx, sy, sz, weight) in corners(tx, ty, tz) {
                    let offset = from.offset_in_volume(sx, sy, sz);
                    accum += codec::unpack_color(from.format(), &bytes_in[offset..])? * weight;
                }

                codec::pack_color(accum, into.format(), texel)?;
            }
        }
    }

    Ok(())
}
