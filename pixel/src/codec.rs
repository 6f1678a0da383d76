//! Packing colors into the memory representation of a format, and back.
//!
//! Native endian formats are handled generically through the masks and shifts of the catalog.
//! All other accessible formats have a dedicated conversion.
use crate::bits::{self, ChannelBits};
use crate::color::Color;
use crate::error::PixelError;
use crate::format::{FormatDescriptor, FormatFlags, PixelFormat};

impl FormatDescriptor {
    fn channels(&self) -> [ChannelBits; 4] {
        [0, 1, 2, 3].map(|i| ChannelBits::new(self.bits[i], self.masks[i], self.shifts[i]))
    }

    /// Whether unpacking reads an alpha value, otherwise alpha is opaque.
    ///
    /// The padded formats carry the alpha flag without any alpha bits.
    fn reads_alpha(&self) -> bool {
        self.flags.contains(FormatFlags::HAS_ALPHA) && self.bits[3] > 0
    }
}

/// Check that `pack` and `unpack` are available for a format.
pub fn check_supported(format: PixelFormat) -> Result<(), PixelError> {
    use PixelFormat::*;

    if format.is_native_endian() {
        return Ok(());
    }

    match format {
        R8 | R8G8 | Float16R | Float16Rg | Float16Rgb | Float16Rgba | Float32R | Float32Rg
        | Float32Rgb | Float32Rgba => Ok(()),
        _ => Err(PixelError::not_implemented("pack/unpack of", format)),
    }
}

/// Pack a color into the first element of `dest`.
pub fn pack_color(color: Color, format: PixelFormat, dest: &mut [u8]) -> Result<(), PixelError> {
    pack_rgba(color.r, color.g, color.b, color.a, format, dest)
}

/// Pack 8-bit channels into the first element of `dest`.
///
/// Native endian formats are packed directly by widening or narrowing the channel bits.
pub fn pack_rgba_u8(
    [r, g, b, a]: [u8; 4],
    format: PixelFormat,
    dest: &mut [u8],
) -> Result<(), PixelError> {
    let desc = format.descriptor();

    if !format.is_native_endian() {
        let color = Color::from_rgba_u8([r, g, b, a]);
        return pack_color(color, format, dest);
    }

    let len = usize::from(desc.element_bytes);
    PixelError::check_len(len, dest.len())?;

    let value = desc
        .channels()
        .into_iter()
        .zip([r, g, b, a])
        .fold(0u32, |value, (ch, v)| {
            value | ch.insert(bits::fixed_to_fixed(v.into(), 8, ch.len.into()))
        });

    bits::int_write(dest, len, value);
    Ok(())
}

/// Pack float channels into the first element of `dest`.
pub fn pack_rgba(
    r: f32,
    g: f32,
    b: f32,
    a: f32,
    format: PixelFormat,
    dest: &mut [u8],
) -> Result<(), PixelError> {
    use PixelFormat::*;

    let desc = format.descriptor();
    check_supported(format)?;
    PixelError::check_len(usize::from(desc.element_bytes), dest.len())?;

    if format.is_native_endian() {
        let value = desc
            .channels()
            .into_iter()
            .zip([r, g, b, a])
            .fold(0u32, |value, (ch, v)| {
                value | ch.insert(bits::float_to_fixed(v, ch.len.into()))
            });

        bits::int_write(dest, desc.element_bytes.into(), value);
        return Ok(());
    }

    let rgba = [r, g, b, a];
    match format {
        Float32R | Float32Rg | Float32Rgb | Float32Rgba => {
            for (idx, &v) in rgba[..format.component_count()].iter().enumerate() {
                bits::write_f32(dest, idx, v);
            }
        }
        Float16R | Float16Rg | Float16Rgb | Float16Rgba => {
            for (idx, &v) in rgba[..format.component_count()].iter().enumerate() {
                bits::write_u16(dest, idx, bits::float_to_half(v));
            }
        }
        R8 | R8G8 => {
            for (byte, &v) in dest.iter_mut().zip(&rgba[..format.component_count()]) {
                *byte = bits::float_to_fixed(v, 8) as u8;
            }
        }
        _ => unreachable!("checked to be supported"),
    }

    Ok(())
}

/// Unpack the first element of `src` into a color.
pub fn unpack_color(format: PixelFormat, src: &[u8]) -> Result<Color, PixelError> {
    unpack_rgba(format, src).map(Color::from)
}

/// Unpack the first element of `src` into 8-bit channels.
///
/// A format without alpha yields an opaque `255` alpha.
pub fn unpack_rgba_u8(format: PixelFormat, src: &[u8]) -> Result<[u8; 4], PixelError> {
    let desc = format.descriptor();

    if !format.is_native_endian() {
        let rgba = unpack_rgba(format, src)?;
        return Ok(rgba.map(|v| bits::float_to_fixed(v, 8) as u8));
    }

    let len = usize::from(desc.element_bytes);
    PixelError::check_len(len, src.len())?;
    let value = bits::int_read(src, len);

    let [r, g, b, a] = desc
        .channels()
        .map(|ch| bits::fixed_to_fixed(ch.extract(value), ch.len.into(), 8) as u8);

    Ok([r, g, b, if desc.reads_alpha() { a } else { 255 }])
}

/// Unpack the first element of `src` into float channels.
///
/// A format without alpha yields an opaque `1.0` alpha. Single channel formats replicate their
/// value into green and blue, two channel float formats replicate green into blue.
pub fn unpack_rgba(format: PixelFormat, src: &[u8]) -> Result<[f32; 4], PixelError> {
    use PixelFormat::*;

    let desc = format.descriptor();
    check_supported(format)?;
    PixelError::check_len(usize::from(desc.element_bytes), src.len())?;

    if format.is_native_endian() {
        let value = bits::int_read(src, desc.element_bytes.into());
        let [r, g, b, a] = desc
            .channels()
            .map(|ch| bits::fixed_to_float(ch.extract(value), ch.len.into()));

        return Ok([r, g, b, if desc.reads_alpha() { a } else { 1.0 }]);
    }

    let f32_at = |idx| bits::read_f32(src, idx);
    let f16_at = |idx| bits::half_to_float(bits::read_u16(src, idx));
    let u8_at = |idx: usize| bits::fixed_to_float(src[idx].into(), 8);

    Ok(match format {
        Float32R => {
            let r = f32_at(0);
            [r, r, r, 1.0]
        }
        Float32Rg => {
            let g = f32_at(1);
            [f32_at(0), g, g, 1.0]
        }
        Float32Rgb => [f32_at(0), f32_at(1), f32_at(2), 1.0],
        Float32Rgba => [f32_at(0), f32_at(1), f32_at(2), f32_at(3)],
        Float16R => {
            let r = f16_at(0);
            [r, r, r, 1.0]
        }
        Float16Rg => {
            let g = f16_at(1);
            [f16_at(0), g, g, 1.0]
        }
        Float16Rgb => [f16_at(0), f16_at(1), f16_at(2), 1.0],
        Float16Rgba => [f16_at(0), f16_at(1), f16_at(2), f16_at(3)],
        R8G8 => [u8_at(0), u8_at(1), 0.0, 1.0],
        R8 => [u8_at(0), 0.0, 0.0, 1.0],
        _ => unreachable!("checked to be supported"),
    })
}
