//! Conversion of whole pixel boxes between formats.
use crate::codec;
use crate::error::PixelError;
use crate::format::PixelFormat;
use crate::frame::{PixelMut, PixelRef};
use crate::layout::PixelLayout;

/// The method by which pixels are moved from source to destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route {
    /// Block compressed data of identical format, copied as a whole.
    Blocks,
    /// Both sides are identical and without padding.
    Bulk,
    /// Identical formats, copied row by row.
    Rows,
    /// The padding byte is re-described as alpha on one side, then planned again.
    Padding,
    /// Every pixel goes through the color codec.
    Codec,
}

/// Convert the pixels of one box into the format of another box.
///
/// Both boxes must have the same extent, they may differ in layout. Identical formats are copied
/// directly, otherwise every pixel is unpacked into a [`Color`](crate::Color) and packed into the
/// destination format.
///
/// The destination is not modified if an error is returned.
///
/// # Usage
///
/// ```
/// use image_pixel::{convert, PixelData, PixelFormat, PixelLayout};
///
/// let layout = PixelLayout::new(2, 1, 1, PixelFormat::R8G8B8)?;
/// let rgb = PixelData::with_bytes(layout, vec![255, 0, 0, 0, 0, 255])?;
///
/// let layout = PixelLayout::new(2, 1, 1, PixelFormat::Float32Rgba)?;
/// let mut rgba = PixelData::new(layout);
///
/// convert(&rgb.as_ref(), &mut rgba.as_mut())?;
/// assert_eq!(rgba.as_ref().color_at(1, 0, 0)?.b, 1.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Panics
///
/// If the width, height or depth of the boxes differ.
pub fn convert(src: &PixelRef, dst: &mut PixelMut) -> Result<(), PixelError> {
    let (from, into) = (*src.layout(), *dst.layout());
    assert_eq!(
        (from.width(), from.height(), from.depth()),
        (into.width(), into.height(), into.depth()),
        "converted boxes must have the same extent"
    );

    let route = plan(&from, &into);
    tracing::trace!(
        from = from.format().name(),
        into = into.format().name(),
        ?route,
        "converting pixels"
    );

    match route {
        Route::Blocks if from.format() == into.format() => {
            let len = from.consecutive_size();
            dst.as_bytes_mut()[..len].copy_from_slice(&src.as_bytes()[..len]);
            Ok(())
        }
        Route::Blocks if from.format().is_compressed() => Err(PixelError::not_implemented(
            "decompression from",
            from.format(),
        )),
        Route::Blocks => Err(PixelError::not_implemented("compression to", into.format())),
        Route::Bulk => {
            let len = from.consecutive_size();
            let (start_in, start_out) = (from.origin_offset(), into.origin_offset());
            dst.as_bytes_mut()[start_out..start_out + len]
                .copy_from_slice(&src.as_bytes()[start_in..start_in + len]);
            Ok(())
        }
        Route::Rows => {
            let (bytes_in, bytes_out) = (src.as_bytes(), dst.as_bytes_mut());
            for (row_in, row_out) in from.rows().zip(into.rows()) {
                bytes_out[row_out].copy_from_slice(&bytes_in[row_in]);
            }
            Ok(())
        }
        Route::Padding => {
            if let Some(format) = with_alpha(into.format()) {
                let mut dst = dst.reborrow().with_format(format);
                convert(src, &mut dst)
            } else {
                let format = with_alpha(from.format()).unwrap_or(from.format());
                convert(&src.with_format(format), dst)
            }
        }
        Route::Codec => {
            codec::check_supported(from.format())?;
            codec::check_supported(into.format())?;
            convert_pixels(src, dst)
        }
    }
}

fn plan(from: &PixelLayout, into: &PixelLayout) -> Route {
    let (format_in, format_out) = (from.format(), into.format());

    if format_in.is_compressed() || format_out.is_compressed() {
        Route::Blocks
    } else if format_in == format_out {
        if from.is_consecutive() && into.is_consecutive() {
            Route::Bulk
        } else {
            Route::Rows
        }
    } else if with_alpha(format_out).is_some()
        || (with_alpha(format_in).is_some() && !format_out.has_alpha())
    {
        Route::Padding
    } else {
        Route::Codec
    }
}

/// The format using the padding byte as alpha, with otherwise identical channels.
fn with_alpha(format: PixelFormat) -> Option<PixelFormat> {
    match format {
        PixelFormat::X8R8G8B8 => Some(PixelFormat::A8R8G8B8),
        PixelFormat::X8B8G8R8 => Some(PixelFormat::A8B8G8R8),
        _ => None,
    }
}

fn convert_pixels(src: &PixelRef, dst: &mut PixelMut) -> Result<(), PixelError> {
    let (from, into) = (*src.layout(), *dst.layout());
    let (size_in, size_out) = (from.format().element_bytes(), into.format().element_bytes());
    let (bytes_in, bytes_out) = (src.as_bytes(), dst.as_bytes_mut());

    for (row_in, row_out) in from.rows().zip(into.rows()) {
        let texels_in = bytes_in[row_in].chunks_exact(size_in);
        let texels_out = bytes_out[row_out].chunks_exact_mut(size_out);

        for (texel_in, texel_out) in texels_in.zip(texels_out) {
            let color = codec::unpack_color(from.format(), texel_in)?;
            codec::pack_color(color, into.format(), texel_out)?;
        }
    }

    Ok(())
}
