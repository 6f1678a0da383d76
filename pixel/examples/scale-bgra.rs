use image_pixel::{scale, Color, Filter, PixelData, PixelError, PixelFormat, PixelLayout};

const SZ_IN: u32 = 64;
const SZ_OUT: u32 = 1024;

/// Shows how one would upscale a BgrA frame while converting it into RgbA.
///
/// This example exists, in part, so that we can run `perf`.
fn main() -> Result<(), PixelError> {
    let layout = PixelLayout::new(SZ_IN, SZ_IN, 1, PixelFormat::B8G8R8A8)
        .map_err(|_| PixelError::InvalidParameters("input layout"))?;
    let mut frame = PixelData::new(layout);

    {
        let mut view = frame.as_mut();
        for y in 0..SZ_IN {
            for x in 0..SZ_IN {
                let (u, v) = (x as f32 / SZ_IN as f32, y as f32 / SZ_IN as f32);
                let checker = if (x / 8 + y / 8) % 2 == 0 { 1.0 } else { 0.5 };
                view.set_color_at(Color::new(u * checker, v * checker, 0.73, 1.0), x, y, 0)?;
            }
        }
    }

    // `image::save` expects an 8-bit RgbA buffer, allocate one.
    let layout = PixelLayout::new(SZ_OUT, SZ_OUT, 1, PixelFormat::R8G8B8A8)
        .map_err(|_| PixelError::InvalidParameters("output layout"))?;
    let mut output = PixelData::new(layout);

    scale(&frame.as_ref(), &mut output.as_mut(), Filter::Bilinear)?;

    if std::env::var_os("IMAGE_PIXEL_SKIP_IO").is_none() {
        // R8G8B8A8 is packed native endian, this matches the byte order only on little endian.
        let container = output.into_bytes();
        let image =
            image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(SZ_OUT, SZ_OUT, container).unwrap();

        let output = format!(concat!(env!("CARGO_MANIFEST_DIR"), "/../test.png"),);
        image.save(output).unwrap();
    }

    Ok(())
}
