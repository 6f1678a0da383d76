use crate::{
    convert, scale, Color, Filter, PixelData, PixelError, PixelFormat, PixelLayout, PixelRef,
    PixelVolume,
};

/// Deterministic, non-trivial bytes.
fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 37 + i / 7) as u8).collect()
}

fn filled(layout: PixelLayout) -> PixelData {
    let len = layout.byte_len();
    PixelData::with_bytes(layout, pattern(len)).unwrap()
}

/// Everything outside of the rows of the volume still holds `value`.
fn assert_padding(data: &PixelData, value: u8) {
    let mut padding = vec![true; data.as_bytes().len()];
    for row in data.layout().rows() {
        padding[row].fill(false);
    }

    let bytes = data.as_bytes().iter().zip(padding).enumerate();
    for (idx, (byte, _)) in bytes.filter(|(_, (_, pad))| *pad) {
        assert_eq!(*byte, value, "byte {idx}");
    }
}

#[test]
fn identity_conversion_copies_region() -> Result<(), PixelError> {
    let volume = PixelVolume {
        left: 1,
        top: 1,
        front: 0,
        right: 4,
        bottom: 3,
        back: 1,
    };

    let layout = PixelLayout::with_pitches(volume, 6, 24, PixelFormat::R8G8B8).unwrap();
    let from = filled(layout);

    let layout = PixelLayout::with_pitches(volume, 5, 20, PixelFormat::R8G8B8).unwrap();
    let mut into = PixelData::with_bytes(layout, vec![0xee; layout.byte_len()])?;

    convert(&from.as_ref(), &mut into.as_mut())?;

    let (src, dst) = (from.layout(), into.layout());
    for (y, z) in [(0, 0), (1, 0)] {
        let row_in = &from.as_bytes()[src.row(y, z)];
        let row_out = &into.as_bytes()[dst.row(y, z)];
        assert_eq!(row_in, row_out, "row {y}");
    }

    assert_padding(&into, 0xee);
    Ok(())
}

#[test]
fn consecutive_copy_from_region_origin() -> Result<(), PixelError> {
    let layout = PixelLayout::new(4, 4, 1, PixelFormat::R8G8).unwrap();
    let from = filled(layout);
    let part = PixelVolume {
        left: 0,
        top: 2,
        front: 0,
        right: 4,
        bottom: 4,
        back: 1,
    };

    let from = from.as_ref().sub_view(part).unwrap();
    assert!(!from.layout().is_consecutive());

    let layout = PixelLayout::new(4, 2, 1, PixelFormat::R8G8).unwrap();
    let mut into = PixelData::new(layout);
    convert(&from, &mut into.as_mut())?;
    assert_eq!(into.as_bytes(), &from.as_bytes()[16..32]);

    Ok(())
}

#[test]
fn padding_becomes_alpha() -> Result<(), PixelError> {
    let layout = PixelLayout::new(3, 3, 1, PixelFormat::A8R8G8B8).unwrap();
    let from = filled(layout);

    let layout = PixelLayout::new(3, 3, 1, PixelFormat::X8R8G8B8).unwrap();
    let mut into = PixelData::new(layout);
    convert(&from.as_ref(), &mut into.as_mut())?;
    // Shares the bit layout, so this is a plain copy.
    assert_eq!(from.as_bytes(), into.as_bytes());

    let layout = PixelLayout::new(3, 3, 1, PixelFormat::R8G8B8A8).unwrap();
    let mut rgba = PixelData::new(layout);
    convert(&into.as_ref(), &mut rgba.as_mut())?;

    for (x, y) in [(0, 0), (2, 1), (1, 2)] {
        let color = rgba.as_ref().color_at(x, y, 0)?;
        let expected = Color {
            a: 1.0,
            ..from.as_ref().color_at(x, y, 0)?
        };
        assert_eq!(color, expected);
    }

    Ok(())
}

#[test]
fn padding_into_opaque_formats() -> Result<(), PixelError> {
    let layout = PixelLayout::new(2, 2, 1, PixelFormat::X8B8G8R8).unwrap();
    let from = filled(layout);

    let layout = PixelLayout::new(2, 2, 1, PixelFormat::R8G8B8).unwrap();
    let mut into = PixelData::new(layout);
    convert(&from.as_ref(), &mut into.as_mut())?;

    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let color = into.as_ref().color_at(x, y, 0)?;
        assert_eq!(color, from.as_ref().color_at(x, y, 0)?);
        assert_eq!(color.a, 1.0);
    }

    Ok(())
}

#[test]
fn pixelwise_conversion_of_padded_volumes() -> Result<(), PixelError> {
    let volume = PixelVolume {
        left: 1,
        top: 1,
        front: 1,
        right: 4,
        bottom: 3,
        back: 3,
    };
    let layout = PixelLayout::with_pitches(volume, 6, 24, PixelFormat::R8G8B8).unwrap();
    let from = filled(layout);

    let volume = PixelVolume {
        left: 2,
        top: 0,
        front: 1,
        right: 5,
        bottom: 2,
        back: 3,
    };
    let layout = PixelLayout::with_pitches(volume, 7, 21, PixelFormat::B8G8R8A8).unwrap();
    let mut into = PixelData::with_bytes(layout, vec![0xee; layout.byte_len()])?;

    convert(&from.as_ref(), &mut into.as_mut())?;

    for z in 0..2 {
        for y in 0..2 {
            for x in 0..3 {
                let color = into.as_ref().color_at(x, y, z)?;
                assert_eq!(color, from.as_ref().color_at(x, y, z)?, "({x}, {y}, {z})");
                assert_eq!(color.a, 1.0);
            }
        }
    }

    assert_padding(&into, 0xee);
    Ok(())
}

#[test]
fn compressed_copy() -> Result<(), PixelError> {
    let layout = PixelLayout::new(8, 8, 1, PixelFormat::Dxt1).unwrap();
    let from = filled(layout);
    let mut into = PixelData::new(layout);

    convert(&from.as_ref(), &mut into.as_mut())?;
    assert_eq!(into.as_bytes().len(), 32);
    assert_eq!(from.as_bytes(), into.as_bytes());

    let layout = PixelLayout::new(8, 8, 1, PixelFormat::Dxt3).unwrap();
    let mut other = PixelData::new(layout);
    let err = convert(&from.as_ref(), &mut other.as_mut()).unwrap_err();
    assert!(matches!(err, PixelError::NotImplemented { format: "PF_DXT1", .. }));

    let layout = PixelLayout::new(8, 8, 1, PixelFormat::R8G8B8A8).unwrap();
    let rgba = PixelData::new(layout);
    let err = convert(&rgba.as_ref(), &mut other.as_mut()).unwrap_err();
    assert!(matches!(err, PixelError::NotImplemented { format: "PF_DXT3", .. }));
    assert!(other.as_bytes().iter().all(|&b| b == 0));

    Ok(())
}

#[test]
fn nearest_identity() -> Result<(), PixelError> {
    for format in PixelFormat::ALL {
        if !format.is_accessible() {
            continue;
        }

        let layout = PixelLayout::new(5, 3, 2, format).unwrap();
        let from = filled(layout);
        let mut into = PixelData::new(layout);

        scale(&from.as_ref(), &mut into.as_mut(), Filter::Nearest)?;
        assert_eq!(from.as_bytes(), into.as_bytes(), "{format}");
    }

    Ok(())
}

#[test]
fn bilinear_bytes_identity() -> Result<(), PixelError> {
    for format in [
        PixelFormat::R8G8,
        PixelFormat::B8G8R8,
        PixelFormat::R8G8B8A8,
        PixelFormat::X8R8G8B8,
    ] {
        let layout = PixelLayout::new(7, 5, 1, format).unwrap();
        let from = filled(layout);
        let mut into = PixelData::new(layout);

        scale(&from.as_ref(), &mut into.as_mut(), Filter::Bilinear)?;
        assert_eq!(from.as_bytes(), into.as_bytes(), "{format}");
    }

    Ok(())
}

#[test]
fn bilinear_float_identity() -> Result<(), PixelError> {
    let layout = PixelLayout::new(4, 4, 1, PixelFormat::Float32Rgba).unwrap();
    let mut from = PixelData::new(layout);
    for (i, (x, y)) in (0..4).flat_map(|y| (0..4).map(move |x| (x, y))).enumerate() {
        let v = i as f32 / 16.0;
        from.as_mut().set_color_at(Color::new(v, 1.0 - v, 0.5, v), x, y, 0)?;
    }

    let mut into = PixelData::new(layout);
    scale(&from.as_ref(), &mut into.as_mut(), Filter::Bilinear)?;

    for y in 0..4 {
        for x in 0..4 {
            let a = from.as_ref().color_at(x, y, 0)?.to_array();
            let b = into.as_ref().color_at(x, y, 0)?.to_array();
            for (a, b) in a.into_iter().zip(b) {
                assert!((a - b).abs() < 1e-3, "{a} {b} at {x},{y}");
            }
        }
    }

    Ok(())
}

#[test]
fn single_pixel_source() -> Result<(), PixelError> {
    let pixel = [0x12, 0x34, 0x56, 0x78];
    let layout = PixelLayout::new(1, 1, 1, PixelFormat::R8G8B8A8).unwrap();
    let from = PixelData::with_bytes(layout, pixel.to_vec())?;

    for filter in [Filter::Nearest, Filter::Bilinear] {
        let layout = PixelLayout::new(5, 3, 1, PixelFormat::R8G8B8A8).unwrap();
        let mut into = PixelData::new(layout);
        scale(&from.as_ref(), &mut into.as_mut(), filter)?;

        for texel in into.as_bytes().chunks_exact(4) {
            assert_eq!(texel, pixel, "{filter:?}");
        }
    }

    Ok(())
}

#[test]
fn nearest_converts_afterwards() -> Result<(), PixelError> {
    let layout = PixelLayout::new(4, 4, 1, PixelFormat::R8G8B8).unwrap();
    let from = filled(layout);

    let layout = PixelLayout::new(2, 2, 1, PixelFormat::Float32Rgba).unwrap();
    let mut into = PixelData::new(layout);
    scale(&from.as_ref(), &mut into.as_mut(), Filter::Nearest)?;

    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(
            into.as_ref().color_at(x, y, 0)?,
            from.as_ref().color_at(2 * x, 2 * y, 0)?
        );
    }

    Ok(())
}

#[test]
fn bilinear_bytes_convert_afterwards() -> Result<(), PixelError> {
    let layout = PixelLayout::new(3, 3, 1, PixelFormat::B8G8R8A8).unwrap();
    let from = filled(layout);

    let layout = PixelLayout::new(3, 3, 1, PixelFormat::R8G8B8A8).unwrap();
    let mut into = PixelData::new(layout);
    scale(&from.as_ref(), &mut into.as_mut(), Filter::Bilinear)?;

    for (x, y) in [(0, 0), (2, 0), (1, 2)] {
        assert_eq!(
            into.as_ref().color_at(x, y, 0)?,
            from.as_ref().color_at(x, y, 0)?
        );
    }

    Ok(())
}

#[test]
fn scales_into_region_of_destination() -> Result<(), PixelError> {
    let volume = PixelVolume {
        left: 1,
        top: 2,
        front: 0,
        right: 6,
        bottom: 6,
        back: 1,
    };

    for source in [
        PixelFormat::R8G8B8A8,
        PixelFormat::B8G8R8A8,
        PixelFormat::Float32Rgba,
    ] {
        let rgba = filled(PixelLayout::new(3, 3, 1, PixelFormat::R8G8B8A8).unwrap());
        let layout = PixelLayout::new(3, 3, 1, source).unwrap();
        let mut from = PixelData::new(layout);
        convert(&rgba.as_ref(), &mut from.as_mut())?;

        for filter in [Filter::Nearest, Filter::Bilinear] {
            let layout = PixelLayout::new(5, 4, 1, PixelFormat::R8G8B8A8).unwrap();
            let mut whole = PixelData::new(layout);
            scale(&from.as_ref(), &mut whole.as_mut(), filter)?;

            let layout =
                PixelLayout::with_pitches(volume, 8, 48, PixelFormat::R8G8B8A8).unwrap();
            let mut into = PixelData::with_bytes(layout, vec![0xee; layout.byte_len()])?;
            scale(&from.as_ref(), &mut into.as_mut(), filter)?;

            let rows = into.layout().rows().zip(whole.layout().rows());
            for (y, (row, expected)) in rows.enumerate() {
                assert_eq!(
                    into.as_bytes()[row],
                    whole.as_bytes()[expected],
                    "{source} {filter:?} row {y}"
                );
            }

            assert_padding(&into, 0xee);
        }
    }

    Ok(())
}

#[test]
fn float_kernel_opaque_alpha() -> Result<(), PixelError> {
    let layout = PixelLayout::new(2, 2, 1, PixelFormat::Float32Rgb).unwrap();
    let mut from = PixelData::new(layout);
    let gray = Color::new(0.25, 0.5, 0.75, 1.0);
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        from.as_mut().set_color_at(gray, x, y, 0)?;
    }

    let layout = PixelLayout::new(3, 3, 1, PixelFormat::Float32Rgba).unwrap();
    let mut into = PixelData::new(layout);
    scale(&from.as_ref(), &mut into.as_mut(), Filter::Bilinear)?;

    for y in 0..3 {
        for x in 0..3 {
            let color = into.as_ref().color_at(x, y, 0)?;
            assert_eq!(color.a, 1.0);
            assert!((color.g - 0.5).abs() < 1e-4, "{color:?}");
        }
    }

    Ok(())
}

#[test]
fn volumetric_blend() -> Result<(), PixelError> {
    // Bilinear on a byte format with depth falls back to the generic blend.
    let layout = PixelLayout::new(2, 2, 2, PixelFormat::R8G8B8A8).unwrap();
    let mut from = PixelData::new(layout);
    for z in 0..2 {
        let v = z as f32;
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            from.as_mut()
                .set_color_at(Color::new(v, v, v, 1.0), x, y, z)?;
        }
    }

    let layout = PixelLayout::new(1, 1, 1, PixelFormat::Float16Rgba).unwrap();
    let mut into = PixelData::new(layout);
    scale(&from.as_ref(), &mut into.as_mut(), Filter::Bilinear)?;

    let color = into.as_ref().color_at(0, 0, 0)?;
    assert!((color.r - 0.5).abs() < 1e-2, "{color:?}");
    assert!((color.a - 1.0).abs() < 1e-3, "{color:?}");

    Ok(())
}

#[test]
fn samples_from_region_origin() -> Result<(), PixelError> {
    let layout = PixelLayout::new(6, 6, 1, PixelFormat::R8).unwrap();
    let from = filled(layout);
    let part = PixelVolume {
        left: 2,
        top: 3,
        front: 0,
        right: 5,
        bottom: 5,
        back: 1,
    };
    let from: PixelRef = from.as_ref().sub_view(part).unwrap();

    let layout = PixelLayout::new(3, 2, 1, PixelFormat::R8).unwrap();
    let mut into = PixelData::new(layout);
    scale(&from, &mut into.as_mut(), Filter::Nearest)?;

    let bytes = from.as_bytes();
    assert_eq!(into.as_bytes()[..3], bytes[3 * 6 + 2..3 * 6 + 5]);
    assert_eq!(into.as_bytes()[3..], bytes[4 * 6 + 2..4 * 6 + 5]);

    Ok(())
}

#[test]
fn empty_boxes() {
    let empty = PixelLayout::new(0, 4, 1, PixelFormat::R8).unwrap();
    let some = PixelLayout::new(2, 2, 1, PixelFormat::R8).unwrap();

    let mut into = PixelData::new(empty);
    let from = PixelData::new(some);
    assert_eq!(
        scale(&from.as_ref(), &mut into.as_mut(), Filter::Bilinear),
        Ok(())
    );

    let from = PixelData::new(empty);
    let mut into = PixelData::new(some);
    assert!(scale(&from.as_ref(), &mut into.as_mut(), Filter::Nearest).is_err());
}
