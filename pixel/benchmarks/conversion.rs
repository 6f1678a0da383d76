//! Benchmarks bulk conversion between formats.
use brunch::Bench;

use image_pixel::{convert, PixelData, PixelError, PixelFormat, PixelLayout};

#[derive(Debug)]
struct Convert {
    format_in: PixelFormat,
    format_out: PixelFormat,
    sz: u32,
}

impl Convert {
    fn name(&self) -> String {
        format!(
            "convert({}, {}, {})",
            self.format_in, self.format_out, self.sz
        )
    }

    fn prepare(&self) -> Result<impl FnMut(), PixelError> {
        let layout = PixelLayout::new(self.sz, self.sz, 1, self.format_in)
            .map_err(|_| PixelError::InvalidParameters("benchmark layout"))?;
        let from = PixelData::new(layout);

        let layout = PixelLayout::new(self.sz, self.sz, 1, self.format_out)
            .map_err(|_| PixelError::InvalidParameters("benchmark layout"))?;
        let mut into = PixelData::new(layout);

        // Fail early, not within the measurement.
        convert(&from.as_ref(), &mut into.as_mut())?;

        Ok(move || convert(&from.as_ref(), &mut into.as_mut()).unwrap())
    }
}

fn main() {
    let tests = [
        /* plain copies */
        Convert {
            format_in: PixelFormat::R8G8B8A8,
            format_out: PixelFormat::R8G8B8A8,
            sz: 128,
        },
        Convert {
            format_in: PixelFormat::A8R8G8B8,
            format_out: PixelFormat::X8R8G8B8,
            sz: 128,
        },
        /* channel reordering through the codec */
        Convert {
            format_in: PixelFormat::R8G8B8,
            format_out: PixelFormat::B8G8R8,
            sz: 128,
        },
        Convert {
            format_in: PixelFormat::B8G8R8A8,
            format_out: PixelFormat::R8G8B8A8,
            sz: 128,
        },
        /* to and from floats */
        Convert {
            format_in: PixelFormat::R8G8B8A8,
            format_out: PixelFormat::Float32Rgba,
            sz: 128,
        },
        Convert {
            format_in: PixelFormat::Float32Rgba,
            format_out: PixelFormat::Float16Rgba,
            sz: 128,
        },
        Convert {
            format_in: PixelFormat::Float16Rgb,
            format_out: PixelFormat::R8G8B8,
            sz: 128,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|convert| {
        let bench = match convert.prepare() {
            Ok(bench) => bench,
            Err(err) => panic!("Failed to setup benchmark {:?}: {:?}", convert, err),
        };

        Bench::new(format!("pixel::conversion::main::{}", convert.name())).run(bench)
    }));
    benches.finish();
}
