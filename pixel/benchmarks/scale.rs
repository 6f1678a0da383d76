//! Benchmarks resampling kernels.
use brunch::Bench;

use image_pixel::{scale, Filter, PixelData, PixelError, PixelFormat, PixelLayout};

#[derive(Debug)]
struct Scale {
    format_in: PixelFormat,
    format_out: PixelFormat,
    filter: Filter,
    sz_in: u32,
    sz_out: u32,
}

impl Scale {
    fn name(&self) -> String {
        format!(
            "scale({}, {}, {:?}, {}->{})",
            self.format_in, self.format_out, self.filter, self.sz_in, self.sz_out
        )
    }

    fn prepare(&self) -> Result<impl FnMut(), PixelError> {
        let layout = PixelLayout::new(self.sz_in, self.sz_in, 1, self.format_in)
            .map_err(|_| PixelError::InvalidParameters("benchmark layout"))?;
        let from = PixelData::new(layout);

        let layout = PixelLayout::new(self.sz_out, self.sz_out, 1, self.format_out)
            .map_err(|_| PixelError::InvalidParameters("benchmark layout"))?;
        let mut into = PixelData::new(layout);
        let filter = self.filter;

        scale(&from.as_ref(), &mut into.as_mut(), filter)?;

        Ok(move || scale(&from.as_ref(), &mut into.as_mut(), filter).unwrap())
    }
}

fn main() {
    let tests = [
        Scale {
            format_in: PixelFormat::R8G8B8A8,
            format_out: PixelFormat::R8G8B8A8,
            filter: Filter::Nearest,
            sz_in: 256,
            sz_out: 128,
        },
        Scale {
            format_in: PixelFormat::R8G8B8A8,
            format_out: PixelFormat::R8G8B8A8,
            filter: Filter::Bilinear,
            sz_in: 128,
            sz_out: 256,
        },
        // With a temporary buffer and a conversion afterwards.
        Scale {
            format_in: PixelFormat::B8G8R8,
            format_out: PixelFormat::R8G8B8A8,
            filter: Filter::Bilinear,
            sz_in: 128,
            sz_out: 256,
        },
        Scale {
            format_in: PixelFormat::Float32Rgba,
            format_out: PixelFormat::Float32Rgb,
            filter: Filter::Bilinear,
            sz_in: 128,
            sz_out: 256,
        },
        // The generic path through the color codec.
        Scale {
            format_in: PixelFormat::Float16Rgba,
            format_out: PixelFormat::R8G8B8A8,
            filter: Filter::Bilinear,
            sz_in: 128,
            sz_out: 256,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|scale| {
        let bench = match scale.prepare() {
            Ok(bench) => bench,
            Err(err) => panic!("Failed to setup benchmark {:?}: {:?}", scale, err),
        };

        Bench::new(format!("pixel::scale::main::{}", scale.name())).run(bench)
    }));
    benches.finish();
}
