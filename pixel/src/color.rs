//! The canonical color representation all formats are unpacked into.
use core::ops::{Add, AddAssign, Mul};

/// A color with four floating point channels.
///
/// Channels are nominally in `[0, 1]` but are not clamped, out-of-range values are carried along
/// until they are packed into a format.
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    /// All channels zero, including alpha.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    /// Construct from the four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Construct from 8-bit channels, interpreted as fractions of 255.
    pub fn from_rgba_u8([r, g, b, a]: [u8; 4]) -> Self {
        Color::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// The channels in `[r, g, b, a]` order.
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Color { r, g, b, a }
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
            a: self.a + rhs.a,
        }
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, weight: f32) -> Color {
        Color {
            r: self.r * weight,
            g: self.g * weight,
            b: self.b * weight,
            a: self.a * weight,
        }
    }
}

/// Scale the color channels of 8-bit pixels by a constant factor.
///
/// `buffer` holds consecutive pixels of `bits_per_pixel` bits each, with red, green and blue in
/// the first three bytes. If scaling would push any of these beyond 255 the whole pixel is
/// scaled down by a shared factor instead of clipping each channel, which keeps the hue. Any
/// further bytes, like alpha, are left as they are.
///
/// # Panics
///
/// If a pixel is smaller than three bytes.
pub fn apply_gamma(buffer: &mut [u8], gamma: f32, bits_per_pixel: u8) {
    if gamma == 1.0 {
        return;
    }

    let stride = usize::from(bits_per_pixel >> 3);
    assert!(stride >= 3, "pixels need at least three 8-bit channels");

    for pixel in buffer.chunks_exact_mut(stride) {
        let rgb = [pixel[0], pixel[1], pixel[2]].map(|ch| f32::from(ch) * gamma);

        let scale = rgb
            .iter()
            .filter(|&&ch| ch > 255.0)
            .fold(1.0f32, |scale, &ch| scale.min(255.0 / ch));

        for (byte, ch) in pixel.iter_mut().zip(rgb) {
            *byte = (ch * scale) as u8;
        }
    }
}
