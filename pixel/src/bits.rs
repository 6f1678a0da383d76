//! Fixed-point and bit-field primitives.
//!
//! A fixed-point value with `n` bits represents the fraction `value / (2^n - 1)`, so that the
//! largest value of any width maps to `1.0` and widening keeps the full dynamic range.
use half::f16;

/// Specifies which bits of a native endian integer a channel occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChannelBits {
    pub(crate) mask: u32,
    pub(crate) shift: u8,
    pub(crate) len: u8,
}

impl ChannelBits {
    pub(crate) const fn new(len: u8, mask: u32, shift: u8) -> Self {
        ChannelBits { mask, shift, len }
    }

    /// Grab the channel from a packed value, as a value of `len` bits in the lowest bits.
    #[inline]
    pub(crate) fn extract(self, value: u32) -> u32 {
        (value & self.mask) >> self.shift
    }

    /// Place `len` low bits of a value into the channel position.
    ///
    /// Bits that fall outside of the mask are discarded, a channel without mask contributes
    /// nothing.
    #[inline]
    pub(crate) fn insert(self, bits: u32) -> u32 {
        bits.wrapping_shl(u32::from(self.shift)) & self.mask
    }
}

/// Convert a fixed-point value of `n` bits to one of `p` bits.
///
/// Narrowing truncates the low bits. Widening scales such that zero and the maximum value are
/// preserved exactly, i.e. a 1-bit `1` becomes an 8-bit `255`.
#[inline]
pub fn fixed_to_fixed(value: u32, n: u32, p: u32) -> u32 {
    use core::cmp::Ordering;

    match n.cmp(&p) {
        Ordering::Greater => value.checked_shr(n - p).unwrap_or(0),
        Ordering::Equal => value,
        Ordering::Less if n == 0 || value == 0 => 0,
        Ordering::Less => {
            let max_n = low_mask(n);
            if value >= max_n {
                low_mask(p)
            } else {
                // A 64-bit intermediate, as `p` can be as large as 32.
                ((u64::from(value) << p) / u64::from(max_n)) as u32
            }
        }
    }
}

/// Convert a float in `[0, 1]` to a fixed-point value with `bits` bits.
///
/// Values outside the range are clamped. Inside the range the product with `2^bits` is
/// truncated, the upper bound maps onto the largest representable value.
#[inline]
pub fn float_to_fixed(value: f32, bits: u32) -> u32 {
    if !(value > 0.0) {
        0
    } else if value >= 1.0 {
        low_mask(bits)
    } else {
        (value * (1u64 << bits) as f32) as u32
    }
}

/// Convert a fixed-point value with `bits` bits to a float in `[0, 1]`.
#[inline]
pub fn fixed_to_float(value: u32, bits: u32) -> f32 {
    if bits == 0 {
        return 0.0;
    }

    value as f32 / low_mask(bits) as f32
}

/// Convert a float to the bits of an IEEE 754 half-float.
#[inline]
pub fn float_to_half(value: f32) -> u16 {
    f16::from_f32(value).to_bits()
}

/// Convert the bits of an IEEE 754 half-float to a float.
#[inline]
pub fn half_to_float(bits: u16) -> f32 {
    f16::from_bits(bits).to_f32()
}

/// Read an unsigned integer of `bytes` bytes, 1 to 4, in native byte order.
///
/// Three byte integers are read as the low three bytes of a `u32`, in memory order of the
/// platform's endianness.
#[inline]
pub fn int_read(src: &[u8], bytes: usize) -> u32 {
    match bytes {
        1 => u32::from(src[0]),
        2 => u32::from(u16::from_ne_bytes([src[0], src[1]])),
        3 if cfg!(target_endian = "big") => u32::from_be_bytes([0, src[0], src[1], src[2]]),
        3 => u32::from_le_bytes([src[0], src[1], src[2], 0]),
        4 => u32::from_ne_bytes([src[0], src[1], src[2], src[3]]),
        _ => 0,
    }
}

/// Write the low `bytes` bytes, 1 to 4, of an integer in native byte order.
#[inline]
pub fn int_write(dest: &mut [u8], bytes: usize, value: u32) {
    match bytes {
        1 => dest[0] = value as u8,
        2 => dest[..2].copy_from_slice(&(value as u16).to_ne_bytes()),
        3 if cfg!(target_endian = "big") => dest[..3].copy_from_slice(&value.to_be_bytes()[1..]),
        3 => dest[..3].copy_from_slice(&value.to_le_bytes()[..3]),
        4 => dest[..4].copy_from_slice(&value.to_ne_bytes()),
        _ => {}
    }
}

/// Read the `idx`-th float of a byte slice, without alignment requirements.
#[inline]
pub(crate) fn read_f32(src: &[u8], idx: usize) -> f32 {
    bytemuck::pod_read_unaligned(&src[4 * idx..4 * idx + 4])
}

#[inline]
pub(crate) fn write_f32(dest: &mut [u8], idx: usize, value: f32) {
    dest[4 * idx..4 * idx + 4].copy_from_slice(bytemuck::bytes_of(&value));
}

#[inline]
pub(crate) fn read_u16(src: &[u8], idx: usize) -> u16 {
    bytemuck::pod_read_unaligned(&src[2 * idx..2 * idx + 2])
}

#[inline]
pub(crate) fn write_u16(dest: &mut [u8], idx: usize, value: u16) {
    dest[2 * idx..2 * idx + 2].copy_from_slice(bytemuck::bytes_of(&value));
}

/// A value with the `bits` low bits set.
const fn low_mask(bits: u32) -> u32 {
    ((-1i64 as u64) ^ u32::MAX as u64).rotate_left(if bits < 32 { bits } else { 32 }) as u32
}
