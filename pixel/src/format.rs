//! The catalog of supported pixel formats.
//!
//! Each format is described by one static [`FormatDescriptor`]. The table is part of the binary,
//! indexed by the ordinal of [`PixelFormat`], and never changes at runtime. Its contents are
//! relied upon by serialized texture data and by the mapping to graphics API formats so the flag
//! bits, channel widths, masks and shifts must stay exactly as they are.
use crate::error::PixelError;

/// Identifies a pixel format.
///
/// The discriminant is the stable ordinal of the format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PixelFormat {
    /// No format, all properties are zero.
    Unknown = 0,
    /// 8-bit red only.
    R8,
    /// 8-bit red and green.
    R8G8,
    /// 24-bit, 8 bits for red, green and blue; red in the lowest byte.
    R8G8B8,
    /// 24-bit, 8 bits for blue, green and red; blue in the lowest byte.
    B8G8R8,
    A8R8G8B8,
    A8B8G8R8,
    B8G8R8A8,
    R8G8B8A8,
    /// Like `A8R8G8B8` where the alpha byte is padding.
    X8R8G8B8,
    /// Like `A8B8G8R8` where the alpha byte is padding.
    X8B8G8R8,
    R8G8B8X8,
    B8G8R8X8,
    /// Block compressed, 8 bytes per 4×4 block.
    Dxt1,
    /// Block compressed, 16 bytes per 4×4 block.
    Dxt2,
    Dxt3,
    Dxt4,
    Dxt5,
    /// A single half-float channel.
    Float16R,
    Float16Rg,
    Float16Rgb,
    Float16Rgba,
    /// A single float channel.
    Float32R,
    Float32Rg,
    Float32Rgb,
    Float32Rgba,
    /// Depth, with stencil.
    D32S8X24,
    /// Depth, with stencil.
    D24S8,
    /// Depth only.
    D32,
    /// Depth only.
    D16,
}

/// Capability bits of a format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FormatFlags(u32);

/// Data type of a single component of a format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComponentType {
    /// Byte sized components.
    Byte = 0,
    /// Short sized components.
    Short = 1,
    /// 16-bit floating point.
    Float16 = 2,
    /// 32-bit floating point.
    Float32 = 3,
}

/// The static description of one pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Human readable name.
    pub name: &'static str,
    /// Number of bytes one element (pixel) occupies. Zero for block compressed formats.
    pub element_bytes: u8,
    /// Capabilities of the format.
    pub flags: FormatFlags,
    /// Data type of a component.
    pub component_type: ComponentType,
    /// Number of components.
    pub component_count: u8,
    /// Bits of the red, green, blue and alpha channel.
    pub bits: [u8; 4],
    /// Masks of each channel within the native endian integer.
    pub masks: [u32; 4],
    /// Shifts of each channel within the native endian integer.
    pub shifts: [u8; 4],
}

impl FormatFlags {
    /// The format has an alpha channel.
    pub const HAS_ALPHA: Self = FormatFlags(0x01);
    /// The format is block compressed.
    pub const COMPRESSED: Self = FormatFlags(0x02);
    /// Components are floating point.
    pub const FLOAT: Self = FormatFlags(0x04);
    /// The format holds depth (and stencil) values.
    pub const DEPTH: Self = FormatFlags(0x08);
    /// Channels are packed into one native endian integer, described by masks and shifts.
    pub const NATIVE_ENDIAN: Self = FormatFlags(0x10);

    /// No flags set.
    pub const fn empty() -> Self {
        FormatFlags(0)
    }

    /// The raw flag bits, as stored in the catalog.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Flags set in either operand.
    pub const fn union(self, other: Self) -> Self {
        FormatFlags(self.0 | other.0)
    }

    /// Whether all flags of `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for FormatFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

const NONE: FormatFlags = FormatFlags::empty();
const ALPHA: FormatFlags = FormatFlags::HAS_ALPHA;
const NATIVE: FormatFlags = FormatFlags::NATIVE_ENDIAN;
const FLOAT: FormatFlags = FormatFlags::FLOAT;
const BLOCKS: FormatFlags = FormatFlags::COMPRESSED.union(FormatFlags::HAS_ALPHA);
const DEPTH: FormatFlags = FormatFlags::DEPTH.union(FormatFlags::FLOAT);

macro_rules! formats {
    ($(
        $name:literal: $bytes:literal, $flags:expr, $ty:ident * $count:literal,
            bits $bits:expr, masks $masks:expr, shifts $shifts:expr;
    )*) => {
        [$(FormatDescriptor {
            name: $name,
            element_bytes: $bytes,
            flags: $flags,
            component_type: ComponentType::$ty,
            component_count: $count,
            bits: $bits,
            masks: $masks,
            shifts: $shifts,
        }),*]
    };
}

const Z4: [u8; 4] = [0; 4];
const ZM: [u32; 4] = [0; 4];

static FORMATS: [FormatDescriptor; PixelFormat::COUNT] = formats! {
    "PF_UNKNOWN": 0, NONE, Byte * 0, bits Z4, masks ZM, shifts Z4;
    "PF_R8": 1, NONE, Byte * 1,
        bits [8, 0, 0, 0], masks [0x0000_00FF, 0, 0, 0], shifts Z4;
    "PF_R8G8": 2, NONE, Byte * 2,
        bits [8, 8, 0, 0], masks [0x0000_00FF, 0x0000_FF00, 0, 0], shifts [0, 8, 0, 0];
    "PF_R8G8B8": 3, NATIVE, Byte * 3,
        bits [8, 8, 8, 0],
        masks [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0],
        shifts [0, 8, 16, 0];
    "PF_B8G8R8": 3, NATIVE, Byte * 3,
        bits [8, 8, 8, 0],
        masks [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0],
        shifts [16, 8, 0, 0];
    "PF_A8R8G8B8": 4, ALPHA.union(NATIVE), Byte * 4,
        bits [8, 8, 8, 8],
        masks [0x0000_FF00, 0x00FF_0000, 0xFF00_0000, 0x0000_00FF],
        shifts [8, 16, 24, 0];
    "PF_A8B8G8R8": 4, ALPHA.union(NATIVE), Byte * 4,
        bits [8, 8, 8, 8],
        masks [0xFF00_0000, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF],
        shifts [24, 16, 8, 0];
    "PF_B8G8R8A8": 4, ALPHA.union(NATIVE), Byte * 4,
        bits [8, 8, 8, 8],
        masks [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
        shifts [16, 8, 0, 24];
    "PF_R8G8B8A8": 4, ALPHA.union(NATIVE), Byte * 4,
        bits [8, 8, 8, 8],
        masks [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000],
        shifts [0, 8, 16, 24];
    "PF_X8R8G8B8": 4, NATIVE, Byte * 3,
        bits [8, 8, 8, 0],
        masks [0x0000_FF00, 0x00FF_0000, 0xFF00_0000, 0x0000_00FF],
        shifts [8, 16, 24, 0];
    "PF_X8B8G8R8": 4, NATIVE, Byte * 3,
        bits [8, 8, 8, 0],
        masks [0xFF00_0000, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF],
        shifts [24, 16, 8, 0];
    "PF_R8G8B8X8": 4, ALPHA.union(NATIVE), Byte * 3,
        bits [8, 8, 8, 0],
        masks [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000],
        shifts [0, 8, 16, 0];
    "PF_B8G8R8X8": 4, ALPHA.union(NATIVE), Byte * 3,
        bits [8, 8, 8, 0],
        masks [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
        shifts [16, 8, 0, 0];
    // Block compressed formats have no per-element description.
    "PF_DXT1": 0, BLOCKS, Byte * 3, bits Z4, masks ZM, shifts Z4;
    "PF_DXT2": 0, BLOCKS, Byte * 4, bits Z4, masks ZM, shifts Z4;
    "PF_DXT3": 0, BLOCKS, Byte * 4, bits Z4, masks ZM, shifts Z4;
    "PF_DXT4": 0, BLOCKS, Byte * 4, bits Z4, masks ZM, shifts Z4;
    "PF_DXT5": 0, BLOCKS, Byte * 4, bits Z4, masks ZM, shifts Z4;
    "PF_FLOAT16_R": 2, FLOAT, Float16 * 1, bits [16, 0, 0, 0], masks ZM, shifts Z4;
    "PF_FLOAT16_RG": 4, FLOAT, Float16 * 2, bits [16, 16, 0, 0], masks ZM, shifts Z4;
    "PF_FLOAT16_RGB": 6, FLOAT, Float16 * 3, bits [16, 16, 16, 0], masks ZM, shifts Z4;
    "PF_FLOAT16_RGBA": 8, FLOAT.union(ALPHA), Float16 * 4,
        bits [16, 16, 16, 16], masks ZM, shifts Z4;
    "PF_FLOAT32_R": 4, FLOAT, Float32 * 1, bits [32, 0, 0, 0], masks ZM, shifts Z4;
    "PF_FLOAT32_RG": 8, FLOAT, Float32 * 2, bits [32, 32, 0, 0], masks ZM, shifts Z4;
    "PF_FLOAT32_RGB": 12, FLOAT, Float32 * 3, bits [32, 32, 32, 0], masks ZM, shifts Z4;
    "PF_FLOAT32_RGBA": 16, FLOAT.union(ALPHA), Float32 * 4,
        bits [32, 32, 32, 32], masks ZM, shifts Z4;
    "PF_D32_S8X24": 4, DEPTH, Float32 * 1, bits Z4, masks ZM, shifts Z4;
    "PF_D24_S8": 8, DEPTH, Float32 * 2, bits Z4, masks ZM, shifts Z4;
    "PF_D32": 4, DEPTH, Float32 * 1, bits Z4, masks ZM, shifts Z4;
    "PF_D16": 2, DEPTH, Float16 * 1, bits Z4, masks ZM, shifts Z4;
};

/// Look up the static description of a format.
pub fn describe(format: PixelFormat) -> &'static FormatDescriptor {
    &FORMATS[format as usize]
}

impl PixelFormat {
    /// The number of formats in the catalog.
    pub const COUNT: usize = 30;

    /// All formats, ordered by their ordinal.
    pub const ALL: [PixelFormat; PixelFormat::COUNT] = {
        use PixelFormat::*;
        [
            Unknown, R8, R8G8, R8G8B8, B8G8R8, A8R8G8B8, A8B8G8R8, B8G8R8A8, R8G8B8A8, X8R8G8B8,
            X8B8G8R8, R8G8B8X8, B8G8R8X8, Dxt1, Dxt2, Dxt3, Dxt4, Dxt5, Float16R, Float16Rg,
            Float16Rgb, Float16Rgba, Float32R, Float32Rg, Float32Rgb, Float32Rgba, D32S8X24,
            D24S8, D32, D16,
        ]
    };

    /// The catalog entry of this format, see [`describe`].
    pub fn descriptor(self) -> &'static FormatDescriptor {
        describe(self)
    }

    /// Number of bytes of one element, zero for block compressed formats.
    pub fn element_bytes(self) -> usize {
        self.descriptor().element_bytes.into()
    }

    /// Number of bits of one element.
    pub fn element_bits(self) -> usize {
        self.element_bytes() * 8
    }

    /// The capability flags of the catalog entry.
    pub fn flags(self) -> FormatFlags {
        self.descriptor().flags
    }

    /// Whether the format is flagged as carrying alpha.
    ///
    /// Note that `R8G8B8X8` and `B8G8R8X8` carry the flag but have no alpha bits.
    pub fn has_alpha(self) -> bool {
        self.flags().contains(FormatFlags::HAS_ALPHA)
    }

    /// Whether components are half or single precision floats.
    pub fn is_floating_point(self) -> bool {
        self.flags().contains(FormatFlags::FLOAT)
    }

    /// Whether the format stores 4×4 blocks instead of single elements.
    pub fn is_compressed(self) -> bool {
        self.flags().contains(FormatFlags::COMPRESSED)
    }

    /// Whether the format holds depth values.
    pub fn is_depth(self) -> bool {
        self.flags().contains(FormatFlags::DEPTH)
    }

    /// Whether channels are found through the masks and shifts of one native endian integer.
    pub fn is_native_endian(self) -> bool {
        self.flags().contains(FormatFlags::NATIVE_ENDIAN)
    }

    /// Whether the generic pack and unpack operations are available for this format.
    ///
    /// This is the case for all known formats that are neither compressed nor depth formats.
    pub fn is_accessible(self) -> bool {
        self != PixelFormat::Unknown && !self.is_compressed() && !self.is_depth()
    }

    /// Bits of the red, green, blue and alpha channel.
    pub fn bit_depths(self) -> [u8; 4] {
        self.descriptor().bits
    }

    /// Masks of the red, green, blue and alpha channel within a native endian element.
    pub fn bit_masks(self) -> [u32; 4] {
        self.descriptor().masks
    }

    /// Shift of each channel's mask, in the same order as [`Self::bit_masks`].
    pub fn bit_shifts(self) -> [u8; 4] {
        self.descriptor().shifts
    }

    /// The storage type of a single component.
    pub fn component_type(self) -> ComponentType {
        self.descriptor().component_type
    }

    /// Number of stored components, padding bytes excluded.
    pub fn component_count(self) -> usize {
        self.descriptor().component_count.into()
    }

    /// The display name, such as `PF_R8G8B8A8`.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = PixelError;

    fn try_from(ordinal: u32) -> Result<Self, PixelError> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| PixelFormat::ALL.get(idx).copied())
            .ok_or(PixelError::InvalidFormat(ordinal))
    }
}

impl From<PixelFormat> for u32 {
    fn from(format: PixelFormat) -> u32 {
        format as u32
    }
}

impl core::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The number of bytes required to hold an image of the given extent.
///
/// Block compressed formats are sized in whole 4×4 blocks, partial blocks at the border are
/// rounded up.
pub fn memory_size(
    width: u32,
    height: u32,
    depth: u32,
    format: PixelFormat,
) -> Result<usize, PixelError> {
    let (width, height, depth) = (width as usize, height as usize, depth as usize);

    if format.is_compressed() {
        let block_bytes = match format {
            PixelFormat::Dxt1 => 8,
            PixelFormat::Dxt2 | PixelFormat::Dxt3 | PixelFormat::Dxt4 | PixelFormat::Dxt5 => 16,
            _ => return Err(PixelError::InvalidParameters("invalid compressed pixel format")),
        };

        Ok(width.div_ceil(4) * height.div_ceil(4) * block_bytes * depth)
    } else {
        Ok(width * height * depth * format.element_bytes())
    }
}

/// Check if the extent is representable in the format.
///
/// Block compressed formats need whole blocks and can not be volumetric.
pub fn is_valid_extent(width: u32, height: u32, depth: u32, format: PixelFormat) -> bool {
    match format {
        PixelFormat::Dxt1
        | PixelFormat::Dxt2
        | PixelFormat::Dxt3
        | PixelFormat::Dxt4
        | PixelFormat::Dxt5 => width % 4 == 0 && height % 4 == 0 && depth == 1,
        _ => true,
    }
}

/// The number of mip levels below the full image, halving each dimension until all reach one.
pub fn max_mipmaps(mut width: u32, mut height: u32, mut depth: u32, _: PixelFormat) -> u32 {
    if width == 0 || height == 0 || depth == 0 {
        return 0;
    }

    let mut count = 0;
    loop {
        width = (width / 2).max(1);
        height = (height / 2).max(1);
        depth = (depth / 2).max(1);
        count += 1;

        if width == 1 && height == 1 && depth == 1 {
            return count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_index_the_table() {
        for (idx, format) in PixelFormat::ALL.iter().enumerate() {
            assert_eq!(*format as usize, idx);
            assert_eq!(PixelFormat::try_from(idx as u32), Ok(*format));
        }

        assert_eq!(
            PixelFormat::try_from(PixelFormat::COUNT as u32),
            Err(PixelError::InvalidFormat(30))
        );
    }

    #[test]
    fn masks_agree_with_bits() {
        for format in PixelFormat::ALL {
            let desc = format.descriptor();

            if !format.is_native_endian() {
                continue;
            }

            for ch in 0..4 {
                let bits = u32::from(desc.bits[ch]);
                if bits == 0 {
                    continue;
                }

                let expected = ((1u64 << bits) - 1) << desc.shifts[ch];
                assert_eq!(u64::from(desc.masks[ch]), expected, "{format:?} channel {ch}");
            }
        }
    }

    #[test]
    fn non_packed_formats_have_no_masks() {
        for format in PixelFormat::ALL {
            if format.is_compressed() || format.is_depth() {
                assert_eq!(format.bit_masks(), [0; 4], "{format:?}");
                assert_eq!(format.bit_shifts(), [0; 4], "{format:?}");
                assert_eq!(format.bit_depths(), [0; 4], "{format:?}");
            }
        }
    }

    #[test]
    fn flag_bits() {
        assert_eq!(PixelFormat::R8G8B8A8.flags().bits(), 0x11);
        assert_eq!(PixelFormat::X8R8G8B8.flags().bits(), 0x10);
        assert_eq!(PixelFormat::Dxt1.flags().bits(), 0x03);
        assert_eq!(PixelFormat::Float32Rgba.flags().bits(), 0x05);
        assert_eq!(PixelFormat::D24S8.flags().bits(), 0x0c);
        assert_eq!(PixelFormat::R8.flags().bits(), 0);
    }

    #[test]
    fn accessibility() {
        assert!(!PixelFormat::Unknown.is_accessible());
        assert!(!PixelFormat::Dxt5.is_accessible());
        assert!(!PixelFormat::D16.is_accessible());
        assert!(PixelFormat::R8.is_accessible());
        assert!(PixelFormat::Float16Rgb.is_accessible());
        assert!(PixelFormat::B8G8R8X8.is_accessible());
    }

    #[test]
    fn sizes() {
        assert_eq!(memory_size(7, 3, 1, PixelFormat::R8G8B8), Ok(63));
        assert_eq!(memory_size(4, 4, 2, PixelFormat::Float32Rgba), Ok(512));
        assert_eq!(memory_size(4, 4, 1, PixelFormat::Dxt1), Ok(8));
        assert_eq!(memory_size(5, 5, 1, PixelFormat::Dxt1), Ok(32));
        assert_eq!(memory_size(8, 8, 1, PixelFormat::Dxt5), Ok(64));
        assert_eq!(PixelFormat::Float16Rgb.element_bits(), 48);
    }

    #[test]
    fn extents() {
        assert!(!is_valid_extent(5, 4, 1, PixelFormat::Dxt1));
        assert!(is_valid_extent(8, 4, 1, PixelFormat::Dxt1));
        assert!(!is_valid_extent(8, 4, 2, PixelFormat::Dxt3));
        assert!(is_valid_extent(5, 3, 7, PixelFormat::R8G8B8));
    }

    #[test]
    fn mipmaps() {
        assert_eq!(max_mipmaps(256, 256, 1, PixelFormat::R8G8B8A8), 8);
        assert_eq!(max_mipmaps(256, 64, 1, PixelFormat::R8G8B8A8), 8);
        assert_eq!(max_mipmaps(16, 16, 64, PixelFormat::R8G8B8A8), 6);
        assert_eq!(max_mipmaps(1, 1, 1, PixelFormat::R8), 1);
        assert_eq!(max_mipmaps(0, 16, 1, PixelFormat::R8), 0);
    }
}
