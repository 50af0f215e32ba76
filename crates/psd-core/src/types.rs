//! Core types for PSD/PSB documents

use byteorder::{BigEndian, ByteOrder};
use std::fmt;

use crate::consts::{PSB_MAX_DIMENSION, PSD_MAX_DIMENSION};

/// Container version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Version {
    /// Standard document, version 1
    Psd,
    /// Large document format, version 2
    Psb,
}

impl Version {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Version::Psd),
            2 => Some(Version::Psb),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            Version::Psd => 1,
            Version::Psb => 2,
        }
    }

    /// Largest width or height the version allows
    pub fn max_dimension(&self) -> u32 {
        match self {
            Version::Psd => PSD_MAX_DIMENSION,
            Version::Psb => PSB_MAX_DIMENSION,
        }
    }

    /// Width in bytes of section and channel lengths
    pub fn length_size(&self) -> usize {
        match self {
            Version::Psd => 4,
            Version::Psb => 8,
        }
    }

    /// Width in bytes of one entry of an RLE row count table
    pub fn rle_count_size(&self) -> usize {
        match self {
            Version::Psd => 2,
            Version::Psb => 4,
        }
    }
}

/// Bits per channel sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitDepth {
    Eight,
    Sixteen,
    ThirtyTwo,
}

impl BitDepth {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            8 => Some(BitDepth::Eight),
            16 => Some(BitDepth::Sixteen),
            32 => Some(BitDepth::ThirtyTwo),
            _ => None,
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::ThirtyTwo => 32,
        }
    }

    /// Returns the size in bytes of one sample
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
            BitDepth::ThirtyTwo => 4,
        }
    }

    /// Name of the Rust sample type holding this depth
    pub fn type_name(&self) -> &'static str {
        match self {
            BitDepth::Eight => "u8",
            BitDepth::Sixteen => "u16",
            BitDepth::ThirtyTwo => "f32",
        }
    }
}

/// Document color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorMode {
    Bitmap = 0,
    Grayscale = 1,
    Indexed = 2,
    Rgb = 3,
    Cmyk = 4,
    Multichannel = 7,
    Duotone = 8,
    Lab = 9,
}

impl ColorMode {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(ColorMode::Bitmap),
            1 => Some(ColorMode::Grayscale),
            2 => Some(ColorMode::Indexed),
            3 => Some(ColorMode::Rgb),
            4 => Some(ColorMode::Cmyk),
            7 => Some(ColorMode::Multichannel),
            8 => Some(ColorMode::Duotone),
            9 => Some(ColorMode::Lab),
            _ => None,
        }
    }

    /// Number of color channels the mode defines
    pub fn color_channels(&self) -> usize {
        match self {
            ColorMode::Bitmap
            | ColorMode::Grayscale
            | ColorMode::Indexed
            | ColorMode::Duotone => 1,
            ColorMode::Rgb | ColorMode::Lab => 3,
            ColorMode::Cmyk => 4,
            ColorMode::Multichannel => 0,
        }
    }
}

/// Semantic identifier of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelId {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
    Black,
    Gray,
    Lightness,
    A,
    B,
    /// Spot or extra channel outside the mode's color channels
    Custom(i16),
    /// Transparency, raw id -1
    Alpha,
    /// Pixel layer mask, raw id -2
    UserMask,
    /// Real user mask when both a vector and a pixel mask exist, raw id -3
    RealUserMask,
}

impl ChannelId {
    /// Maps an on-disk channel number to its meaning under `mode`
    pub fn from_raw(raw: i16, mode: ColorMode) -> Self {
        match raw {
            -1 => return ChannelId::Alpha,
            -2 => return ChannelId::UserMask,
            -3 => return ChannelId::RealUserMask,
            _ => {}
        }

        let color = match (mode, raw) {
            (ColorMode::Rgb, 0) => Some(ChannelId::Red),
            (ColorMode::Rgb, 1) => Some(ChannelId::Green),
            (ColorMode::Rgb, 2) => Some(ChannelId::Blue),
            (ColorMode::Cmyk, 0) => Some(ChannelId::Cyan),
            (ColorMode::Cmyk, 1) => Some(ChannelId::Magenta),
            (ColorMode::Cmyk, 2) => Some(ChannelId::Yellow),
            (ColorMode::Cmyk, 3) => Some(ChannelId::Black),
            (ColorMode::Lab, 0) => Some(ChannelId::Lightness),
            (ColorMode::Lab, 1) => Some(ChannelId::A),
            (ColorMode::Lab, 2) => Some(ChannelId::B),
            (
                ColorMode::Bitmap
                | ColorMode::Grayscale
                | ColorMode::Indexed
                | ColorMode::Duotone,
                0,
            ) => Some(ChannelId::Gray),
            _ => None,
        };
        color.unwrap_or(ChannelId::Custom(raw))
    }

    /// True for the two layer mask channels
    pub fn is_mask(&self) -> bool {
        matches!(self, ChannelId::UserMask | ChannelId::RealUserMask)
    }
}

/// Channel key: semantic id plus the raw channel number it was stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelIdInfo {
    pub id: ChannelId,
    pub index: i16,
}

impl ChannelIdInfo {
    pub fn new(id: ChannelId, index: i16) -> Self {
        Self { id, index }
    }

    pub fn from_raw(raw: i16, mode: ColorMode) -> Self {
        Self::new(ChannelId::from_raw(raw, mode), raw)
    }
}

/// Bounding rectangle in document coordinates, edges exclusive on bottom/right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Rect {
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// True when top <= bottom and left <= right
    pub fn is_valid(&self) -> bool {
        self.top <= self.bottom && self.left <= self.right
    }

    pub fn width(&self) -> u32 {
        (i64::from(self.right) - i64::from(self.left)).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (i64::from(self.bottom) - i64::from(self.top)).max(0) as u32
    }

    pub fn pixel_count(&self) -> usize {
        (self.width() as usize) * (self.height() as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }
}

/// Layer blend mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMode {
    PassThrough,
    #[default]
    Normal,
    Dissolve,
    Darken,
    Multiply,
    ColorBurn,
    LinearBurn,
    DarkerColor,
    Lighten,
    Screen,
    ColorDodge,
    LinearDodge,
    LighterColor,
    Overlay,
    SoftLight,
    HardLight,
    VividLight,
    LinearLight,
    PinLight,
    HardMix,
    Difference,
    Exclusion,
    Subtract,
    Divide,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    const KEYS: [(BlendMode, &'static [u8; 4]); 28] = [
        (BlendMode::PassThrough, b"pass"),
        (BlendMode::Normal, b"norm"),
        (BlendMode::Dissolve, b"diss"),
        (BlendMode::Darken, b"dark"),
        (BlendMode::Multiply, b"mul "),
        (BlendMode::ColorBurn, b"idiv"),
        (BlendMode::LinearBurn, b"lbrn"),
        (BlendMode::DarkerColor, b"dkCl"),
        (BlendMode::Lighten, b"lite"),
        (BlendMode::Screen, b"scrn"),
        (BlendMode::ColorDodge, b"div "),
        (BlendMode::LinearDodge, b"lddg"),
        (BlendMode::LighterColor, b"lgCl"),
        (BlendMode::Overlay, b"over"),
        (BlendMode::SoftLight, b"sLit"),
        (BlendMode::HardLight, b"hLit"),
        (BlendMode::VividLight, b"vLit"),
        (BlendMode::LinearLight, b"lLit"),
        (BlendMode::PinLight, b"pLit"),
        (BlendMode::HardMix, b"hMix"),
        (BlendMode::Difference, b"diff"),
        (BlendMode::Exclusion, b"smud"),
        (BlendMode::Subtract, b"fsub"),
        (BlendMode::Divide, b"fdiv"),
        (BlendMode::Hue, b"hue "),
        (BlendMode::Saturation, b"sat "),
        (BlendMode::Color, b"colr"),
        (BlendMode::Luminosity, b"lum "),
    ];

    pub fn from_key(key: &[u8; 4]) -> Option<Self> {
        Self::KEYS
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(mode, _)| *mode)
    }

    pub fn key(&self) -> [u8; 4] {
        Self::KEYS
            .iter()
            .find(|(mode, _)| mode == self)
            .map(|(_, k)| **k)
            .unwrap_or(*b"norm")
    }
}

/// Channel sample type, one per supported bit depth
pub trait Sample:
    Copy
    + Default
    + num_traits::NumCast
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + Send
    + Sync
    + 'static
{
    const BIT_DEPTH: BitDepth;

    /// Converts a big-endian byte plane into samples. `bytes.len()` must be
    /// a multiple of the sample size.
    fn decode_be(bytes: &[u8]) -> Vec<Self>;

    /// Value used when filling a synthesized mask of the given 8-bit color
    fn from_mask_color(color: u8) -> Self {
        <Self as num_traits::NumCast>::from(color).unwrap_or_default()
    }
}

impl Sample for u8 {
    const BIT_DEPTH: BitDepth = BitDepth::Eight;

    fn decode_be(bytes: &[u8]) -> Vec<Self> {
        bytes.to_vec()
    }
}

impl Sample for u16 {
    const BIT_DEPTH: BitDepth = BitDepth::Sixteen;

    fn decode_be(bytes: &[u8]) -> Vec<Self> {
        let mut out = vec![0u16; bytes.len() / 2];
        BigEndian::read_u16_into(&bytes[..out.len() * 2], &mut out);
        out
    }
}

impl Sample for f32 {
    const BIT_DEPTH: BitDepth = BitDepth::ThirtyTwo;

    fn decode_be(bytes: &[u8]) -> Vec<Self> {
        let mut out = vec![0f32; bytes.len() / 4];
        BigEndian::read_f32_into(&bytes[..out.len() * 4], &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ids_follow_color_mode() {
        assert_eq!(ChannelId::from_raw(0, ColorMode::Rgb), ChannelId::Red);
        assert_eq!(ChannelId::from_raw(3, ColorMode::Cmyk), ChannelId::Black);
        assert_eq!(ChannelId::from_raw(0, ColorMode::Grayscale), ChannelId::Gray);
        assert_eq!(ChannelId::from_raw(3, ColorMode::Rgb), ChannelId::Custom(3));
        assert_eq!(ChannelId::from_raw(-1, ColorMode::Lab), ChannelId::Alpha);
        assert_eq!(ChannelId::from_raw(-2, ColorMode::Rgb), ChannelId::UserMask);
        assert!(ChannelId::RealUserMask.is_mask());
        assert!(!ChannelId::Alpha.is_mask());
    }

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(10, 20, 60, 120);
        assert!(rect.is_valid());
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 50);
        assert_eq!(rect.pixel_count(), 5000);

        let inverted = Rect::new(10, 0, 5, 0);
        assert!(!inverted.is_valid());
        assert!(Rect::default().is_empty());

        let extreme = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(extreme.width(), u32::MAX);
    }

    #[test]
    fn test_blend_mode_keys() {
        assert_eq!(BlendMode::from_key(b"mul "), Some(BlendMode::Multiply));
        assert_eq!(BlendMode::from_key(b"pass"), Some(BlendMode::PassThrough));
        assert_eq!(BlendMode::from_key(b"nope"), None);
        assert_eq!(&BlendMode::Luminosity.key(), b"lum ");
        assert_eq!(BlendMode::default(), BlendMode::Normal);
    }

    #[test]
    fn test_sample_conversion() {
        assert_eq!(u16::decode_be(&[0x01, 0x02, 0xFF, 0xFF]), vec![0x0102, 0xFFFF]);
        assert_eq!(f32::decode_be(&1.5f32.to_be_bytes()), vec![1.5]);
        assert_eq!(u8::from_mask_color(255), 255);
        assert_eq!(u16::from_mask_color(255), 255);
        assert_eq!(f32::from_mask_color(128), 128.0);
        assert_eq!(<u16 as Sample>::BIT_DEPTH.bytes_per_sample(), 2);
    }

    #[test]
    fn test_version_limits() {
        assert_eq!(Version::Psd.max_dimension(), 30_000);
        assert_eq!(Version::Psb.max_dimension(), 300_000);
        assert_eq!(Version::Psb.length_size(), 8);
        assert_eq!(Version::from_u16(3), None);
    }
}
