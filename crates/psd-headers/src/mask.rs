//! Layer mask / adjustment layer data of a layer record

use psd_bytes::ByteReader;
use psd_core::{PsdError, PsdResult, Rect, Version};

const FLAG_RELATIVE: u8 = 1 << 0;
const FLAG_DISABLED: u8 = 1 << 1;
const FLAG_INVERT: u8 = 1 << 2;
const FLAG_FROM_RENDER: u8 = 1 << 3;
const FLAG_PARAMETERS: u8 = 1 << 4;

/// Density and feather applied to the masks of a layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskParameters {
    pub user_density: Option<u8>,
    pub user_feather: Option<f64>,
    pub vector_density: Option<u8>,
    pub vector_feather: Option<f64>,
}

impl MaskParameters {
    fn parse(reader: &mut ByteReader<'_>) -> PsdResult<Self> {
        let present = reader.read_u8()?;
        let mut params = Self::default();
        if present & 1 != 0 {
            params.user_density = Some(reader.read_u8()?);
        }
        if present & 2 != 0 {
            params.user_feather = Some(reader.read_f64()?);
        }
        if present & 4 != 0 {
            params.vector_density = Some(reader.read_u8()?);
        }
        if present & 8 != 0 {
            params.vector_feather = Some(reader.read_f64()?);
        }
        Ok(params)
    }
}

/// The "real" user mask stored when a layer has both a vector and a pixel mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealUserMask {
    pub bounds: Rect,
    pub default_color: u8,
    pub flags: u8,
}

/// Layer mask descriptor.
///
/// `default_color` is an 8-bit value whatever the document depth. It is the
/// color of every pixel outside `bounds`, and of every pixel inside them when
/// the mask channel carries no data.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskData {
    pub bounds: Rect,
    pub default_color: u8,
    pub relative_to_layer: bool,
    pub disabled: bool,
    pub invert: bool,
    pub from_render: bool,
    pub parameters: Option<MaskParameters>,
    pub real: Option<RealUserMask>,
}

impl MaskData {
    /// Parse the mask sub-record. The length prefix has already been consumed
    /// and `reader` spans exactly the sub-record. Returns `None` for an empty
    /// sub-record.
    pub fn parse(reader: &mut ByteReader<'_>, version: Version) -> PsdResult<Option<Self>> {
        if reader.is_empty() {
            return Ok(None);
        }

        let start = reader.offset();
        let bounds = read_rect(reader, start, version, "mask")?;
        let default_color = reader.read_u8()?;
        let flags = reader.read_u8()?;

        // Records of 20 bytes end with two bytes of padding. Longer ones store
        // the real user mask ahead of the mask parameters.
        let real = if reader.len() >= 36 {
            let flags = reader.read_u8()?;
            let default_color = reader.read_u8()?;
            let bounds = read_rect(reader, start, version, "real mask")?;
            Some(RealUserMask {
                bounds,
                default_color,
                flags,
            })
        } else {
            None
        };

        let parameters = if flags & FLAG_PARAMETERS != 0 {
            Some(MaskParameters::parse(reader)?)
        } else {
            None
        };

        Ok(Some(Self {
            bounds,
            default_color,
            relative_to_layer: flags & FLAG_RELATIVE != 0,
            disabled: flags & FLAG_DISABLED != 0,
            invert: flags & FLAG_INVERT != 0,
            from_render: flags & FLAG_FROM_RENDER != 0,
            parameters,
            real,
        }))
    }

    pub fn width(&self) -> u32 {
        self.bounds.width()
    }

    pub fn height(&self) -> u32 {
        self.bounds.height()
    }
}

/// Read top, left, bottom, right and reject inverted rectangles or ones
/// wider or taller than the version allows
pub fn read_rect(
    reader: &mut ByteReader<'_>,
    record_offset: u64,
    version: Version,
    what: &str,
) -> PsdResult<Rect> {
    let rect = Rect::new(
        reader.read_i32()?,
        reader.read_i32()?,
        reader.read_i32()?,
        reader.read_i32()?,
    );
    if !rect.is_valid() {
        return Err(PsdError::corrupt_record(
            record_offset,
            format!(
                "{} bounds are degenerate (top {}, left {}, bottom {}, right {})",
                what, rect.top, rect.left, rect.bottom, rect.right
            ),
        ));
    }
    let max = version.max_dimension();
    if rect.width() > max || rect.height() > max {
        return Err(PsdError::corrupt_record(
            record_offset,
            format!(
                "{} bounds of {}x{} exceed the {} limit of {}",
                what,
                rect.width(),
                rect.height(),
                match version {
                    Version::Psd => "PSD",
                    Version::Psb => "PSB",
                },
                max
            ),
        ));
    }
    Ok(rect)
}
