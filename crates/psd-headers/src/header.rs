//! The fixed 26-byte file header

use log::debug;
use psd_bytes::ByteReader;
use psd_core::consts::{MAX_CHANNELS, MIN_CHANNELS, PSD_SIGNATURE};
use psd_core::*;

/// Photoshop file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileHeader {
    pub version: Version,
    pub channels: u16,
    pub width: u32,
    pub height: u32,
    pub depth: BitDepth,
    pub color_mode: ColorMode,
}

impl FileHeader {
    /// Parse the header. The signature is checked before anything else.
    pub fn parse(reader: &mut ByteReader<'_>) -> PsdResult<Self> {
        let signature = reader
            .read_signature()
            .map_err(|_| PsdError::NotAPhotoshopFile)?;
        if signature != PSD_SIGNATURE {
            return Err(PsdError::NotAPhotoshopFile);
        }

        let raw_version = reader.read_u16()?;
        let version =
            Version::from_u16(raw_version).ok_or(PsdError::UnsupportedVersion(raw_version))?;

        let reserved = reader.read(6)?;
        if reserved.iter().any(|&b| b != 0) {
            return Err(PsdError::InvalidHeader(
                "reserved header bytes are not zero".to_string(),
            ));
        }

        let channels = reader.read_u16()?;
        if !(MIN_CHANNELS..=MAX_CHANNELS).contains(&channels) {
            return Err(PsdError::InvalidHeader(format!(
                "channel count {} outside {}..={}",
                channels, MIN_CHANNELS, MAX_CHANNELS
            )));
        }

        let height = reader.read_u32()?;
        let width = reader.read_u32()?;
        check_dimension("height", height, version)?;
        check_dimension("width", width, version)?;

        let raw_depth = reader.read_u16()?;
        let depth = BitDepth::from_u16(raw_depth).ok_or(PsdError::UnsupportedBitDepth(raw_depth))?;

        let raw_mode = reader.read_u16()?;
        let color_mode = ColorMode::from_u16(raw_mode)
            .ok_or_else(|| PsdError::InvalidHeader(format!("unknown color mode {}", raw_mode)))?;

        debug!(
            "{:?} header: {}x{}, {} channels, {}-bit {:?}",
            version,
            width,
            height,
            channels,
            depth.bits(),
            color_mode
        );

        Ok(Self {
            version,
            channels,
            width,
            height,
            depth,
            color_mode,
        })
    }

    /// Parse just the header of a complete document
    pub fn from_bytes(data: &[u8]) -> PsdResult<Self> {
        Self::parse(&mut ByteReader::new(data))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn check_dimension(dimension: &'static str, value: u32, version: Version) -> PsdResult<()> {
    let max = version.max_dimension();
    if value == 0 || value > max {
        return Err(PsdError::DimensionOutOfRange {
            dimension,
            value,
            max,
        });
    }
    Ok(())
}
