//! Channel codec dispatch

use log::trace;
use psd_bytes::ByteReader;
use psd_core::{BitDepth, PsdError, PsdResult, Sample, Version};

use crate::prediction::reverse_prediction;
use crate::rle::decode_rle;
use crate::zip::inflate;

/// Compression scheme of a channel or of the merged image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Raw,
    Rle,
    Zip,
    ZipPrediction,
}

impl Compression {
    pub fn from_u16(code: u16) -> PsdResult<Self> {
        match code {
            0 => Ok(Compression::Raw),
            1 => Ok(Compression::Rle),
            2 => Ok(Compression::Zip),
            3 => Ok(Compression::ZipPrediction),
            other => Err(PsdError::UnsupportedCompression(other)),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            Compression::Raw => 0,
            Compression::Rle => 1,
            Compression::Zip => 2,
            Compression::ZipPrediction => 3,
        }
    }
}

/// Extent and sample layout of one decoded plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelGeometry {
    pub width: u32,
    pub height: u32,
    pub depth: BitDepth,
    pub version: Version,
}

impl ChannelGeometry {
    pub fn new(width: u32, height: u32, depth: BitDepth, version: Version) -> Self {
        Self {
            width,
            height,
            depth,
            version,
        }
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.depth.bytes_per_sample()
    }

    /// Length in bytes of the decoded plane
    pub fn expected_len(&self) -> usize {
        self.row_bytes() * self.height as usize
    }
}

/// Decompress one plane to its big-endian byte representation
pub fn decompress(
    compression: Compression,
    data: &[u8],
    geometry: &ChannelGeometry,
) -> PsdResult<Vec<u8>> {
    let mut planes = decompress_planes(compression, data, geometry, 1)?;
    Ok(planes.pop().unwrap_or_default())
}

/// Decompress `planes` consecutive planes sharing one geometry.
///
/// This is the layout of the merged image section: RLE uses a single row
/// count table covering every plane, and zip uses one stream for all of them.
pub fn decompress_planes(
    compression: Compression,
    data: &[u8],
    geometry: &ChannelGeometry,
    planes: usize,
) -> PsdResult<Vec<Vec<u8>>> {
    let plane_len = geometry.expected_len();
    let total = plane_len * planes;
    trace!(
        "Decompressing {} plane(s) of {}x{} with {:?}: {} bytes -> {} bytes",
        planes,
        geometry.width,
        geometry.height,
        compression,
        data.len(),
        total
    );

    if total == 0 {
        return Ok(vec![Vec::new(); planes]);
    }

    let bytes = match compression {
        Compression::Raw => {
            if data.len() != total {
                return Err(PsdError::CorruptChannelData(format!(
                    "raw data is {} bytes, expected {}",
                    data.len(),
                    total
                )));
            }
            data.to_vec()
        }
        Compression::Rle => decode_rle(
            data,
            geometry.row_bytes(),
            geometry.height as usize * planes,
            geometry.version,
        )?,
        Compression::Zip => inflate(data, total)?,
        Compression::ZipPrediction => {
            let mut inflated = inflate(data, total)?;
            for plane in inflated.chunks_exact_mut(plane_len) {
                reverse_prediction(
                    plane,
                    geometry.width as usize,
                    geometry.height as usize,
                    geometry.depth,
                );
            }
            inflated
        }
    };

    Ok(bytes.chunks_exact(plane_len).map(<[u8]>::to_vec).collect())
}

/// Decode a layer channel span: a 2-byte compression code followed by the
/// compressed plane.
pub fn decode_channel<T: Sample>(span: &[u8], geometry: &ChannelGeometry) -> PsdResult<Vec<T>> {
    if span.is_empty() && geometry.expected_len() == 0 {
        return Ok(Vec::new());
    }

    let mut reader = ByteReader::new(span);
    let code = reader.read_u16().map_err(|_| {
        PsdError::CorruptChannelData(format!(
            "channel span of {} bytes has no compression code",
            span.len()
        ))
    })?;
    let compression = Compression::from_u16(code)?;
    let bytes = decompress(compression, reader.read(reader.remaining())?, geometry)?;
    Ok(T::decode_be(&bytes))
}
