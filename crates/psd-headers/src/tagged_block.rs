//! Additional layer information ("tagged blocks")

use log::trace;
use psd_bytes::ByteReader;
use psd_core::consts::{RESOURCE_SIGNATURE, RESOURCE_SIGNATURE_64};
use psd_core::{BlendMode, PsdError, PsdResult, Version};

/// Keys whose length field is 8 bytes wide in PSB documents
const PSB_LONG_KEYS: [&[u8; 4]; 13] = [
    b"LMsk", b"Lr16", b"Lr32", b"Layr", b"Mt16", b"Mt32", b"Mtrn", b"Alph", b"FMsk", b"lnk2",
    b"FEid", b"FXid", b"PxSD",
];

/// A tagged block borrowed from the document buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTaggedBlock<'a> {
    pub signature: [u8; 4],
    pub key: [u8; 4],
    pub data: &'a [u8],
    /// Absolute file offset of the block data
    pub offset: u64,
}

impl RawTaggedBlock<'_> {
    pub fn to_block(&self) -> TaggedBlock {
        TaggedBlock {
            key: self.key,
            data: self.data.to_vec(),
        }
    }
}

/// A tagged block kept on a layer or on the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedBlock {
    pub key: [u8; 4],
    pub data: Vec<u8>,
}

impl TaggedBlock {
    pub fn key_str(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }
}

/// Read blocks until fewer than a block header's worth of bytes remain
pub fn read_tagged_blocks<'a>(
    reader: &mut ByteReader<'a>,
    version: Version,
) -> PsdResult<Vec<RawTaggedBlock<'a>>> {
    let mut blocks = Vec::new();

    while reader.remaining() >= 12 {
        let offset = reader.offset();
        let signature = reader.read_signature()?;
        if signature != RESOURCE_SIGNATURE && signature != RESOURCE_SIGNATURE_64 {
            return Err(PsdError::corrupt_record(
                offset,
                format!(
                    "tagged block signature {:?}",
                    String::from_utf8_lossy(&signature)
                ),
            ));
        }

        let key = reader.read_signature()?;
        let length = if version == Version::Psb && PSB_LONG_KEYS.contains(&&key) {
            reader.read_u64()?
        } else {
            u64::from(reader.read_u32()?)
        };
        if length > reader.remaining() as u64 {
            return Err(PsdError::corrupt_record(
                offset,
                format!(
                    "tagged block '{}' declares {} bytes, {} remain",
                    String::from_utf8_lossy(&key),
                    length,
                    reader.remaining()
                ),
            ));
        }

        let data_offset = reader.offset();
        let data = reader.read(length as usize)?;
        // Lengths are rounded up to an even count on disk
        if length % 2 == 1 && !reader.at_end() {
            reader.skip(1)?;
        }

        trace!(
            "Tagged block '{}': {} bytes",
            String::from_utf8_lossy(&key),
            length
        );
        blocks.push(RawTaggedBlock {
            signature,
            key,
            data,
            offset: data_offset,
        });
    }

    Ok(blocks)
}

/// Kind of a section divider record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DividerType {
    /// Any other layer
    Other,
    /// Group whose folder is expanded in the layers panel
    OpenFolder,
    /// Group whose folder is collapsed in the layers panel
    ClosedFolder,
    /// Hidden marker closing a group
    BoundingSection,
}

impl DividerType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(DividerType::Other),
            1 => Some(DividerType::OpenFolder),
            2 => Some(DividerType::ClosedFolder),
            3 => Some(DividerType::BoundingSection),
            _ => None,
        }
    }

    /// True for the markers that open a group
    pub fn is_group_start(&self) -> bool {
        matches!(self, DividerType::OpenFolder | DividerType::ClosedFolder)
    }

    pub fn is_group_end(&self) -> bool {
        matches!(self, DividerType::BoundingSection)
    }
}

/// Decoded `lsct`/`lsdk` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDivider {
    pub divider_type: DividerType,
    /// Blend mode of the group, overriding the record's `pass` placeholder
    pub blend_mode: Option<BlendMode>,
    /// 0 normal, 1 scene group
    pub sub_type: Option<u32>,
}

impl SectionDivider {
    pub fn parse(block: &RawTaggedBlock<'_>) -> PsdResult<Self> {
        let mut reader = ByteReader::new(block.data);
        let raw_type = reader.read_u32()?;
        let divider_type = DividerType::from_u32(raw_type).ok_or_else(|| {
            PsdError::corrupt_record(block.offset, format!("section divider type {}", raw_type))
        })?;

        let mut blend_mode = None;
        if reader.remaining() >= 8 {
            let signature = reader.read_signature()?;
            if signature != RESOURCE_SIGNATURE {
                return Err(PsdError::corrupt_record(
                    block.offset,
                    "section divider blend signature",
                ));
            }
            let key = reader.read_signature()?;
            blend_mode = Some(BlendMode::from_key(&key).ok_or_else(|| {
                PsdError::corrupt_record(
                    block.offset,
                    format!("unknown blend mode {:?}", String::from_utf8_lossy(&key)),
                )
            })?);
        }

        let sub_type = if reader.remaining() >= 4 {
            Some(reader.read_u32()?)
        } else {
            None
        };

        Ok(Self {
            divider_type,
            blend_mode,
            sub_type,
        })
    }
}
