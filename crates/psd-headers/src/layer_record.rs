//! Layer records of the layer info section

use log::trace;
use psd_bytes::ByteReader;
use psd_core::consts::{MAX_CHANNELS, RESOURCE_SIGNATURE};
use psd_core::*;

use crate::header::FileHeader;
use crate::mask::{read_rect, MaskData};
use crate::tagged_block::{read_tagged_blocks, SectionDivider, TaggedBlock};

/// One entry of a record's channel table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelInfo {
    pub info: ChannelIdInfo,
    /// Length of the channel's span in the image data, compression code included
    pub length: u64,
}

/// Flags byte of a layer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerFlags {
    pub transparency_protected: bool,
    pub hidden: bool,
    pub pixel_data_irrelevant: bool,
}

impl LayerFlags {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            transparency_protected: byte & 0x01 != 0,
            hidden: byte & 0x02 != 0,
            // Bit 4 only carries meaning when bit 3 is set
            pixel_data_irrelevant: byte & 0x08 != 0 && byte & 0x10 != 0,
        }
    }
}

/// A parsed layer record, before its channel data is decoded
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    /// Absolute file offset of the record
    pub offset: u64,
    pub bounds: Rect,
    pub channels: Vec<ChannelInfo>,
    pub blend_mode: BlendMode,
    pub opacity: u8,
    pub clipping: bool,
    pub flags: LayerFlags,
    pub mask: Option<MaskData>,
    pub blending_ranges: Vec<u8>,
    /// Legacy Pascal name
    pub name: String,
    /// `luni` block
    pub unicode_name: Option<String>,
    /// `lyid` block
    pub layer_id: Option<u32>,
    /// `lspf` block
    pub protection_flags: Option<u32>,
    /// `lsct` or `lsdk` block
    pub divider: Option<SectionDivider>,
    /// Every tagged block of the record except the ones decoded above
    pub tagged_blocks: Vec<TaggedBlock>,
}

impl LayerRecord {
    pub fn parse(reader: &mut ByteReader<'_>, header: &FileHeader) -> PsdResult<Self> {
        let offset = reader.offset();
        let bounds = read_rect(reader, offset, header.version, "layer")?;

        let channel_count = reader.read_u16()?;
        if channel_count > MAX_CHANNELS {
            return Err(PsdError::corrupt_record(
                offset,
                format!("{} channels", channel_count),
            ));
        }
        let mut channels = Vec::with_capacity(channel_count as usize);
        for _ in 0..channel_count {
            let raw = reader.read_i16()?;
            if raw < -3 {
                return Err(PsdError::corrupt_record(offset, format!("channel id {}", raw)));
            }
            let length = reader.read_length(header.version)?;
            channels.push(ChannelInfo {
                info: ChannelIdInfo::from_raw(raw, header.color_mode),
                length,
            });
        }

        if reader.read_signature()? != RESOURCE_SIGNATURE {
            return Err(PsdError::corrupt_record(offset, "missing 8BIM blend signature"));
        }
        let key = reader.read_signature()?;
        let blend_mode = BlendMode::from_key(&key).ok_or_else(|| {
            PsdError::corrupt_record(
                offset,
                format!("unknown blend mode {:?}", String::from_utf8_lossy(&key)),
            )
        })?;

        let opacity = reader.read_u8()?;
        let clipping = reader.read_u8()? != 0;
        let flags = LayerFlags::from_byte(reader.read_u8()?);
        reader.skip(1)?;

        let extra_length = reader.read_u32()? as usize;
        if extra_length > reader.remaining() {
            return Err(PsdError::corrupt_record(
                offset,
                format!("extra data of {} bytes overruns the layer info", extra_length),
            ));
        }
        let mut extra = reader.sub_reader(extra_length)?;

        let mask_length = extra.read_u32()? as usize;
        let mut mask_reader = extra.sub_reader(mask_length)?;
        let mask = MaskData::parse(&mut mask_reader, header.version)?;

        let ranges_length = extra.read_u32()? as usize;
        let blending_ranges = extra.read(ranges_length)?.to_vec();

        let name = extra.read_pascal_string(4)?;

        let mut record = Self {
            offset,
            bounds,
            channels,
            blend_mode,
            opacity,
            clipping,
            flags,
            mask,
            blending_ranges,
            name,
            unicode_name: None,
            layer_id: None,
            protection_flags: None,
            divider: None,
            tagged_blocks: Vec::new(),
        };

        for block in read_tagged_blocks(&mut extra, header.version)? {
            match &block.key {
                b"lsct" | b"lsdk" => record.divider = Some(SectionDivider::parse(&block)?),
                b"luni" => {
                    let mut block_reader = ByteReader::new(block.data);
                    record.unicode_name = Some(block_reader.read_unicode_string()?);
                }
                b"lyid" => record.layer_id = Some(ByteReader::new(block.data).read_u32()?),
                b"lspf" => record.protection_flags = Some(ByteReader::new(block.data).read_u32()?),
                _ => record.tagged_blocks.push(block.to_block()),
            }
        }

        trace!(
            "Layer record '{}' at {}: {:?}, {} channels, mask: {}",
            record.display_name(),
            offset,
            record.bounds,
            record.channels.len(),
            record.mask.is_some()
        );

        Ok(record)
    }

    /// Unicode name when present, the Pascal name otherwise
    pub fn display_name(&self) -> &str {
        self.unicode_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_visible(&self) -> bool {
        !self.flags.hidden
    }

    pub fn has_block(&self, key: &[u8; 4]) -> bool {
        self.tagged_blocks.iter().any(|block| &block.key == key)
    }

    /// Rectangle covered by a channel: the mask bounds for mask channels, the
    /// layer bounds otherwise
    pub fn channel_extent(&self, id: ChannelId) -> Rect {
        match id {
            ChannelId::UserMask => self.mask.map(|mask| mask.bounds).unwrap_or_default(),
            ChannelId::RealUserMask => self
                .mask
                .map(|mask| mask.real.map(|real| real.bounds).unwrap_or(mask.bounds))
                .unwrap_or_default(),
            _ => self.bounds,
        }
    }
}
