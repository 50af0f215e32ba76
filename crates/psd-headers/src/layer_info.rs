//! Layer and mask information section

use log::{debug, trace};
use psd_bytes::ByteReader;
use psd_core::{PsdError, PsdResult};

use crate::header::FileHeader;
use crate::layer_record::LayerRecord;
use crate::tagged_block::{read_tagged_blocks, TaggedBlock};

/// Flat layer records plus the compressed span of every channel.
///
/// `channel_data[i][j]` is the span of `records[i].channels[j]`, starting
/// with its 2-byte compression code.
#[derive(Debug, Clone, Default)]
pub struct LayerInfo<'a> {
    pub records: Vec<LayerRecord>,
    pub channel_data: Vec<Vec<&'a [u8]>>,
    /// A negative layer count flags that the first alpha channel of the merged
    /// image holds its transparency
    pub merged_alpha: bool,
}

impl<'a> LayerInfo<'a> {
    /// Parse the layer info body (after its length prefix)
    pub fn parse(reader: &mut ByteReader<'a>, header: &FileHeader) -> PsdResult<Self> {
        if reader.is_empty() {
            return Ok(Self::default());
        }

        let raw_count = reader.read_i16()?;
        let merged_alpha = raw_count < 0;
        let count = raw_count.unsigned_abs() as usize;
        debug!("Layer info: {} records", count);

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(LayerRecord::parse(reader, header)?);
        }

        let mut channel_data = Vec::with_capacity(count);
        for record in &records {
            let mut spans = Vec::with_capacity(record.channels.len());
            for channel in &record.channels {
                if channel.length > reader.remaining() as u64 {
                    return Err(PsdError::CorruptChannelData(format!(
                        "channel {:?} of layer '{}' declares {} bytes at offset {}, {} remain",
                        channel.info.id,
                        record.display_name(),
                        channel.length,
                        reader.offset(),
                        reader.remaining()
                    )));
                }
                spans.push(reader.read(channel.length as usize)?);
            }
            trace!(
                "Layer '{}': {} channel spans",
                record.display_name(),
                spans.len()
            );
            channel_data.push(spans);
        }

        Ok(Self {
            records,
            channel_data,
            merged_alpha,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The whole layer and mask information section
#[derive(Debug, Clone, Default)]
pub struct LayerAndMaskInfo<'a> {
    pub layer_info: LayerInfo<'a>,
    /// Global layer mask info, kept raw
    pub global_mask: Vec<u8>,
    /// Document level tagged blocks, minus the layer info ones
    pub tagged_blocks: Vec<TaggedBlock>,
}

impl<'a> LayerAndMaskInfo<'a> {
    pub fn parse(reader: &mut ByteReader<'a>, header: &FileHeader) -> PsdResult<Self> {
        let length = reader.read_bounded_length(header.version)?;
        let mut section = reader.sub_reader(length)?;
        debug!("Layer and mask info: {} bytes", length);
        if section.is_empty() {
            return Ok(Self::default());
        }

        let info_length = section.read_bounded_length(header.version)?;
        let mut info_reader = section.sub_reader(info_length)?;
        let mut layer_info = LayerInfo::parse(&mut info_reader, header)?;

        let mut global_mask = Vec::new();
        if section.remaining() >= 4 {
            let mask_length = section.read_u32()? as usize;
            global_mask = section.read(mask_length)?.to_vec();
        }

        let mut tagged_blocks = Vec::new();
        for block in read_tagged_blocks(&mut section, header.version)? {
            match &block.key {
                // 16 and 32-bit documents keep their layers here, with an empty
                // layer info above
                b"Lr16" | b"Lr32" | b"Layr" => {
                    if layer_info.is_empty() {
                        debug!(
                            "Reading layer info from the '{}' block",
                            String::from_utf8_lossy(&block.key)
                        );
                        let mut block_reader = ByteReader::with_offset(block.data, block.offset);
                        layer_info = LayerInfo::parse(&mut block_reader, header)?;
                    }
                }
                _ => tagged_blocks.push(block.to_block()),
            }
        }

        Ok(Self {
            layer_info,
            global_mask,
            tagged_blocks,
        })
    }
}
