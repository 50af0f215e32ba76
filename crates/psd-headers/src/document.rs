//! Top-level section layout of a document

use log::debug;
use psd_bytes::ByteReader;
use psd_core::PsdResult;

use crate::header::FileHeader;
use crate::layer_info::LayerAndMaskInfo;
use crate::resources::{ColorModeData, ImageResources};

/// Merged (composite) image section, still compressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedImageData<'a> {
    pub compression: u16,
    pub data: &'a [u8],
}

/// Every section of a document, with channel data left as borrowed spans
#[derive(Debug, Clone)]
pub struct PhotoshopFile<'a> {
    pub header: FileHeader,
    pub color_mode_data: ColorModeData,
    pub image_resources: ImageResources,
    pub layer_and_mask: LayerAndMaskInfo<'a>,
    /// `None` when the file ends after the layer and mask section
    pub merged_image: Option<MergedImageData<'a>>,
}

impl<'a> PhotoshopFile<'a> {
    pub fn parse(data: &'a [u8]) -> PsdResult<Self> {
        let mut reader = ByteReader::new(data);

        let header = FileHeader::parse(&mut reader)?;
        let color_mode_data = ColorModeData::parse(&mut reader)?;
        let image_resources = ImageResources::parse(&mut reader)?;
        let layer_and_mask = LayerAndMaskInfo::parse(&mut reader, &header)?;

        let merged_image = if reader.remaining() >= 2 {
            let compression = reader.read_u16()?;
            let data = reader.read(reader.remaining())?;
            debug!(
                "Merged image data: compression {}, {} bytes",
                compression,
                data.len()
            );
            Some(MergedImageData { compression, data })
        } else {
            None
        };

        Ok(Self {
            header,
            color_mode_data,
            image_resources,
            layer_and_mask,
            merged_image,
        })
    }
}
