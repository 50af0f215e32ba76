//! Color mode data and image resource blocks
//!
//! Both sections are pass-through metadata: they are kept byte for byte and
//! only the ICC profile gets a typed accessor.

use log::{debug, trace, warn};
use psd_bytes::ByteReader;
use psd_core::consts::RESOURCE_ICC_PROFILE;
use psd_core::PsdResult;

/// Signatures accepted in front of an image resource block
const RESOURCE_SIGNATURES: [&[u8; 4]; 5] = [b"8BIM", b"MeSa", b"AgHg", b"PHUT", b"DCSR"];

/// Raw color mode data section (the palette of indexed documents, duotone
/// specification, or empty)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorModeData {
    pub data: Vec<u8>,
}

impl ColorModeData {
    pub fn parse(reader: &mut ByteReader<'_>) -> PsdResult<Self> {
        let length = reader.read_u32()? as usize;
        let data = reader.read(length)?.to_vec();
        debug!("Color mode data: {} bytes", data.len());
        Ok(Self { data })
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One image resource block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    pub signature: [u8; 4],
    pub id: u16,
    pub name: String,
    pub data: Vec<u8>,
}

/// The image resources section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResources {
    pub blocks: Vec<ImageResource>,
}

impl ImageResources {
    pub fn parse(reader: &mut ByteReader<'_>) -> PsdResult<Self> {
        let length = reader.read_u32()? as usize;
        let mut section = reader.sub_reader(length)?;
        let mut blocks = Vec::new();

        while section.remaining() >= 4 {
            let offset = section.offset();
            let signature = section.read_signature()?;
            if !RESOURCE_SIGNATURES.contains(&&signature) {
                warn!(
                    "Image resource at offset {} has unknown signature {:?}, skipping the rest",
                    offset,
                    String::from_utf8_lossy(&signature)
                );
                break;
            }

            let id = section.read_u16()?;
            let name = section.read_pascal_string(2)?;
            let size = section.read_u32()? as usize;
            let data = section.read(size)?.to_vec();
            if size % 2 == 1 && !section.at_end() {
                section.skip(1)?;
            }

            trace!("Image resource {} '{}': {} bytes", id, name, size);
            blocks.push(ImageResource {
                signature,
                id,
                name,
                data,
            });
        }

        debug!("Image resources: {} blocks", blocks.len());
        Ok(Self { blocks })
    }

    pub fn get(&self, id: u16) -> Option<&ImageResource> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.get(RESOURCE_ICC_PROFILE).map(|block| block.data.as_slice())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
