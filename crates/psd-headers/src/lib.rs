//! PSD/PSB header, resource and layer record parsing
//!
//! Everything up to (but not including) decoding channel pixels lives here: the
//! file header, color mode data, image resources, the flat list of layer records
//! with their masks, tagged blocks and section dividers, and the spans of
//! compressed channel data that the decoder turns into pixels.

pub mod document;
pub mod header;
pub mod layer_info;
pub mod layer_record;
pub mod mask;
pub mod resources;
pub mod tagged_block;

pub use document::{MergedImageData, PhotoshopFile};
pub use header::FileHeader;
pub use layer_info::{LayerAndMaskInfo, LayerInfo};
pub use layer_record::{ChannelInfo, LayerFlags, LayerRecord};
pub use mask::{MaskData, MaskParameters, RealUserMask};
pub use resources::{ColorModeData, ImageResource, ImageResources};
pub use tagged_block::{
    read_tagged_blocks, DividerType, RawTaggedBlock, SectionDivider, TaggedBlock,
};
