//! # PSD - layered Photoshop document reader
//!
//! Reads `.psd` and `.psb` files into a tree of typed layers whose channels
//! are decoded to `u8`, `u16` or `f32` samples, matching the document's bit
//! depth.
//!
//! ## Quick Start
//!
//! ```no_run
//! use psd::prelude::*;
//!
//! # fn main() -> psd::PsdResult<()> {
//! let file = LayeredFile::<u8>::read_file("input.psd")?;
//! let layer = file.find_layer_as::<ImageLayer<u8>>("Group/RedLayer")?;
//! let red = layer.get_channel(ChannelId::Red)?;
//! println!("{} red samples in {}x{}", red.len(), layer.width(), layer.height());
//! # Ok(())
//! # }
//! ```
//!
//! When the bit depth is not known up front:
//!
//! ```no_run
//! # fn main() -> psd::PsdResult<()> {
//! let data = std::fs::read("input.psd")?;
//! match psd::read_any(&data)? {
//!     psd::AnyLayeredFile::Eight(file) => println!("8-bit, {} layers", file.layer_count()),
//!     psd::AnyLayeredFile::Sixteen(file) => println!("16-bit, {} layers", file.layer_count()),
//!     psd::AnyLayeredFile::ThirtyTwo(file) => println!("32-bit, {} layers", file.layer_count()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - PSD and PSB (large document) variants
//! - Raw, RLE, zip and zip with prediction channel compression
//! - Group, adjustment, text and smart object layers
//! - Layer masks, synthesized from their default color when not stored
//! - Parallel channel decoding with rayon
//! - Optional `serde` support for the plain value types

pub use psd_core::{
    BitDepth, BlendMode, ChannelData, ChannelId, ChannelIdInfo, ColorMode, ImageData, PsdError,
    PsdResult, Rect, Sample, Version,
};

pub use psd_headers::{
    ColorModeData, FileHeader, ImageResource, ImageResources, MaskData, MaskParameters,
    RealUserMask, TaggedBlock,
};

pub use psd_decoder::{
    find_layer_as, read_any, AdjustmentKind, AdjustmentLayer, AnyLayeredFile, ChannelStore,
    GroupLayer, ImageLayer, Layer, LayerCommon, LayerData, LayerKind, LayerType, LayeredFile,
    MergedImage, ReadOptions, SmartObjectLayer, TextLayer,
};

/// The types and traits needed for everyday reading
pub mod prelude {
    pub use crate::{
        AnyLayeredFile, ChannelId, GroupLayer, ImageLayer, Layer, LayerData, LayerKind,
        LayeredFile, PsdError, PsdResult, ReadOptions,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
