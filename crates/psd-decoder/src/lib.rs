//! PSD/PSB layer decoding
//!
//! Turns the flat record list parsed by `psd-headers` into a tree of typed
//! layers whose channels are decoded to samples of the document's bit depth.

pub mod channel_store;
pub mod decode;
pub mod layer;
pub mod layered_file;
pub mod options;
pub mod tree;

pub use channel_store::ChannelStore;
pub use decode::{decode_layers, MergedImage};
pub use layer::{
    AdjustmentKind, AdjustmentLayer, GroupLayer, ImageLayer, Layer, LayerCommon, LayerData,
    LayerKind, LayerType, SmartObjectLayer, TextLayer,
};
pub use layered_file::{find_layer_as, read_any, AnyLayeredFile, FlatLayers, LayeredFile};
pub use options::ReadOptions;
pub use tree::build_tree;
