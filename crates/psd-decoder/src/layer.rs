//! Layer tree nodes

use psd_core::consts::DEFAULT_MASK_COLOR;
use psd_core::{BlendMode, ChannelId, ChannelIdInfo, ImageData, PsdResult, Rect, Sample};
use psd_headers::{LayerFlags, LayerRecord, MaskData, TaggedBlock};

use crate::channel_store::ChannelStore;

/// Properties shared by every kind of layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCommon<T> {
    pub name: String,
    pub bounds: Rect,
    pub blend_mode: BlendMode,
    pub opacity: u8,
    pub visible: bool,
    pub clipping: bool,
    pub flags: LayerFlags,
    pub layer_id: Option<u32>,
    pub protection_flags: Option<u32>,
    pub blending_ranges: Vec<u8>,
    pub channels: ChannelStore<T>,
    /// Unrecognised tagged blocks, kept raw
    pub tagged_blocks: Vec<TaggedBlock>,
    /// Index path from the root, the last entry being this layer's position
    /// among its siblings
    pub(crate) address: Vec<usize>,
}

impl<T: Sample> LayerCommon<T> {
    pub(crate) fn from_record(record: LayerRecord, channels: ChannelStore<T>) -> Self {
        let visible = record.is_visible();
        let name = match record.unicode_name {
            Some(name) => name,
            None => record.name,
        };
        Self {
            name,
            bounds: record.bounds,
            blend_mode: record.blend_mode,
            opacity: record.opacity,
            visible,
            clipping: record.clipping,
            flags: record.flags,
            layer_id: record.layer_id,
            protection_flags: record.protection_flags,
            blending_ranges: record.blending_ranges,
            channels,
            tagged_blocks: record.tagged_blocks,
            address: Vec::new(),
        }
    }

    pub fn address(&self) -> &[usize] {
        &self.address
    }
}

/// Kind of layer, named for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Image,
    Group,
    Adjustment,
    Text,
    SmartObject,
}

impl LayerType {
    pub fn name(&self) -> &'static str {
        match self {
            LayerType::Image => "ImageLayer",
            LayerType::Group => "GroupLayer",
            LayerType::Adjustment => "AdjustmentLayer",
            LayerType::Text => "TextLayer",
            LayerType::SmartObject => "SmartObjectLayer",
        }
    }
}

/// Adjustment or fill applied by an adjustment layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustmentKind {
    Levels,
    Curves,
    BrightnessContrast,
    ColorBalance,
    HueSaturation,
    SelectiveColor,
    ChannelMixer,
    GradientMap,
    Threshold,
    Invert,
    Posterize,
    Exposure,
    Vibrance,
    PhotoFilter,
    ColorLookup,
    BlackAndWhite,
    SolidColor,
    GradientFill,
    PatternFill,
}

impl AdjustmentKind {
    const KEYS: [(&'static [u8; 4], AdjustmentKind); 20] = [
        (b"levl", AdjustmentKind::Levels),
        (b"curv", AdjustmentKind::Curves),
        (b"brit", AdjustmentKind::BrightnessContrast),
        (b"CgEd", AdjustmentKind::BrightnessContrast),
        (b"blnc", AdjustmentKind::ColorBalance),
        (b"hue2", AdjustmentKind::HueSaturation),
        (b"selc", AdjustmentKind::SelectiveColor),
        (b"mixr", AdjustmentKind::ChannelMixer),
        (b"grdm", AdjustmentKind::GradientMap),
        (b"thrs", AdjustmentKind::Threshold),
        (b"nvrt", AdjustmentKind::Invert),
        (b"post", AdjustmentKind::Posterize),
        (b"expA", AdjustmentKind::Exposure),
        (b"vibA", AdjustmentKind::Vibrance),
        (b"phfl", AdjustmentKind::PhotoFilter),
        (b"clrL", AdjustmentKind::ColorLookup),
        (b"blwh", AdjustmentKind::BlackAndWhite),
        (b"SoCo", AdjustmentKind::SolidColor),
        (b"GdFl", AdjustmentKind::GradientFill),
        (b"PtFl", AdjustmentKind::PatternFill),
    ];

    pub fn from_key(key: &[u8; 4]) -> Option<Self> {
        Self::KEYS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, kind)| *kind)
    }

    /// First adjustment block found on a record
    pub fn detect(record: &LayerRecord) -> Option<Self> {
        record
            .tagged_blocks
            .iter()
            .find_map(|block| Self::from_key(&block.key))
    }

    pub fn is_fill(&self) -> bool {
        matches!(
            self,
            AdjustmentKind::SolidColor | AdjustmentKind::GradientFill | AdjustmentKind::PatternFill
        )
    }
}

const TEXT_KEY: &[u8; 4] = b"TySh";
const SMART_OBJECT_KEYS: [&[u8; 4]; 3] = [b"SoLd", b"PlLd", b"SoLE"];

#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer<T> {
    pub common: LayerCommon<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupLayer<T> {
    pub common: LayerCommon<T>,
    /// Children, top-most first
    pub children: Vec<Layer<T>>,
    /// Folder expanded in the layers panel
    pub is_open: bool,
}

impl<T> GroupLayer<T> {
    pub fn children(&self) -> &[Layer<T>] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentLayer<T> {
    pub common: LayerCommon<T>,
    pub kind: AdjustmentKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer<T> {
    pub common: LayerCommon<T>,
}

impl<T: Sample> TextLayer<T> {
    /// Raw type tool descriptor
    pub fn text_data(&self) -> Option<&[u8]> {
        self.tagged_block(TEXT_KEY).map(|block| block.data.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmartObjectLayer<T> {
    pub common: LayerCommon<T>,
}

impl<T: Sample> SmartObjectLayer<T> {
    /// Raw placed layer descriptor
    pub fn placed_data(&self) -> Option<&[u8]> {
        SMART_OBJECT_KEYS
            .iter()
            .find_map(|key| self.tagged_block(key))
            .map(|block| block.data.as_slice())
    }
}

/// A node of the layer tree
#[derive(Debug, Clone, PartialEq)]
pub enum Layer<T> {
    Image(ImageLayer<T>),
    Group(GroupLayer<T>),
    Adjustment(AdjustmentLayer<T>),
    Text(TextLayer<T>),
    SmartObject(SmartObjectLayer<T>),
}

impl<T: Sample> Layer<T> {
    /// Build a leaf layer, picking its kind from the record's tagged blocks
    pub(crate) fn leaf(record: LayerRecord, channels: ChannelStore<T>) -> Self {
        let text = record.has_block(TEXT_KEY);
        let smart = SMART_OBJECT_KEYS.iter().any(|key| record.has_block(key));
        let adjustment = AdjustmentKind::detect(&record);
        let common = LayerCommon::from_record(record, channels);

        if text {
            Layer::Text(TextLayer { common })
        } else if smart {
            Layer::SmartObject(SmartObjectLayer { common })
        } else if let Some(kind) = adjustment {
            Layer::Adjustment(AdjustmentLayer { common, kind })
        } else {
            Layer::Image(ImageLayer { common })
        }
    }

    pub fn layer_type(&self) -> LayerType {
        match self {
            Layer::Image(_) => LayerType::Image,
            Layer::Group(_) => LayerType::Group,
            Layer::Adjustment(_) => LayerType::Adjustment,
            Layer::Text(_) => LayerType::Text,
            Layer::SmartObject(_) => LayerType::SmartObject,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Layer::Group(_))
    }

    /// Children of a group, empty for any other layer
    pub fn children(&self) -> &[Layer<T>] {
        match self {
            Layer::Group(group) => &group.children,
            _ => &[],
        }
    }

    pub fn as_kind<K: LayerKind<T>>(&self) -> Option<&K> {
        K::from_layer(self)
    }

    pub(crate) fn common_mut(&mut self) -> &mut LayerCommon<T> {
        match self {
            Layer::Image(layer) => &mut layer.common,
            Layer::Group(layer) => &mut layer.common,
            Layer::Adjustment(layer) => &mut layer.common,
            Layer::Text(layer) => &mut layer.common,
            Layer::SmartObject(layer) => &mut layer.common,
        }
    }
}

/// Read access shared by every layer kind
pub trait LayerData<T: Sample> {
    fn common(&self) -> &LayerCommon<T>;

    fn name(&self) -> &str {
        &self.common().name
    }

    fn bounds(&self) -> Rect {
        self.common().bounds
    }

    fn width(&self) -> u32 {
        self.common().bounds.width()
    }

    fn height(&self) -> u32 {
        self.common().bounds.height()
    }

    fn blend_mode(&self) -> BlendMode {
        self.common().blend_mode
    }

    fn opacity(&self) -> u8 {
        self.common().opacity
    }

    fn is_visible(&self) -> bool {
        self.common().visible
    }

    fn clipping(&self) -> bool {
        self.common().clipping
    }

    fn layer_id(&self) -> Option<u32> {
        self.common().layer_id
    }

    fn channels(&self) -> &ChannelStore<T> {
        &self.common().channels
    }

    fn channel_ids(&self) -> Vec<ChannelIdInfo> {
        self.channels().channel_ids().collect()
    }

    fn get_channel(&self, id: ChannelId) -> PsdResult<Vec<T>> {
        self.channels().get_channel(id)
    }

    fn get_image_data(&self) -> ImageData<T> {
        self.channels().get_image_data()
    }

    fn get_mask(&self) -> Vec<T> {
        self.channels().get_mask()
    }

    fn has_mask(&self) -> bool {
        self.channels().has_mask()
    }

    fn mask(&self) -> Option<&MaskData> {
        self.channels().mask()
    }

    /// Default mask color, 0 for layers without a mask
    fn mask_default_color(&self) -> u8 {
        self.channels()
            .mask_default_color()
            .unwrap_or(DEFAULT_MASK_COLOR)
    }

    fn tagged_block(&self, key: &[u8; 4]) -> Option<&TaggedBlock> {
        self.common()
            .tagged_blocks
            .iter()
            .find(|block| &block.key == key)
    }
}

/// A concrete layer kind that can be picked out of a [`Layer`]
pub trait LayerKind<T: Sample>: LayerData<T> + Sized {
    const LAYER_TYPE: LayerType;

    fn from_layer(layer: &Layer<T>) -> Option<&Self>;
}

impl<T: Sample> LayerData<T> for Layer<T> {
    fn common(&self) -> &LayerCommon<T> {
        match self {
            Layer::Image(layer) => &layer.common,
            Layer::Group(layer) => &layer.common,
            Layer::Adjustment(layer) => &layer.common,
            Layer::Text(layer) => &layer.common,
            Layer::SmartObject(layer) => &layer.common,
        }
    }
}

macro_rules! layer_kind {
    ($kind:ident, $variant:ident) => {
        impl<T: Sample> LayerData<T> for $kind<T> {
            fn common(&self) -> &LayerCommon<T> {
                &self.common
            }
        }

        impl<T: Sample> LayerKind<T> for $kind<T> {
            const LAYER_TYPE: LayerType = LayerType::$variant;

            fn from_layer(layer: &Layer<T>) -> Option<&Self> {
                match layer {
                    Layer::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

layer_kind!(ImageLayer, Image);
layer_kind!(GroupLayer, Group);
layer_kind!(AdjustmentLayer, Adjustment);
layer_kind!(TextLayer, Text);
layer_kind!(SmartObjectLayer, SmartObject);
