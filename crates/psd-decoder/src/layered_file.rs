//! Layered document: the decoded layer tree plus document level data

use std::any::Any;
use std::path::Path;

use log::{debug, info};
use psd_core::{BitDepth, ColorMode, PsdError, PsdResult, Sample, Version};
use psd_headers::{ColorModeData, FileHeader, ImageResources, PhotoshopFile, TaggedBlock};

use crate::decode::{decode_layers, MergedImage};
use crate::layer::{GroupLayer, Layer, LayerData, LayerKind};
use crate::options::ReadOptions;
use crate::tree::build_tree;

/// A fully decoded document whose samples are of type `T`
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredFile<T> {
    header: FileHeader,
    color_mode_data: ColorModeData,
    image_resources: ImageResources,
    layers: Vec<Layer<T>>,
    merged_image: Option<MergedImage<T>>,
    merged_alpha: bool,
    global_mask: Vec<u8>,
    tagged_blocks: Vec<TaggedBlock>,
}

impl<T: Sample> LayeredFile<T> {
    pub fn read(data: &[u8]) -> PsdResult<Self> {
        Self::read_with_options(data, &ReadOptions::default())
    }

    pub fn read_with_options(data: &[u8], options: &ReadOptions) -> PsdResult<Self> {
        Self::from_document(PhotoshopFile::parse(data)?, options)
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> PsdResult<Self> {
        let data = std::fs::read(path)?;
        Self::read(&data)
    }

    /// Decode a parsed document. Fails with `TypeMismatch` when `T` does not
    /// match the document bit depth.
    pub fn from_document(document: PhotoshopFile<'_>, options: &ReadOptions) -> PsdResult<Self> {
        let header = document.header;
        if header.depth != T::BIT_DEPTH {
            return Err(PsdError::TypeMismatch {
                expected: T::BIT_DEPTH.type_name(),
                found: header.depth.type_name(),
            });
        }

        let layer_and_mask = document.layer_and_mask;
        let merged_alpha = layer_and_mask.layer_info.merged_alpha;
        let decoded = decode_layers::<T>(layer_and_mask.layer_info, &header, options)?;
        let record_count = decoded.len();
        let layers = build_tree(decoded)?;

        let merged_image = match (&document.merged_image, options.decode_merged_image) {
            (Some(merged), true) => Some(MergedImage::decode(merged, &header, merged_alpha)?),
            _ => None,
        };

        let file = Self {
            header,
            color_mode_data: document.color_mode_data,
            image_resources: document.image_resources,
            layers,
            merged_image,
            merged_alpha,
            global_mask: layer_and_mask.global_mask,
            tagged_blocks: layer_and_mask.tagged_blocks,
        };
        info!(
            "Read {:?} {}x{} {}-bit {:?} document: {} records, {} top-level layers",
            header.version,
            header.width,
            header.height,
            header.depth.bits(),
            header.color_mode,
            record_count,
            file.layers.len()
        );
        Ok(file)
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn version(&self) -> Version {
        self.header.version
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.header.depth
    }

    pub fn color_mode(&self) -> ColorMode {
        self.header.color_mode
    }

    pub fn color_mode_data(&self) -> &ColorModeData {
        &self.color_mode_data
    }

    pub fn image_resources(&self) -> &ImageResources {
        &self.image_resources
    }

    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.image_resources.icc_profile()
    }

    pub fn merged_image(&self) -> Option<&MergedImage<T>> {
        self.merged_image.as_ref()
    }

    /// True when the first extra channel of the merged image is its
    /// transparency
    pub fn has_merged_alpha(&self) -> bool {
        self.merged_alpha
    }

    /// Global layer mask info, raw
    pub fn global_mask(&self) -> &[u8] {
        &self.global_mask
    }

    /// Document level tagged blocks
    pub fn tagged_blocks(&self) -> &[TaggedBlock] {
        &self.tagged_blocks
    }

    /// Top-level layers, top-most first
    pub fn layers(&self) -> &[Layer<T>] {
        &self.layers
    }

    /// Every layer, depth first, each group before its children
    pub fn flat_layers(&self) -> FlatLayers<'_, T> {
        FlatLayers {
            stack: vec![self.layers.iter()],
        }
    }

    pub fn layer_count(&self) -> usize {
        self.flat_layers().count()
    }

    /// Layer at an index path
    pub fn layer_at(&self, address: &[usize]) -> Option<&Layer<T>> {
        let (first, rest) = address.split_first()?;
        let mut layer = self.layers.get(*first)?;
        for index in rest {
            layer = layer.children().get(*index)?;
        }
        Some(layer)
    }

    /// Group containing `layer`, `None` at the top level
    pub fn parent(&self, layer: &Layer<T>) -> Option<&GroupLayer<T>> {
        let address = layer.common().address();
        let parent = address.split_last().map(|(_, parent)| parent)?;
        match self.layer_at(parent)? {
            Layer::Group(group) => Some(group),
            _ => None,
        }
    }

    /// `/`-joined names from the top level down to `layer`
    pub fn layer_path(&self, layer: &Layer<T>) -> String {
        let address = layer.common().address();
        (1..=address.len())
            .filter_map(|depth| self.layer_at(&address[..depth]))
            .map(|layer| layer.name())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Resolve a `/`-separated path of layer names from the top level.
    ///
    /// Names are compared exactly. When siblings share a name the search
    /// backtracks, returning the first match in depth-first order.
    pub fn find_layer(&self, path: &str) -> PsdResult<&Layer<T>> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(PsdError::LayerNotFound(path.to_string()));
        }
        let found = find_in(&self.layers, &segments);
        debug!("find_layer '{}': {}", path, found.is_some());
        found.ok_or_else(|| PsdError::LayerNotFound(path.to_string()))
    }

    /// [`LayeredFile::find_layer`], then check the layer's kind
    pub fn find_layer_as<K: LayerKind<T>>(&self, path: &str) -> PsdResult<&K> {
        let layer = self.find_layer(path)?;
        K::from_layer(layer).ok_or(PsdError::TypeMismatch {
            expected: K::LAYER_TYPE.name(),
            found: layer.layer_type().name(),
        })
    }
}

fn find_in<'a, T: Sample>(layers: &'a [Layer<T>], segments: &[&str]) -> Option<&'a Layer<T>> {
    let (first, rest) = segments.split_first()?;
    layers
        .iter()
        .filter(|layer| layer.name() == *first)
        .find_map(|layer| {
            if rest.is_empty() {
                Some(layer)
            } else {
                find_in(layer.children(), rest)
            }
        })
}

/// Look up a layer of a given kind in `file`
pub fn find_layer_as<'a, T: Sample, K: LayerKind<T>>(
    path: &str,
    file: &'a LayeredFile<T>,
) -> PsdResult<&'a K> {
    file.find_layer_as::<K>(path)
}

/// Depth-first iterator over a layer tree
pub struct FlatLayers<'a, T> {
    stack: Vec<std::slice::Iter<'a, Layer<T>>>,
}

impl<'a, T> Iterator for FlatLayers<'a, T> {
    type Item = &'a Layer<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(layer) => {
                    if let Layer::Group(group) = layer {
                        self.stack.push(group.children.iter());
                    }
                    return Some(layer);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A document of whichever bit depth the file declares
#[derive(Debug, Clone, PartialEq)]
pub enum AnyLayeredFile {
    Eight(LayeredFile<u8>),
    Sixteen(LayeredFile<u16>),
    ThirtyTwo(LayeredFile<f32>),
}

impl AnyLayeredFile {
    pub fn read(data: &[u8]) -> PsdResult<Self> {
        Self::read_with_options(data, &ReadOptions::default())
    }

    pub fn read_with_options(data: &[u8], options: &ReadOptions) -> PsdResult<Self> {
        let document = PhotoshopFile::parse(data)?;
        Ok(match document.header.depth {
            BitDepth::Eight => Self::Eight(LayeredFile::from_document(document, options)?),
            BitDepth::Sixteen => Self::Sixteen(LayeredFile::from_document(document, options)?),
            BitDepth::ThirtyTwo => Self::ThirtyTwo(LayeredFile::from_document(document, options)?),
        })
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> PsdResult<Self> {
        let data = std::fs::read(path)?;
        Self::read(&data)
    }

    pub fn header(&self) -> &FileHeader {
        match self {
            Self::Eight(file) => file.header(),
            Self::Sixteen(file) => file.header(),
            Self::ThirtyTwo(file) => file.header(),
        }
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.header().depth
    }

    /// The document as `LayeredFile<T>`, `TypeMismatch` for any other `T`
    pub fn as_file<T: Sample>(&self) -> PsdResult<&LayeredFile<T>> {
        let file: &dyn Any = match self {
            Self::Eight(file) => file as &dyn Any,
            Self::Sixteen(file) => file as &dyn Any,
            Self::ThirtyTwo(file) => file as &dyn Any,
        };
        file.downcast_ref::<LayeredFile<T>>()
            .ok_or(PsdError::TypeMismatch {
                expected: T::BIT_DEPTH.type_name(),
                found: self.bit_depth().type_name(),
            })
    }

    pub fn find_layer_as<T: Sample, K: LayerKind<T>>(&self, path: &str) -> PsdResult<&K> {
        self.as_file::<T>()?.find_layer_as::<K>(path)
    }
}

impl From<LayeredFile<u8>> for AnyLayeredFile {
    fn from(file: LayeredFile<u8>) -> Self {
        Self::Eight(file)
    }
}

impl From<LayeredFile<u16>> for AnyLayeredFile {
    fn from(file: LayeredFile<u16>) -> Self {
        Self::Sixteen(file)
    }
}

impl From<LayeredFile<f32>> for AnyLayeredFile {
    fn from(file: LayeredFile<f32>) -> Self {
        Self::ThirtyTwo(file)
    }
}

/// Read a document without knowing its bit depth up front
pub fn read_any(data: &[u8]) -> PsdResult<AnyLayeredFile> {
    AnyLayeredFile::read(data)
}
