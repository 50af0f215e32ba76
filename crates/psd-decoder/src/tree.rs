//! Layer tree construction from the flat record list

use log::trace;
use psd_core::{PsdError, PsdResult, Sample};
use psd_headers::{DividerType, LayerRecord};

use crate::channel_store::ChannelStore;
use crate::layer::{GroupLayer, Layer, LayerCommon};

/// A group whose start marker has been seen but not its end marker
struct Frame<T> {
    record: LayerRecord,
    channels: ChannelStore<T>,
    children: Vec<Layer<T>>,
}

impl<T: Sample> Frame<T> {
    fn into_group(self) -> Layer<T> {
        let is_open = self
            .record
            .divider
            .map(|divider| divider.divider_type == DividerType::OpenFolder)
            .unwrap_or(false);
        let blend_override = self.record.divider.and_then(|divider| divider.blend_mode);

        let mut common = LayerCommon::from_record(self.record, self.channels);
        if let Some(blend_mode) = blend_override {
            common.blend_mode = blend_mode;
        }
        Layer::Group(GroupLayer {
            common,
            children: self.children,
            is_open,
        })
    }
}

/// Build the layer tree.
///
/// `layers` are in file order, bottom-most first. They are visited top-most
/// first: an open or closed folder divider starts a group, a bounding section
/// divider closes the innermost open one.
pub fn build_tree<T: Sample>(
    layers: Vec<(LayerRecord, ChannelStore<T>)>,
) -> PsdResult<Vec<Layer<T>>> {
    let mut root: Vec<Layer<T>> = Vec::new();
    let mut stack: Vec<Frame<T>> = Vec::new();

    for (record, channels) in layers.into_iter().rev() {
        let divider = record.divider.map(|divider| divider.divider_type);
        match divider {
            Some(kind) if kind.is_group_start() => {
                trace!("Group '{}' opened at depth {}", record.display_name(), stack.len());
                stack.push(Frame {
                    record,
                    channels,
                    children: Vec::new(),
                });
            }
            Some(kind) if kind.is_group_end() => {
                let frame = stack.pop().ok_or_else(|| {
                    PsdError::CorruptGroupStructure(format!(
                        "group end marker '{}' at offset {} has no open group",
                        record.display_name(),
                        record.offset
                    ))
                })?;
                trace!("Group '{}' closed", frame.record.display_name());
                let group = frame.into_group();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(group),
                    None => root.push(group),
                }
            }
            _ => {
                let layer = Layer::leaf(record, channels);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(layer),
                    None => root.push(layer),
                }
            }
        }
    }

    if let Some(frame) = stack.last() {
        return Err(PsdError::CorruptGroupStructure(format!(
            "{} group(s) never closed, innermost '{}'",
            stack.len(),
            frame.record.display_name()
        )));
    }

    assign_addresses(&mut root, &mut Vec::new());
    Ok(root)
}

fn assign_addresses<T: Sample>(layers: &mut [Layer<T>], prefix: &mut Vec<usize>) {
    for (index, layer) in layers.iter_mut().enumerate() {
        prefix.push(index);
        layer.common_mut().address = prefix.clone();
        if let Layer::Group(group) = layer {
            assign_addresses(&mut group.children, prefix);
        }
        prefix.pop();
    }
}
