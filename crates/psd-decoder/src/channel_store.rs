//! Decoded channels of a single layer

use psd_core::{ChannelId, ChannelIdInfo, ImageData, PsdError, PsdResult, Rect, Sample};
use psd_headers::MaskData;

/// Channel buffers of one layer, in file order, plus its mask descriptor.
///
/// A layer can describe a mask without storing pixels for it; such a mask
/// reads as a buffer of its bounds filled with the default color.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStore<T> {
    channels: Vec<(ChannelIdInfo, Vec<T>)>,
    mask: Option<MaskData>,
}

impl<T> Default for ChannelStore<T> {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            mask: None,
        }
    }
}

impl<T: Sample> ChannelStore<T> {
    pub fn new(mask: Option<MaskData>) -> Self {
        Self {
            channels: Vec::new(),
            mask,
        }
    }

    /// Add a decoded channel, replacing an earlier one with the same key
    pub fn insert(&mut self, info: ChannelIdInfo, data: Vec<T>) {
        match self.channels.iter_mut().find(|(key, _)| *key == info) {
            Some(entry) => entry.1 = data,
            None => self.channels.push((info, data)),
        }
    }

    /// Keys of the stored channels in file order
    pub fn channel_ids(&self) -> impl Iterator<Item = ChannelIdInfo> + '_ {
        self.channels.iter().map(|(info, _)| *info)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Borrow the stored pixels of a channel. Masks are not synthesized here.
    pub fn channel(&self, id: ChannelId) -> Option<&[T]> {
        self.channels
            .iter()
            .find(|(info, data)| info.id == id && !data.is_empty())
            .map(|(_, data)| data.as_slice())
    }

    /// Copy out a channel, synthesizing a mask that has no stored pixels
    pub fn get_channel(&self, id: ChannelId) -> PsdResult<Vec<T>> {
        if let Some(data) = self.channel(id) {
            return Ok(data.to_vec());
        }
        match id {
            ChannelId::UserMask | ChannelId::RealUserMask => self
                .synthesized_mask(id)
                .ok_or(PsdError::ChannelNotFound(id)),
            _ => Err(PsdError::ChannelNotFound(id)),
        }
    }

    /// Every channel keyed by its id, masks included
    pub fn get_image_data(&self) -> ImageData<T> {
        let mut image: ImageData<T> = self
            .channels
            .iter()
            .filter(|(info, data)| !(info.id.is_mask() && data.is_empty()))
            .map(|(info, data)| (*info, data.clone()))
            .collect();

        if self.mask.is_some() && self.channel(ChannelId::UserMask).is_none() {
            let key = self
                .channels
                .iter()
                .map(|(info, _)| *info)
                .find(|info| info.id == ChannelId::UserMask)
                .unwrap_or(ChannelIdInfo::new(ChannelId::UserMask, -2));
            image.insert(key, self.get_mask());
        }
        image
    }

    /// Pixels of the layer mask, empty when the layer has none
    pub fn get_mask(&self) -> Vec<T> {
        if self.mask.is_none() {
            return Vec::new();
        }
        self.get_channel(ChannelId::UserMask).unwrap_or_default()
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    pub fn mask(&self) -> Option<&MaskData> {
        self.mask.as_ref()
    }

    pub fn mask_default_color(&self) -> Option<u8> {
        self.mask.map(|mask| mask.default_color)
    }

    fn synthesized_mask(&self, id: ChannelId) -> Option<Vec<T>> {
        let mask = self.mask?;
        let (bounds, color): (Rect, u8) = match id {
            ChannelId::RealUserMask => {
                let real = mask.real?;
                (real.bounds, real.default_color)
            }
            _ => (mask.bounds, mask.default_color),
        };
        Some(vec![T::from_mask_color(color); bounds.pixel_count()])
    }
}
