//! Channel buffer aliases shared by the decoder and its callers

use std::collections::HashMap;

use crate::ChannelIdInfo;

/// One decoded channel plane, row-major, `width * height` samples
pub type ChannelData<T> = Vec<T>;

/// Every channel of a layer keyed by its channel info
pub type ImageData<T> = HashMap<ChannelIdInfo, ChannelData<T>>;
