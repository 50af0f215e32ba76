//! Channel decoding for layers and the merged image

use log::{debug, trace};
use psd_compression::{decode_channel, decompress_planes, ChannelGeometry, Compression};
use psd_core::{ChannelId, ChannelIdInfo, ImageData, PsdError, PsdResult, Sample};
use psd_headers::{FileHeader, LayerInfo, LayerRecord, MergedImageData};
use rayon::prelude::*;

use crate::channel_store::ChannelStore;
use crate::options::ReadOptions;

/// One compressed channel waiting to be decoded
struct ChannelJob<'a> {
    layer: usize,
    info: ChannelIdInfo,
    span: &'a [u8],
    geometry: ChannelGeometry,
}

impl ChannelJob<'_> {
    fn run<T: Sample>(&self, records: &[LayerRecord]) -> PsdResult<Vec<T>> {
        decode_channel::<T>(self.span, &self.geometry).map_err(|err| match err {
            PsdError::CorruptChannelData(reason) => PsdError::CorruptChannelData(format!(
                "layer '{}', channel {:?}: {}",
                records[self.layer].display_name(),
                self.info.id,
                reason
            )),
            other => other,
        })
    }
}

/// Decode every layer channel and pair each record with its channel store
pub fn decode_layers<T: Sample>(
    info: LayerInfo<'_>,
    header: &FileHeader,
    options: &ReadOptions,
) -> PsdResult<Vec<(LayerRecord, ChannelStore<T>)>> {
    let LayerInfo {
        records,
        channel_data,
        ..
    } = info;

    let mut jobs = Vec::new();
    for (layer, (record, spans)) in records.iter().zip(&channel_data).enumerate() {
        for (channel, span) in record.channels.iter().zip(spans) {
            let extent = record.channel_extent(channel.info.id);
            jobs.push(ChannelJob {
                layer,
                info: channel.info,
                span: *span,
                geometry: ChannelGeometry::new(
                    extent.width(),
                    extent.height(),
                    header.depth,
                    header.version,
                ),
            });
        }
    }
    debug!(
        "Decoding {} channels of {} layers ({})",
        jobs.len(),
        records.len(),
        if options.parallel { "parallel" } else { "sequential" }
    );

    let decoded: Vec<PsdResult<Vec<T>>> = if options.parallel {
        jobs.par_iter().map(|job| job.run(&records)).collect()
    } else {
        jobs.iter().map(|job| job.run(&records)).collect()
    };

    let mut stores: Vec<ChannelStore<T>> = records
        .iter()
        .map(|record| ChannelStore::new(record.mask))
        .collect();
    for (job, result) in jobs.iter().zip(decoded) {
        let data = result?;
        trace!(
            "Layer {} channel {:?}: {} samples",
            job.layer,
            job.info.id,
            data.len()
        );
        if !data.is_empty() {
            stores[job.layer].insert(job.info, data);
        }
    }

    Ok(records.into_iter().zip(stores).collect())
}

/// The flattened composite stored after the layer section
#[derive(Debug, Clone, PartialEq)]
pub struct MergedImage<T> {
    pub width: u32,
    pub height: u32,
    channels: Vec<(ChannelIdInfo, Vec<T>)>,
}

impl<T: Sample> MergedImage<T> {
    pub fn decode(
        merged: &MergedImageData<'_>,
        header: &FileHeader,
        merged_alpha: bool,
    ) -> PsdResult<Self> {
        let compression = Compression::from_u16(merged.compression)?;
        let geometry =
            ChannelGeometry::new(header.width, header.height, header.depth, header.version);
        let planes =
            decompress_planes(compression, merged.data, &geometry, header.channels as usize)?;

        let color_channels = header.color_mode.color_channels();
        let channels = planes
            .into_iter()
            .enumerate()
            .map(|(index, bytes)| {
                let raw = index as i16;
                let info = if index < color_channels {
                    ChannelIdInfo::from_raw(raw, header.color_mode)
                } else if merged_alpha && index == color_channels {
                    ChannelIdInfo::new(ChannelId::Alpha, raw)
                } else {
                    ChannelIdInfo::new(ChannelId::Custom(raw), raw)
                };
                (info, T::decode_be(&bytes))
            })
            .collect();

        debug!(
            "Merged image: {} channels of {}x{}",
            header.channels, header.width, header.height
        );
        Ok(Self {
            width: header.width,
            height: header.height,
            channels,
        })
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = ChannelIdInfo> + '_ {
        self.channels.iter().map(|(info, _)| *info)
    }

    pub fn channel(&self, id: ChannelId) -> Option<&[T]> {
        self.channels
            .iter()
            .find(|(info, _)| info.id == id)
            .map(|(_, data)| data.as_slice())
    }

    pub fn get_channel(&self, id: ChannelId) -> PsdResult<Vec<T>> {
        self.channel(id)
            .map(<[T]>::to_vec)
            .ok_or(PsdError::ChannelNotFound(id))
    }

    pub fn get_image_data(&self) -> ImageData<T> {
        self.channels.iter().cloned().collect()
    }
}
