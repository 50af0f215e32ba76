//! In-memory builder for synthetic PSD/PSB documents

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

pub const PSD: u16 = 1;
pub const PSB: u16 = 2;

pub const GRAYSCALE: u16 = 1;
pub const RGB: u16 = 3;
pub const CMYK: u16 = 4;

pub const OPEN_FOLDER: u32 = 1;
pub const CLOSED_FOLDER: u32 = 2;
pub const BOUNDING_SECTION: u32 = 3;

/// Channel compression used when encoding a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    Rle,
    Zip,
    ZipPrediction,
}

/// Encode a channel plane as a layer channel span, compression code included
pub fn encode_channel(
    encoding: Encoding,
    plane: &[u8],
    width: usize,
    height: usize,
    bytes_per_sample: usize,
    version: u16,
) -> Vec<u8> {
    let row_bytes = width * bytes_per_sample;
    let mut out = Vec::new();
    match encoding {
        Encoding::Raw => {
            out.extend_from_slice(&0u16.to_be_bytes());
            out.extend_from_slice(plane);
        }
        Encoding::Rle => {
            out.extend_from_slice(&1u16.to_be_bytes());
            out.extend(rle_body(plane, row_bytes, height, version));
        }
        Encoding::Zip => {
            out.extend_from_slice(&2u16.to_be_bytes());
            out.extend(deflate(plane));
        }
        Encoding::ZipPrediction => {
            out.extend_from_slice(&3u16.to_be_bytes());
            out.extend(deflate(&predict(plane, width, height, bytes_per_sample)));
        }
    }
    out
}

/// Row count table followed by the PackBits rows
pub fn rle_body(plane: &[u8], row_bytes: usize, rows: usize, version: u16) -> Vec<u8> {
    let packed: Vec<Vec<u8>> = (0..rows)
        .map(|row| packbits(&plane[row * row_bytes..(row + 1) * row_bytes]))
        .collect();
    let mut out = Vec::new();
    for row in &packed {
        if version == PSB {
            out.extend_from_slice(&(row.len() as u32).to_be_bytes());
        } else {
            out.extend_from_slice(&(row.len() as u16).to_be_bytes());
        }
    }
    for row in packed {
        out.extend(row);
    }
    out
}

/// PackBits: runs of three or more equal bytes are repeats, the rest literals
pub fn packbits(row: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut literal: Vec<u8> = Vec::new();
    let mut i = 0;

    let flush = |literal: &mut Vec<u8>, out: &mut Vec<u8>| {
        for chunk in literal.chunks(128) {
            out.push((chunk.len() - 1) as u8);
            out.extend_from_slice(chunk);
        }
        literal.clear();
    };

    while i < row.len() {
        let mut run = 1;
        while i + run < row.len() && row[i + run] == row[i] && run < 128 {
            run += 1;
        }
        if run >= 3 {
            flush(&mut literal, &mut out);
            out.push((1 - run as i16) as i8 as u8);
            out.push(row[i]);
            i += run;
        } else {
            literal.push(row[i]);
            i += 1;
        }
    }
    flush(&mut literal, &mut out);
    out
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Forward per-row delta prediction
pub fn predict(plane: &[u8], width: usize, height: usize, bytes_per_sample: usize) -> Vec<u8> {
    let row_bytes = width * bytes_per_sample;
    let mut out = Vec::with_capacity(plane.len());
    for row in plane.chunks_exact(row_bytes).take(height) {
        match bytes_per_sample {
            1 => byte_delta(row, &mut out),
            2 => {
                let mut previous = 0u16;
                for sample in row.chunks_exact(2) {
                    let value = u16::from_be_bytes([sample[0], sample[1]]);
                    out.extend_from_slice(&value.wrapping_sub(previous).to_be_bytes());
                    previous = value;
                }
            }
            _ => {
                let mut planar = vec![0u8; row_bytes];
                for x in 0..width {
                    for plane in 0..4 {
                        planar[plane * width + x] = row[x * 4 + plane];
                    }
                }
                byte_delta(&planar, &mut out);
            }
        }
    }
    out
}

fn byte_delta(row: &[u8], out: &mut Vec<u8>) {
    let mut previous = 0u8;
    for &byte in row {
        out.push(byte.wrapping_sub(previous));
        previous = byte;
    }
}

pub fn be_u16(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

pub fn be_f32(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Layer mask sub-record
#[derive(Debug, Clone)]
pub struct MaskSpec {
    pub bounds: [i32; 4],
    pub default_color: u8,
    pub flags: u8,
    /// Bounds and default color of the real user mask
    pub real: Option<([i32; 4], u8)>,
    /// User mask density parameter
    pub density: Option<u8>,
}

impl MaskSpec {
    fn record(&self) -> Vec<u8> {
        let mut flags = self.flags;
        if self.density.is_some() {
            flags |= 0x10;
        }
        let mut out: Vec<u8> = self.bounds.iter().flat_map(|v| v.to_be_bytes()).collect();
        out.extend_from_slice(&[self.default_color, flags]);
        match self.real {
            Some((bounds, color)) => {
                out.extend_from_slice(&[0, color]);
                out.extend(bounds.iter().flat_map(|v| v.to_be_bytes()));
            }
            None if self.density.is_none() => out.extend_from_slice(&[0, 0]),
            None => {}
        }
        if let Some(density) = self.density {
            out.extend_from_slice(&[1, density]);
        }
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }
}

/// One layer record, its tagged blocks and its encoded channel spans
#[derive(Debug, Clone)]
pub struct LayerSpec {
    pub name: String,
    pub bounds: [i32; 4],
    pub blend_key: [u8; 4],
    pub opacity: u8,
    pub flags: u8,
    /// Raw channel id and the full span, compression code included
    pub channels: Vec<(i16, Vec<u8>)>,
    pub mask: Option<MaskSpec>,
    pub blocks: Vec<([u8; 4], Vec<u8>)>,
}

impl LayerSpec {
    pub fn new(name: &str, bounds: [i32; 4]) -> Self {
        Self {
            name: name.to_string(),
            bounds,
            blend_key: *b"norm",
            opacity: 255,
            flags: 0,
            channels: Vec::new(),
            mask: None,
            blocks: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        (self.bounds[3] - self.bounds[1]) as usize
    }

    pub fn height(&self) -> usize {
        (self.bounds[2] - self.bounds[0]) as usize
    }

    pub fn channel(mut self, id: i16, span: Vec<u8>) -> Self {
        self.channels.push((id, span));
        self
    }

    /// Raw 8-bit channel filled with `value`
    pub fn filled(self, id: i16, value: u8) -> Self {
        let plane = vec![value; self.width() * self.height()];
        let mut span = 0u16.to_be_bytes().to_vec();
        span.extend(plane);
        self.channel(id, span)
    }

    pub fn mask(mut self, bounds: [i32; 4], default_color: u8) -> Self {
        self.mask = Some(MaskSpec {
            bounds,
            default_color,
            flags: 0,
            real: None,
            density: None,
        });
        self
    }

    /// Attach a real user mask to the mask set by `mask`
    pub fn real_mask(mut self, bounds: [i32; 4], default_color: u8) -> Self {
        if let Some(mask) = &mut self.mask {
            mask.real = Some((bounds, default_color));
        }
        self
    }

    pub fn mask_density(mut self, density: u8) -> Self {
        if let Some(mask) = &mut self.mask {
            mask.density = Some(density);
        }
        self
    }

    pub fn block(mut self, key: &[u8; 4], data: Vec<u8>) -> Self {
        self.blocks.push((*key, data));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.flags |= 0x02;
        self
    }

    pub fn blend(mut self, key: &[u8; 4]) -> Self {
        self.blend_key = *key;
        self
    }

    pub fn unicode_name(self, name: &str) -> Self {
        let units: Vec<u16> = name.encode_utf16().collect();
        let mut data = (units.len() as u32).to_be_bytes().to_vec();
        data.extend(be_u16(&units));
        self.block(b"luni", data)
    }

    pub fn divider(self, kind: u32) -> Self {
        self.block(b"lsct", kind.to_be_bytes().to_vec())
    }

    fn record(&self, version: u16) -> Vec<u8> {
        let mut out: Vec<u8> = self.bounds.iter().flat_map(|v| v.to_be_bytes()).collect();
        out.extend_from_slice(&(self.channels.len() as u16).to_be_bytes());
        for (id, span) in &self.channels {
            out.extend_from_slice(&id.to_be_bytes());
            push_length(&mut out, span.len() as u64, version);
        }
        out.extend_from_slice(b"8BIM");
        out.extend_from_slice(&self.blend_key);
        out.extend_from_slice(&[self.opacity, 0, self.flags, 0]);

        let mut extra = Vec::new();
        match &self.mask {
            Some(mask) => {
                let record = mask.record();
                extra.extend_from_slice(&(record.len() as u32).to_be_bytes());
                extra.extend(record);
            }
            None => extra.extend_from_slice(&0u32.to_be_bytes()),
        }
        extra.extend_from_slice(&0u32.to_be_bytes());

        let name = self.name.as_bytes();
        extra.push(name.len() as u8);
        extra.extend_from_slice(name);
        while extra.len() % 4 != 0 {
            extra.push(0);
        }

        for (key, data) in &self.blocks {
            extra.extend_from_slice(b"8BIM");
            extra.extend_from_slice(key);
            extra.extend_from_slice(&(data.len() as u32).to_be_bytes());
            extra.extend_from_slice(data);
            if data.len() % 2 == 1 {
                extra.push(0);
            }
        }

        out.extend_from_slice(&(extra.len() as u32).to_be_bytes());
        out.extend(extra);
        out
    }
}

fn push_length(out: &mut Vec<u8>, length: u64, version: u16) {
    if version == PSB {
        out.extend_from_slice(&length.to_be_bytes());
    } else {
        out.extend_from_slice(&(length as u32).to_be_bytes());
    }
}

/// Whole document, layers listed in file order (bottom-most first)
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    pub version: u16,
    pub channels: u16,
    pub width: u32,
    pub height: u32,
    pub depth: u16,
    pub color_mode: u16,
    pub resources: Vec<(u16, Vec<u8>)>,
    pub layers: Vec<LayerSpec>,
    pub merged_alpha: bool,
    /// Store the layer info in a global `Lr16`/`Lr32` block instead
    pub layer_block: Option<[u8; 4]>,
    /// Compression code and data of the merged image section
    pub merged: Option<(u16, Vec<u8>)>,
}

impl DocumentBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            version: PSD,
            channels: 3,
            width,
            height,
            depth: 8,
            color_mode: RGB,
            resources: Vec::new(),
            layers: Vec::new(),
            merged_alpha: false,
            layer_block: None,
            merged: None,
        }
    }

    pub fn psb(mut self) -> Self {
        self.version = PSB;
        self
    }

    pub fn depth(mut self, depth: u16) -> Self {
        self.depth = depth;
        self
    }

    pub fn color_mode(mut self, mode: u16, channels: u16) -> Self {
        self.color_mode = mode;
        self.channels = channels;
        self
    }

    pub fn layer(mut self, layer: LayerSpec) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn resource(mut self, id: u16, data: Vec<u8>) -> Self {
        self.resources.push((id, data));
        self
    }

    pub fn layers_in_block(mut self, key: &[u8; 4]) -> Self {
        self.layer_block = Some(*key);
        self
    }

    pub fn merged(mut self, compression: u16, data: Vec<u8>) -> Self {
        self.merged = Some((compression, data));
        self
    }

    fn layer_info(&self) -> Vec<u8> {
        if self.layers.is_empty() {
            return Vec::new();
        }
        let count = self.layers.len() as i16;
        let count = if self.merged_alpha { -count } else { count };
        let mut out = count.to_be_bytes().to_vec();
        for layer in &self.layers {
            out.extend(layer.record(self.version));
        }
        for layer in &self.layers {
            for (_, span) in &layer.channels {
                out.extend_from_slice(span);
            }
        }
        out
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = b"8BPS".to_vec();
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&[0; 6]);
        out.extend_from_slice(&self.channels.to_be_bytes());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(&self.width.to_be_bytes());
        out.extend_from_slice(&self.depth.to_be_bytes());
        out.extend_from_slice(&self.color_mode.to_be_bytes());

        out.extend_from_slice(&0u32.to_be_bytes());

        let mut resources = Vec::new();
        for (id, data) in &self.resources {
            resources.extend_from_slice(b"8BIM");
            resources.extend_from_slice(&id.to_be_bytes());
            resources.extend_from_slice(&[0, 0]);
            resources.extend_from_slice(&(data.len() as u32).to_be_bytes());
            resources.extend_from_slice(data);
            if data.len() % 2 == 1 {
                resources.push(0);
            }
        }
        out.extend_from_slice(&(resources.len() as u32).to_be_bytes());
        out.extend(resources);

        let info = self.layer_info();
        let mut section = Vec::new();
        match self.layer_block {
            Some(key) => {
                push_length(&mut section, 0, self.version);
                section.extend_from_slice(&0u32.to_be_bytes());
                section.extend_from_slice(b"8BIM");
                section.extend_from_slice(&key);
                push_length(&mut section, info.len() as u64, self.version);
                section.extend(info);
            }
            None => {
                push_length(&mut section, info.len() as u64, self.version);
                section.extend(info);
                section.extend_from_slice(&0u32.to_be_bytes());
            }
        }
        push_length(&mut out, section.len() as u64, self.version);
        out.extend(section);

        if let Some((compression, data)) = &self.merged {
            out.extend_from_slice(&compression.to_be_bytes());
            out.extend_from_slice(data);
        }
        out
    }
}
