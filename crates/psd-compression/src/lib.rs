//! Channel compression codecs for PSD/PSB
//!
//! This crate implements the four channel encodings of the format: raw, PackBits
//! run-length encoding, zlib, and zlib with per-row delta prediction. Decoding is
//! pure; every call owns its output buffer.

pub mod codec;
pub mod prediction;
pub mod rle;
pub mod zip;

pub use codec::{decode_channel, decompress, decompress_planes, ChannelGeometry, Compression};
pub use prediction::reverse_prediction;
pub use rle::{decode_packbits_row, decode_rle};
pub use zip::inflate;
