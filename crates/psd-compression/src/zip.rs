//! Zlib inflation of zip-compressed channels

use std::io::Read;

use flate2::read::ZlibDecoder;
use psd_core::{PsdError, PsdResult};

/// Inflate `data`, which must produce exactly `expected` bytes
pub fn inflate(data: &[u8], expected: usize) -> PsdResult<Vec<u8>> {
    let mut out = Vec::with_capacity(expected.min(data.len()));
    // One byte of slack detects streams that inflate past the expected size.
    // The buffer grows with the stream, bounded by the same limit.
    ZlibDecoder::new(data)
        .take(expected as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| PsdError::CorruptChannelData(format!("zip stream: {}", e)))?;

    if out.len() != expected {
        return Err(PsdError::CorruptChannelData(format!(
            "zip stream inflated to {} bytes, expected {}",
            if out.len() > expected {
                format!("more than {}", expected)
            } else {
                out.len().to_string()
            },
            expected
        )));
    }
    Ok(out)
}
