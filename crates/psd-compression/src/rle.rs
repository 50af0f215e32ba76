//! PackBits run-length decoding with per-row byte count tables

use psd_bytes::ByteReader;
use psd_core::{PsdError, PsdResult, Version};

/// Decode one PackBits row into `out`, which must be filled exactly.
///
/// A header byte `n` in `0..=127` copies the next `n + 1` bytes, `-127..=-1`
/// repeats the next byte `1 - n` times and `-128` is a no-op.
pub fn decode_packbits_row(src: &[u8], out: &mut [u8]) -> PsdResult<()> {
    let mut i = 0;
    let mut o = 0;

    while i < src.len() {
        let header = src[i] as i8;
        i += 1;

        if header >= 0 {
            let count = header as usize + 1;
            if i + count > src.len() {
                return Err(PsdError::CorruptChannelData(format!(
                    "RLE literal run of {} bytes overruns its row",
                    count
                )));
            }
            if o + count > out.len() {
                return Err(row_overflow(out.len()));
            }
            out[o..o + count].copy_from_slice(&src[i..i + count]);
            i += count;
            o += count;
        } else if header != -128 {
            let count = 1 - header as isize;
            let count = count as usize;
            let Some(&value) = src.get(i) else {
                return Err(PsdError::CorruptChannelData(
                    "RLE repeat run is missing its value byte".to_string(),
                ));
            };
            i += 1;
            if o + count > out.len() {
                return Err(row_overflow(out.len()));
            }
            out[o..o + count].fill(value);
            o += count;
        }
    }

    if o != out.len() {
        return Err(PsdError::CorruptChannelData(format!(
            "RLE row decoded to {} bytes, expected {}",
            o,
            out.len()
        )));
    }
    Ok(())
}

fn row_overflow(expected: usize) -> PsdError {
    PsdError::CorruptChannelData(format!(
        "RLE row decodes past its expected {} bytes",
        expected
    ))
}

/// Decode `rows` rows of `row_bytes` each.
///
/// `data` starts with the row byte count table (2-byte entries in PSD,
/// 4-byte entries in PSB) followed by the packed rows.
pub fn decode_rle(
    data: &[u8],
    row_bytes: usize,
    rows: usize,
    version: Version,
) -> PsdResult<Vec<u8>> {
    let mut reader = ByteReader::new(data);
    let mut counts = Vec::with_capacity(rows.min(data.len() / 2));
    for _ in 0..rows {
        let count = match version {
            Version::Psd => reader.read_u16().map(usize::from),
            Version::Psb => reader.read_u32().map(|c| c as usize),
        }
        .map_err(|_| {
            PsdError::CorruptChannelData(format!(
                "RLE count table truncated, expected {} rows",
                rows
            ))
        })?;
        counts.push(count);
    }

    if row_bytes == 0 {
        return Ok(Vec::new());
    }

    // Rows are appended as they decode, never sized from the extent alone
    let mut out = Vec::with_capacity(row_bytes.saturating_mul(rows).min(data.len()));
    for (row, count) in counts.into_iter().enumerate() {
        let src = reader.read(count).map_err(|_| {
            PsdError::CorruptChannelData(format!(
                "RLE row {} declares {} bytes past the end of its channel",
                row, count
            ))
        })?;
        let start = out.len();
        out.resize(start + row_bytes, 0);
        decode_packbits_row(src, &mut out[start..])?;
    }

    Ok(out)
}
