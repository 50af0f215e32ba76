//! Undoing the per-row delta prediction of zip-with-prediction channels

use psd_core::BitDepth;

/// Reverse prediction on an inflated channel plane in place.
///
/// `data` holds `height` rows of `width` big-endian samples. Each row was
/// encoded independently:
/// - 8-bit: every byte stores the difference to its left neighbour
/// - 16-bit: every sample stores the (wrapping) difference to its left neighbour
/// - 32-bit: the four bytes of each float were split into byte planes
///   (all high bytes, then the next, ...) and the row was delta encoded bytewise
pub fn reverse_prediction(data: &mut [u8], width: usize, height: usize, depth: BitDepth) {
    let row_bytes = width * depth.bytes_per_sample();
    debug_assert_eq!(data.len(), row_bytes * height);

    if row_bytes == 0 {
        return;
    }

    match depth {
        BitDepth::Eight => {
            for row in data.chunks_exact_mut(row_bytes) {
                undo_byte_delta(row);
            }
        }
        BitDepth::Sixteen => {
            for row in data.chunks_exact_mut(row_bytes) {
                undo_u16_delta(row);
            }
        }
        BitDepth::ThirtyTwo => {
            let mut scratch = vec![0u8; row_bytes];
            for row in data.chunks_exact_mut(row_bytes) {
                undo_byte_delta(row);
                interleave_byte_planes(row, &mut scratch, width);
                row.copy_from_slice(&scratch);
            }
        }
    }
}

fn undo_byte_delta(row: &mut [u8]) {
    for x in 1..row.len() {
        row[x] = row[x].wrapping_add(row[x - 1]);
    }
}

fn undo_u16_delta(row: &mut [u8]) {
    let mut previous = 0u16;
    for sample in row.chunks_exact_mut(2) {
        let value = u16::from_be_bytes([sample[0], sample[1]]).wrapping_add(previous);
        sample.copy_from_slice(&value.to_be_bytes());
        previous = value;
    }
}

/// Gather byte `i` of float `x` from plane `i` at position `x`
fn interleave_byte_planes(planar: &[u8], out: &mut [u8], width: usize) {
    for x in 0..width {
        for plane in 0..4 {
            out[x * 4 + plane] = planar[plane * width + x];
        }
    }
}
