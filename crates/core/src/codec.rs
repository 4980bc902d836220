//! Run-length tile codec with an LZ4 envelope.
//!
//! Raw layout:
//! - 8-byte header: `width` then `depth`, both little-endian `i32`.
//! - Runs over the row-major floor classification (`x` fastest). Floor and
//!   door cells encode as `1`, everything else as `0`.
//!   - Short run, length 1..=63: one byte `(length << 1) | value`.
//!   - Long run, length 1..=65535: `0x80 | value`, then length as `u16` LE.
//!
//! The stored blob is the raw layout compressed with `lz4_flex` (size-prefixed).
//! Wall and door distinctions are not stored; callers re-derive walls after
//! decoding.

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use thiserror::Error;

use crate::mapgen::TileGrid;
use crate::types::Cell;

pub const HEADER_LEN: usize = 8;
pub const MAX_SHORT_RUN: usize = 63;
pub const MAX_LONG_RUN: usize = u16::MAX as usize;
/// Upper bound on decoded cells; larger headers are rejected.
pub const MAX_CELLS: usize = 1 << 26;

const LONG_RUN_FLAG: u8 = 0x80;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("blob is {len} bytes, shorter than the {HEADER_LEN}-byte header")]
    TruncatedHeader { len: usize },
    #[error("grid {width}x{depth} exceeds the {MAX_CELLS}-cell codec limit")]
    GridTooLarge { width: usize, depth: usize },
    #[error("invalid grid dimensions {width}x{depth}")]
    InvalidDimensions { width: i32, depth: i32 },
    #[error("long run at byte {offset} is missing its length")]
    TruncatedRun { offset: usize },
    #[error("zero-length run at byte {offset}")]
    ZeroLengthRun { offset: usize },
    #[error("run at byte {offset} writes past the {capacity} cells of the grid")]
    RunOverflow { offset: usize, capacity: usize },
    #[error("decoded {decoded} cells, expected {expected}")]
    MissingCells { decoded: usize, expected: usize },
    #[error("compression envelope: {0}")]
    Envelope(String),
}

/// Maximal run of identically classified cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub floor: bool,
    pub len: usize,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Maximal runs of the floor classification in row-major order.
pub fn scan_runs(grid: &TileGrid) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for cell in grid.cells() {
        let floor = cell.is_walkable();
        match runs.last_mut() {
            Some(run) if run.floor == floor => run.len += 1,
            _ => runs.push(Run { floor, len: 1 }),
        }
    }
    runs
}

/// Fails for grids the decoder would refuse: more than [`MAX_CELLS`] cells or
/// a side that does not fit the signed header.
pub fn ensure_encodable(width: usize, depth: usize) -> Result<(), FormatError> {
    let fits_header = i32::try_from(width).is_ok() && i32::try_from(depth).is_ok();
    match width.checked_mul(depth) {
        Some(cells) if fits_header && cells <= MAX_CELLS => Ok(()),
        _ => Err(FormatError::GridTooLarge { width, depth }),
    }
}

pub fn encode_runs(grid: &TileGrid) -> Result<Vec<u8>, FormatError> {
    ensure_encodable(grid.width(), grid.depth())?;
    let mut out = Vec::with_capacity(HEADER_LEN + 64);
    out.extend((grid.width() as i32).to_le_bytes());
    out.extend((grid.depth() as i32).to_le_bytes());

    for run in scan_runs(grid) {
        let value = u8::from(run.floor);
        let mut remaining = run.len;
        while remaining > 0 {
            let len = remaining.min(MAX_LONG_RUN);
            if len <= MAX_SHORT_RUN {
                out.push(((len as u8) << 1) | value);
            } else {
                out.push(LONG_RUN_FLAG | value);
                out.extend((len as u16).to_le_bytes());
            }
            remaining -= len;
        }
    }
    Ok(out)
}

pub fn encode(grid: &TileGrid) -> Result<Vec<u8>, FormatError> {
    Ok(compress_prepend_size(&encode_runs(grid)?))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn read_header(raw: &[u8]) -> Result<(usize, usize), FormatError> {
    let (Some(width_bytes), Some(depth_bytes)) = (raw.get(0..4), raw.get(4..HEADER_LEN)) else {
        return Err(FormatError::TruncatedHeader { len: raw.len() });
    };
    let width =
        i32::from_le_bytes([width_bytes[0], width_bytes[1], width_bytes[2], width_bytes[3]]);
    let depth =
        i32::from_le_bytes([depth_bytes[0], depth_bytes[1], depth_bytes[2], depth_bytes[3]]);

    let invalid = FormatError::InvalidDimensions { width, depth };
    let (Ok(stored_width), Ok(stored_depth)) = (usize::try_from(width), usize::try_from(depth))
    else {
        return Err(invalid);
    };
    match stored_width.checked_mul(stored_depth) {
        Some(cells) if cells <= MAX_CELLS => Ok((stored_width, stored_depth)),
        _ => Err(invalid),
    }
}

/// Rebuilds a floor/void grid from the raw run layout.
///
/// The write cursor wraps at the width stored in the header.
pub fn decode_runs(raw: &[u8]) -> Result<TileGrid, FormatError> {
    let (width, depth) = read_header(raw)?;
    let capacity = width * depth;
    let mut cells = Vec::with_capacity(capacity);

    let mut offset = HEADER_LEN;
    while offset < raw.len() {
        let run_offset = offset;
        let tag = raw[offset];
        offset += 1;

        let floor = tag & 1 == 1;
        let len = if tag & LONG_RUN_FLAG != 0 {
            let Some(len_bytes) = raw.get(offset..offset + 2) else {
                return Err(FormatError::TruncatedRun { offset: run_offset });
            };
            offset += 2;
            usize::from(u16::from_le_bytes([len_bytes[0], len_bytes[1]]))
        } else {
            usize::from(tag >> 1)
        };

        if len == 0 {
            return Err(FormatError::ZeroLengthRun { offset: run_offset });
        }
        if cells.len() + len > capacity {
            return Err(FormatError::RunOverflow { offset: run_offset, capacity });
        }
        let cell = if floor { Cell::Floor } else { Cell::Void };
        cells.resize(cells.len() + len, cell);
    }

    if cells.len() != capacity {
        return Err(FormatError::MissingCells { decoded: cells.len(), expected: capacity });
    }
    TileGrid::from_cells(width, depth, cells)
        .ok_or(FormatError::MissingCells { decoded: capacity, expected: capacity })
}

pub fn decode(bytes: &[u8]) -> Result<TileGrid, FormatError> {
    let Some(prefix) = bytes.get(0..4) else {
        return Err(FormatError::Envelope(format!(
            "{} bytes cannot hold the size prefix",
            bytes.len()
        )));
    };
    let declared = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    // Worst case is one byte per cell plus the header.
    if declared > HEADER_LEN + MAX_CELLS {
        return Err(FormatError::Envelope(format!(
            "declared raw size {declared} exceeds the decode limit"
        )));
    }
    let raw = decompress_size_prepended(bytes)
        .map_err(|error| FormatError::Envelope(error.to_string()))?;
    decode_runs(&raw)
}

#[cfg(test)]
mod tests;
