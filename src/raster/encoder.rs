// src/raster/encoder.rs

//! Minimal PNG writer for 8-bit grayscale.
//!
//! Layout:
//!
//! ```text
//! signature | IHDR | IDAT | IEND
//! ```
//!
//! Every chunk is `length (u32 BE) | tag | payload | crc32(tag ++ payload)`.
//! Scanlines are stored unfiltered (filter byte 0) and the whole scanline
//! buffer is zlib-compressed in one pass. No ancillary chunks are written,
//! so identical pixels always give identical bytes.

use std::io::Write;

use crc32fast::Hasher;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::trace;

use crate::error::EncodeError;

/// The fixed eight-byte PNG signature.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// --- IHDR field values ---
const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_GRAYSCALE: u8 = 0;
const COMPRESSION_DEFLATE: u8 = 0;
const FILTER_METHOD_ADAPTIVE: u8 = 0;
const INTERLACE_NONE: u8 = 0;

const FILTER_NONE: u8 = 0; // per-scanline filter type
const COMPRESSION_LEVEL: u32 = 6;
const MAX_DIMENSION: u32 = i32::MAX as u32; // PNG limits dimensions to 2^31 - 1

/// Encodes `pixels` (row-major, top row first) as a grayscale PNG.
///
/// Pixels beyond the end of `pixels` are written as 0.
pub fn encode(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(EncodeError::BadDimensions { width, height });
    }
    let row_len = width as usize;
    let pixel_count = row_len
        .checked_mul(height as usize)
        .ok_or(EncodeError::BadDimensions { width, height })?;
    if pixels.len() > pixel_count {
        return Err(EncodeError::TooManyPixels {
            len: pixels.len(),
            width,
            height,
        });
    }

    let mut out = Vec::new();
    out.extend_from_slice(&SIGNATURE);
    write_chunk(&mut out, b"IHDR", &header(width, height), width, height)?;
    let data = compress(&scanlines(pixels, row_len, height as usize), width, height)?;
    write_chunk(&mut out, b"IDAT", &data, width, height)?;
    write_chunk(&mut out, b"IEND", &[], width, height)?;

    trace!(
        "encoded {}x{} grayscale PNG: {} bytes ({} compressed)",
        width,
        height,
        out.len(),
        data.len()
    );
    Ok(out)
}

fn header(width: u32, height: u32) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    ihdr[8] = BIT_DEPTH;
    ihdr[9] = COLOR_TYPE_GRAYSCALE;
    ihdr[10] = COMPRESSION_DEFLATE;
    ihdr[11] = FILTER_METHOD_ADAPTIVE;
    ihdr[12] = INTERLACE_NONE;
    ihdr
}

/// One filter byte plus `row_len` samples per row.
fn scanlines(pixels: &[u8], row_len: usize, rows: usize) -> Vec<u8> {
    let mut raw = Vec::with_capacity(rows * (row_len + 1));
    for row in 0..rows {
        raw.push(FILTER_NONE);
        let start = (row * row_len).min(pixels.len());
        let end = ((row + 1) * row_len).min(pixels.len());
        raw.extend_from_slice(&pixels[start..end]);
        raw.resize(raw.len() + row_len - (end - start), 0);
    }
    raw
}

fn compress(raw: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
    encoder
        .write_all(raw)
        .and_then(|_| encoder.finish())
        .map_err(|source| EncodeError::Compress {
            width,
            height,
            source,
        })
}

fn write_chunk(
    out: &mut Vec<u8>,
    tag: &'static [u8; 4],
    payload: &[u8],
    width: u32,
    height: u32,
) -> Result<(), EncodeError> {
    let len = u32::try_from(payload.len()).map_err(|_| EncodeError::ChunkTooLarge {
        tag: tag_name(tag),
        len: payload.len(),
        width,
        height,
    })?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);

    let mut hasher = Hasher::new();
    hasher.update(tag);
    hasher.update(payload);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
    Ok(())
}

fn tag_name(tag: &'static [u8; 4]) -> &'static str {
    std::str::from_utf8(tag).unwrap_or("????")
}
