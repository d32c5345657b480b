// src/raster/mod.rs

//! Turns sampled field values into an encoded grayscale image.

pub mod encoder;
pub mod quantize;

pub use encoder::encode;
pub use quantize::{quantize, QuantizedGrid};

use crate::error::EncodeError;

/// Encodes a quantized grid with its own dimensions.
pub fn encode_grid(grid: &QuantizedGrid) -> Result<Vec<u8>, EncodeError> {
    let width = dimension(grid.width(), grid.width(), grid.height())?;
    let height = dimension(grid.height(), grid.width(), grid.height())?;
    encode(grid.pixels(), width, height)
}

fn dimension(value: usize, width: usize, height: usize) -> Result<u32, EncodeError> {
    u32::try_from(value).map_err(|_| EncodeError::BadDimensions {
        width: u32::try_from(width).unwrap_or(u32::MAX),
        height: u32::try_from(height).unwrap_or(u32::MAX),
    })
}
