// src/raster/quantize.rs

//! Min-max normalisation of sampled values to 8-bit raster order.

use log::debug;

use crate::error::QuantizeError;
use crate::field::SampledGrid;

/// Bytes laid out row-major, row 0 at the top, column 0 at the left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedGrid {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl QuantizedGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at raster `row`, `col`.
    pub fn at(&self, row: usize, col: usize) -> u8 {
        self.pixels[row * self.width + col]
    }
}

/// Maps `grid` onto `0..=255` and reorders it for a raster.
///
/// The sampled grid is indexed `(i, j)` with `i` along x and `j` growing
/// upward; a raster is indexed by row from the top. So the grid is
/// transposed and its rows reversed: `raster[row][col] = grid[col][N-1-row]`.
pub fn quantize(grid: &SampledGrid) -> Result<QuantizedGrid, QuantizeError> {
    let n = grid.size();
    if n == 0 {
        return Err(QuantizeError::Empty);
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for i in 0..n {
        for j in 0..n {
            let v = grid.get(i, j);
            if !v.is_finite() {
                return Err(QuantizeError::NonFinite { i, j });
            }
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if hi <= lo {
        return Err(QuantizeError::Degenerate { value: lo });
    }

    let scale = 255.0 / (hi - lo);
    let mut pixels = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let v = grid.get(col, n - 1 - row);
            pixels.push(((v - lo) * scale).round().clamp(0.0, 255.0) as u8);
        }
    }
    debug!("quantized {}x{} grid, range [{:.6}, {:.6}]", n, n, lo, hi);

    Ok(QuantizedGrid {
        width: n,
        height: n,
        pixels,
    })
}
