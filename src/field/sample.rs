// src/field/sample.rs

//! Cell-centered sampling of a solved field.

use log::debug;

use super::domain::RegularDomain;
use super::problem::FieldSolution;

/// `N x N` samples in domain index order: `get(i, j)` is the cell whose
/// lower-left corner is `(i, j)`, with `i` along x and `j` along y.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledGrid {
    size: usize,
    values: Vec<f64>,
}

impl SampledGrid {
    /// Builds a grid from values laid out `i`-major (`values[i * size + j]`).
    ///
    /// # Panics
    /// Panics if `values.len() != size * size`.
    #[cfg(test)]
    pub(crate) fn from_values(size: usize, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), size * size, "grid must be square");
        SampledGrid { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Evaluates `solution` at the center of every cell of `domain`.
pub fn sample(solution: &FieldSolution, domain: &RegularDomain) -> SampledGrid {
    let size = domain.resolution();
    let values: Vec<f64> = domain
        .cell_centers()
        .map(|(_, _, x, y)| solution.evaluate(x, y))
        .collect();
    debug!("sampled {}x{} cell centers", size, size);
    SampledGrid { size, values }
}
