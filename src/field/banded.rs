// src/field/banded.rs

//! Symmetric positive-definite banded matrices and their Cholesky solve.
//!
//! Only the lower band is stored: row `i` keeps columns `i - bandwidth..=i`.
//! The spline stiffness matrix couples a degree of freedom only with its
//! `(2p + 1)²` tensor neighbours, so with lexicographic numbering the band is
//! `p * (N + p) + p` wide and the factorisation costs `O(n * bandwidth²)`.

use crate::error::FieldError;
use log::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct BandedMatrix {
    size: usize,
    bandwidth: usize,
    data: Vec<f64>,
}

impl BandedMatrix {
    pub fn zeros(size: usize, bandwidth: usize) -> Self {
        BandedMatrix {
            size,
            bandwidth,
            data: vec![0.0; size * (bandwidth + 1)],
        }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(j <= i && i - j <= self.bandwidth);
        i * (self.bandwidth + 1) + (i - j)
    }

    /// Entry `(i, j)` of the symmetric matrix; zero outside the band.
    #[cfg(test)]
    fn get(&self, i: usize, j: usize) -> f64 {
        let (i, j) = if j > i { (j, i) } else { (i, j) };
        if i - j > self.bandwidth {
            0.0
        } else {
            self.data[self.index(i, j)]
        }
    }

    /// Adds `value` to the symmetric pair `(i, j)` / `(j, i)`.
    ///
    /// # Panics
    /// Panics if the pair lies outside the band.
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        let (i, j) = if j > i { (j, i) } else { (i, j) };
        assert!(
            i - j <= self.bandwidth,
            "entry ({}, {}) outside bandwidth {}",
            i,
            j,
            self.bandwidth
        );
        let idx = self.index(i, j);
        self.data[idx] += value;
    }

    /// `y = A x`.
    #[cfg(test)]
    fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.size];
        for i in 0..self.size {
            let lo = i.saturating_sub(self.bandwidth);
            for j in lo..=i {
                let a = self.data[self.index(i, j)];
                y[i] += a * x[j];
                if j != i {
                    y[j] += a * x[i];
                }
            }
        }
        y
    }

    /// Factors `A = L Lᵀ` in place, consuming the matrix.
    ///
    /// A pivot that is not positive relative to its original diagonal entry
    /// means the system has no unique solution.
    pub fn cholesky(mut self) -> Result<CholeskyFactor, FieldError> {
        let n = self.size;
        let bw = self.bandwidth;
        for j in 0..n {
            let lo = j.saturating_sub(bw);
            let diag_idx = self.index(j, j);
            let original = self.data[diag_idx];
            let mut pivot = original;
            for k in lo..j {
                let l = self.data[self.index(j, k)];
                pivot -= l * l;
            }
            if !(pivot > f64::EPSILON * original.abs()) || !pivot.is_finite() {
                return Err(FieldError::Singular {
                    index: j,
                    pivot,
                    size: n,
                });
            }
            let root = pivot.sqrt();
            self.data[diag_idx] = root;

            let last = (j + bw).min(n - 1);
            for i in j + 1..=last {
                let lo_i = i.saturating_sub(bw);
                let mut s = self.data[self.index(i, j)];
                for k in lo_i.max(lo)..j {
                    s -= self.data[self.index(i, k)] * self.data[self.index(j, k)];
                }
                let idx = self.index(i, j);
                self.data[idx] = s / root;
            }
        }
        trace!("cholesky: factored {} unknowns, bandwidth {}", n, bw);
        Ok(CholeskyFactor { lower: self })
    }
}

/// Lower-triangular banded factor of an SPD matrix.
#[derive(Debug, Clone)]
pub struct CholeskyFactor {
    lower: BandedMatrix,
}

impl CholeskyFactor {
    /// Solves `A x = b` by forward and back substitution.
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let l = &self.lower;
        let n = l.size;
        let bw = l.bandwidth;
        let mut x = b.to_vec();

        for i in 0..n {
            let lo = i.saturating_sub(bw);
            let mut s = x[i];
            for k in lo..i {
                s -= l.data[l.index(i, k)] * x[k];
            }
            x[i] = s / l.data[l.index(i, i)];
        }
        for i in (0..n).rev() {
            let hi = (i + bw).min(n.saturating_sub(1));
            let mut s = x[i];
            for k in i + 1..=hi {
                s -= l.data[l.index(k, i)] * x[k];
            }
            x[i] = s / l.data[l.index(i, i)];
        }
        x
    }
}
