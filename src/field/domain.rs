// src/field/domain.rs

//! The regular domain and its trimming by a level set.
//!
//! A region is represented by its integration rule: a list of weighted
//! points, each tagged with the element it lies in. Trimming splits the
//! element rules of the domain into the part where the level set is
//! non-negative and the complement, refining cells that the zero level set
//! cuts.

use log::debug;

/// One integration point of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadPoint {
    pub element: (usize, usize),
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

/// A sub-region of the regular domain, as an integration rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    points: Vec<QuadPoint>,
}

impl Region {
    pub fn points(&self) -> &[QuadPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Measure of the region: the sum of its weights.
    pub fn area(&self) -> f64 {
        self.points.iter().map(|q| q.weight).sum()
    }

    fn push(&mut self, point: QuadPoint) {
        self.points.push(point);
    }
}

/// Gauss-Legendre rule with `n` points on `[0, 1]`, as `(node, weight)`.
pub fn gauss_legendre(n: usize) -> Vec<(f64, f64)> {
    let mut rule = Vec::with_capacity(n);
    for i in 0..n {
        // Newton iteration on P_n from the Chebyshev-like initial guess.
        let mut z = (std::f64::consts::PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre(n, z);
            let dz = p / dp;
            z -= dz;
            if dz.abs() < 1e-15 {
                break;
            }
        }
        let (_, dp) = legendre(n, z);
        let weight = 2.0 / ((1.0 - z * z) * dp * dp);
        rule.push((0.5 * (1.0 - z), 0.5 * weight));
    }
    rule.sort_by(|a, b| a.0.total_cmp(&b.0));
    rule
}

/// `P_n(z)` and `P_n'(z)` by the three-term recurrence.
fn legendre(n: usize, z: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    let mut p0 = 1.0;
    let mut p1 = z;
    for k in 2..=n {
        let k = k as f64;
        let p2 = ((2.0 * k - 1.0) * z * p1 - (k - 1.0) * p0) / k;
        p0 = p1;
        p1 = p2;
    }
    let derivative = n as f64 * (z * p1 - p0) / (z * z - 1.0);
    (p1, derivative)
}

/// The regular `N x N` grid of unit cells over `[0, N]²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegularDomain {
    resolution: usize,
}

impl RegularDomain {
    pub fn new(resolution: usize) -> Self {
        RegularDomain { resolution }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Center of every cell, `i` (x) outermost.
    pub fn cell_centers(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        let n = self.resolution;
        (0..n).flat_map(move |i| (0..n).map(move |j| (i, j, i as f64 + 0.5, j as f64 + 0.5)))
    }

    /// Integration rule over the four edges, `order` points per edge cell.
    pub fn boundary(&self, order: usize) -> Vec<QuadPoint> {
        let n = self.resolution;
        let top = n as f64;
        let rule = gauss_legendre(order);
        let mut points = Vec::with_capacity(4 * n * order);
        for e in 0..n {
            for &(t, weight) in &rule {
                let s = e as f64 + t;
                let point = |element, x, y| QuadPoint {
                    element,
                    x,
                    y,
                    weight,
                };
                points.push(point((e, 0), s, 0.0)); // bottom
                points.push(point((e, n - 1), s, top)); // top
                points.push(point((0, e), 0.0, s)); // left
                points.push(point((n - 1, e), top, s)); // right
            }
        }
        points
    }

    /// Splits the domain by the sign of `levelset`.
    ///
    /// Returns `(trimmed, complement)`: the region where the level set is
    /// non-negative and the region where it is negative. Cells whose corners
    /// and center disagree in sign are bisected up to `max_refine` times;
    /// below that the integration points are classified individually.
    pub fn trim<F>(&self, levelset: F, order: usize, max_refine: u32) -> (Region, Region)
    where
        F: Fn(f64, f64) -> f64,
    {
        let rule = gauss_legendre(order);
        let mut trimmed = Region::default();
        let mut complement = Region::default();
        let mut cut_cells = 0usize;

        for i in 0..self.resolution {
            for j in 0..self.resolution {
                let cell = Cell {
                    element: (i, j),
                    x0: i as f64,
                    y0: j as f64,
                    size: 1.0,
                };
                if cell.sign(&levelset).is_none() {
                    cut_cells += 1;
                }
                cell.split(&levelset, &rule, max_refine, &mut trimmed, &mut complement);
            }
        }

        debug!(
            "trim: {} cut cells, {} trimmed points (area {:.3}), {} complement points (area {:.3})",
            cut_cells,
            trimmed.len(),
            trimmed.area(),
            complement.len(),
            complement.area()
        );
        (trimmed, complement)
    }
}

/// A square sub-cell of one element.
#[derive(Debug, Clone, Copy)]
struct Cell {
    element: (usize, usize),
    x0: f64,
    y0: f64,
    size: f64,
}

impl Cell {
    /// `Some(true)` if the level set is non-negative at all probes,
    /// `Some(false)` if negative at all, `None` if the cell is cut.
    fn sign<F: Fn(f64, f64) -> f64>(&self, levelset: &F) -> Option<bool> {
        let h = self.size;
        let probes = [
            (self.x0, self.y0),
            (self.x0 + h, self.y0),
            (self.x0, self.y0 + h),
            (self.x0 + h, self.y0 + h),
            (self.x0 + 0.5 * h, self.y0 + 0.5 * h),
        ];
        let first = levelset(probes[0].0, probes[0].1) >= 0.0;
        if probes[1..].iter().all(|&(x, y)| (levelset(x, y) >= 0.0) == first) {
            Some(first)
        } else {
            None
        }
    }

    fn split<F: Fn(f64, f64) -> f64>(
        &self,
        levelset: &F,
        rule: &[(f64, f64)],
        depth: u32,
        trimmed: &mut Region,
        complement: &mut Region,
    ) {
        match self.sign(levelset) {
            Some(kept) => {
                let target = if kept { trimmed } else { complement };
                for point in self.points(rule) {
                    target.push(point);
                }
            }
            None if depth > 0 => {
                let half = 0.5 * self.size;
                for (dx, dy) in [(0.0, 0.0), (half, 0.0), (0.0, half), (half, half)] {
                    let child = Cell {
                        element: self.element,
                        x0: self.x0 + dx,
                        y0: self.y0 + dy,
                        size: half,
                    };
                    child.split(levelset, rule, depth - 1, trimmed, complement);
                }
            }
            None => {
                for point in self.points(rule) {
                    if levelset(point.x, point.y) >= 0.0 {
                        trimmed.push(point);
                    } else {
                        complement.push(point);
                    }
                }
            }
        }
    }

    /// Tensor Gauss rule mapped onto this cell.
    fn points<'a>(&'a self, rule: &'a [(f64, f64)]) -> impl Iterator<Item = QuadPoint> + 'a {
        let area = self.size * self.size;
        rule.iter().flat_map(move |&(tx, wx)| {
            rule.iter().map(move |&(ty, wy)| QuadPoint {
                element: self.element,
                x: self.x0 + tx * self.size,
                y: self.y0 + ty * self.size,
                weight: wx * wy * area,
            })
        })
    }
}
