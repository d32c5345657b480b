// src/field/basis.rs

//! Tensor-product B-spline basis on the regular domain.
//!
//! Each axis carries an open (clamped) uniform knot vector over `[0, N]`
//! with unit element spacing, so `N + p` functions per axis, interpolation at
//! the domain edges, and `C^(p-1)` continuity between elements. On element
//! `e` exactly the functions `e..=e + p` are non-zero.

/// One-dimensional clamped B-spline basis.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineAxis {
    elements: usize,
    degree: usize,
    knots: Vec<f64>,
}

impl SplineAxis {
    pub fn new(elements: usize, degree: usize) -> Self {
        let mut knots = Vec::with_capacity(elements + 2 * degree + 1);
        knots.extend(std::iter::repeat(0.0).take(degree + 1));
        knots.extend((1..elements).map(|k| k as f64));
        knots.extend(std::iter::repeat(elements as f64).take(degree + 1));
        SplineAxis {
            elements,
            degree,
            knots,
        }
    }

    /// Number of basis functions along the axis.
    pub fn len(&self) -> usize {
        self.elements + self.degree
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Element containing `u`; the right end of the domain belongs to the
    /// last element.
    pub fn element_of(&self, u: f64) -> usize {
        if u <= 0.0 {
            0
        } else {
            (u.floor() as usize).min(self.elements - 1)
        }
    }

    /// Values of the `p + 1` non-zero functions on `element` at `u`.
    ///
    /// Entry `k` belongs to global function `element + k`.
    pub fn values(&self, element: usize, u: f64) -> Vec<f64> {
        self.cox_de_boor(element + self.degree, u, self.degree)
    }

    /// Values and first derivatives of the non-zero functions on `element`.
    pub fn values_and_derivatives(&self, element: usize, u: f64) -> (Vec<f64>, Vec<f64>) {
        let p = self.degree;
        let span = element + p;
        let values = self.cox_de_boor(span, u, p);
        let lower = self.cox_de_boor(span, u, p - 1);

        let mut derivatives = vec![0.0; p + 1];
        let degree = p as f64;
        for (k, d) in derivatives.iter_mut().enumerate() {
            let g = span - p + k;
            if k >= 1 {
                let denom = self.knots[g + p] - self.knots[g];
                if denom > 0.0 {
                    *d += degree * lower[k - 1] / denom;
                }
            }
            if k < p {
                let denom = self.knots[g + p + 1] - self.knots[g + 1];
                if denom > 0.0 {
                    *d -= degree * lower[k] / denom;
                }
            }
        }
        (values, derivatives)
    }

    /// The `degree + 1` non-zero functions of the given degree on knot span
    /// `span`, by the triangular Cox-de Boor recurrence.
    fn cox_de_boor(&self, span: usize, u: f64, degree: usize) -> Vec<f64> {
        let mut n = vec![0.0; degree + 1];
        let mut left = vec![0.0; degree + 1];
        let mut right = vec![0.0; degree + 1];
        n[0] = 1.0;
        for j in 1..=degree {
            left[j] = u - self.knots[span + 1 - j];
            right[j] = self.knots[span + j] - u;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = n[r] / (right[r + 1] + left[j - r]);
                n[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            n[j] = saved;
        }
        n
    }
}

/// Non-zero basis data of the 2-D basis at one point.
#[derive(Debug, Clone)]
pub struct LocalBasis {
    /// Global degree-of-freedom indices.
    pub dofs: Vec<usize>,
    pub values: Vec<f64>,
    /// `(d/dx, d/dy)` per function.
    pub gradients: Vec<(f64, f64)>,
}

/// Tensor product of two identical clamped axes over an `N x N` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineBasis {
    axis: SplineAxis,
}

impl SplineBasis {
    pub fn new(resolution: usize, degree: usize) -> Self {
        SplineBasis {
            axis: SplineAxis::new(resolution, degree),
        }
    }

    pub fn axis(&self) -> &SplineAxis {
        &self.axis
    }

    /// Functions per axis.
    pub fn per_axis(&self) -> usize {
        self.axis.len()
    }

    /// Total number of degrees of freedom.
    pub fn dof_count(&self) -> usize {
        self.per_axis() * self.per_axis()
    }

    pub fn dof(&self, a: usize, b: usize) -> usize {
        a * self.per_axis() + b
    }

    /// Largest index distance between two coupled degrees of freedom.
    #[cfg(test)]
    pub(crate) fn bandwidth(&self) -> usize {
        let p = self.axis.degree();
        p * self.per_axis() + p
    }

    /// Whether two degrees of freedom share support on some element.
    #[cfg(test)]
    pub(crate) fn coupled(&self, i: usize, j: usize) -> bool {
        let n = self.per_axis();
        let p = self.axis.degree();
        (i / n).abs_diff(j / n) <= p && (i % n).abs_diff(j % n) <= p
    }

    /// Values of the non-zero functions at `(x, y)` inside element `(ex, ey)`.
    pub fn eval(&self, ex: usize, ey: usize, x: f64, y: f64) -> (Vec<usize>, Vec<f64>) {
        let bx = self.axis.values(ex, x);
        let by = self.axis.values(ey, y);
        let mut dofs = Vec::with_capacity(bx.len() * by.len());
        let mut values = Vec::with_capacity(bx.len() * by.len());
        for (ka, va) in bx.iter().enumerate() {
            for (kb, vb) in by.iter().enumerate() {
                dofs.push(self.dof(ex + ka, ey + kb));
                values.push(va * vb);
            }
        }
        (dofs, values)
    }

    /// Values and gradients of the non-zero functions at `(x, y)` inside
    /// element `(ex, ey)`.
    pub fn eval_with_gradients(&self, ex: usize, ey: usize, x: f64, y: f64) -> LocalBasis {
        let (bx, dx) = self.axis.values_and_derivatives(ex, x);
        let (by, dy) = self.axis.values_and_derivatives(ey, y);
        let count = bx.len() * by.len();
        let mut local = LocalBasis {
            dofs: Vec::with_capacity(count),
            values: Vec::with_capacity(count),
            gradients: Vec::with_capacity(count),
        };
        for ka in 0..bx.len() {
            for kb in 0..by.len() {
                local.dofs.push(self.dof(ex + ka, ey + kb));
                local.values.push(bx[ka] * by[kb]);
                local.gradients.push((dx[ka] * by[kb], bx[ka] * dy[kb]));
            }
        }
        local
    }

    /// Evaluates the expansion `Σ coeffs[i] B_i` at an index-space point.
    pub fn evaluate(&self, coeffs: &[f64], x: f64, y: f64) -> f64 {
        let ex = self.axis.element_of(x);
        let ey = self.axis.element_of(y);
        let (dofs, values) = self.eval(ex, ey, x, y);
        dofs.iter().zip(values).map(|(&d, v)| coeffs[d] * v).sum()
    }
}
