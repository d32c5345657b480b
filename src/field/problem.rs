// src/field/problem.rs

//! Weak-form assembly and the constrained solve.
//!
//! A [`FieldProblem`] is a weighted sum of harmonic (Laplace) terms, each
//! integrated over its own region, plus Dirichlet constraints on a subset of
//! the degrees of freedom. All terms are summed into one stiffness matrix
//! before anything is solved.

use log::{debug, info};

use super::banded::BandedMatrix;
use super::basis::SplineBasis;
use super::domain::{QuadPoint, Region, RegularDomain};
use crate::error::FieldError;

/// Boundary mass below which a degree of freedom is left unconstrained.
const DROP_TOLERANCE: f64 = 1e-15;

/// One `weight * ∫_region ∇u·∇v` term of the weak form.
#[derive(Debug, Clone, Copy)]
pub struct HarmonicTerm<'a> {
    pub name: &'static str,
    pub weight: f64,
    pub region: &'a Region,
}

/// Prescribed values for a subset of the degrees of freedom.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    values: Vec<Option<f64>>,
}

impl Constraints {
    /// No degree of freedom constrained.
    pub fn none(dof_count: usize) -> Self {
        Constraints {
            values: vec![None; dof_count],
        }
    }

    /// Fits `g` on the boundary of `domain` in the least-squares sense.
    ///
    /// Minimises `∫_∂Ω (u - g)² ds` over the degrees of freedom whose basis
    /// functions do not vanish on the boundary; all others stay free.
    pub fn fit_boundary<G>(
        basis: &SplineBasis,
        domain: &RegularDomain,
        g: G,
    ) -> Result<Self, FieldError>
    where
        G: Fn(f64, f64) -> f64,
    {
        let order = basis.axis().degree() + 1;
        let boundary = domain.boundary(order);
        let dof_count = basis.dof_count();

        let mut mass_diag = vec![0.0; dof_count];
        for q in &boundary {
            let (dofs, values) = basis.eval(q.element.0, q.element.1, q.x, q.y);
            for (&d, v) in dofs.iter().zip(&values) {
                mass_diag[d] += q.weight * v * v;
            }
        }

        let mut reduced = vec![usize::MAX; dof_count];
        let mut constrained = Vec::new();
        for (d, &m) in mass_diag.iter().enumerate() {
            if m > DROP_TOLERANCE {
                reduced[d] = constrained.len();
                constrained.push(d);
            }
        }
        if constrained.is_empty() {
            return Err(FieldError::NoConstraints);
        }

        let bandwidth = reduced_bandwidth(basis, &constrained, &reduced);
        let mut mass = BandedMatrix::zeros(constrained.len(), bandwidth);
        let mut rhs = vec![0.0; constrained.len()];
        for q in &boundary {
            let (dofs, values) = basis.eval(q.element.0, q.element.1, q.x, q.y);
            let target = g(q.x, q.y);
            for (a, (&da, &va)) in dofs.iter().zip(&values).enumerate() {
                let ra = reduced[da];
                if ra == usize::MAX {
                    continue;
                }
                rhs[ra] += q.weight * va * target;
                for (&db, &vb) in dofs.iter().zip(&values).take(a + 1) {
                    let rb = reduced[db];
                    if rb != usize::MAX {
                        mass.add(ra, rb, q.weight * va * vb);
                    }
                }
            }
        }

        let fitted = mass.cholesky()?.solve(&rhs);
        let mut values = vec![None; dof_count];
        for (&d, v) in constrained.iter().zip(fitted) {
            values[d] = Some(v);
        }
        debug!("boundary fit: {} of {} dofs constrained", constrained.len(), dof_count);
        Ok(Constraints { values })
    }

    pub fn get(&self, dof: usize) -> Option<f64> {
        self.values[dof]
    }

    /// Number of constrained degrees of freedom.
    pub fn count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// The solved field: one coefficient per degree of freedom.
#[derive(Debug, Clone)]
pub struct FieldSolution {
    basis: SplineBasis,
    coeffs: Vec<f64>,
}

impl FieldSolution {
    pub fn basis(&self) -> &SplineBasis {
        &self.basis
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Value of the field at an index-space point.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.basis.evaluate(&self.coeffs, x, y)
    }
}

/// Collects weighted harmonic terms and constraints into one problem.
#[derive(Debug)]
pub struct FieldProblemBuilder<'a> {
    basis: &'a SplineBasis,
    terms: Vec<HarmonicTerm<'a>>,
    constraints: Option<Constraints>,
}

impl<'a> FieldProblemBuilder<'a> {
    pub fn new(basis: &'a SplineBasis) -> Self {
        FieldProblemBuilder {
            basis,
            terms: Vec::new(),
            constraints: None,
        }
    }

    /// Adds `weight * ∫_region ∇u·∇v` to the weak form.
    pub fn harmonic(mut self, name: &'static str, weight: f64, region: &'a Region) -> Self {
        self.terms.push(HarmonicTerm {
            name,
            weight,
            region,
        });
        self
    }

    /// Freezes the constrained degrees of freedom at their given values.
    pub fn dirichlet(mut self, constraints: Constraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn build(self) -> FieldProblem<'a> {
        let constraints = self
            .constraints
            .unwrap_or_else(|| Constraints::none(self.basis.dof_count()));
        FieldProblem {
            basis: self.basis,
            terms: self.terms,
            constraints,
        }
    }
}

/// A combined weak-form problem ready to solve.
#[derive(Debug)]
pub struct FieldProblem<'a> {
    basis: &'a SplineBasis,
    terms: Vec<HarmonicTerm<'a>>,
    constraints: Constraints,
}

impl FieldProblem<'_> {
    pub fn terms(&self) -> &[HarmonicTerm<'_>] {
        &self.terms
    }

    /// Assembles every term into one system, eliminates the constrained
    /// degrees of freedom and solves for the rest.
    pub fn solve(&self) -> Result<FieldSolution, FieldError> {
        let dof_count = self.basis.dof_count();
        let mut reduced = vec![usize::MAX; dof_count];
        let mut free = Vec::new();
        for d in 0..dof_count {
            if self.constraints.get(d).is_none() {
                reduced[d] = free.len();
                free.push(d);
            }
        }

        let mut coeffs: Vec<f64> = (0..dof_count)
            .map(|d| self.constraints.get(d).unwrap_or(0.0))
            .collect();

        if !free.is_empty() {
            let bandwidth = reduced_bandwidth(self.basis, &free, &reduced);
            let mut stiffness = BandedMatrix::zeros(free.len(), bandwidth);
            let mut rhs = vec![0.0; free.len()];

            for term in &self.terms {
                debug!(
                    "assembling term '{}' (weight {:e}, {} points)",
                    term.name,
                    term.weight,
                    term.region.len()
                );
                for q in term.region.points() {
                    self.accumulate(q, term.weight, &reduced, &mut stiffness, &mut rhs);
                }
            }

            let solution = stiffness.cholesky()?.solve(&rhs);
            for (&d, v) in free.iter().zip(solution) {
                coeffs[d] = v;
            }
        }

        if let Some(index) = coeffs.iter().position(|c| !c.is_finite()) {
            return Err(FieldError::NonFinite { index });
        }
        info!(
            "solved field: {} dofs ({} free, {} constrained), {} terms",
            dof_count,
            free.len(),
            dof_count - free.len(),
            self.terms.len()
        );
        Ok(FieldSolution {
            basis: self.basis.clone(),
            coeffs,
        })
    }

    /// Adds one integration point's contribution to the free system. Couplings
    /// to constrained degrees of freedom move to the right-hand side.
    fn accumulate(
        &self,
        q: &QuadPoint,
        weight: f64,
        reduced: &[usize],
        stiffness: &mut BandedMatrix,
        rhs: &mut [f64],
    ) {
        let local = self.basis.eval_with_gradients(q.element.0, q.element.1, q.x, q.y);
        let scale = weight * q.weight;
        for (a, &da) in local.dofs.iter().enumerate() {
            let ra = reduced[da];
            if ra == usize::MAX {
                continue;
            }
            let (ax, ay) = local.gradients[a];
            for (b, &db) in local.dofs.iter().enumerate() {
                let (bx, by) = local.gradients[b];
                let k = scale * (ax * bx + ay * by);
                match self.constraints.get(db) {
                    Some(value) => rhs[ra] -= k * value,
                    None => {
                        let rb = reduced[db];
                        if rb <= ra {
                            stiffness.add(ra, rb, k);
                        }
                    }
                }
            }
        }
    }
}

/// Band needed to hold the couplings among `kept` after renumbering through
/// `reduced`.
fn reduced_bandwidth(basis: &SplineBasis, kept: &[usize], reduced: &[usize]) -> usize {
    let n = basis.per_axis();
    let p = basis.axis().degree();
    let mut bandwidth = 0;
    for &d in kept {
        let (a, b) = (d / n, d % n);
        for a2 in a.saturating_sub(p)..=(a + p).min(n - 1) {
            for b2 in b.saturating_sub(p)..=(b + p).min(n - 1) {
                let r = reduced[basis.dof(a2, b2)];
                if r != usize::MAX {
                    bandwidth = bandwidth.max(r.abs_diff(reduced[d]));
                }
            }
        }
    }
    bandwidth
}
