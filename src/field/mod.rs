// src/field/mod.rs

//! The harmonic field around the glyph.
//!
//! The regular domain is trimmed by the glyph's distance function. A Laplace
//! problem on the remaining region carries the visible field; the same
//! problem on the excised complement, scaled down by [`COMPLEMENT_WEIGHT`],
//! is added before solving so that degrees of freedom supported mostly
//! inside the glyph still receive definite values. The domain boundary is
//! held to a linear ramp tilted 30° from the y axis.
//!
//! The two problems are summed, never solved one after the other: a second
//! independent solve gives degrees of freedom with tiny support large
//! corrective values and shows up as artifacts along the glyph edge.

pub mod banded;
pub mod basis;
pub mod domain;
pub mod problem;
pub mod sample;

pub use basis::SplineBasis;
pub use domain::{Region, RegularDomain};
pub use problem::{Constraints, FieldProblem, FieldProblemBuilder, FieldSolution};
pub use sample::{sample, SampledGrid};

use log::info;

use crate::error::FieldError;

/// Weight of the harmonic term on the excised region, relative to the
/// visible one.
pub const COMPLEMENT_WEIGHT: f64 = 1e-5;

/// Discretisation parameters for [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSetup {
    pub resolution: usize,
    pub degree: usize,
    pub max_refine: u32,
}

/// Boundary data: `(ξ + √3 η) / 2` in normalised coordinates `ξ = x/N`,
/// `η = y/N`. Without trimming this ramp is itself the solution.
pub fn boundary_ramp(resolution: usize) -> impl Fn(f64, f64) -> f64 {
    let n = resolution as f64;
    move |x, y| 0.5 * (x / n + 3f64.sqrt() * y / n)
}

/// Trims the regular domain with `levelset` and solves the combined problem.
///
/// `levelset` is evaluated in index coordinates; the region where it is
/// non-negative carries the primary term.
pub fn solve<F>(setup: &FieldSetup, levelset: F) -> Result<(RegularDomain, FieldSolution), FieldError>
where
    F: Fn(f64, f64) -> f64,
{
    let domain = RegularDomain::new(setup.resolution);
    let basis = SplineBasis::new(setup.resolution, setup.degree);
    let order = setup.degree + 1;

    let (trimmed, complement) = domain.trim(levelset, order, setup.max_refine);
    info!(
        "trimmed domain: area {:.3} kept, {:.3} excised",
        trimmed.area(),
        complement.area()
    );

    let constraints = Constraints::fit_boundary(&basis, &domain, boundary_ramp(setup.resolution))?;
    let problem = FieldProblemBuilder::new(&basis)
        .harmonic("trimmed", 1.0, &trimmed)
        .harmonic("complement", COMPLEMENT_WEIGHT, &complement)
        .dirichlet(constraints)
        .build();
    let solution = problem.solve()?;
    Ok((domain, solution))
}

#[cfg(test)]
mod tests;
