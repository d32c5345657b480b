// src/field/tests.rs

use super::basis::SplineAxis;
use super::domain::gauss_legendre;
use super::*;
use crate::error::FieldError;

const TOL: f64 = 1e-9;

fn setup(resolution: usize, degree: usize) -> FieldSetup {
    FieldSetup {
        resolution,
        degree,
        max_refine: 3,
    }
}

#[test_log::test]
fn gauss_rule_integrates_polynomials_exactly() {
    for n in 1..=5 {
        let rule = gauss_legendre(n);
        let total: f64 = rule.iter().map(|&(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-14);
        for k in 0..(2 * n) {
            let integral: f64 = rule.iter().map(|&(x, w)| w * x.powi(k as i32)).sum();
            let exact = 1.0 / (k as f64 + 1.0);
            assert!((integral - exact).abs() < 1e-13, "n={} k={}", n, k);
        }
        assert!(rule.iter().all(|&(x, _)| x > 0.0 && x < 1.0));
    }
}

#[test_log::test]
fn spline_axis_is_a_partition_of_unity() {
    for degree in 1..=4 {
        let axis = SplineAxis::new(7, degree);
        assert_eq!(axis.len(), 7 + degree);
        for step in 0..=70 {
            let u = step as f64 * 0.1;
            let e = axis.element_of(u);
            let (values, derivatives) = axis.values_and_derivatives(e, u);
            let sum: f64 = values.iter().sum();
            let dsum: f64 = derivatives.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "degree {} u {}", degree, u);
            assert!(dsum.abs() < 1e-10, "degree {} u {}", degree, u);
            assert!(values.iter().all(|&v| v >= -1e-14));
        }
    }
}

#[test_log::test]
fn spline_axis_interpolates_at_the_ends() {
    let axis = SplineAxis::new(5, 3);
    let start = axis.values(0, 0.0);
    assert_eq!(start[0], 1.0);
    assert!(start[1..].iter().all(|&v| v == 0.0));
    let end = axis.values(4, 5.0);
    assert!((end[3] - 1.0).abs() < 1e-14);
}

#[test_log::test]
fn derivative_matches_finite_difference() {
    let axis = SplineAxis::new(6, 3);
    let h = 1e-6;
    for &u in &[0.3, 1.7, 2.5, 4.05, 5.9] {
        let e = axis.element_of(u);
        let (_, d) = axis.values_and_derivatives(e, u);
        let plus = axis.values(e, u + h);
        let minus = axis.values(e, u - h);
        for k in 0..d.len() {
            let fd = (plus[k] - minus[k]) / (2.0 * h);
            assert!((fd - d[k]).abs() < 1e-6, "u {} k {}: {} vs {}", u, k, fd, d[k]);
        }
    }
}

#[test_log::test]
fn coupled_dofs_fit_inside_the_bandwidth() {
    let basis = SplineBasis::new(6, 2);
    let n = basis.per_axis();
    for i in 0..basis.dof_count() {
        for j in 0..basis.dof_count() {
            if basis.coupled(i, j) {
                assert!(i.abs_diff(j) <= basis.bandwidth());
            }
        }
    }
    assert!(basis.coupled(basis.dof(0, 0), basis.dof(2, 2)));
    assert!(!basis.coupled(basis.dof(0, 0), basis.dof(3, 0)));
    assert_eq!(n, 8);
}

#[test_log::test]
fn boundary_fit_reproduces_the_ramp_on_the_boundary() {
    let basis = SplineBasis::new(8, 3);
    let domain = RegularDomain::new(8);
    let ramp = boundary_ramp(8);
    let constraints = Constraints::fit_boundary(&basis, &domain, &ramp).unwrap();
    assert_eq!(constraints.count(), 4 * basis.per_axis() - 4);

    let coeffs: Vec<f64> = (0..basis.dof_count())
        .map(|d| constraints.get(d).unwrap_or(0.0))
        .collect();
    for step in 0..=16 {
        let s = step as f64 * 0.5;
        for &(x, y) in &[(s, 0.0), (s, 8.0), (0.0, s), (8.0, s)] {
            let u = basis.evaluate(&coeffs, x, y);
            assert!((u - ramp(x, y)).abs() < TOL, "at ({}, {}): {} vs {}", x, y, u, ramp(x, y));
        }
    }
}

#[test_log::test]
fn untrimmed_domain_solves_to_the_plane() {
    let (domain, solution) = solve(&setup(8, 3), |_, _| 1.0).unwrap();
    let ramp = boundary_ramp(8);
    let grid = sample(&solution, &domain);
    assert_eq!(grid.size(), 8);
    for i in 0..8 {
        for j in 0..8 {
            let (x, y) = (i as f64 + 0.5, j as f64 + 0.5);
            assert!((grid.get(i, j) - ramp(x, y)).abs() < 1e-8);
        }
    }
}

#[test_log::test]
fn sampling_keeps_domain_index_order() {
    let (domain, solution) = solve(&setup(6, 1), |_, _| 1.0).unwrap();
    let grid = sample(&solution, &domain);
    // The ramp grows faster along y, so stepping j moves further than stepping i.
    let step_i = grid.get(1, 0) - grid.get(0, 0);
    let step_j = grid.get(0, 1) - grid.get(0, 0);
    assert!(step_i > 0.0);
    assert!((step_j / step_i - 3f64.sqrt()).abs() < 1e-8);
}

#[test_log::test]
fn trimming_partitions_the_domain() {
    let domain = RegularDomain::new(16);
    let radius = 4.0;
    let disk = |x: f64, y: f64| (x - 8.0).hypot(y - 8.0) - radius;
    let (trimmed, complement) = domain.trim(disk, 3, 4);
    // The disk level set is negative inside, so the disk is the complement.
    assert!((trimmed.area() + complement.area() - 256.0).abs() < 1e-9);
    let disk_area = std::f64::consts::PI * radius * radius;
    assert!((complement.area() - disk_area).abs() < 0.5, "area {}", complement.area());
    assert!(trimmed.points().iter().all(|q| disk(q.x, q.y) >= 0.0));
    assert!(complement.points().iter().all(|q| disk(q.x, q.y) < 0.0));
}

#[test_log::test]
fn trimming_with_positive_levelset_keeps_everything() {
    let domain = RegularDomain::new(4);
    let (trimmed, complement) = domain.trim(|_, _| 0.0, 2, 2);
    assert!(complement.is_empty());
    assert_eq!(trimmed.len(), 4 * 4 * 4);
}

/// Square hole covering the support of the bilinear function at node (4, 4).
fn square_hole(x: f64, y: f64) -> f64 {
    (x - 4.0).abs().max((y - 4.0).abs()) - 1.0
}

#[test_log::test]
fn excised_support_without_complement_term_is_singular() {
    let domain = RegularDomain::new(8);
    let basis = SplineBasis::new(8, 1);
    let (trimmed, _) = domain.trim(square_hole, 2, 2);
    let constraints = Constraints::fit_boundary(&basis, &domain, boundary_ramp(8)).unwrap();
    let problem = FieldProblemBuilder::new(&basis)
        .harmonic("trimmed", 1.0, &trimmed)
        .dirichlet(constraints)
        .build();
    assert!(matches!(problem.solve(), Err(FieldError::Singular { .. })));
}

#[test_log::test]
fn complement_term_gives_excised_dofs_a_bounded_value() {
    let (_, solution) = solve(&setup(8, 1), square_hole).unwrap();
    let basis = solution.basis();
    let hidden = solution.coefficients()[basis.dof(4, 4)];
    let top = 0.5 * (1.0 + 3f64.sqrt());
    assert!(hidden.is_finite());
    assert!(hidden > 0.0 && hidden < top, "hidden dof = {}", hidden);
}

#[test_log::test]
fn weights_combine_into_one_problem() {
    let domain = RegularDomain::new(8);
    let basis = SplineBasis::new(8, 2);
    let (trimmed, complement) = domain.trim(square_hole, 3, 2);
    let problem = FieldProblemBuilder::new(&basis)
        .harmonic("trimmed", 1.0, &trimmed)
        .harmonic("complement", COMPLEMENT_WEIGHT, &complement)
        .dirichlet(Constraints::fit_boundary(&basis, &domain, boundary_ramp(8)).unwrap())
        .build();
    let names: Vec<_> = problem.terms().iter().map(|t| t.name).collect();
    assert_eq!(names, ["trimmed", "complement"]);
    assert_eq!(problem.terms()[1].weight, COMPLEMENT_WEIGHT);
    assert!(problem.solve().is_ok());
}

#[test_log::test]
fn boundary_rule_covers_the_perimeter() {
    let domain = RegularDomain::new(6);
    let points = domain.boundary(3);
    assert_eq!(points.len(), 4 * 6 * 3);
    let length: f64 = points.iter().map(|q| q.weight).sum();
    assert!((length - 24.0).abs() < TOL);
    assert!(points
        .iter()
        .all(|q| q.x == 0.0 || q.x == 6.0 || q.y == 0.0 || q.y == 6.0));
}
