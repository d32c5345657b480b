// src/glyph/tests.rs

use super::*;
use std::f64::consts::PI;

const EPS: f64 = 1e-9;

/// Points on the outer contour of the upright staple, sampled along each piece.
fn staple_contour_points() -> Vec<(f64, f64)> {
    let (cx, cy) = STAPLE_ANCHOR;
    let outer = ARCH_RADIUS + HALF_STROKE;
    let inner = ARCH_RADIUS - HALF_STROKE;
    let mut points = Vec::new();
    for k in 0..=10 {
        let t = -LEG_HALF_LENGTH + 2.0 * LEG_HALF_LENGTH * f64::from(k) / 10.0;
        // both faces of both legs
        points.push((cx + outer, cy + t));
        points.push((cx - outer, cy + t));
        points.push((cx + inner, cy + t));
        points.push((cx - inner, cy + t));
    }
    for k in 1..10 {
        let theta = PI * f64::from(k) / 10.0;
        points.push((cx + outer * theta.cos(), cy + LEG_HALF_LENGTH + outer * theta.sin()));
        points.push((cx + inner * theta.cos(), cy + LEG_HALF_LENGTH + inner * theta.sin()));
    }
    for k in 0..=10 {
        // right foot, outer face, inside its quarter
        let phi = 0.5 * PI * f64::from(k) / 10.0;
        let fx = -outer * phi.cos();
        let fy = -outer * phi.sin();
        points.push((cx + 2.0 * ARCH_RADIUS + fx, cy - LEG_HALF_LENGTH + fy));
    }
    for k in 1..10 {
        // rounded cap at the right foot tip
        let psi = -0.5 * PI + PI * f64::from(k) / 10.0;
        points.push((
            cx + 2.0 * ARCH_RADIUS + HALF_STROKE * psi.cos(),
            cy - LEG_HALF_LENGTH - ARCH_RADIUS + HALF_STROKE * psi.sin(),
        ));
    }
    points
}

#[test_log::test]
fn contour_points_have_zero_distance() {
    for (x, y) in staple_contour_points() {
        let d = staple_distance(x, y);
        assert!(d.abs() < EPS, "staple_distance({}, {}) = {}", x, y, d);
    }
}

#[test_log::test]
fn centerline_is_inside_by_half_a_stroke() {
    let (cx, cy) = STAPLE_ANCHOR;
    for k in 0..=10 {
        let t = -LEG_HALF_LENGTH + 2.0 * LEG_HALF_LENGTH * f64::from(k) / 10.0;
        let d = staple_distance(cx + ARCH_RADIUS, cy + t);
        assert!((d + HALF_STROKE).abs() < EPS);
        assert!(distance(cx + ARCH_RADIUS, cy + t) < 0.0);
    }
    let top = staple_distance(cx, cy + LEG_HALF_LENGTH + ARCH_RADIUS);
    assert!((top + HALF_STROKE).abs() < EPS);
}

#[test_log::test]
fn gaps_between_legs_are_outside() {
    let (cx, cy) = STAPLE_ANCHOR;
    assert!(staple_distance(cx, cy) > 0.0);
    assert!((staple_distance(cx, cy) - HALF_STROKE).abs() < EPS);
}

#[test_log::test]
fn far_points_measure_straight_line_distance() {
    // Nearest contour: the upright arch, centered at (-1, 2.5) with outer radius 1.5.
    let expected = (1.0f64).hypot(97.5) - 1.5;
    assert!((distance(0.0, 100.0) - expected).abs() < EPS);

    // Nearest contour: the rotated staple's foot cap around (3, 1.5).
    let expected = (97.0f64).hypot(0.5) - 0.5;
    assert!((distance(100.0, 1.0) - expected).abs() < EPS);

    // And the mirror image through the origin.
    assert!((distance(-100.0, -1.0) - expected).abs() < EPS);
}

#[test_log::test]
fn combined_glyph_is_half_turn_symmetric() {
    for i in -40..=40 {
        for j in -40..=40 {
            let x = f64::from(i) * 0.137;
            let y = f64::from(j) * 0.113;
            assert_eq!(distance(x, y), distance(-x, -y), "at ({}, {})", x, y);
        }
    }
}

#[test_log::test]
fn single_staple_is_not_half_turn_symmetric() {
    let (cx, cy) = STAPLE_ANCHOR;
    let x = cx;
    let y = cy + LEG_HALF_LENGTH + ARCH_RADIUS;
    assert!(staple_distance(x, y) < 0.0);
    assert!(staple_distance(-x, -y) > 0.0);
}

#[test_log::test]
fn frame_maps_domain_center_to_origin() {
    let frame = GlyphFrame::new(64, 4);
    assert_eq!(frame.to_glyph(32.0, 32.0), (0.0, 0.0));
    assert_eq!(frame.to_glyph(36.0, 28.0), (1.0, -1.0));
    assert_eq!(frame.to_glyph(0.0, 64.0), (-8.0, 8.0));
}

#[test_log::test]
fn even_stroke_on_even_grid_puts_stem_edges_on_cell_boundaries() {
    let frame = GlyphFrame::new(64, 4);
    assert!(frame.distance_at(34.0, 32.0).abs() < EPS);
    assert!(frame.distance_at(30.0, 32.0).abs() < EPS);
}

#[test_log::test]
fn center_cell_lies_inside_the_glyph() {
    let frame = GlyphFrame::new(64, 4);
    assert!(frame.distance_at(32.5, 31.5) < 0.0);
    assert!(frame.distance_at(31.5, 32.5) < 0.0);
}

#[test_log::test]
fn domain_corners_are_well_outside() {
    let frame = GlyphFrame::new(64, 4);
    for &(x, y) in &[(0.5, 0.5), (63.5, 0.5), (0.5, 63.5), (63.5, 63.5)] {
        assert!(frame.distance_at(x, y) > 3.0);
    }
}
