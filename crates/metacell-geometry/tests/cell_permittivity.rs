//! Integration tests for unit-cell permittivity synthesis.
//!
//! - `None` family yields layer backgrounds and ignores parameters
//! - Output tensors have shape `(batch, pixelsX, pixelsY, Nlay, Nx, Ny)`
//! - Cylinders fill the cell centre and leave the corners empty
//! - Coupled posts read their own parameter slice and sum occupancies
//! - Rectangular posts only touch layer 1
//! - Parameter shape errors surface before synthesis

use approx::assert_abs_diff_eq;
use ndarray::{Array4, Axis};
use num_complex::Complex64;

use metacell_geometry::{
    generate_cell_perm, CellGeometrySpec, ComplexScalar, GeometryError, ParameterizationType,
    SpanLimits,
};

// ─────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────

fn base_spec(family: ParameterizationType) -> CellGeometrySpec {
    CellGeometrySpec {
        parameterization_type: family,
        batch_size: 1,
        pixels_x: 1,
        pixels_y: 1,
        nlay: 1,
        nx: 21,
        ny: 21,
        lx: 1.0,
        ly: 1.0,
        span_limits: SpanLimits { min: 0.1, max: 0.9 },
        sigmoid_coeff: 500.0,
        lay_eps_list: vec![ComplexScalar::from(1.0)],
        erd: ComplexScalar::from(4.0),
        urd: ComplexScalar::from(1.0),
    }
}

/// Six samples per side over a unit cell put grid points exactly on the
/// coupled-post centres: index 1 is -L/4, index 4 is +L/4.
fn coupled_spec(family: ParameterizationType, span: SpanLimits, kappa: f64) -> CellGeometrySpec {
    CellGeometrySpec {
        nx: 6,
        ny: 6,
        span_limits: span,
        sigmoid_coeff: kappa,
        ..base_spec(family)
    }
}

fn eps(out: &metacell_geometry::CellMaterials, layer: usize, a: usize, b: usize) -> Complex64 {
    out.permittivity[[0, 0, 0, layer, a, b]]
}

// ─────────────────────────────────────────────────────────────
// Shapes and uniform outputs
// ─────────────────────────────────────────────────────────────

#[test]
fn test_none_family_is_background_everywhere() {
    let spec = CellGeometrySpec {
        batch_size: 2,
        pixels_x: 2,
        pixels_y: 3,
        nlay: 2,
        nx: 5,
        ny: 4,
        lay_eps_list: vec![ComplexScalar::from(2.25), ComplexScalar(Complex64::new(1.5, 0.1))],
        ..base_spec(ParameterizationType::None)
    };
    // Shape deliberately unrelated to the pixel grid.
    let params = Array4::from_elem((7, 1, 1, 7), 0.3);
    let out = generate_cell_perm(params.view(), &spec).unwrap();

    assert_eq!(out.permittivity.dim(), (2, 2, 3, 2, 5, 4));
    for (layer, slab) in out.permittivity.axis_iter(Axis(3)).enumerate() {
        let expected = spec.lay_eps_list[layer].0;
        assert!(slab.iter().all(|&v| v == expected));
    }
}

#[test]
fn test_output_shapes_and_uniform_permeability() {
    let spec = CellGeometrySpec {
        batch_size: 3,
        pixels_x: 2,
        pixels_y: 3,
        nlay: 2,
        nx: 8,
        ny: 6,
        lay_eps_list: vec![ComplexScalar::from(1.0), ComplexScalar::from(2.0)],
        urd: ComplexScalar(Complex64::new(1.2, -0.3)),
        ..base_spec(ParameterizationType::CoupledEllipticalResonators)
    };
    let params = Array4::from_elem((2, 2, 3, 4), 0.4);
    let out = generate_cell_perm(params.view(), &spec).unwrap();

    assert_eq!(out.permittivity.dim(), (3, 2, 3, 2, 8, 6));
    assert_eq!(out.permeability.dim(), (3, 2, 3, 2, 8, 6));
    assert!(out
        .permeability
        .iter()
        .all(|&v| v == Complex64::new(1.2, -0.3)));
}

#[test]
fn test_batch_entries_are_identical() {
    let spec = CellGeometrySpec {
        batch_size: 4,
        pixels_x: 2,
        pixels_y: 2,
        ..base_spec(ParameterizationType::EllipticalResonators)
    };
    let params = Array4::from_shape_fn((2, 2, 2, 1), |(c, i, j, _)| 0.2 * (c + i + 2 * j) as f64);
    let out = generate_cell_perm(params.view(), &spec).unwrap();
    let first = out.permittivity.index_axis(Axis(0), 0);
    for b in 1..4 {
        assert_eq!(out.permittivity.index_axis(Axis(0), b), first);
    }
}

// ─────────────────────────────────────────────────────────────
// Single-post families
// ─────────────────────────────────────────────────────────────

#[test]
fn test_cylinder_fills_centre_not_corners() {
    let spec = CellGeometrySpec {
        span_limits: SpanLimits { min: 0.8, max: 0.8 },
        ..base_spec(ParameterizationType::CylindricalNanoposts)
    };
    let params = Array4::from_elem((1, 1, 1, 1), 1.0);
    let out = generate_cell_perm(params.view(), &spec).unwrap();

    assert_abs_diff_eq!(eps(&out, 0, 10, 10).re, 4.0, epsilon = 1e-9);
    for (a, b) in [(0, 0), (0, 20), (20, 0), (20, 20)] {
        assert_abs_diff_eq!(eps(&out, 0, a, b).re, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_ellipse_follows_per_axis_widths() {
    // rx = 0.9, ry = 0.1
    let spec = base_spec(ParameterizationType::EllipticalResonators);
    let mut params = Array4::zeros((2, 1, 1, 1));
    params[[0, 0, 0, 0]] = 1.0;
    let out = generate_cell_perm(params.view(), &spec).unwrap();

    // (x, y) = (6/21, 0) is inside, (0, 6/21) is outside.
    assert_abs_diff_eq!(eps(&out, 0, 16, 10).re, 4.0, epsilon = 1e-9);
    assert_abs_diff_eq!(eps(&out, 0, 10, 16).re, 1.0, epsilon = 1e-9);
}

#[test]
fn test_rectangular_post_only_touches_layer_one() {
    let spec = CellGeometrySpec {
        nlay: 3,
        lay_eps_list: vec![
            ComplexScalar::from(1.0),
            ComplexScalar::from(1.0),
            ComplexScalar::from(2.25),
        ],
        ..base_spec(ParameterizationType::RectangularResonators)
    };
    let params = Array4::from_elem((2, 1, 1, 1), 0.5);
    let out = generate_cell_perm(params.view(), &spec).unwrap();

    let layer = |l: usize| out.permittivity.index_axis(Axis(3), l).to_owned();
    assert!(layer(0).iter().all(|&v| v == Complex64::new(1.0, 0.0)));
    assert!(layer(2).iter().all(|&v| v == Complex64::new(2.25, 0.0)));
    assert_abs_diff_eq!(eps(&out, 1, 10, 10).re, 4.0, epsilon = 1e-9);
    assert_abs_diff_eq!(eps(&out, 1, 0, 0).re, 1.0, epsilon = 1e-9);
}

#[test]
fn test_rectangular_with_single_layer_is_rejected() {
    let spec = base_spec(ParameterizationType::RectangularResonators);
    let params = Array4::from_elem((2, 1, 1, 1), 0.5);
    assert!(matches!(
        generate_cell_perm(params.view(), &spec),
        Err(GeometryError::InvalidConfig(_))
    ));
}

// ─────────────────────────────────────────────────────────────
// Coupled families
// ─────────────────────────────────────────────────────────────

#[test]
fn test_coupled_masks_sum_across_posts() {
    // With zero sharpness each post contributes exactly one half.
    let spec = coupled_spec(
        ParameterizationType::CoupledEllipticalResonators,
        SpanLimits { min: 0.2, max: 0.2 },
        0.0,
    );
    let params = Array4::from_elem((2, 1, 1, 4), 0.5);
    let out = generate_cell_perm(params.view(), &spec).unwrap();
    // 1 + (4 - 1) * 2
    assert!(out
        .permittivity
        .iter()
        .all(|v| (v.re - 7.0).abs() < 1e-12 && v.im == 0.0));
}

#[test]
fn test_coupled_posts_use_their_own_parameters() {
    // Post 2 sits at (+L/4, -L/4) and is the only wide one.
    let spec = coupled_spec(
        ParameterizationType::CoupledEllipticalResonators,
        SpanLimits { min: 0.1, max: 0.3 },
        200.0,
    );
    let mut params = Array4::zeros((2, 1, 1, 4));
    params[[0, 0, 0, 2]] = 1.0;
    params[[1, 0, 0, 2]] = 1.0;
    let out = generate_cell_perm(params.view(), &spec).unwrap();

    for (a, b) in [(1, 1), (1, 4), (4, 1), (4, 4)] {
        assert_abs_diff_eq!(eps(&out, 0, a, b).re, 4.0, epsilon = 1e-6);
    }
    // One sample off-centre in y: inside the wide post, outside its mirror.
    assert_abs_diff_eq!(eps(&out, 0, 4, 2).re, 4.0, epsilon = 1e-6);
    assert_abs_diff_eq!(eps(&out, 0, 1, 2).re, 1.0, epsilon = 1e-6);
}

#[test]
fn test_rectangular_posts_are_squarer_than_elliptical() {
    // r = 5/24 puts sample (5, 5) at 0.8 r from post 3 in both x and y.
    let span = SpanLimits { min: 5.0 / 24.0, max: 5.0 / 24.0 };
    let params = Array4::from_elem((2, 1, 1, 4), 0.5);

    let rect = coupled_spec(ParameterizationType::CoupledRectangularResonators, span, 50.0);
    let rect = generate_cell_perm(params.view(), &rect).unwrap();
    let ellipse = coupled_spec(ParameterizationType::CoupledEllipticalResonators, span, 50.0);
    let ellipse = generate_cell_perm(params.view(), &ellipse).unwrap();

    assert_abs_diff_eq!(eps(&rect, 0, 5, 5).re, 4.0, epsilon = 1e-6);
    assert_abs_diff_eq!(eps(&ellipse, 0, 5, 5).re, 1.0, epsilon = 1e-4);
}

// ─────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────

#[test]
fn test_param_shape_mismatch() {
    let spec = CellGeometrySpec {
        pixels_x: 3,
        pixels_y: 3,
        ..base_spec(ParameterizationType::CoupledRectangularResonators)
    };
    let params = Array4::from_elem((2, 3, 3, 1), 0.5);
    match generate_cell_perm(params.view(), &spec) {
        Err(GeometryError::ParamShape { expected, found, .. }) => {
            assert_eq!(expected, (2, 3, 3, 4));
            assert_eq!(found, (2, 3, 3, 1));
        }
        other => panic!("expected ParamShape, got {other:?}"),
    }
}

#[test]
fn test_spec_loads_from_toml() {
    let spec: CellGeometrySpec = toml::from_str(
        r#"
        parameterization_type = "cylindrical_nanoposts"
        pixels_x = 1
        pixels_y = 1
        nlay = 1
        nx = 11
        ny = 11
        lx = 180e-9
        ly = 180e-9
        span_limits = { min = 0.2, max = 0.9 }
        sigmoid_coeff = 1000.0
        lay_eps_list = [1.0]
        erd = [6.0, 0.02]
        "#,
    )
    .unwrap();
    let params = Array4::from_elem((1, 1, 1, 1), 0.5);
    let out = generate_cell_perm(params.view(), &spec).unwrap();
    assert_eq!(out.permittivity.dim(), (1, 1, 1, 1, 11, 11));
    assert_abs_diff_eq!(eps(&out, 0, 5, 5).im, 0.02, epsilon = 1e-9);
}
