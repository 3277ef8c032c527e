//! Assembly of per-cell material tensors.
//!
//! [`generate_cell_perm`] turns a normalised parameter tensor into relative
//! permittivity and permeability tensors of shape
//! `(batch, pixelsX, pixelsY, Nlay, Nx, Ny)`. Each structured layer blends
//! its background towards the structure material with the sigmoid
//! occupancy $m$:
//!
//! $$\varepsilon_l(x, y) = \varepsilon_{b,l} + (\varepsilon_r - \varepsilon_{b,l})\, m(x, y)$$
//!
//! Layers the family does not cover keep their background value.

use ndarray::{Array4, Array6, ArrayView4};
use num_complex::Complex64;

use crate::family::LayerCoverage;
use crate::grid::CartesianGrid;
use crate::shapes::build_structure;
use crate::spec::{CellGeometrySpec, GeometryError};

/// Relative material tensors for every cell of a metasurface batch.
#[derive(Debug, Clone)]
pub struct CellMaterials {
    pub permittivity: Array6<Complex64>,
    pub permeability: Array6<Complex64>,
}

/// Generate permittivity and permeability for a batch of unit cells.
///
/// `norm_param` has shape `(d1, pixelsX, pixelsY, d2)` as required by the
/// configured family, with entries nominally in `[0, 1]`. The `None` family
/// ignores `norm_param` entirely. Every batch entry receives the same
/// structure.
pub fn generate_cell_perm(
    norm_param: ArrayView4<'_, f64>,
    spec: &CellGeometrySpec,
) -> Result<CellMaterials, GeometryError> {
    spec.validate()?;
    let family = spec.parameterization_type;
    family.check_params(norm_param.dim(), (spec.pixels_x, spec.pixels_y))?;

    let grid = CartesianGrid::new(spec.lx, spec.nx, spec.ly, spec.ny);
    let mask = build_structure(family, norm_param, spec, &grid);
    log::debug!(
        "Synthesised {} cells: {}x{} pixels, {} layer(s), {}x{} samples",
        family,
        spec.pixels_x,
        spec.pixels_y,
        spec.nlay,
        spec.nx,
        spec.ny
    );

    let shape = spec.materials_shape();
    let permittivity = match mask {
        Some(mask) => blend_layers(&mask, family.layer_coverage(), spec),
        None => Array6::from_shape_fn(shape, |(_, _, _, l, _, _)| spec.lay_eps_list[l].0),
    };
    let permeability = Array6::from_elem(shape, spec.urd.0);

    Ok(CellMaterials {
        permittivity,
        permeability,
    })
}

fn blend_layers(
    mask: &Array4<f64>,
    coverage: LayerCoverage,
    spec: &CellGeometrySpec,
) -> Array6<Complex64> {
    let erd = spec.erd.0;
    Array6::from_shape_fn(spec.materials_shape(), |(_, i, j, l, a, b)| {
        let background = spec.lay_eps_list[l].0;
        let structured = match coverage {
            LayerCoverage::All => true,
            LayerCoverage::Single(layer) => layer == l,
            LayerCoverage::Empty => false,
        };
        if structured {
            background + (erd - background) * mask[[i, j, a, b]]
        } else {
            background
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::ParameterizationType;
    use crate::spec::{ComplexScalar, SpanLimits};
    use approx::assert_abs_diff_eq;

    fn spec(family: ParameterizationType, nlay: usize) -> CellGeometrySpec {
        CellGeometrySpec {
            parameterization_type: family,
            batch_size: 2,
            pixels_x: 1,
            pixels_y: 1,
            nlay,
            nx: 9,
            ny: 9,
            lx: 1.0,
            ly: 1.0,
            span_limits: SpanLimits { min: 0.1, max: 0.9 },
            sigmoid_coeff: 200.0,
            lay_eps_list: (0..nlay).map(|l| ComplexScalar::from(1.0 + l as f64)).collect(),
            erd: ComplexScalar::from(10.0),
            urd: ComplexScalar::from(1.0),
        }
    }

    #[test]
    fn test_uncovered_layers_keep_background() {
        let spec = spec(ParameterizationType::RectangularResonators, 3);
        let params = Array4::from_elem((2, 1, 1, 1), 0.5);
        let out = generate_cell_perm(params.view(), &spec).unwrap();
        for l in [0, 2] {
            for a in 0..9 {
                for b in 0..9 {
                    assert_eq!(out.permittivity[[1, 0, 0, l, a, b]].re, 1.0 + l as f64);
                }
            }
        }
        // Centre of layer 1 sits inside the post.
        assert_abs_diff_eq!(out.permittivity[[0, 0, 0, 1, 4, 4]].re, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_wrong_param_shape_is_rejected_before_synthesis() {
        let spec = spec(ParameterizationType::CylindricalNanoposts, 1);
        let params = Array4::from_elem((2, 1, 1, 1), 0.5);
        assert!(matches!(
            generate_cell_perm(params.view(), &spec),
            Err(GeometryError::ParamShape { .. })
        ));
    }
}
