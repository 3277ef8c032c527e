//! Implicit-surface shape builders.
//!
//! Every builder evaluates an implicit function $f(x, y)$ that is positive
//! inside the structure and negative outside, then relaxes it to a smooth
//! occupancy $\sigma(\kappa f) \in (0, 1)$ with sharpness $\kappa$. The
//! relaxation keeps the occupancy differentiable in the shape parameters.
//!
//! Masks are returned per pixel with shape `(pixelsX, pixelsY, Nx, Ny)`;
//! broadcasting over batch and layers happens at assembly.

use ndarray::{Array4, ArrayView4};

use crate::family::ParameterizationType;
use crate::grid::CartesianGrid;
use crate::spec::{CellGeometrySpec, SpanLimits};

/// Exponent of the super-ellipse used for coupled rectangular posts.
pub const POWER_EXP: i32 = 10;

/// Logistic function, evaluated without overflow for large $|z|$.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Structure occupancy of every cell, or `None` for the empty family.
pub fn build_structure(
    family: ParameterizationType,
    params: ArrayView4<'_, f64>,
    spec: &CellGeometrySpec,
    grid: &CartesianGrid,
) -> Option<Array4<f64>> {
    let builder = ShapeBuilder {
        params,
        span: spec.span_limits,
        lx: spec.lx,
        ly: spec.ly,
        kappa: spec.sigmoid_coeff,
        grid,
    };
    let mask = match family {
        ParameterizationType::RectangularResonators => builder.rectangle(),
        ParameterizationType::EllipticalResonators => builder.ellipse(),
        ParameterizationType::CylindricalNanoposts => builder.cylinder(),
        ParameterizationType::CoupledEllipticalResonators => builder.coupled(2),
        ParameterizationType::CoupledRectangularResonators => builder.coupled(POWER_EXP),
        ParameterizationType::None => return None,
    };
    Some(mask)
}

/// Quadrant centres of the four coupled posts, in parameter order.
fn quadrant_centres(lx: f64, ly: f64) -> [(f64, f64); 4] {
    [
        (-lx / 4.0, -ly / 4.0),
        (-lx / 4.0, ly / 4.0),
        (lx / 4.0, -ly / 4.0),
        (lx / 4.0, ly / 4.0),
    ]
}

struct ShapeBuilder<'p, 'g> {
    /// `(d1, pixelsX, pixelsY, d2)`
    params: ArrayView4<'p, f64>,
    span: SpanLimits,
    lx: f64,
    ly: f64,
    kappa: f64,
    grid: &'g CartesianGrid,
}

impl ShapeBuilder<'_, '_> {
    fn shape(&self) -> (usize, usize, usize, usize) {
        let (_, px, py, _) = self.params.dim();
        let (nx, ny) = self.grid.dim();
        (px, py, nx, ny)
    }

    /// Physical x/y widths of structure `k` in pixel `(i, j)`.
    fn radii(&self, i: usize, j: usize, k: usize) -> (f64, f64) {
        (
            self.span.apply(self.params[[0, i, j, k]]) * self.lx,
            self.span.apply(self.params[[1, i, j, k]]) * self.ly,
        )
    }

    fn relax(&self, f: f64) -> f64 {
        sigmoid(self.kappa * f)
    }

    /// Diamond-norm post: $1 - |x/r_x - y/r_y| - |x/r_x + y/r_y|$.
    fn rectangle(&self) -> Array4<f64> {
        Array4::from_shape_fn(self.shape(), |(i, j, a, b)| {
            let (rx, ry) = self.radii(i, j, 0);
            let u = self.grid.x[[a, b]] / rx;
            let v = self.grid.y[[a, b]] / ry;
            self.relax(1.0 - (u - v).abs() - (u + v).abs())
        })
    }

    /// Centred ellipse: $1 - (2x/r_x)^2 - (2y/r_y)^2$.
    fn ellipse(&self) -> Array4<f64> {
        Array4::from_shape_fn(self.shape(), |(i, j, a, b)| {
            let (rx, ry) = self.radii(i, j, 0);
            let u = 2.0 * self.grid.x[[a, b]] / rx;
            let v = 2.0 * self.grid.y[[a, b]] / ry;
            self.relax(1.0 - u * u - v * v)
        })
    }

    /// Circular post of radius $\tfrac12 \min(L_x, L_y)$ times the spanned
    /// parameter.
    fn cylinder(&self) -> Array4<f64> {
        let half_min = 0.5 * self.lx.min(self.ly);
        Array4::from_shape_fn(self.shape(), |(i, j, a, b)| {
            let r = self.span.apply(self.params[[0, i, j, 0]]) * half_min;
            let u = self.grid.x[[a, b]] / r;
            let v = self.grid.y[[a, b]] / r;
            self.relax(1.0 - u * u - v * v)
        })
    }

    /// Four posts at the quadrant centres with boundary
    /// $1 - ((x-c_x)/r_x)^p - ((y-c_y)/r_y)^p$. Occupancies add, so
    /// overlapping posts may exceed one.
    fn coupled(&self, power: i32) -> Array4<f64> {
        let centres = quadrant_centres(self.lx, self.ly);
        Array4::from_shape_fn(self.shape(), |(i, j, a, b)| {
            let (x, y) = (self.grid.x[[a, b]], self.grid.y[[a, b]]);
            centres
                .iter()
                .enumerate()
                .map(|(k, &(cx, cy))| {
                    let (rx, ry) = self.radii(i, j, k);
                    let f = 1.0 - ((x - cx) / rx).powi(power) - ((y - cy) / ry).powi(power);
                    self.relax(f)
                })
                .sum()
        })
    }
}
