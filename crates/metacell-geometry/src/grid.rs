//! Centred cartesian sampling of a unit-cell cross-section.

use ndarray::{Array1, Array2};

/// Sample coordinates of an `(Nx, Ny)` grid spanning `Lx × Ly`, centred on
/// the origin. `x[[i, j]]` depends only on `i`, `y[[i, j]]` only on `j`.
#[derive(Debug, Clone)]
pub struct CartesianGrid {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
}

impl CartesianGrid {
    /// Build the grid with spacing `Lx / Nx` and `Ly / Ny`.
    pub fn new(lx: f64, nx: usize, ly: f64, ny: usize) -> Self {
        let xa = centred_axis(lx, nx);
        let ya = centred_axis(ly, ny);
        Self {
            x: Array2::from_shape_fn((nx, ny), |(i, _)| xa[i]),
            y: Array2::from_shape_fn((nx, ny), |(_, j)| ya[j]),
        }
    }

    /// `(Nx, Ny)`.
    pub fn dim(&self) -> (usize, usize) {
        self.x.dim()
    }
}

fn centred_axis(length: f64, n: usize) -> Array1<f64> {
    let step = length / n as f64;
    let axis = Array1::from_shape_fn(n, |i| i as f64 * step);
    let mean = axis.mean().unwrap_or(0.0);
    axis - mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_grid_is_centred_with_cell_spacing() {
        let grid = CartesianGrid::new(400e-9, 4, 300e-9, 3);
        assert_eq!(grid.dim(), (4, 3));

        let xs: Vec<f64> = grid.x.column(0).to_vec();
        let expected = [-150e-9, -50e-9, 50e-9, 150e-9];
        for (x, e) in xs.iter().zip(expected) {
            assert_abs_diff_eq!(*x, e, epsilon = 1e-18);
        }
        let ys: Vec<f64> = grid.y.row(0).to_vec();
        for (y, e) in ys.iter().zip([-100e-9, 0.0, 100e-9]) {
            assert_abs_diff_eq!(*y, e, epsilon = 1e-18);
        }
    }

    #[test]
    fn test_coordinates_are_separable() {
        let grid = CartesianGrid::new(1.0, 5, 2.0, 6);
        for i in 0..5 {
            for j in 0..6 {
                assert_eq!(grid.x[[i, j]], grid.x[[i, 0]]);
                assert_eq!(grid.y[[i, j]], grid.y[[0, j]]);
            }
        }
    }
}
