//! Inputs and outputs of an inverse-design lookup.

use ndarray::{Array3, ArrayD};

/// Target optical responses for a batch of metasurface designs.
///
/// The three lists run in parallel: design `i` is
/// `(transmission[i], phase[i], wavelengths[i])`. Each map is shaped
/// `(polarisations, Ny, Nx)` where the polarisation count must match the
/// library being inverted.
#[derive(Debug, Clone, Default)]
pub struct DesignTargetSpec {
    pub transmission: Vec<Array3<f64>>,
    pub phase: Vec<Array3<f64>>,
    /// Target wavelength of each design (m).
    pub wavelengths: Vec<f64>,
}

impl DesignTargetSpec {
    pub fn new(transmission: Vec<Array3<f64>>, phase: Vec<Array3<f64>>, wavelengths: Vec<f64>) -> Self {
        Self {
            transmission,
            phase,
            wavelengths,
        }
    }

    /// Append one design.
    pub fn push(&mut self, transmission: Array3<f64>, phase: Array3<f64>, wavelength: f64) {
        self.transmission.push(transmission);
        self.phase.push(phase);
        self.wavelengths.push(wavelength);
    }

    /// Number of designs, taken from the wavelength list.
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }
}

/// Geometry recovered for each design, in input order.
///
/// With `reshaped == false` each entry has shape `(pixels, axes)`, one row
/// per cell in row-major `(Ny, Nx)` order. With `reshaped == true` each entry
/// has shape `(axes, Ny, Nx)`.
#[derive(Debug, Clone)]
pub struct GeometrySolution {
    /// Physical geometry (m).
    pub physical: Vec<ArrayD<f64>>,
    /// Geometry normalised to the library's fixed axis limits.
    pub normalized: Vec<ArrayD<f64>>,
    pub reshaped: bool,
}

impl GeometrySolution {
    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.physical.is_empty()
    }
}
