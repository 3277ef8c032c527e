//! Precomputed optical-response tables.
//!
//! A [`ResponseTable`] stores the phase and transmission of every simulated
//! cell geometry at every simulated wavelength. The geometry mesh grid of the
//! raw sweep (one or two axes) is flattened row-major into a single
//! *candidate* axis at construction, so each candidate is one row of the
//! geometry matrix and one column of the response arrays.

use ndarray::{s, Array1, Array2, Array3, ArrayView1, ArrayView2};
use num_complex::Complex64;

use crate::library::LibraryError;
use crate::search;

/// Fixed physical bounds of a geometry axis, used for normalisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamLimits {
    pub min: f64,
    pub max: f64,
}

impl ParamLimits {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a physical value affinely so that `min → 0` and `max → 1`.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, normalized: f64) -> f64 {
        normalized * (self.max - self.min) + self.min
    }
}

/// A named geometry degree of freedom with its normalisation bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryAxis {
    pub name: &'static str,
    pub limits: ParamLimits,
}

/// Immutable phase/transmission table indexed by (polarisation, candidate,
/// wavelength).
#[derive(Debug, Clone)]
pub struct ResponseTable {
    /// Phase (rad), shape `(polarisations, candidates, wavelengths)`.
    phase: Array3<f64>,
    /// Transmission amplitude, same shape as `phase`. Stored as loaded.
    transmission: Array3<f64>,
    /// Physical geometry (m) of each candidate, shape `(candidates, axes)`.
    geometry: Array2<f64>,
    /// Simulated wavelengths (m).
    wavelengths: Array1<f64>,
    /// Shape of the geometry mesh grid before flattening.
    grid_shape: Vec<usize>,
}

impl ResponseTable {
    /// Assemble a table, checking that every array agrees on its axes.
    pub fn new(
        phase: Array3<f64>,
        transmission: Array3<f64>,
        geometry: Array2<f64>,
        wavelengths: Array1<f64>,
        grid_shape: Vec<usize>,
    ) -> Result<Self, LibraryError> {
        if phase.dim() != transmission.dim() {
            return Err(LibraryError::InvalidTable(format!(
                "phase shape {:?} differs from transmission shape {:?}",
                phase.shape(),
                transmission.shape()
            )));
        }
        let (npol, ncand, nw) = phase.dim();
        if npol == 0 || ncand == 0 || nw == 0 {
            return Err(LibraryError::InvalidTable(format!(
                "table has an empty axis: {:?}",
                phase.shape()
            )));
        }
        if geometry.nrows() != ncand {
            return Err(LibraryError::InvalidTable(format!(
                "{} geometry rows for {} candidates",
                geometry.nrows(),
                ncand
            )));
        }
        if wavelengths.len() != nw {
            return Err(LibraryError::InvalidTable(format!(
                "{} wavelengths for a wavelength axis of length {}",
                wavelengths.len(),
                nw
            )));
        }
        if grid_shape.iter().product::<usize>() != ncand {
            return Err(LibraryError::InvalidTable(format!(
                "grid shape {:?} does not flatten to {} candidates",
                grid_shape, ncand
            )));
        }
        Ok(Self {
            phase,
            transmission,
            geometry,
            wavelengths,
            grid_shape,
        })
    }

    pub fn polarizations(&self) -> usize {
        self.phase.dim().0
    }

    pub fn candidates(&self) -> usize {
        self.phase.dim().1
    }

    pub fn phase(&self) -> &Array3<f64> {
        &self.phase
    }

    pub fn transmission(&self) -> &Array3<f64> {
        &self.transmission
    }

    pub fn geometry(&self) -> ArrayView2<'_, f64> {
        self.geometry.view()
    }

    pub fn wavelengths(&self) -> ArrayView1<'_, f64> {
        self.wavelengths.view()
    }

    pub fn grid_shape(&self) -> &[usize] {
        &self.grid_shape
    }

    /// Index of the simulated wavelength closest to `wavelength`.
    ///
    /// Equidistant grid points resolve to the lower index.
    pub fn nearest_wavelength_index(&self, wavelength: f64) -> usize {
        search::nearest_index(self.wavelengths.view(), wavelength)
    }

    /// Complex response $t\,e^{i\phi}$ of every candidate at one wavelength,
    /// shape `(candidates, polarisations)`.
    ///
    /// Transmission is clamped to `[0, 1]` on the fly; phase is used as is.
    pub fn responses_at(&self, wavelength_index: usize) -> Array2<Complex64> {
        let phase = self.phase.slice(s![.., .., wavelength_index]);
        let trans = self.transmission.slice(s![.., .., wavelength_index]);
        Array2::from_shape_fn((self.candidates(), self.polarizations()), |(k, c)| {
            Complex64::from_polar(trans[[c, k]].clamp(0.0, 1.0), phase[[c, k]])
        })
    }
}
