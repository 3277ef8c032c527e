//! Refractive-index provider trait.
//!
//! Every material source implements [`IndexProvider`], which maps a list of
//! wavelengths (metres) to complex refractive indices $\tilde{n} = n + ik$.

use num_complex::Complex64;
use thiserror::Error;

/// Errors from material providers.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("Wavelength {wavelength_m:e} m is outside the data range [{min:e}, {max:e}] m")]
    OutOfRange {
        wavelength_m: f64,
        min: f64,
        max: f64,
    },

    #[error("Material not found: {0}")]
    NotFound(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Failed to read index table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed index table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Provides the complex refractive index of a material.
pub trait IndexProvider: Send + Sync {
    /// Human-readable name of this material.
    fn name(&self) -> &str;

    /// Wavelength range over which data is available (m), or `None` when the
    /// material is defined at every wavelength.
    fn wavelength_range(&self) -> Option<(f64, f64)>;

    /// Complex refractive index at a single wavelength.
    fn refractive_index(&self, wavelength_m: f64) -> Result<Complex64, MaterialError>;

    /// Complex refractive index at each wavelength in `wavelengths_m`.
    ///
    /// The whole request is range-checked before anything is evaluated, so a
    /// single out-of-range wavelength fails the call without partial output.
    fn index(&self, wavelengths_m: &[f64]) -> Result<Vec<Complex64>, MaterialError> {
        if let Some((min, max)) = self.wavelength_range() {
            if let Some(&bad) = wavelengths_m.iter().find(|&&w| w < min || w > max) {
                return Err(MaterialError::OutOfRange {
                    wavelength_m: bad,
                    min,
                    max,
                });
            }
        }
        wavelengths_m
            .iter()
            .map(|&w| self.refractive_index(w))
            .collect()
    }

    /// Complex dielectric function $\epsilon = \tilde{n}^2$ at a wavelength.
    fn permittivity(&self, wavelength_m: f64) -> Result<Complex64, MaterialError> {
        let n = self.refractive_index(wavelength_m)?;
        Ok(n * n)
    }
}

/// Free space: $\tilde{n} = 1$ at every wavelength, no table involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vacuum;

impl IndexProvider for Vacuum {
    fn name(&self) -> &str {
        "Vacuum"
    }

    fn wavelength_range(&self) -> Option<(f64, f64)> {
        None
    }

    fn refractive_index(&self, _wavelength_m: f64) -> Result<Complex64, MaterialError> {
        Ok(Complex64::new(1.0, 0.0))
    }
}
