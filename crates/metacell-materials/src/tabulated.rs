//! Tabulated complex refractive indices.
//!
//! A [`TabulatedIndex`] holds $\tilde{n}(\lambda)$ sampled on a wavelength
//! grid (metres) and answers queries by linear interpolation. Tables come
//! either from the built-in handbook data or from a JSON index store.
//!
//! ## Built-in tables
//!
//! | Identifier | Constructor | Range |
//! |-----------|-------------|-------|
//! | `TiO2` | [`TabulatedIndex::tio2()`] | 300–1000 nm |
//! | `SiO2` | [`TabulatedIndex::sio2()`] | 300–1000 nm |
//!
//! Values are $(n, k)$ pairs from E. D. Palik, *Handbook of Optical
//! Constants of Solids* (Academic Press, 1985).

use std::path::Path;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::interp::LinearInterpolator;
use crate::provider::{IndexProvider, MaterialError};

// (λ/nm, n, k), rutile TiO₂ ordinary ray
const TIO2_NK: [(f64, f64, f64); 41] = [
    (300.0, 3.340, 0.880), (310.0, 3.140, 0.660), (320.0, 2.990, 0.480), (330.0, 2.870, 0.330),
    (340.0, 2.780, 0.220), (350.0, 2.720, 0.140), (360.0, 2.680, 0.080), (370.0, 2.655, 0.040),
    (380.0, 2.640, 0.018), (390.0, 2.629, 0.008), (400.0, 2.620, 0.003), (420.0, 2.607, 0.001),
    (440.0, 2.596, 0.000), (460.0, 2.587, 0.000), (480.0, 2.579, 0.000), (500.0, 2.572, 0.000),
    (520.0, 2.566, 0.000), (540.0, 2.560, 0.000), (560.0, 2.555, 0.000), (580.0, 2.551, 0.000),
    (600.0, 2.547, 0.000), (620.0, 2.543, 0.000), (640.0, 2.540, 0.000), (660.0, 2.537, 0.000),
    (680.0, 2.534, 0.000), (700.0, 2.531, 0.000), (720.0, 2.529, 0.000), (740.0, 2.527, 0.000),
    (760.0, 2.525, 0.000), (780.0, 2.523, 0.000), (800.0, 2.521, 0.000), (820.0, 2.519, 0.000),
    (840.0, 2.518, 0.000), (860.0, 2.516, 0.000), (880.0, 2.515, 0.000), (900.0, 2.513, 0.000),
    (920.0, 2.512, 0.000), (940.0, 2.511, 0.000), (960.0, 2.510, 0.000), (980.0, 2.508, 0.000),
    (1000.0, 2.507, 0.000),
];

// (λ/nm, n, k), fused silica
const SIO2_NK: [(f64, f64, f64); 41] = [
    (300.0, 1.487, 0.000), (310.0, 1.484, 0.000), (320.0, 1.482, 0.000), (330.0, 1.480, 0.000),
    (340.0, 1.478, 0.000), (350.0, 1.476, 0.000), (360.0, 1.475, 0.000), (370.0, 1.474, 0.000),
    (380.0, 1.473, 0.000), (390.0, 1.472, 0.000), (400.0, 1.470, 0.000), (420.0, 1.469, 0.000),
    (440.0, 1.468, 0.000), (460.0, 1.467, 0.000), (480.0, 1.466, 0.000), (500.0, 1.462, 0.000),
    (520.0, 1.461, 0.000), (540.0, 1.460, 0.000), (560.0, 1.459, 0.000), (580.0, 1.458, 0.000),
    (600.0, 1.458, 0.000), (620.0, 1.457, 0.000), (640.0, 1.457, 0.000), (660.0, 1.456, 0.000),
    (680.0, 1.455, 0.000), (700.0, 1.455, 0.000), (720.0, 1.454, 0.000), (740.0, 1.454, 0.000),
    (760.0, 1.453, 0.000), (780.0, 1.453, 0.000), (800.0, 1.452, 0.000), (820.0, 1.452, 0.000),
    (840.0, 1.451, 0.000), (860.0, 1.451, 0.000), (880.0, 1.450, 0.000), (900.0, 1.450, 0.000),
    (920.0, 1.450, 0.000), (940.0, 1.449, 0.000), (960.0, 1.449, 0.000), (980.0, 1.449, 0.000),
    (1000.0, 1.448, 0.000),
];

/// On-disk layout of a material index table.
///
/// `w` holds wavelengths in metres and `index` the complex index split into
/// real and imaginary columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexTable {
    pub w: Vec<f64>,
    pub index: SplitComplex,
}

/// Complex column stored as separate real and imaginary vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitComplex {
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

/// A material whose index is linearly interpolated from a table.
#[derive(Debug, Clone)]
pub struct TabulatedIndex {
    name: String,
    table: LinearInterpolator,
}

impl TabulatedIndex {
    /// Construct from wavelengths (m) and complex index samples.
    pub fn new(
        name: impl Into<String>,
        wavelengths_m: Vec<f64>,
        index: Vec<Complex64>,
    ) -> Result<Self, MaterialError> {
        Ok(Self {
            name: name.into(),
            table: LinearInterpolator::new(wavelengths_m, index)?,
        })
    }

    /// Construct from an [`IndexTable`].
    pub fn from_table(name: impl Into<String>, table: IndexTable) -> Result<Self, MaterialError> {
        let IndexTable { w, index } = table;
        if index.real.len() != index.imag.len() {
            return Err(MaterialError::DataError(format!(
                "index has {} real and {} imaginary values",
                index.real.len(),
                index.imag.len()
            )));
        }
        let samples = index
            .real
            .iter()
            .zip(&index.imag)
            .map(|(&re, &im)| Complex64::new(re, im))
            .collect();
        Self::new(name, w, samples)
    }

    /// Load an [`IndexTable`] from a JSON file.
    pub fn load_json(name: impl Into<String>, path: &Path) -> Result<Self, MaterialError> {
        let content = std::fs::read_to_string(path)?;
        let table: IndexTable = serde_json::from_str(&content)?;
        log::debug!("Loaded index table from {}", path.display());
        Self::from_table(name, table)
    }

    /// Rutile TiO₂ (ordinary ray), 300–1000 nm.
    ///
    /// High-index dielectric (n ≈ 2.5–2.7 in the visible) with an absorption
    /// edge near 380 nm.
    pub fn tio2() -> Self {
        Self::from_nk("TiO2", &TIO2_NK)
    }

    /// Fused silica SiO₂, 300–1000 nm. Lossless across the table.
    pub fn sio2() -> Self {
        Self::from_nk("SiO2", &SIO2_NK)
    }

    /// Wavelength knots (m).
    pub fn wavelengths(&self) -> &[f64] {
        self.table.knots()
    }

    /// Stored index samples, one per knot.
    pub fn samples(&self) -> &[Complex64] {
        self.table.samples()
    }

    fn from_nk(name: &str, data: &[(f64, f64, f64)]) -> Self {
        let wavelengths_m = data.iter().map(|&(lam, _, _)| lam / 1e9).collect();
        let index = data
            .iter()
            .map(|&(_, n, k)| Complex64::new(n, k))
            .collect();
        let table = LinearInterpolator::new(wavelengths_m, index)
            .expect("built-in index tables are strictly increasing");
        Self {
            name: name.to_string(),
            table,
        }
    }
}

impl IndexProvider for TabulatedIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn wavelength_range(&self) -> Option<(f64, f64)> {
        Some(self.table.range())
    }

    fn refractive_index(&self, wavelength_m: f64) -> Result<Complex64, MaterialError> {
        let (min, max) = self.table.range();
        self.table
            .evaluate(wavelength_m)
            .ok_or(MaterialError::OutOfRange {
                wavelength_m,
                min,
                max,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tio2_is_high_index_in_visible() {
        let tio2 = TabulatedIndex::tio2();
        let n = tio2.refractive_index(532e-9).unwrap();
        assert!(n.re > 2.5 && n.re < 2.6, "TiO2 n at 532 nm = {}", n.re);
        assert_abs_diff_eq!(n.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_builtin_range_accepts_literal_endpoints() {
        for material in [TabulatedIndex::tio2(), TabulatedIndex::sio2()] {
            assert_eq!(material.wavelength_range(), Some((300e-9, 1000e-9)));
            let n = material.index(&[300e-9, 500e-9, 1000e-9]).unwrap();
            assert_eq!(n[1], material.samples()[15]);
        }
    }

    #[test]
    fn test_sio2_permittivity_is_index_squared() {
        let sio2 = TabulatedIndex::sio2();
        let n = sio2.refractive_index(600e-9).unwrap();
        let eps = sio2.permittivity(600e-9).unwrap();
        assert_abs_diff_eq!(eps.re, n.re * n.re, epsilon = 1e-12);
    }

    #[test]
    fn test_from_table_rejects_mismatched_columns() {
        let table = IndexTable {
            w: vec![400e-9, 500e-9],
            index: SplitComplex {
                real: vec![1.5, 1.6],
                imag: vec![0.0],
            },
        };
        assert!(matches!(
            TabulatedIndex::from_table("bad", table),
            Err(MaterialError::DataError(_))
        ));
    }
}
