//! Nanocylinder library (180 nm unit cell, 600 nm height).
//!
//! Polarisation-insensitive cylinders swept over radius. Raw store layout:
//! `phase` and `transmission` shaped `(len(wavelength_m), len(radius_m))`,
//! plus the `radius_m` and `wavelength_m` vectors.

use ndarray::{Array1, Array2, Array3, Ix2};

use super::{CellLibrary, LibraryError};
use crate::store::LibraryStore;
use crate::table::{GeometryAxis, ParamLimits, ResponseTable};

const AXES: [GeometryAxis; 1] = [GeometryAxis {
    name: "radius",
    limits: ParamLimits::new(30e-9, 150e-9),
}];

const WAVELENGTH_LIMITS: ParamLimits = ParamLimits::new(310e-9, 750e-9);

/// Single-axis library: one polarisation channel, geometry `radius`.
#[derive(Debug, Clone)]
pub struct NanocylinderLibrary {
    table: ResponseTable,
}

impl NanocylinderLibrary {
    pub const NAME: &'static str = "Nanocylinders_U180nm_H600nm";

    /// Build from a backing store. Any missing or inconsistent array fails
    /// the whole load.
    pub fn from_store(store: &LibraryStore) -> Result<Self, LibraryError> {
        let radius = store.vector("radius_m")?;
        let wavelengths = store.vector("wavelength_m")?;
        let (nr, nw) = (radius.len(), wavelengths.len());

        let raw = |name: &str| -> Result<Array3<f64>, LibraryError> {
            let array = store.array(name)?;
            if array.shape() != [nw, nr] {
                return Err(LibraryError::MalformedArray {
                    name: name.to_string(),
                    message: format!("expected shape {:?}, found {:?}", [nw, nr], array.shape()),
                });
            }
            let array = array
                .into_dimensionality::<Ix2>()
                .map_err(|e| LibraryError::MalformedArray {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
            Ok(Array3::from_shape_fn((1, nr, nw), |(_, r, w)| array[[w, r]]))
        };

        let table = ResponseTable::new(
            raw("phase")?,
            raw("transmission")?,
            Array2::from_shape_fn((nr, 1), |(r, _)| radius[r]),
            Array1::from(wavelengths),
            vec![nr],
        )?;
        log::info!("Loaded {}: {} radii, {} wavelengths", Self::NAME, nr, nw);
        Ok(Self { table })
    }
}

impl CellLibrary for NanocylinderLibrary {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn table(&self) -> &ResponseTable {
        &self.table
    }

    fn axes(&self) -> &[GeometryAxis] {
        &AXES
    }

    fn wavelength_limits(&self) -> ParamLimits {
        WAVELENGTH_LIMITS
    }
}
