//! Rectangular nanofin library (350 nm unit cell, 600 nm height).
//!
//! FDTD sweep over fin widths `lenx × leny`, simulated for x- and
//! y-polarised illumination. Raw store layout:
//!
//! | Array | Shape |
//! |-------|-------|
//! | `phase`, `transmission` | `(2, len(leny), len(lenx), len(wavelength_m))` |
//! | `lenx` | `len(lenx)` (any shape, flattened) |
//! | `leny` | `len(leny)` |
//! | `wavelength_m` | `len(wavelength_m)` |

use ndarray::{Array1, Array2, Array3, Array4, Ix4};

use super::{CellLibrary, LibraryError};
use crate::store::LibraryStore;
use crate::table::{GeometryAxis, ParamLimits, ResponseTable};

const AXES: [GeometryAxis; 2] = [
    GeometryAxis {
        name: "lenx",
        limits: ParamLimits::new(60e-9, 300e-9),
    },
    GeometryAxis {
        name: "leny",
        limits: ParamLimits::new(60e-9, 300e-9),
    },
];

const WAVELENGTH_LIMITS: ParamLimits = ParamLimits::new(310e-9, 750e-9);

/// Double-axis library: two polarisation channels, geometry `(lenx, leny)`.
#[derive(Debug, Clone)]
pub struct NanofinLibrary {
    table: ResponseTable,
}

impl NanofinLibrary {
    pub const NAME: &'static str = "Nanofins_U350nm_H600nm";

    /// Build from a backing store. Any missing or inconsistent array fails
    /// the whole load.
    pub fn from_store(store: &LibraryStore) -> Result<Self, LibraryError> {
        let lenx = store.vector("lenx")?;
        let leny = store.vector("leny")?;
        let wavelengths = store.vector("wavelength_m")?;
        let (nx, ny, nw) = (lenx.len(), leny.len(), wavelengths.len());
        let expected = [2, ny, nx, nw];

        let raw = |name: &str| -> Result<_, LibraryError> {
            let array = store.array(name)?;
            if array.shape() != expected {
                return Err(LibraryError::MalformedArray {
                    name: name.to_string(),
                    message: format!("expected shape {:?}, found {:?}", expected, array.shape()),
                });
            }
            array
                .into_dimensionality::<Ix4>()
                .map_err(|e| LibraryError::MalformedArray {
                    name: name.to_string(),
                    message: e.to_string(),
                })
        };
        let phase = raw("phase")?;
        let transmission = raw("transmission")?;

        // Candidate k = iy * nx + ix, the row-major flattening of (leny, lenx).
        let flatten = |a: &Array4<f64>| {
            Array3::from_shape_fn((2, ny * nx, nw), |(c, k, w)| a[[c, k / nx, k % nx, w]])
        };
        let geometry = Array2::from_shape_fn((ny * nx, 2), |(k, axis)| match axis {
            0 => lenx[k % nx],
            _ => leny[k / nx],
        });

        let table = ResponseTable::new(
            flatten(&phase),
            flatten(&transmission),
            geometry,
            Array1::from(wavelengths),
            vec![ny, nx],
        )?;
        log::info!(
            "Loaded {}: {}x{} geometries, {} wavelengths",
            Self::NAME,
            nx,
            ny,
            nw
        );
        Ok(Self { table })
    }
}

impl CellLibrary for NanofinLibrary {
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
