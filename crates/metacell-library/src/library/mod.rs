//! Cell-library abstraction and the inverse-design lookup.
//!
//! The [`CellLibrary`] trait gives every precomputed library the same
//! inverse lookup: given target transmission and phase maps, find for each
//! pixel the simulated geometry whose response is closest. Two libraries are
//! provided:
//!
//! - [`NanofinLibrary`]: rectangular fins, two polarisations, axes
//!   `(lenx, leny)`.
//! - [`NanocylinderLibrary`]: cylinders, one polarisation, axis `radius`.

pub mod nanocylinders;
pub mod nanofins;

pub use nanocylinders::NanocylinderLibrary;
pub use nanofins::NanofinLibrary;

use ndarray::{Array2, Array3};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search;
use crate::store::LibraryStore;
use crate::table::{GeometryAxis, ParamLimits, ResponseTable};
use crate::types::{DesignTargetSpec, GeometrySolution};

/// Errors from building or querying a cell library.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(
        "Design lists must have equal length: {transmission} transmission, \
         {phase} phase, {wavelengths} wavelengths"
    )]
    LengthMismatch {
        transmission: usize,
        phase: usize,
        wavelengths: usize,
    },

    #[error(
        "Design {index}: {kind} map has {found} polarisation channel(s) but \
         library '{library}' needs {expected}"
    )]
    PolarizationMismatch {
        index: usize,
        kind: &'static str,
        found: usize,
        expected: usize,
        library: String,
    },

    #[error("Design {index}: transmission shape {transmission:?} differs from phase shape {phase:?}")]
    ShapeMismatch {
        index: usize,
        transmission: Vec<usize>,
        phase: Vec<usize>,
    },

    #[error("Design {index}: wavelength {wavelength} is not finite")]
    InvalidWavelength { index: usize, wavelength: f64 },

    #[error("Library store has no array named '{0}'")]
    MissingArray(String),

    #[error("Library array '{name}' is malformed: {message}")]
    MalformedArray { name: String, message: String },

    #[error("Invalid response table: {0}")]
    InvalidTable(String),

    #[error("Failed to read library store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed library store: {0}")]
    Json(#[from] serde_json::Error),
}

/// A precomputed library of cell responses that can be inverted.
///
/// Implementations hold their [`ResponseTable`] immutably, so a library may
/// be shared across threads and inverted concurrently.
pub trait CellLibrary: Send + Sync {
    /// Identifier of the simulated library.
    fn name(&self) -> &str;

    /// The response table backing this library.
    fn table(&self) -> &ResponseTable;

    /// Geometry axes, in the column order of the solution.
    fn axes(&self) -> &[GeometryAxis];

    /// Bounds of the simulated wavelength sweep (m).
    fn wavelength_limits(&self) -> ParamLimits;

    /// Polarisation channels every design map must carry.
    fn polarizations(&self) -> usize {
        self.table().polarizations()
    }

    /// Invert target optical responses into cell geometry.
    ///
    /// Every design is validated before any lookup runs; on error nothing is
    /// returned. See [`GeometrySolution`] for the output layout selected by
    /// `reshape`.
    fn invert(
        &self,
        designs: &DesignTargetSpec,
        reshape: bool,
    ) -> Result<GeometrySolution, LibraryError> {
        validate_designs(self.name(), self.polarizations(), designs)?;
        Ok(invert_designs(self.table(), self.axes(), designs, reshape))
    }
}

/// The libraries that can be loaded from a [`LibraryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryKind {
    Nanofins,
    Nanocylinders,
}

impl LibraryKind {
    /// Build the library of this kind from a backing store.
    pub fn load(self, store: &LibraryStore) -> Result<Box<dyn CellLibrary>, LibraryError> {
        Ok(match self {
            LibraryKind::Nanofins => Box::new(NanofinLibrary::from_store(store)?),
            LibraryKind::Nanocylinders => Box::new(NanocylinderLibrary::from_store(store)?),
        })
    }
}

fn validate_designs(
    library: &str,
    polarizations: usize,
    designs: &DesignTargetSpec,
) -> Result<(), LibraryError> {
    let n = designs.wavelengths.len();
    if designs.transmission.len() != n || designs.phase.len() != n {
        return Err(LibraryError::LengthMismatch {
            transmission: designs.transmission.len(),
            phase: designs.phase.len(),
            wavelengths: n,
        });
    }

    for (index, ((trans, phase), &wavelength)) in designs
        .transmission
        .iter()
        .zip(&designs.phase)
        .zip(&designs.wavelengths)
        .enumerate()
    {
        for (kind, map) in [("transmission", trans), ("phase", phase)] {
            let found = map.dim().0;
            if found != polarizations {
                return Err(LibraryError::PolarizationMismatch {
                    index,
                    kind,
                    found,
                    expected: polarizations,
                    library: library.to_string(),
                });
            }
        }
        if trans.dim() != phase.dim() {
            return Err(LibraryError::ShapeMismatch {
                index,
                transmission: trans.shape().to_vec(),
                phase: phase.shape().to_vec(),
            });
        }
        if !wavelength.is_finite() {
            return Err(LibraryError::InvalidWavelength { index, wavelength });
        }
    }
    Ok(())
}

/// Target responses $t\,e^{i\phi}$ flattened per pixel, shape `(Ny·Nx, P)`.
fn target_responses(trans: &Array3<f64>, phase: &Array3<f64>) -> Array2<Complex64> {
    let (npol, ny, nx) = trans.dim();
    Array2::from_shape_fn((ny * nx, npol), |(p, c)| {
        let (y, x) = (p / nx, p % nx);
        Complex64::from_polar(trans[[c, y, x]], phase[[c, y, x]])
    })
}

/// Lookup over already-validated designs.
fn invert_designs(
    table: &ResponseTable,
    axes: &[GeometryAxis],
    designs: &DesignTargetSpec,
    reshape: bool,
) -> GeometrySolution {
    let naxes = axes.len();
    let geometry = table.geometry();
    let mut physical = Vec::with_capacity(designs.len());
    let mut normalized = Vec::with_capacity(designs.len());

    for ((trans, phase), &wavelength) in designs
        .transmission
        .iter()
        .zip(&designs.phase)
        .zip(&designs.wavelengths)
    {
        let w_idx = table.nearest_wavelength_index(wavelength);
        let candidates = table.responses_at(w_idx);
        let targets = target_responses(trans, phase);
        let winners = search::nearest_candidates(candidates.view(), targets.view());

        log::debug!(
            "Inverted {} pixels at λ={:.1} nm (table λ={:.1} nm) against {} candidates",
            winners.len(),
            wavelength * 1e9,
            table.wavelengths()[w_idx] * 1e9,
            table.candidates()
        );

        let design = Array2::from_shape_fn((winners.len(), naxes), |(p, a)| {
            geometry[[winners[p], a]]
        });
        let norm = Array2::from_shape_fn(design.dim(), |(p, a)| {
            axes[a].limits.normalize(design[[p, a]])
        });

        if reshape {
            let (_, ny, nx) = trans.dim();
            let grid = |values: &Array2<f64>| {
                Array3::from_shape_fn((naxes, ny, nx), |(a, y, x)| values[[y * nx + x, a]])
                    .into_dyn()
            };
            physical.push(grid(&design));
            normalized.push(grid(&norm));
        } else {
            physical.push(design.into_dyn());
            normalized.push(norm.into_dyn());
        }
    }

    GeometrySolution {
        physical,
        normalized,
        reshaped: reshape,
    }
}
