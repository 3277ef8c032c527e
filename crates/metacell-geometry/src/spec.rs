//! Cell geometry configuration.
//!
//! [`CellGeometrySpec`] carries the subset of solver settings the
//! parameterizer needs. It deserialises from TOML, e.g.
//!
//! ```toml
//! parameterization_type = "coupled_elliptical_resonators"
//! batch_size = 1
//! pixels_x = 3
//! pixels_y = 3
//! nlay = 1
//! nx = 64
//! ny = 64
//! lx = 350e-9
//! ly = 350e-9
//! span_limits = { min = 0.05, max = 0.25 }
//! sigmoid_coeff = 1000.0
//! lay_eps_list = [1.0]
//! erd = 6.76
//! urd = 1.0
//! ```
//!
//! Permittivities accept a real number or an `[re, im]` pair. The sizing keys
//! also accept their solver spellings (`batchSize`, `pixelsX`, `pixelsY`,
//! `Nlay`, `Nx`, `Ny`, `Lx`, `Ly`); `dtype`/`cdtype` are ignored since
//! precision is fixed to `f64`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::family::ParameterizationType;

/// Errors from cell geometry synthesis.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Unknown parameterization type: {0}")]
    UnknownFamily(String),

    #[error("{family} expects parameters of shape {expected:?}, found {found:?}")]
    ParamShape {
        family: ParameterizationType,
        expected: (usize, usize, usize, usize),
        found: (usize, usize, usize, usize),
    },

    #[error("Invalid cell configuration: {0}")]
    InvalidConfig(String),
}

/// Fraction of the unit-cell extent spanned by normalised parameters:
/// `0 → min`, `1 → max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanLimits {
    pub min: f64,
    pub max: f64,
}

impl SpanLimits {
    /// Affine map of a normalised parameter onto `[min, max]`.
    pub fn apply(&self, normalized: f64) -> f64 {
        normalized * (self.max - self.min) + self.min
    }
}

/// A complex material constant that may be written as a plain real number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ComplexRepr", into = "ComplexRepr")]
pub struct ComplexScalar(pub Complex64);

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum ComplexRepr {
    Real(f64),
    Pair([f64; 2]),
}

impl From<ComplexRepr> for ComplexScalar {
    fn from(repr: ComplexRepr) -> Self {
        match repr {
            ComplexRepr::Real(re) => ComplexScalar(Complex64::new(re, 0.0)),
            ComplexRepr::Pair([re, im]) => ComplexScalar(Complex64::new(re, im)),
        }
    }
}

impl From<ComplexScalar> for ComplexRepr {
    fn from(value: ComplexScalar) -> Self {
        if value.0.im == 0.0 {
            ComplexRepr::Real(value.0.re)
        } else {
            ComplexRepr::Pair([value.0.re, value.0.im])
        }
    }
}

impl From<f64> for ComplexScalar {
    fn from(re: f64) -> Self {
        ComplexScalar(Complex64::new(re, 0.0))
    }
}

impl From<Complex64> for ComplexScalar {
    fn from(value: Complex64) -> Self {
        ComplexScalar(value)
    }
}

/// Settings consumed by the cell parameterizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellGeometrySpec {
    pub parameterization_type: ParameterizationType,
    #[serde(default = "default_batch_size", alias = "batchSize")]
    pub batch_size: usize,
    #[serde(alias = "pixelsX")]
    pub pixels_x: usize,
    #[serde(alias = "pixelsY")]
    pub pixels_y: usize,
    /// Number of physical layers.
    #[serde(alias = "Nlay")]
    pub nlay: usize,
    /// Spatial samples per cell along x.
    #[serde(alias = "Nx")]
    pub nx: usize,
    /// Spatial samples per cell along y.
    #[serde(alias = "Ny")]
    pub ny: usize,
    /// Unit-cell extent along x (m).
    #[serde(alias = "Lx")]
    pub lx: f64,
    /// Unit-cell extent along y (m).
    #[serde(alias = "Ly")]
    pub ly: f64,
    pub span_limits: SpanLimits,
    /// Sharpness of the sigmoid relaxation of structure boundaries.
    pub sigmoid_coeff: f64,
    /// Background permittivity of each layer.
    pub lay_eps_list: Vec<ComplexScalar>,
    /// Permittivity of the structure material.
    pub erd: ComplexScalar,
    /// Relative permeability, uniform everywhere.
    #[serde(default = "default_urd")]
    pub urd: ComplexScalar,
}

fn default_batch_size() -> usize {
    1
}

fn default_urd() -> ComplexScalar {
    ComplexScalar::from(1.0)
}

impl CellGeometrySpec {
    /// Output tensor shape `(batch, pixelsX, pixelsY, Nlay, Nx, Ny)`.
    pub fn materials_shape(&self) -> (usize, usize, usize, usize, usize, usize) {
        (
            self.batch_size,
            self.pixels_x,
            self.pixels_y,
            self.nlay,
            self.nx,
            self.ny,
        )
    }

    /// Check internal consistency. Called before any synthesis.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let sizes = [
            ("batch_size", self.batch_size),
            ("pixels_x", self.pixels_x),
            ("pixels_y", self.pixels_y),
            ("nlay", self.nlay),
            ("nx", self.nx),
            ("ny", self.ny),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, n)| *n == 0) {
            return Err(GeometryError::InvalidConfig(format!("{name} must be positive")));
        }
        if !(self.lx > 0.0 && self.ly > 0.0) {
            return Err(GeometryError::InvalidConfig(format!(
                "cell extents must be positive, got lx={}, ly={}",
                self.lx, self.ly
            )));
        }
        let span = self.span_limits;
        if !(span.min > 0.0 && span.max >= span.min) {
            return Err(GeometryError::InvalidConfig(format!(
                "span limits need 0 < min <= max (min = 0 gives a zero-size structure), got [{}, {}]",
                span.min, span.max
            )));
        }
        if !self.sigmoid_coeff.is_finite() {
            return Err(GeometryError::InvalidConfig(
                "sigmoid_coeff must be finite".into(),
            ));
        }
        if self.lay_eps_list.len() != self.nlay {
            return Err(GeometryError::InvalidConfig(format!(
                "lay_eps_list has {} entries for {} layers",
                self.lay_eps_list.len(),
                self.nlay
            )));
        }
        if let crate::family::LayerCoverage::Single(layer) =
            self.parameterization_type.layer_coverage()
        {
            if layer >= self.nlay {
                return Err(GeometryError::InvalidConfig(format!(
                    "{} writes layer {} but only {} layer(s) are configured",
                    self.parameterization_type, layer, self.nlay
                )));
            }
        }
        Ok(())
    }
}
