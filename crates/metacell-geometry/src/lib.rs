//! # Metacell Geometry
//!
//! Unit-cell geometry synthesis for metasurface solvers. This crate provides:
//!
//! - **Families** ([`family`]) — The closed set of cell parameterizations and
//!   the parameter tensor shape each expects.
//! - **Configuration** ([`spec`]) — [`CellGeometrySpec`], deserialisable from
//!   TOML, and [`GeometryError`].
//! - **Sampling** ([`grid`]) — Centred cartesian grids over a unit cell.
//! - **Shapes** ([`shapes`]) — Sigmoid-relaxed implicit structures.
//! - **Assembly** ([`permittivity`]) — [`generate_cell_perm`], which produces
//!   `(batch, pixelsX, pixelsY, Nlay, Nx, Ny)` permittivity and permeability.

pub mod family;
pub mod grid;
pub mod permittivity;
pub mod shapes;
pub mod spec;

pub use family::{LayerCoverage, ParameterizationType};
pub use grid::CartesianGrid;
pub use permittivity::{generate_cell_perm, CellMaterials};
pub use spec::{CellGeometrySpec, ComplexScalar, GeometryError, SpanLimits};
