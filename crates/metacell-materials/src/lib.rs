//! # Metacell Materials
//!
//! Complex refractive-index providers for metasurface cell materials. All
//! materials implement [`IndexProvider`](provider::IndexProvider), which maps
//! wavelengths in metres to $\tilde{n} = n + ik$.
//!
//! ## Available data sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | Vacuum | [`provider`] | $\tilde{n} = 1$, no range limit |
//! | Palik handbook (TiO₂, SiO₂) | [`tabulated`] | 300–1000 nm |
//! | JSON index tables | [`tabulated`] | `w` + `index.{real,imag}` |
//!
//! ## Interpolation
//!
//! Tables are interpolated linearly ([`interp::LinearInterpolator`]) with the
//! real and imaginary parts treated independently. Requests outside the
//! tabulated range fail rather than extrapolate.

pub mod catalog;
pub mod interp;
pub mod provider;
pub mod tabulated;

pub use catalog::{get_material_index, MaterialCatalog};
pub use provider::{IndexProvider, MaterialError, Vacuum};
pub use tabulated::{IndexTable, SplitComplex, TabulatedIndex};
