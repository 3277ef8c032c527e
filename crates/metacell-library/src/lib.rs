//! # Metacell Library
//!
//! Precomputed metasurface cell libraries and the inverse-design lookup that
//! turns target transmission/phase maps into cell geometry.
//!
//! ## Architecture
//!
//! Every library implements [`library::CellLibrary`], whose `invert` method
//! performs a brute-force nearest-neighbour search of the library's
//! [`table::ResponseTable`] for each pixel of each design. Libraries are
//! built once from a [`store::LibraryStore`] and never mutated afterwards.
//!
//! ## Modules
//!
//! - [`store`] — Named-array backing store (JSON on disk).
//! - [`table`] — Response tables and geometry normalisation limits.
//! - [`search`] — Nearest-wavelength and nearest-response search.
//! - [`library`] — The `CellLibrary` trait, nanofin and nanocylinder libraries.
//! - [`types`] — Design targets and geometry solutions.

pub mod library;
pub mod search;
pub mod store;
pub mod table;
pub mod types;

pub use library::{CellLibrary, LibraryError, LibraryKind, NanocylinderLibrary, NanofinLibrary};
pub use store::{LibraryStore, NamedArray};
pub use table::{GeometryAxis, ParamLimits, ResponseTable};
pub use types::{DesignTargetSpec, GeometrySolution};
