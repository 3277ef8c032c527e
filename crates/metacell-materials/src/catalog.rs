//! Name-keyed registry of refractive-index providers.
//!
//! [`MaterialCatalog::builtin()`] knows `TiO2`, `SiO2` and `Vacuum`. Looking
//! up any other name is a configuration error ([`MaterialError::NotFound`]).

use std::collections::BTreeMap;

use num_complex::Complex64;

use crate::provider::{IndexProvider, MaterialError, Vacuum};
use crate::tabulated::TabulatedIndex;

/// A set of named materials.
pub struct MaterialCatalog {
    materials: BTreeMap<String, Box<dyn IndexProvider>>,
}

impl MaterialCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            materials: BTreeMap::new(),
        }
    }

    /// Catalog with the built-in TiO₂, SiO₂ and vacuum entries.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.register("TiO2", TabulatedIndex::tio2());
        catalog.register("SiO2", TabulatedIndex::sio2());
        catalog.register("Vacuum", Vacuum);
        catalog
    }

    /// Register (or replace) a material under `name`.
    pub fn register(&mut self, name: impl Into<String>, provider: impl IndexProvider + 'static) {
        self.materials.insert(name.into(), Box::new(provider));
    }

    /// Look up a material by name.
    pub fn get(&self, name: &str) -> Result<&dyn IndexProvider, MaterialError> {
        self.materials
            .get(name)
            .map(|p| p.as_ref())
            .ok_or_else(|| MaterialError::NotFound(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    /// Complex refractive index of `name` at each wavelength (m).
    pub fn index(&self, name: &str, wavelengths_m: &[f64]) -> Result<Vec<Complex64>, MaterialError> {
        self.get(name)?.index(wavelengths_m)
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Complex refractive index of a built-in material at each wavelength (m).
pub fn get_material_index(name: &str, wavelengths_m: &[f64]) -> Result<Vec<Complex64>, MaterialError> {
    MaterialCatalog::builtin().index(name, wavelengths_m)
}
