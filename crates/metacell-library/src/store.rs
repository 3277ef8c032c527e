//! Backing data store for precomputed cell libraries.
//!
//! A [`LibraryStore`] is a map of named real-valued n-dimensional arrays, the
//! same shape of data an FDTD sweep exports (`phase`, `transmission`, one or
//! two geometry axes and a wavelength axis). On disk each entry is a JSON
//! object `{ "shape": [...], "data": [...] }` with `data` in row-major order.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::library::LibraryError;

/// A single named array in serialised form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedArray {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl NamedArray {
    /// Build a 1-D array.
    pub fn vector(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    fn to_array(&self, name: &str) -> Result<ArrayD<f64>, LibraryError> {
        ArrayD::from_shape_vec(IxDyn(&self.shape), self.data.clone()).map_err(|_| {
            LibraryError::MalformedArray {
                name: name.to_string(),
                message: format!(
                    "shape {:?} needs {} values, found {}",
                    self.shape,
                    self.shape.iter().product::<usize>(),
                    self.data.len()
                ),
            }
        })
    }
}

/// Named arrays backing a cell library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryStore {
    arrays: BTreeMap<String, NamedArray>,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an array, replacing any previous entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, shape: Vec<usize>, data: Vec<f64>) {
        self.arrays.insert(name.into(), NamedArray { shape, data });
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_array(mut self, name: impl Into<String>, shape: Vec<usize>, data: Vec<f64>) -> Self {
        self.insert(name, shape, data);
        self
    }

    /// Fetch an array by name.
    ///
    /// # Errors
    /// [`LibraryError::MissingArray`] if absent, [`LibraryError::MalformedArray`]
    /// if the declared shape does not match the data length.
    pub fn array(&self, name: &str) -> Result<ArrayD<f64>, LibraryError> {
        self.arrays
            .get(name)
            .ok_or_else(|| LibraryError::MissingArray(name.to_string()))?
            .to_array(name)
    }

    /// Fetch an array and flatten it to a vector, whatever its declared shape.
    ///
    /// Geometry and wavelength axes are often exported as `(1, n)` or `(n, 1)`
    /// matrices; only the values matter.
    pub fn vector(&self, name: &str) -> Result<Vec<f64>, LibraryError> {
        Ok(self.array(name)?.iter().copied().collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    /// Load a store from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, LibraryError> {
        let content = std::fs::read_to_string(path)?;
        let store: LibraryStore = serde_json::from_str(&content)?;
        log::debug!(
            "Loaded library store {} ({} arrays)",
            path.display(),
            store.arrays.len()
        );
        Ok(store)
    }

    /// Write the store to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<(), LibraryError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_array_is_reported_by_name() {
        let store = LibraryStore::new().with_array("phase", vec![2], vec![0.0, 1.0]);
        match store.array("transmission") {
            Err(LibraryError::MissingArray(name)) => assert_eq!(name, "transmission"),
            other => panic!("expected MissingArray, got {:?}", other),
        }
    }

    #[test]
    fn test_shape_mismatch_is_malformed() {
        let store = LibraryStore::new().with_array("phase", vec![2, 2], vec![0.0; 3]);
        assert!(matches!(
            store.array("phase"),
            Err(LibraryError::MalformedArray { .. })
        ));
    }

    #[test]
    fn test_vector_flattens_row_matrix() {
        let store = LibraryStore::new().with_array("lenx", vec![1, 3], vec![1.0, 2.0, 3.0]);
        assert_eq!(store.vector("lenx").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_json_layout_is_flat_map() {
        let store = LibraryStore::new().with_array("w", vec![1], vec![5e-7]);
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["w"]["shape"][0], 1);
        let back: LibraryStore = serde_json::from_value(json).unwrap();
        assert!(back.contains("w"));
    }
}
