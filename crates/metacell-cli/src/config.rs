//! TOML configuration deserialisation for metacell jobs.
//!
//! A job may carry an inversion (`[library]` plus `[[design]]` entries), a
//! cell synthesis (`[cell]`), or both:
//!
//! ```toml
//! [library]
//! kind = "nanofins"
//! path = "nanofins.json"
//!
//! [[design]]
//! file = "lens_532.json"
//! wavelength = 532e-9
//!
//! [cell]
//! params = "params.json"
//!
//! [cell.geometry]
//! parameterization_type = "cylindrical_nanoposts"
//! # ...
//!
//! [output]
//! directory = "./output"
//! ```
//!
//! Relative paths are resolved against the directory of the job file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use metacell_geometry::CellGeometrySpec;
use metacell_library::LibraryKind;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub library: Option<LibraryConfig>,
    #[serde(default)]
    pub design: Vec<DesignConfig>,
    pub cell: Option<CellConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    /// Directory of the job file; relative paths hang off it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Which library to invert against, and where its store lives.
#[derive(Debug, Deserialize)]
pub struct LibraryConfig {
    pub kind: LibraryKind,
    pub path: PathBuf,
}

/// One design target: a JSON store holding `transmission` and `phase`
/// arrays of shape `(P, Ny, Nx)`.
#[derive(Debug, Deserialize)]
pub struct DesignConfig {
    pub file: PathBuf,
    /// Design wavelength (m).
    pub wavelength: f64,
    /// Label used for the output file name (default: design index).
    pub name: Option<String>,
}

/// Cell synthesis: geometry settings plus a JSON store holding `norm_param`.
#[derive(Debug, Deserialize)]
pub struct CellConfig {
    pub params: PathBuf,
    pub geometry: CellGeometrySpec,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Also write the full inversion result as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}

impl JobConfig {
    /// Resolve a configured path against the job file directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Structural checks that do not touch any referenced file.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.library.is_none() && self.cell.is_none() {
            anyhow::bail!("Job defines neither [library] nor [cell]");
        }
        if self.library.is_some() && self.design.is_empty() {
            anyhow::bail!("[library] is set but no [[design]] entries are given");
        }
        if self.library.is_none() && !self.design.is_empty() {
            anyhow::bail!("[[design]] entries need a [library] to invert against");
        }
        for (i, design) in self.design.iter().enumerate() {
            if !(design.wavelength.is_finite() && design.wavelength > 0.0) {
                anyhow::bail!("Design {}: wavelength must be positive, got {}", i, design.wavelength);
            }
        }
        if let Some(cell) = &self.cell {
            cell.geometry.validate().context("Invalid [cell.geometry]")?;
        }
        Ok(())
    }
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut config: JobConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = r#"
        [library]
        kind = "nanocylinders"
        path = "cyl.json"

        [[design]]
        file = "target.json"
        wavelength = 500e-9

        [cell]
        params = "params.json"

        [cell.geometry]
        parameterization_type = "cylindrical_nanoposts"
        pixels_x = 1
        pixels_y = 1
        nlay = 1
        nx = 8
        ny = 8
        lx = 180e-9
        ly = 180e-9
        span_limits = { min = 0.2, max = 0.8 }
        sigmoid_coeff = 500.0
        lay_eps_list = [1.0]
        erd = 6.76
    "#;

    #[test]
    fn test_job_parses_and_validates() {
        let job: JobConfig = toml::from_str(JOB).unwrap();
        assert_eq!(job.library.as_ref().unwrap().kind, LibraryKind::Nanocylinders);
        assert_eq!(job.design.len(), 1);
        assert_eq!(job.output.directory, "./output");
        job.validate().unwrap();
    }

    #[test]
    fn test_library_without_designs_is_rejected() {
        let mut job: JobConfig = toml::from_str(JOB).unwrap();
        job.design.clear();
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_relative_paths_resolve_against_job_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, JOB).unwrap();
        let job = load_config(&path).unwrap();
        assert_eq!(job.resolve(Path::new("cyl.json")), dir.path().join("cyl.json"));
    }
}
