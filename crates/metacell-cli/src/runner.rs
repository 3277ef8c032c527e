//! Job runner: ties together libraries, cell synthesis, and output writers.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Array3, ArrayD, Axis, Ix2, Ix3, Ix4};
use num_complex::Complex64;
use serde::Serialize;

use metacell_geometry::{generate_cell_perm, CellMaterials};
use metacell_library::{CellLibrary, DesignTargetSpec, GeometrySolution, LibraryStore};
use metacell_materials::{IndexProvider, MaterialCatalog};

use crate::config::JobConfig;

/// Results from an inversion run.
pub struct InversionOutput {
    pub library: String,
    pub axes: Vec<&'static str>,
    /// `(Ny, Nx)` of each design, in input order.
    pub dims: Vec<(usize, usize)>,
    pub labels: Vec<String>,
    pub solution: GeometrySolution,
}

/// Load the configured library and invert every design.
pub fn run_inversion(job: &JobConfig) -> Result<InversionOutput> {
    let lib_cfg = job
        .library
        .as_ref()
        .context("Job has no [library] section")?;
    let store_path = job.resolve(&lib_cfg.path);
    let store = LibraryStore::load_json(&store_path)
        .with_context(|| format!("Failed to load library store {}", store_path.display()))?;
    let library = lib_cfg.kind.load(&store)?;
    println!(
        "Library: {} ({} candidates, {} polarisation(s))",
        library.name(),
        library.table().candidates(),
        library.polarizations()
    );

    let limits = library.wavelength_limits();
    let mut designs = DesignTargetSpec::default();
    let mut dims = Vec::with_capacity(job.design.len());
    let mut labels = Vec::with_capacity(job.design.len());
    for (i, design) in job.design.iter().enumerate() {
        let path = job.resolve(&design.file);
        let (trans, phase) = load_design(&path)
            .with_context(|| format!("Failed to load design {}", path.display()))?;
        if design.wavelength < limits.min || design.wavelength > limits.max {
            log::warn!(
                "Design {}: wavelength {:.1} nm is outside the simulated range {:.0}–{:.0} nm",
                i,
                design.wavelength * 1e9,
                limits.min * 1e9,
                limits.max * 1e9
            );
        }
        let (_, ny, nx) = trans.dim();
        println!(
            "  Design {}: {}x{} pixels at {:.1} nm",
            i,
            ny,
            nx,
            design.wavelength * 1e9
        );
        dims.push((ny, nx));
        labels.push(design.name.clone().unwrap_or_else(|| format!("design_{i}")));
        designs.push(trans, phase, design.wavelength);
    }

    let solution = library.invert(&designs, false)?;
    Ok(InversionOutput {
        library: library.name().to_string(),
        axes: library.axes().iter().map(|a| a.name).collect(),
        dims,
        labels,
        solution,
    })
}

fn load_design(path: &Path) -> Result<(Array3<f64>, Array3<f64>)> {
    let store = LibraryStore::load_json(path)?;
    let map = |name: &str| -> Result<Array3<f64>> {
        let array = store.array(name)?;
        let ndim = array.ndim();
        array
            .into_dimensionality::<Ix3>()
            .with_context(|| format!("'{name}' must be 3-D (P, Ny, Nx), found {ndim}-D"))
    };
    Ok((map("transmission")?, map("phase")?))
}

/// Write one design's geometry to CSV, one row per pixel.
pub fn write_inversion_csv(output: &InversionOutput, index: usize, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let physical = output.solution.physical[index].view().into_dimensionality::<Ix2>()?;
    let normalized = output.solution.normalized[index].view().into_dimensionality::<Ix2>()?;
    let (ny, nx) = output.dims[index];

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "# Metacell inverse design: library {}", output.library)?;
    writeln!(file, "# Design '{}': {}x{} pixels", output.labels[index], ny, nx)?;
    writeln!(file, "#")?;
    let mut header = String::from("pixel,y,x");
    for axis in &output.axes {
        header.push_str(&format!(",{axis}_m"));
    }
    for axis in &output.axes {
        header.push_str(&format!(",{axis}_norm"));
    }
    writeln!(file, "{header}")?;

    for p in 0..ny * nx {
        let mut row = format!("{},{},{}", p, p / nx, p % nx);
        for a in 0..output.axes.len() {
            row.push_str(&format!(",{:.6e}", physical[[p, a]]));
        }
        for a in 0..output.axes.len() {
            row.push_str(&format!(",{:.6}", normalized[[p, a]]));
        }
        writeln!(file, "{row}")?;
    }

    println!("Geometry written to: {}", path.display());
    Ok(())
}

#[derive(Serialize)]
struct DesignRecord<'a> {
    name: &'a str,
    shape: Vec<usize>,
    physical: Vec<f64>,
    normalized: Vec<f64>,
}

/// Write every design's flat geometry to a single JSON file.
pub fn write_inversion_json(output: &InversionOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let flat = |a: &ArrayD<f64>| a.iter().copied().collect::<Vec<_>>();
    let records: Vec<DesignRecord<'_>> = output
        .labels
        .iter()
        .zip(&output.solution.physical)
        .zip(&output.solution.normalized)
        .map(|((name, phys), norm)| DesignRecord {
            name,
            shape: phys.shape().to_vec(),
            physical: flat(phys),
            normalized: flat(norm),
        })
        .collect();
    let json = serde_json::to_string_pretty(&records)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Geometry (JSON) written to: {}", path.display());
    Ok(())
}

/// Synthesise the configured cell batch.
pub fn run_cell(job: &JobConfig) -> Result<CellMaterials> {
    let cell = job.cell.as_ref().context("Job has no [cell] section")?;
    let params_path = job.resolve(&cell.params);
    let store = LibraryStore::load_json(&params_path)
        .with_context(|| format!("Failed to load parameters {}", params_path.display()))?;
    let norm_param = store
        .array("norm_param")?
        .into_dimensionality::<Ix4>()
        .context("'norm_param' must be 4-D (d1, pixelsX, pixelsY, d2)")?;

    let spec = &cell.geometry;
    println!(
        "Cell: {} ({}x{} pixels, {} layer(s), {}x{} samples)",
        spec.parameterization_type, spec.pixels_x, spec.pixels_y, spec.nlay, spec.nx, spec.ny
    );
    Ok(generate_cell_perm(norm_param.view(), spec)?)
}

#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub layer: usize,
    pub background: [f64; 2],
    pub min_re: f64,
    pub max_re: f64,
    pub mean: [f64; 2],
    /// Fraction of samples whose permittivity differs from the background.
    pub structured_fraction: f64,
}

#[derive(Debug, Serialize)]
pub struct CellSummary {
    pub family: String,
    pub shape: Vec<usize>,
    pub permeability: [f64; 2],
    pub layers: Vec<LayerSummary>,
}

/// Per-layer statistics of a synthesised permittivity tensor.
pub fn summarize_cell(job: &JobConfig, materials: &CellMaterials) -> Result<CellSummary> {
    let cell = job.cell.as_ref().context("Job has no [cell] section")?;
    let spec = &cell.geometry;
    let pair = |z: Complex64| [z.re, z.im];

    let layers = materials
        .permittivity
        .axis_iter(Axis(3))
        .enumerate()
        .map(|(layer, slab)| {
            let background = spec.lay_eps_list[layer].0;
            let count = slab.len().max(1) as f64;
            let (mut min_re, mut max_re) = (f64::INFINITY, f64::NEG_INFINITY);
            let mut sum = Complex64::new(0.0, 0.0);
            let mut structured = 0usize;
            for &v in slab.iter() {
                min_re = min_re.min(v.re);
                max_re = max_re.max(v.re);
                sum += v;
                if (v - background).norm() > 1e-9 * background.norm().max(1.0) {
                    structured += 1;
                }
            }
            LayerSummary {
                layer,
                background: pair(background),
                min_re,
                max_re,
                mean: pair(sum / count),
                structured_fraction: structured as f64 / count,
            }
        })
        .collect();

    Ok(CellSummary {
        family: spec.parameterization_type.to_string(),
        shape: materials.permittivity.shape().to_vec(),
        permeability: pair(spec.urd.0),
        layers,
    })
}

/// Write a cell summary to a JSON file.
pub fn write_cell_json(summary: &CellSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Cell summary written to: {}", path.display());
    Ok(())
}

/// Print the built-in materials, evaluating the index at `wavelengths` (m).
pub fn print_materials(wavelengths: &[f64]) -> Result<()> {
    let catalog = MaterialCatalog::builtin();
    println!("Available materials:");
    println!();
    for name in catalog.names() {
        let provider = catalog.get(name)?;
        match provider.wavelength_range() {
            Some((lo, hi)) => println!("  {:<8} {:.0}–{:.0} nm", name, lo * 1e9, hi * 1e9),
            None => println!("  {:<8} all wavelengths", name),
        }
        if wavelengths.is_empty() {
            continue;
        }
        match provider.index(wavelengths) {
            Ok(values) => {
                for (w, n) in wavelengths.iter().zip(values) {
                    println!("      {:>8.1} nm  n = {:.4} + {:.4}i", w * 1e9, n.re, n.im);
                }
            }
            Err(e) => println!("      {e}"),
        }
    }
    Ok(())
}
