//! Metacell command-line interface.
//!
//! Run inverse design and cell synthesis from TOML job files:
//! ```sh
//! metacell invert job.toml
//! metacell cell job.toml -o out/
//! metacell validate job.toml
//! metacell materials -w 500e-9 -w 633e-9
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "metacell")]
#[command(about = "Metacell: metasurface cell inverse design")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invert target transmission/phase maps into cell geometry.
    Invert {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Synthesise permittivity and permeability for a cell batch.
    Cell {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running anything.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List built-in materials.
    Materials {
        /// Evaluate the refractive index at these wavelengths (m).
        #[arg(short, long = "wavelength")]
        wavelengths: Vec<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Invert { config, output } => {
            println!("Metacell inverse design");
            println!("=======================");
            let job = config::load_config(&config)?;
            job.validate()?;
            println!("Configuration: {}", config.display());

            let result = runner::run_inversion(&job)?;
            let out_dir = output.unwrap_or_else(|| job.resolve(Path::new(&job.output.directory)));

            for (i, label) in result.labels.iter().enumerate() {
                let csv_path = out_dir.join(format!("{label}.csv"));
                runner::write_inversion_csv(&result, i, &csv_path)?;
            }
            if job.output.save_json {
                runner::write_inversion_json(&result, &out_dir.join("geometry.json"))?;
            }

            println!("Inversion complete.");
            Ok(())
        }
        Commands::Cell { config, output } => {
            println!("Metacell cell synthesis");
            println!("=======================");
            let job = config::load_config(&config)?;
            job.validate()?;
            println!("Configuration: {}", config.display());

            let materials = runner::run_cell(&job)?;
            let summary = runner::summarize_cell(&job, &materials)?;
            let out_dir = output.unwrap_or_else(|| job.resolve(Path::new(&job.output.directory)));
            runner::write_cell_json(&summary, &out_dir.join("cell.json"))?;

            println!("Synthesis complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            job.validate()?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Materials { wavelengths } => runner::print_materials(&wavelengths),
    }
}
