mod commands;
mod config;
mod convert;
mod data;
mod grid;
mod plot;
mod wsgg;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Unit conversion and comparison toolkit for molecular absorption spectra.
#[derive(Parser, Debug)]
#[command(name = "specbridge", version)]
#[command(about = "Convert, compare and fit molecular absorption spectra")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an ExoMol cross-section file to absorption coefficients
    Convert {
        /// JSON job file
        job: PathBuf,
    },
    /// Reconcile a HITRAN coefficient export to cross-sections
    Reconcile {
        /// JSON job file
        job: PathBuf,
    },
    /// Overlay spectral series on a log-scale chart
    Plot {
        /// JSON job file
        job: PathBuf,
    },
    /// Render a stacked two-panel coefficient comparison
    Panels {
        /// JSON job file
        job: PathBuf,
    },
    /// Fit WSGG gray-gas weights with temperature polynomials
    Wsgg {
        /// JSON job file
        job: PathBuf,
    },
    /// Compare LBL and WSGG emissivities
    Emissivity {
        /// JSON job file
        job: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Convert { job } => commands::convert(&config::load(job)?),
        Command::Reconcile { job } => commands::reconcile(&config::load(job)?),
        Command::Plot { job } => commands::plot(&config::load(job)?),
        Command::Panels { job } => commands::panels(&config::load(job)?),
        Command::Wsgg { job } => commands::wsgg_fit(&config::load(job)?),
        Command::Emissivity { job } => commands::emissivity(&config::load(job)?),
    }
}
