//! Command-line interface components.

use crate::config::{IngestConfig, JoinStrategy, UnderflowPolicy};
use crate::processor::IngestRequest;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "airfoil-ingest")]
#[command(about = "Automatically insert airfoil aerodynamics into the database")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Airfoil name code, e.g. naca2412
    #[arg(value_name = "AIRFOIL")]
    pub airfoil: String,

    /// Polar file, relative to the base directory
    #[arg(value_name = "FILENAME")]
    pub filename: PathBuf,

    /// Reynolds number, e.g. 123456.789
    #[arg(value_name = "REYNOLDS", allow_negative_numbers = true)]
    pub reynolds: f64,

    /// Mach number, e.g. 0.1
    #[arg(value_name = "MACH", allow_negative_numbers = true)]
    pub mach: f64,

    /// Directory the polar file and pressure directory are resolved against
    #[arg(long, default_value = ".")]
    pub base_dir: PathBuf,

    /// Pressure-distribution directory, relative to the base directory
    #[arg(long, default_value = crate::constants::DEFAULT_PRESSURE_DIR)]
    pub pressure_dir: PathBuf,

    /// Append to this Parquet file instead of the Postgres table from DB_* variables
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail when a pressure distribution is too short for the full sample
    #[arg(long)]
    pub strict_resample: bool,

    /// How pressure files are paired with polar rows
    #[arg(long, value_enum, default_value_t = JoinArg::Auto)]
    pub join: JoinArg,

    /// Write asset paths as airfoil/<name>_<alpha>.png
    #[arg(long)]
    pub legacy_asset_path: bool,

    /// Parse and validate everything but store nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JoinArg {
    Auto,
    Angle,
    Listing,
}

impl From<JoinArg> for JoinStrategy {
    fn from(arg: JoinArg) -> Self {
        match arg {
            JoinArg::Auto => JoinStrategy::Auto,
            JoinArg::Angle => JoinStrategy::AngleKey,
            JoinArg::Listing => JoinStrategy::ListingOrder,
        }
    }
}

impl Args {
    pub fn ingest_config(&self) -> IngestConfig {
        let policy = if self.strict_resample {
            UnderflowPolicy::Strict
        } else {
            UnderflowPolicy::Lenient
        };

        let config = IngestConfig::new(&self.base_dir)
            .with_pressure_directory(&self.pressure_dir)
            .with_underflow_policy(policy)
            .with_join_strategy(self.join.into());

        if self.legacy_asset_path {
            config.with_legacy_asset_paths()
        } else {
            config
        }
    }

    pub fn request(&self) -> IngestRequest {
        IngestRequest::new(&self.airfoil, &self.filename, self.reynolds, self.mach)
    }
}
