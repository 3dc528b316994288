//! Ingestion pipeline.
//!
//! Orchestrates one ingestion run: parse the polar file, build the pressure
//! sample collection, join the two, stamp the records and hand them to a
//! [`Loader`]. Nothing reaches the loader unless every input parsed.

pub mod join;
pub mod polar;
pub mod pressure;
pub mod resample;

#[cfg(test)]
pub mod tests;

use self::join::align_samples;
use self::polar::{AirfoilCondition, PolarRecordBuilder};
use self::pressure::PressureCollectionBuilder;

use crate::clock::{Clock, SystemClock};
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::loader::Loader;
use crate::models::{AirfoilAerodynamicRecord, IngestionStats};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// One airfoil condition to ingest
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub airfoil_name: String,
    /// Polar file, relative to the configured base directory
    pub polar_file: PathBuf,
    pub reynolds_number: f64,
    pub mach_number: f64,
}

impl IngestRequest {
    pub fn new(
        airfoil_name: impl Into<String>,
        polar_file: impl Into<PathBuf>,
        reynolds_number: f64,
        mach_number: f64,
    ) -> Self {
        Self {
            airfoil_name: airfoil_name.into(),
            polar_file: polar_file.into(),
            reynolds_number,
            mach_number,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.airfoil_name.trim();
        if name.is_empty() {
            return Err(IngestError::InvalidRequest {
                reason: "airfoil name is empty".to_string(),
            });
        }
        if name.contains(['/', '\\']) {
            return Err(IngestError::InvalidRequest {
                reason: format!("airfoil name '{}' contains a path separator", name),
            });
        }

        for (label, value) in [
            ("Reynolds number", self.reynolds_number),
            ("Mach number", self.mach_number),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(IngestError::InvalidRequest {
                    reason: format!("{} must be a finite non-negative number, got {}", label, value),
                });
            }
        }
        Ok(())
    }

    fn condition(&self) -> AirfoilCondition {
        AirfoilCondition {
            airfoil_name: self.airfoil_name.trim().to_string(),
            reynolds_number: self.reynolds_number,
            mach_number: self.mach_number,
        }
    }
}

/// Runs ingestion requests against one configuration
#[derive(Clone)]
pub struct AirfoilIngestor {
    config: IngestConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AirfoilIngestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirfoilIngestor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AirfoilIngestor {
    pub fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Use a different time source for `created_at` / `modified_at`
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Parse and join all inputs into records without loading them
    pub fn build_records(
        &self,
        request: &IngestRequest,
    ) -> Result<(Vec<AirfoilAerodynamicRecord>, IngestionStats)> {
        request.validate()?;

        let polar_path = self.config.resolve(&request.polar_file);
        let pressure_dir = self.config.pressure_path();
        debug!(
            "Ingesting {} from {} with pressure distributions in {}",
            request.airfoil_name,
            polar_path.display(),
            pressure_dir.display()
        );

        let polar_builder = PolarRecordBuilder::new(&self.config);
        let rows = polar_builder.read_rows(&polar_path)?;

        let entries = PressureCollectionBuilder::new(&self.config).build(&pressure_dir)?;
        let pressure_files = entries.len();

        let (samples, join) = align_samples(&rows, entries, self.config.join_strategy)?;
        let records = polar_builder.build(&request.condition(), &rows, samples, self.clock.now());

        let stats = IngestionStats {
            polar_rows: rows.len(),
            pressure_files,
            records_loaded: 0,
            join,
            ..Default::default()
        };
        Ok((records, stats))
    }

    /// Build every record, then append them all through `loader`
    pub fn ingest<L: Loader + ?Sized>(
        &self,
        request: &IngestRequest,
        loader: &mut L,
    ) -> Result<IngestionStats> {
        let start_time = Instant::now();

        let (records, mut stats) = self.build_records(request)?;
        stats.records_loaded = loader.append(&records)?;
        stats.elapsed = start_time.elapsed();

        info!(
            "Loaded {} records for {} (Re = {}, Mach = {}) in {}ms",
            stats.records_loaded,
            request.airfoil_name,
            request.reynolds_number,
            request.mach_number,
            stats.elapsed.as_millis()
        );
        Ok(stats)
    }
}
