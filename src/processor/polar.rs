//! Polar file parsing and record assembly.

use crate::config::IngestConfig;
use crate::constants::POLAR_COLUMNS;
use crate::error::Result;
use crate::models::{AirfoilAerodynamicRecord, PolarRow};
use crate::reader::{FixedWidthReader, float_column};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

/// Identity fields shared by every record of one ingestion run
#[derive(Debug, Clone)]
pub struct AirfoilCondition {
    pub airfoil_name: String,
    pub reynolds_number: f64,
    pub mach_number: f64,
}

#[derive(Debug, Clone)]
pub struct PolarRecordBuilder {
    reader: FixedWidthReader,
    asset_prefix: String,
    asset_extension: String,
}

impl PolarRecordBuilder {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            reader: FixedWidthReader::new(config.polar_skip_rows, POLAR_COLUMNS),
            asset_prefix: config.asset_prefix.clone(),
            asset_extension: config.asset_extension.clone(),
        }
    }

    /// Parse the polar file into one row per angle of attack
    pub fn read_rows(&self, path: &Path) -> Result<Vec<PolarRow>> {
        let df = self.reader.read_path(path)?;
        let column = |name: &str| float_column(&df, name);

        let alpha = column("alpha")?;
        let cl = column("cl")?;
        let cd = column("cd")?;
        let cdp = column("cdp")?;
        let cm = column("cm")?;
        let top_xtr = column("top_xtr")?;
        let bot_xtr = column("bot_xtr")?;
        let cpmin = column("cpmin")?;
        let chinge = column("chinge")?;
        let xcp = column("xcp")?;

        let rows: Vec<PolarRow> = (0..df.height())
            .map(|i| PolarRow {
                angle_of_attack: alpha[i],
                lift_coefficient: cl[i],
                drag_coefficient: cd[i],
                moment_coefficient: cm[i],
                pressure_drag_coefficient: cdp[i],
                top_transition: top_xtr[i],
                bottom_transition: bot_xtr[i],
                min_pressure_coefficient: cpmin[i],
                hinge_moment_coefficient: chinge[i],
                center_of_pressure: xcp[i],
            })
            .collect();

        debug!("Read {} polar rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// `<prefix><airfoil>_<alpha><extension>`, e.g. `naca2412_2.0`
    pub fn asset_path(&self, airfoil_name: &str, angle_of_attack: f64) -> String {
        format!(
            "{}{}_{}{}",
            self.asset_prefix,
            airfoil_name,
            format_angle(angle_of_attack),
            self.asset_extension
        )
    }

    /// Assemble one record per polar row; `samples[i]` belongs to `rows[i]`
    pub fn build(
        &self,
        condition: &AirfoilCondition,
        rows: &[PolarRow],
        samples: Vec<String>,
        ingested_at: DateTime<Utc>,
    ) -> Vec<AirfoilAerodynamicRecord> {
        rows.iter()
            .zip(samples)
            .map(|(row, pressure_sample)| AirfoilAerodynamicRecord {
                airfoil_name: condition.airfoil_name.clone(),
                reynolds_number: condition.reynolds_number,
                mach_number: condition.mach_number,
                angle_of_attack: row.angle_of_attack,
                lift_coefficient: row.lift_coefficient,
                drag_coefficient: row.drag_coefficient,
                moment_coefficient: row.moment_coefficient,
                asset_path: self.asset_path(&condition.airfoil_name, row.angle_of_attack),
                pressure_sample,
                created_at: ingested_at,
                modified_at: ingested_at,
            })
            .collect()
    }
}

/// Shortest round-trip decimal, keeping `.0` on integral values
fn format_angle(value: f64) -> String {
    format!("{:?}", value)
}
