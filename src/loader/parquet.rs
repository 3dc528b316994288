//! Parquet destination.
//!
//! Appends records to a single Parquet file. The combined table is written
//! to a temporary file in the destination directory and persisted over the
//! destination, so a failed write leaves the previous contents in place and
//! no stray temporary file behind.

use crate::constants::columns;
use crate::error::{IngestError, Result};
use crate::loader::Loader;
use crate::models::AirfoilAerodynamicRecord;
use chrono::{TimeZone, Utc};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ParquetLoader {
    output_path: PathBuf,
}

impl ParquetLoader {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Read every record currently stored in the destination file
    pub fn read_all(&self) -> Result<Vec<AirfoilAerodynamicRecord>> {
        if !self.output_path.is_file() {
            return Ok(Vec::new());
        }
        dataframe_to_records(&self.read_existing()?)
    }

    fn read_existing(&self) -> Result<DataFrame> {
        let file = File::open(&self.output_path)?;
        Ok(ParquetReader::new(file).finish()?)
    }

    fn output_dir(&self) -> &Path {
        match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Loader for ParquetLoader {
    fn append(&mut self, records: &[AirfoilAerodynamicRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let new_rows = records_to_dataframe(records)?;
        let mut df = if self.output_path.is_file() {
            let mut existing = self.read_existing()?;
            existing
                .vstack_mut(&new_rows)
                .map_err(|e| IngestError::storage(format!(
                    "cannot append to {}: {}",
                    self.output_path.display(),
                    e
                )))?;
            existing
        } else {
            std::fs::create_dir_all(self.output_dir())?;
            new_rows
        };

        // Dropping the temporary file on an error path removes it
        let mut temp = NamedTempFile::new_in(self.output_dir())?;
        ParquetWriter::new(&mut temp)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)
            .map_err(|e| IngestError::storage(format!(
                "failed to write {}: {}",
                self.output_path.display(),
                e
            )))?;
        temp.persist(&self.output_path).map_err(|e| {
            IngestError::storage(format!(
                "failed to replace {}: {}",
                self.output_path.display(),
                e.error
            ))
        })?;

        debug!(
            "Appended {} rows to {} ({} total)",
            records.len(),
            self.output_path.display(),
            df.height()
        );
        Ok(records.len())
    }
}

/// Render records in the storage column layout
pub fn records_to_dataframe(records: &[AirfoilAerodynamicRecord]) -> Result<DataFrame> {
    let text = |f: fn(&AirfoilAerodynamicRecord) -> &str| -> Vec<String> {
        records.iter().map(|r| f(r).to_string()).collect()
    };
    let real = |f: fn(&AirfoilAerodynamicRecord) -> f64| -> Vec<f64> {
        records.iter().map(f).collect()
    };
    let timestamp = |name: &str, f: fn(&AirfoilAerodynamicRecord) -> i64| -> Result<Column> {
        let micros: Vec<i64> = records.iter().map(f).collect();
        Ok(Column::new(name.into(), micros)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?)
    };

    let frame = DataFrame::new(vec![
        Column::new(columns::AIRFOIL_NAME.into(), text(|r| r.airfoil_name.as_str())),
        Column::new(columns::REYNOLDS_NUMBER.into(), real(|r| r.reynolds_number)),
        Column::new(columns::ANGLE_OF_ATTACK.into(), real(|r| r.angle_of_attack)),
        Column::new(columns::LIFT_COEFFICIENT.into(), real(|r| r.lift_coefficient)),
        Column::new(columns::DRAG_COEFFICIENT.into(), real(|r| r.drag_coefficient)),
        Column::new(columns::MOMENT_COEFFICIENT.into(), real(|r| r.moment_coefficient)),
        Column::new(columns::ASSET_PATH.into(), text(|r| r.asset_path.as_str())),
        Column::new(columns::MACH_NUMBER.into(), real(|r| r.mach_number)),
        timestamp(columns::CREATED_AT, |r| r.created_at.timestamp_micros())?,
        timestamp(columns::MODIFIED_AT, |r| r.modified_at.timestamp_micros())?,
        Column::new(columns::PRESSURE_SAMPLE.into(), text(|r| r.pressure_sample.as_str())),
    ])?;
    Ok(frame)
}

/// Inverse of [`records_to_dataframe`]
pub fn dataframe_to_records(df: &DataFrame) -> Result<Vec<AirfoilAerodynamicRecord>> {
    let text = |name: &str| -> Result<Vec<String>> {
        Ok(df
            .column(name)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    };
    let real = |name: &str| -> Result<Vec<f64>> { crate::reader::float_column(df, name) };
    let timestamp = |name: &str| -> Result<Vec<i64>> {
        let series = df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
            .cast(&DataType::Int64)?;
        Ok(series.i64()?.into_iter().map(|v| v.unwrap_or_default()).collect())
    };

    let names = text(columns::AIRFOIL_NAME)?;
    let reynolds = real(columns::REYNOLDS_NUMBER)?;
    let alpha = real(columns::ANGLE_OF_ATTACK)?;
    let cl = real(columns::LIFT_COEFFICIENT)?;
    let cd = real(columns::DRAG_COEFFICIENT)?;
    let cm = real(columns::MOMENT_COEFFICIENT)?;
    let assets = text(columns::ASSET_PATH)?;
    let mach = real(columns::MACH_NUMBER)?;
    let created = timestamp(columns::CREATED_AT)?;
    let modified = timestamp(columns::MODIFIED_AT)?;
    let samples = text(columns::PRESSURE_SAMPLE)?;

    let stamp = |micros: i64| {
        Utc.timestamp_micros(micros).single().ok_or_else(|| {
            IngestError::storage(format!("timestamp out of range: {}", micros))
        })
    };

    (0..df.height())
        .map(|i| {
            Ok(AirfoilAerodynamicRecord {
                airfoil_name: names[i].clone(),
                reynolds_number: reynolds[i],
                mach_number: mach[i],
                angle_of_attack: alpha[i],
                lift_coefficient: cl[i],
                drag_coefficient: cd[i],
                moment_coefficient: cm[i],
                asset_path: assets[i].clone(),
                pressure_sample: samples[i].clone(),
                created_at: stamp(created[i])?,
                modified_at: stamp(modified[i])?,
            })
        })
        .collect()
}
