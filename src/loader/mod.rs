//! Destinations for finished records.
//!
//! A [`Loader`] receives the complete record set of one ingestion run and
//! appends it to durable storage. Existing rows are never updated or
//! removed.

pub mod parquet;
pub mod postgres;

pub use self::parquet::{ParquetLoader, records_to_dataframe};
pub use self::postgres::PostgresLoader;

use crate::error::Result;
use crate::models::AirfoilAerodynamicRecord;

pub trait Loader {
    /// Append `records` in order, returning how many were written
    fn append(&mut self, records: &[AirfoilAerodynamicRecord]) -> Result<usize>;
}

/// Keeps appended records in memory
#[derive(Debug, Default)]
pub struct MemoryLoader {
    pub records: Vec<AirfoilAerodynamicRecord>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Loader for MemoryLoader {
    fn append(&mut self, records: &[AirfoilAerodynamicRecord]) -> Result<usize> {
        self.records.extend_from_slice(records);
        Ok(records.len())
    }
}
