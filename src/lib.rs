//! Airfoil Ingest Library
//!
//! Converts airfoil analysis output (a lift/drag/moment polar plus one
//! surface pressure distribution per angle of attack) into normalized
//! aerodynamic records and appends them to durable storage.
//!
//! This library provides tools for:
//! - Parsing whitespace-aligned polar and pressure-distribution text files
//! - Downsampling pressure distributions symmetrically about the leading edge
//! - Joining pressure samples to polar rows by angle of attack
//! - Appending records to Postgres or Parquet

pub mod cli;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod models;
pub mod processor;
pub mod reader;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{IngestConfig, JoinStrategy, StorageConfig, UnderflowPolicy};
pub use error::{IngestError, Result};
pub use loader::{Loader, MemoryLoader, ParquetLoader, PostgresLoader};
pub use models::{AirfoilAerodynamicRecord, IngestionStats, PressurePoint, PressureSample};
pub use processor::{AirfoilIngestor, IngestRequest};
