//! Core data structures for airfoil ingestion.
//!
//! Defines pressure-distribution points, the serialized pressure sample,
//! the persisted aerodynamic record and per-run statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// One chordwise station of a pressure distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressurePoint {
    pub x: f64,
    #[serde(alias = "cpv")]
    pub cp: f64,
}

impl PressurePoint {
    pub fn new(x: f64, cp: f64) -> Self {
        Self { x, cp }
    }
}

/// Resampled pressure distribution stored alongside each record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PressureSample {
    pub points: Vec<PressurePoint>,
}

impl PressureSample {
    pub fn new(points: Vec<PressurePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Encode as a JSON array of `{"x": .., "cp": ..}` objects
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a sample previously written by [`PressureSample::to_json`]
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Measured operating point read from one polar file row.
///
/// Only angle of attack and the lift, drag and moment coefficients reach
/// storage; the remaining columns are kept as parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolarRow {
    pub angle_of_attack: f64,
    pub lift_coefficient: f64,
    pub drag_coefficient: f64,
    pub moment_coefficient: f64,
    pub pressure_drag_coefficient: f64,
    /// Transition location on the upper surface, x/c
    pub top_transition: f64,
    /// Transition location on the lower surface, x/c
    pub bottom_transition: f64,
    pub min_pressure_coefficient: f64,
    pub hinge_moment_coefficient: f64,
    pub center_of_pressure: f64,
}

/// The persisted unit: one polar row joined with its pressure sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilAerodynamicRecord {
    pub airfoil_name: String,
    pub reynolds_number: f64,
    pub mach_number: f64,
    pub angle_of_attack: f64,
    pub lift_coefficient: f64,
    pub drag_coefficient: f64,
    pub moment_coefficient: f64,
    pub asset_path: String,
    /// JSON-encoded [`PressureSample`]
    pub pressure_sample: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl AirfoilAerodynamicRecord {
    pub fn decoded_pressure_sample(&self) -> Result<PressureSample> {
        PressureSample::from_json(&self.pressure_sample)
    }
}

/// How pressure files were paired with polar rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinOutcome {
    #[default]
    AngleKey,
    ListingOrder,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct IngestionStats {
    pub polar_rows: usize,
    pub pressure_files: usize,
    pub records_loaded: usize,
    pub join: JoinOutcome,
    pub elapsed: Duration,
}
