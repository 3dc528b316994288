//! Pressure-distribution collection.
//!
//! Reads one pressure-distribution file per angle of attack from a
//! directory, resamples each distribution and serializes the result. Each
//! sample also records the angle of attack found in its file, when any, so
//! that samples can be matched to polar rows by angle instead of by
//! directory position.

use crate::config::IngestConfig;
use crate::constants::PRESSURE_COLUMNS;
use crate::error::{IngestError, Result};
use crate::models::{PressurePoint, PressureSample};
use crate::processor::resample::PressureResampler;
use crate::reader::{FixedWidthReader, float_column};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};
use walkdir::WalkDir;

static HEADER_ALPHA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:alpha|alfa|aoa)\s*[=:]\s*([-+]?\d+(?:\.\d*)?(?:[eE][-+]?\d+)?)")
        .expect("valid header alpha regex")
});

static FILE_ALPHA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[_\-\s])(?:alpha|alfa|aoa|a)[_=]?([-+]?\d+(?:\.\d+)?)$")
        .expect("valid file name alpha regex")
});

/// One resampled pressure distribution, ready to be joined to a polar row
#[derive(Debug, Clone)]
pub struct PressureEntry {
    pub path: PathBuf,
    pub angle_of_attack: Option<f64>,
    pub sample: PressureSample,
    pub encoded: String,
}

/// Builds the ordered pressure-sample collection for one ingestion run
#[derive(Debug, Clone)]
pub struct PressureCollectionBuilder {
    reader: FixedWidthReader,
    resampler: PressureResampler,
}

impl PressureCollectionBuilder {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            reader: FixedWidthReader::new(config.pressure_skip_rows, PRESSURE_COLUMNS),
            resampler: PressureResampler::new(config.sample_size, config.underflow_policy),
        }
    }

    /// Process every file in `dir`, in file-name order
    pub fn build(&self, dir: &Path) -> Result<Vec<PressureEntry>> {
        let files = list_pressure_files(dir)?;
        info!(
            "Found {} pressure distribution files in {}",
            files.len(),
            dir.display()
        );

        files.iter().map(|path| self.build_entry(path)).collect()
    }

    /// Read, resample and encode one pressure-distribution file
    pub fn build_entry(&self, path: &Path) -> Result<PressureEntry> {
        let (header, df) = self.reader.read_path_with_header(path)?;
        let xs = float_column(&df, "x")?;
        let cps = float_column(&df, "cpv")?;

        let points: Vec<PressurePoint> = xs
            .into_iter()
            .zip(cps)
            .map(|(x, cp)| PressurePoint::new(x, cp))
            .collect();

        let sample = PressureSample::new(self.resampler.resample(&points, path)?);
        let encoded = sample.to_json()?;
        let angle_of_attack =
            angle_from_header(&header).or_else(|| angle_from_file_name(path));

        debug!(
            "Resampled {} from {} to {} points (alpha = {:?})",
            path.display(),
            points.len(),
            sample.len(),
            angle_of_attack
        );

        Ok(PressureEntry {
            path: path.to_path_buf(),
            angle_of_attack,
            sample,
            encoded,
        })
    }
}

/// Regular, non-hidden files directly under `dir`, sorted by file name.
///
/// Symbolic links are resolved, so a link to a regular file is listed.
pub fn list_pressure_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if entry.file_type().is_file() && !hidden {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Angle of attack declared in the header lines, e.g. `alpha = 2.000`
fn angle_from_header(header: &[String]) -> Option<f64> {
    header.iter().find_map(|line| {
        HEADER_ALPHA
            .captures(line)
            .and_then(|c| c[1].parse::<f64>().ok())
    })
}

/// Angle of attack encoded as a file-name suffix, e.g. `cp_a2.0.txt`
fn angle_from_file_name(path: &Path) -> Option<f64> {
    // Without an extension `cp_a2.5` has the stem `cp_a2`, so try the full name first
    let name = path.file_name()?.to_str()?;
    let stem = path.file_stem()?.to_str()?;
    [name, stem]
        .iter()
        .find_map(|candidate| FILE_ALPHA.captures(candidate))
        .and_then(|c| c[1].parse::<f64>().ok())
}
