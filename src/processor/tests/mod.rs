//! Integration tests for the processor module
//!
//! Exercise the complete ingestion pipeline against polar and pressure
//! files written into temporary base directories.


use crate::config::IngestConfig;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const POLAR_FILE: &str = "naca2412_re100k.txt";

const POLAR_HEADER: &str = "
       XFOIL         Version 6.99

 Calculated polar for: NACA 2412

 1 1 Reynolds number fixed          Mach number fixed

 xtrf =   1.000 (top)        1.000 (bottom)
 Mach =   0.000     Re =     0.100 e 6     Ncrit =   9.000

   alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr  Cpmin    Chinge    XCp
";

/// Polar coefficients used by every fixture row
pub fn lift(alpha: f64) -> f64 {
    0.25 + 0.1 * alpha
}

pub fn polar_line(alpha: f64) -> String {
    format!(
        "{:8.3}{:9.4}{:10.5}{:10.5}{:9.4}{:9.4}{:9.4}{:9.4}{:9.4}{:9.4}",
        alpha,
        lift(alpha),
        0.012,
        0.004,
        -0.03,
        0.58,
        1.0,
        -0.974,
        0.0,
        0.27
    )
}

/// Write a polar file with one row per angle of attack
pub fn write_polar(base: &Path, alphas: &[f64]) -> PathBuf {
    let mut text = POLAR_HEADER.to_string();
    for &alpha in alphas {
        writeln!(text, "{}", polar_line(alpha)).unwrap();
    }
    let path = base.join(POLAR_FILE);
    fs::write(&path, text).unwrap();
    path
}

/// Write a pressure distribution of `points` stations; `cpv` encodes the row index
pub fn write_pressure(dir: &Path, file_name: &str, alpha: Option<f64>, points: usize) -> PathBuf {
    let mut text = String::from(" XFOIL pressure distribution\n NACA 2412\n");
    match alpha {
        Some(alpha) => writeln!(text, " alpha = {:.3}   Re = 100000", alpha).unwrap(),
        None => writeln!(text, " operating point").unwrap(),
    }
    text.push_str(" Mach = 0.000\n\n    x        Cpi       Cpv       Qi        Qv\n");

    let mid = points.saturating_sub(1) / 2;
    for i in 0..points {
        let x = (i as f64 - mid as f64).abs() / (mid.max(1) as f64);
        writeln!(
            text,
            "{:10.5}{:10.5}{:10.1}{:10.5}{:10.5}",
            x,
            1.0 - x,
            i as f64,
            0.9,
            0.95
        )
        .unwrap();
    }

    fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, text).unwrap();
    path
}

/// Base directory holding a polar file and one keyed pressure file per angle
pub fn create_condition(temp_dir: &TempDir, alphas: &[f64], points: usize) -> IngestConfig {
    let base = temp_dir.path();
    write_polar(base, alphas);
    for (i, &alpha) in alphas.iter().enumerate() {
        write_pressure(&base.join("cp"), &format!("cp_{:02}.txt", i), Some(alpha), points);
    }
    IngestConfig::new(base)
}
