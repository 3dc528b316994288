//! Fixed-width text table parsing.
//!
//! Polar and pressure-distribution files share a layout: a fixed number of
//! header lines followed by column-aligned numeric rows. Fields are split on
//! runs of whitespace, so variable spacing between columns is tolerated, but
//! every data row must carry exactly one value per column.

use crate::error::{IngestError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Reader for one whitespace-aligned table layout
#[derive(Debug, Clone)]
pub struct FixedWidthReader {
    skip_rows: usize,
    columns: Vec<String>,
}

impl FixedWidthReader {
    pub fn new(skip_rows: usize, columns: &[&str]) -> Self {
        Self {
            skip_rows,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Parse a file into a frame with one `Float64` column per schema column
    pub fn read_path(&self, path: &Path) -> Result<DataFrame> {
        Ok(self.read_path_with_header(path)?.1)
    }

    /// Like [`FixedWidthReader::read_path`], also returning the skipped header lines
    pub fn read_path_with_header(&self, path: &Path) -> Result<(Vec<String>, DataFrame)> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IngestError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => IngestError::Io(e),
        })?;
        self.read_with_header(BufReader::new(file), path)
    }

    /// Parse from any buffered source; `path` is only used in error messages
    pub fn read<R: BufRead>(&self, reader: R, path: &Path) -> Result<DataFrame> {
        Ok(self.read_with_header(reader, path)?.1)
    }

    pub fn read_with_header<R: BufRead>(
        &self,
        reader: R,
        path: &Path,
    ) -> Result<(Vec<String>, DataFrame)> {
        let mut header = Vec::with_capacity(self.skip_rows);
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); self.columns.len()];

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = index + 1;

            if index < self.skip_rows {
                header.push(line);
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != self.columns.len() {
                return Err(IngestError::malformed(
                    path,
                    line_num,
                    format!(
                        "expected {} fields, found {}",
                        self.columns.len(),
                        fields.len()
                    ),
                ));
            }

            for ((field, column), out) in fields.iter().zip(&self.columns).zip(values.iter_mut()) {
                let value = parse_field(field).ok_or_else(|| {
                    IngestError::malformed(
                        path,
                        line_num,
                        format!("column '{}' is not numeric: '{}'", column, field),
                    )
                })?;
                out.push(value);
            }
        }

        let rows = values.first().map_or(0, Vec::len);
        debug!(
            "Parsed {} rows x {} columns from {}",
            rows,
            self.columns.len(),
            path.display()
        );

        let columns = self
            .columns
            .iter()
            .zip(values)
            .map(|(name, data)| Column::new(name.as_str().into(), data))
            .collect::<Vec<_>>();

        Ok((header, DataFrame::new(columns)?))
    }
}

/// Parse one numeric field, accepting Fortran `D` exponents
fn parse_field(field: &str) -> Option<f64> {
    let value = match field.parse::<f64>() {
        Ok(v) => v,
        Err(_) => field.replace(['D', 'd'], "E").parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Extract a column as a vector of `f64`
pub fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = df
        .column(name)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    Ok(values)
}
