//! Configuration management and validation.
//!
//! Provides the ingestion parameters (input layout, resampling and join
//! policy, asset naming) and the storage connection settings sourced from
//! the environment.

use crate::constants::{
    DEFAULT_PRESSURE_DIR, DEFAULT_SAMPLE_SIZE, DEFAULT_TABLE, LEGACY_ASSET_EXTENSION,
    LEGACY_ASSET_PREFIX, POLAR_SKIP_ROWS, PRESSURE_SKIP_ROWS, env_keys,
};
use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// What to do when a pressure distribution cannot supply the full sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnderflowPolicy {
    /// Keep the shorter sample and log a warning
    #[default]
    Lenient,
    /// Fail the ingestion run with `ResampleUnderflow`
    Strict,
}

/// How pressure files are paired with polar rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinStrategy {
    /// Match by angle of attack when every file carries one, else by listing order
    #[default]
    Auto,
    /// Match by angle of attack; every file must carry one
    AngleKey,
    /// Pair the n-th file (sorted by name) with the n-th polar row
    ListingOrder,
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Root for resolving the polar file and pressure directory
    pub base_directory: PathBuf,

    /// Pressure-distribution directory, relative to `base_directory`
    pub pressure_directory: PathBuf,

    pub polar_skip_rows: usize,
    pub pressure_skip_rows: usize,

    /// Points kept per pressure distribution (even)
    pub sample_size: usize,

    pub underflow_policy: UnderflowPolicy,
    pub join_strategy: JoinStrategy,

    /// Prepended to every asset path
    pub asset_prefix: String,

    /// Appended to every asset path
    pub asset_extension: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("."),
            pressure_directory: PathBuf::from(DEFAULT_PRESSURE_DIR),
            polar_skip_rows: POLAR_SKIP_ROWS,
            pressure_skip_rows: PRESSURE_SKIP_ROWS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            underflow_policy: UnderflowPolicy::Lenient,
            join_strategy: JoinStrategy::Auto,
            asset_prefix: String::new(),
            asset_extension: String::new(),
        }
    }
}

impl IngestConfig {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
            ..Default::default()
        }
    }

    pub fn with_pressure_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pressure_directory = dir.into();
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_underflow_policy(mut self, policy: UnderflowPolicy) -> Self {
        self.underflow_policy = policy;
        self
    }

    pub fn with_join_strategy(mut self, strategy: JoinStrategy) -> Self {
        self.join_strategy = strategy;
        self
    }

    /// Use the `airfoil/<name>_<alpha>.png` asset layout
    pub fn with_legacy_asset_paths(mut self) -> Self {
        self.asset_prefix = LEGACY_ASSET_PREFIX.to_string();
        self.asset_extension = LEGACY_ASSET_EXTENSION.to_string();
        self
    }

    /// Resolve a path relative to the base directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_directory.join(path)
    }

    pub fn pressure_path(&self) -> PathBuf {
        self.resolve(&self.pressure_directory)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_size < 2 || self.sample_size % 2 != 0 {
            return Err(IngestError::Configuration {
                message: format!(
                    "sample size must be an even number of at least 2, got {}",
                    self.sample_size
                ),
            });
        }
        debug!("Validated ingestion config: {:?}", self);
        Ok(())
    }
}

/// Connection settings for the Postgres destination table
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub table: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("table", &self.table)
            .finish()
    }
}

impl StorageConfig {
    /// Read connection settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read connection settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).ok_or_else(|| IngestError::MissingConfiguration {
                key: key.to_string(),
            })
        };

        let username = require(env_keys::USERNAME)?;
        let password = require(env_keys::PASSWORD)?;
        let host = require(env_keys::HOST)?;
        let port = require(env_keys::PORT)?;
        let database = require(env_keys::DATABASE)?;

        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|e| IngestError::Configuration {
                message: format!("{} is not a valid port ({}): {}", env_keys::PORT, port, e),
            })?;

        let table = lookup(env_keys::TABLE).unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(Self {
            username,
            password,
            host,
            port,
            database,
            table,
        })
    }
}
