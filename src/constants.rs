//! Application constants for airfoil ingestion
//!
//! File layouts, column names and default values shared by the readers,
//! the record builder and the loaders.

// =============================================================================
// Input File Layouts
// =============================================================================

/// Header lines preceding the first data row of a polar file
pub const POLAR_SKIP_ROWS: usize = 11;

/// Header lines preceding the first data row of a pressure-distribution file
pub const PRESSURE_SKIP_ROWS: usize = 6;

/// Polar file columns, in file order
pub const POLAR_COLUMNS: &[&str] = &[
    "alpha", "cl", "cd", "cdp", "cm", "top_xtr", "bot_xtr", "cpmin", "chinge", "xcp",
];

/// Pressure-distribution file columns, in file order
pub const PRESSURE_COLUMNS: &[&str] = &["x", "cpi", "cpv", "qi", "qv"];

/// Directory (relative to the base directory) holding one pressure file per angle
pub const DEFAULT_PRESSURE_DIR: &str = "cp";

// =============================================================================
// Resampling
// =============================================================================

/// Number of points kept from each pressure distribution
pub const DEFAULT_SAMPLE_SIZE: usize = 48;

/// Two angles of attack closer than this are treated as the same operating point
pub const ANGLE_TOLERANCE: f64 = 1e-6;

// =============================================================================
// Output Schema
// =============================================================================

pub mod columns {
    pub const AIRFOIL_NAME: &str = "airfoil_name";
    pub const REYNOLDS_NUMBER: &str = "reynolds_number";
    pub const ANGLE_OF_ATTACK: &str = "angle_of_attack";
    pub const LIFT_COEFFICIENT: &str = "lift_coefficient";
    pub const DRAG_COEFFICIENT: &str = "drag_coefficient";
    pub const MOMENT_COEFFICIENT: &str = "moment_coefficient";
    pub const ASSET_PATH: &str = "asset_path";
    pub const MACH_NUMBER: &str = "mach_number";
    pub const CREATED_AT: &str = "created_at";
    pub const MODIFIED_AT: &str = "modified_at";
    pub const PRESSURE_SAMPLE: &str = "pressure_sample";

    /// Output columns in storage order
    pub const ALL: &[&str] = &[
        AIRFOIL_NAME,
        REYNOLDS_NUMBER,
        ANGLE_OF_ATTACK,
        LIFT_COEFFICIENT,
        DRAG_COEFFICIENT,
        MOMENT_COEFFICIENT,
        ASSET_PATH,
        MACH_NUMBER,
        CREATED_AT,
        MODIFIED_AT,
        PRESSURE_SAMPLE,
    ];
}

// =============================================================================
// Storage
// =============================================================================

/// Environment variables read for the Postgres connection
pub mod env_keys {
    pub const USERNAME: &str = "DB_USERNAME";
    pub const PASSWORD: &str = "DB_PASSWORD";
    pub const HOST: &str = "DB_HOST";
    pub const PORT: &str = "DB_PORT";
    pub const DATABASE: &str = "DB_NAME";
    pub const TABLE: &str = "DB_TABLE";
}

/// Destination table when `DB_TABLE` is not set
pub const DEFAULT_TABLE: &str = "airfoil_aerodynamics";

/// Asset directory and extension used by the legacy plotting front end
pub const LEGACY_ASSET_PREFIX: &str = "airfoil/";
pub const LEGACY_ASSET_EXTENSION: &str = ".png";
