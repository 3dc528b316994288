//! Postgres destination.
//!
//! Inserts every record of a run inside one transaction, so either the whole
//! run is appended or nothing is. The destination table must already exist.

use crate::config::StorageConfig;
use crate::constants::columns;
use crate::error::{IngestError, Result};
use crate::loader::Loader;
use crate::models::AirfoilAerodynamicRecord;
use postgres::types::Type;
use postgres::{Client, Config, NoTls};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("valid table name regex")
});

pub struct PostgresLoader {
    config: StorageConfig,
    client: Option<Client>,
}

impl std::fmt::Debug for PostgresLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresLoader")
            .field("config", &self.config)
            .field("connected", &self.client.is_some())
            .finish()
    }
}

impl PostgresLoader {
    /// Validate the settings; the connection is opened on first append
    pub fn new(config: StorageConfig) -> Result<Self> {
        if !TABLE_NAME.is_match(&config.table) {
            return Err(IngestError::Configuration {
                message: format!("invalid table name: '{}'", config.table),
            });
        }
        Ok(Self {
            config,
            client: None,
        })
    }

    fn client(&mut self) -> Result<&mut Client> {
        if self.client.is_none() {
            let client = Config::new()
                .host(&self.config.host)
                .port(self.config.port)
                .user(&self.config.username)
                .password(&self.config.password)
                .dbname(&self.config.database)
                .connect(NoTls)?;
            info!(
                "Connected to postgres at {}:{}/{}",
                self.config.host, self.config.port, self.config.database
            );
            self.client = Some(client);
        }
        self.client
            .as_mut()
            .ok_or_else(|| IngestError::storage("postgres client unavailable"))
    }
}

/// Parameter types sent with the insert, in storage column order.
///
/// Declaring them lets the server apply assignment casts, so `real` and
/// `timestamp` columns accept `FLOAT8` and `TIMESTAMPTZ` values.
pub const PARAMETER_TYPES: [Type; 11] = [
    Type::TEXT,
    Type::FLOAT8,
    Type::FLOAT8,
    Type::FLOAT8,
    Type::FLOAT8,
    Type::FLOAT8,
    Type::TEXT,
    Type::FLOAT8,
    Type::TIMESTAMPTZ,
    Type::TIMESTAMPTZ,
    Type::TEXT,
];

/// `INSERT` statement for the storage column layout
pub fn insert_statement(table: &str) -> String {
    let placeholders: Vec<String> = (1..=columns::ALL.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns::ALL.join(", "),
        placeholders.join(", ")
    )
}

impl Loader for PostgresLoader {
    fn append(&mut self, records: &[AirfoilAerodynamicRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let sql = insert_statement(&self.config.table);
        let client = self.client()?;
        let mut transaction = client.transaction()?;
        let statement = transaction.prepare_typed(&sql, &PARAMETER_TYPES)?;

        for record in records {
            transaction.execute(
                &statement,
                &[
                    &record.airfoil_name,
                    &record.reynolds_number,
                    &record.angle_of_attack,
                    &record.lift_coefficient,
                    &record.drag_coefficient,
                    &record.moment_coefficient,
                    &record.asset_path,
                    &record.mach_number,
                    &record.created_at,
                    &record.modified_at,
                    &record.pressure_sample,
                ],
            )?;
        }
        transaction.commit()?;

        debug!("Committed {} rows", records.len());
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(table: &str) -> StorageConfig {
        StorageConfig {
            username: "flow".to_string(),
            password: "secret".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            database: "aero".to_string(),
            table: table.to_string(),
        }
    }

    #[test]
    fn test_insert_statement_follows_column_layout() {
        assert_eq!(
            insert_statement("airfoil_aerodynamics"),
            "INSERT INTO airfoil_aerodynamics (airfoil_name, reynolds_number, angle_of_attack, \
             lift_coefficient, drag_coefficient, moment_coefficient, asset_path, mach_number, \
             created_at, modified_at, pressure_sample) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        );
    }

    #[test]
    fn test_parameter_types_follow_column_layout() {
        assert_eq!(PARAMETER_TYPES.len(), columns::ALL.len());

        for (column, ty) in columns::ALL.iter().zip(&PARAMETER_TYPES) {
            let expected = match *column {
                columns::AIRFOIL_NAME | columns::ASSET_PATH | columns::PRESSURE_SAMPLE => {
                    Type::TEXT
                }
                columns::CREATED_AT | columns::MODIFIED_AT => Type::TIMESTAMPTZ,
                _ => Type::FLOAT8,
            };
            assert_eq!(*ty, expected, "column {}", column);
        }
    }

    #[test]
    fn test_record_values_accept_parameter_types() {
        use chrono::{DateTime, Utc};
        use postgres::types::ToSql;

        assert!(<String as ToSql>::accepts(&Type::TEXT));
        assert!(<f64 as ToSql>::accepts(&Type::FLOAT8));
        assert!(<DateTime<Utc> as ToSql>::accepts(&Type::TIMESTAMPTZ));
        assert!(!<DateTime<Utc> as ToSql>::accepts(&Type::TIMESTAMP));
    }

    #[test]
    fn test_table_name_validation() {
        assert!(PostgresLoader::new(storage("airfoil_aerodynamics")).is_ok());
        assert!(PostgresLoader::new(storage("public.flow_koleksiairfoil")).is_ok());
        assert!(PostgresLoader::new(storage("x; DROP TABLE y")).is_err());
        assert!(PostgresLoader::new(storage("")).is_err());
    }

    #[test]
    fn test_empty_append_does_not_connect() {
        let mut loader = PostgresLoader::new(storage("airfoil_aerodynamics")).unwrap();
        assert_eq!(loader.append(&[]).unwrap(), 0);
        assert!(loader.client.is_none());
    }
}
