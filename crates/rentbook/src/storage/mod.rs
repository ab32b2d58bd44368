//! Storage layer for rentbook.
//!
//! This module provides `SQLite`-based persistent storage for one partition's
//! vehicle records. Every operation opens its own connection and closes it on
//! return, so no lock or handle outlives a call.

pub mod migrations;
pub mod schema;

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::partition::PartitionHandle;
use crate::record::{RecordFields, VehicleRecord};

use schema::RECORD_COLUMNS;

/// Record operations over a single partition.
///
/// Implemented by [`PartitionStore`] and by decorators such as
/// [`crate::validate::Validated`].
pub trait RecordStore {
    /// Key of the partition this store operates on.
    fn partition(&self) -> &str;

    /// Persist a new record and return its id.
    ///
    /// The id is strictly greater than any id previously assigned in the
    /// partition, including ids of deleted records.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    fn create(&self, fields: &RecordFields) -> Result<i64>;

    /// Fetch a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such record exists.
    fn get(&self, id: i64) -> Result<VehicleRecord>;

    /// Replace all six fields of a record. The id never changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such record exists, in which case
    /// nothing is written.
    fn update(&self, id: i64, fields: &RecordFields) -> Result<()>;

    /// Permanently remove a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such record exists.
    fn delete(&self, id: i64) -> Result<()>;

    /// Every record in the partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition cannot be read.
    fn list_all(&self) -> Result<Vec<VehicleRecord>>;
}

/// `SQLite`-backed store for one partition.
#[derive(Debug, Clone)]
pub struct PartitionStore {
    handle: PartitionHandle,
}

impl PartitionStore {
    /// Create a store over a resolved partition.
    #[must_use]
    pub fn new(handle: PartitionHandle) -> Self {
        Self { handle }
    }

    /// The partition this store operates on.
    #[must_use]
    pub fn handle(&self) -> &PartitionHandle {
        &self.handle
    }

    /// Get the path to the partition's database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    /// Create the partition's database and schema if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub fn initialize(handle: &PartitionHandle) -> Result<()> {
        Self::connect_to(handle.path()).map(drop)
    }

    /// Open a connection for the duration of one operation.
    fn connect(&self) -> Result<Connection> {
        Self::connect_to(self.handle.path())
    }

    fn connect_to(path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(path).map_err(|source| Error::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        Ok(conn)
    }

    /// Get partition statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<PartitionStats> {
        let conn = self.connect()?;

        let total_records: i64 =
            conn.query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))?;

        let last_assigned_id: Option<i64> = conn
            .query_row(
                "SELECT seq FROM sqlite_sequence WHERE name = 'vehicles'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let db_size_bytes = std::fs::metadata(self.path()).map_or(0, |m| m.len());

        Ok(PartitionStats {
            partition: self.handle.key().to_string(),
            total_records,
            last_assigned_id,
            db_size_bytes,
        })
    }

    /// Convert a database row to a record.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<VehicleRecord> {
        Ok(VehicleRecord {
            id: row.get(0)?,
            fields: RecordFields {
                date: row.get(1)?,
                time: row.get(2)?,
                plate: row.get(3)?,
                vehicle: row.get(4)?,
                person: row.get(5)?,
                partner: row.get(6)?,
            },
        })
    }
}

impl RecordStore for PartitionStore {
    fn partition(&self) -> &str {
        self.handle.key()
    }

    fn create(&self, fields: &RecordFields) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            r"
            INSERT INTO vehicles (date, time, plate, vehicle, person, partner)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                fields.date,
                fields.time,
                fields.plate,
                fields.vehicle,
                fields.person,
                fields.partner,
            ],
        )?;

        let id = conn.last_insert_rowid();
        info!(
            "Added vehicle '{}' as record {} in partition '{}'",
            fields.vehicle,
            id,
            self.partition()
        );
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<VehicleRecord> {
        let conn = self.connect()?;
        conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM vehicles WHERE id = ?1"),
            [id],
            Self::row_to_record,
        )
        .optional()?
        .ok_or_else(|| Error::not_found(self.partition(), id))
    }

    fn update(&self, id: i64, fields: &RecordFields) -> Result<()> {
        let conn = self.connect()?;
        let affected = conn.execute(
            r"
            UPDATE vehicles
            SET date = ?1, time = ?2, plate = ?3, vehicle = ?4, person = ?5, partner = ?6
            WHERE id = ?7
            ",
            params![
                fields.date,
                fields.time,
                fields.plate,
                fields.vehicle,
                fields.person,
                fields.partner,
                id,
            ],
        )?;

        if affected == 0 {
            return Err(Error::not_found(self.partition(), id));
        }
        info!("Updated record {} in partition '{}'", id, self.partition());
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let conn = self.connect()?;
        let affected = conn.execute("DELETE FROM vehicles WHERE id = ?1", [id])?;

        if affected == 0 {
            return Err(Error::not_found(self.partition(), id));
        }
        info!("Deleted record {} from partition '{}'", id, self.partition());
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<VehicleRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM vehicles ORDER BY id ASC"
        ))?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "Listed {} records from partition '{}'",
            records.len(),
            self.partition()
        );
        Ok(records)
    }
}

/// Statistics about one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionStats {
    /// Partition key.
    pub partition: String,
    /// Number of records currently stored.
    pub total_records: i64,
    /// Highest id ever assigned, if any record was ever created.
    pub last_assigned_id: Option<i64>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
