//! `SQLite` schema definitions for partition databases.

/// SQL statement to create the vehicles table.
///
/// `AUTOINCREMENT` keeps ids strictly increasing even after the highest id
/// has been deleted.
pub const CREATE_VEHICLES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    plate TEXT NOT NULL,
    vehicle TEXT NOT NULL,
    person TEXT NOT NULL,
    partner TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_VEHICLES_TABLE, CREATE_METADATA_TABLE];

/// Column list shared by every record query, in [`crate::VehicleRecord`] order.
pub const RECORD_COLUMNS: &str = "id, date, time, plate, vehicle, person, partner";
