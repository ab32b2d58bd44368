//! Error types for rentbook.
//!
//! Every fallible operation in the crate returns [`Error`]. The variants fall
//! into three classes that callers care about: a record was not found, the
//! storage or report destination was unavailable, or a field failed
//! validation. The predicates on [`Error`] answer which class an error is in.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rentbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create a partition database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to bring the schema up to date.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Record Errors ===
    /// No record with this id exists in the partition.
    #[error("no record with id {id} in partition '{partition}'")]
    NotFound {
        /// Partition key that was searched.
        partition: String,
        /// The missing record id.
        id: i64,
    },

    /// A field value was rejected by a validator.
    #[error("invalid value for field '{field}': {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the constraint that failed.
        message: String,
    },

    // === Partition Errors ===
    /// The user identifier is not in the partition allow-list.
    #[error("unknown user '{user}': no partition is configured for it")]
    UnknownUser {
        /// The identifier as given by the caller.
        user: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Report Errors ===
    /// The PDF encoder failed.
    #[error("failed to build report: {message}")]
    Report {
        /// Description of what went wrong.
        message: String,
    },

    /// The report could not be written to its destination.
    #[error("failed to write report to {path}: {source}")]
    ReportWrite {
        /// Destination path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rentbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a not-found error for a record id in a partition.
    #[must_use]
    pub fn not_found(partition: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            partition: partition.into(),
            id,
        }
    }

    /// Create a validation error for a field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a report encoding error.
    #[must_use]
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Check if this error means the referenced record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a field validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error means storage or a report destination was
    /// unavailable or unwritable.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::Io(_)
                | Self::DirectoryCreate { .. }
                | Self::ReportWrite { .. }
        )
    }
}
