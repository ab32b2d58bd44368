//! `rentbook` - vehicle rental records for a small rental desk
//!
//! Records are kept per staff member, each in its own `SQLite` partition.
//! The library covers the record store, filtering and sorting, and PDF
//! report export; the `rentbook` binary is a thin command-line front end.
//!
//! - [`partition`] maps user identifiers to partitions through an allow-list.
//! - [`storage`] provides create/get/update/delete/list over one partition.
//! - [`query`] filters by vehicle name and sorts by date and time.
//! - [`report`] renders a record list to a paginated PDF table.
//! - [`validate`] adds optional field checks in front of a store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod partition;
pub mod query;
pub mod record;
pub mod report;
pub mod storage;
pub mod validate;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use partition::{PartitionHandle, PartitionResolver};
pub use query::{
    filter_by_vehicle_substring, sort_by_date_time, sort_by_date_time_with, CalendarOrdering,
    DateOrder, LexicalOrdering, Query, RecordOrdering,
};
pub use record::{Partner, RecordFields, VehicleRecord};
pub use report::{report_file_name, ReportGenerator, ReportMetadata};
pub use storage::{PartitionStats, PartitionStore, RecordStore};
pub use validate::{FieldValidator, PartnerAllowList, Validated};
