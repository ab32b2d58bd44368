//! Mapping from user identifiers to storage partitions.
//!
//! Each known user owns one partition: a `SQLite` file named after the
//! user's partition key inside the data directory. Keys come from an
//! allow-list in the configuration, never from the identifier the caller
//! typed, so no caller input reaches a file path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{is_valid_partition_key, Config, PARTITION_KEY_PATTERN};
use crate::error::{Error, Result};
use crate::storage::PartitionStore;

/// Normalize a user identifier for allow-list lookup.
#[must_use]
pub fn normalize_user(user: &str) -> String {
    user.trim().to_lowercase()
}

/// A resolved partition: its key and the database file backing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionHandle {
    key: String,
    path: PathBuf,
}

impl PartitionHandle {
    /// The partition key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path to the partition's database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolves user identifiers to partitions, creating them on first use.
#[derive(Debug, Clone)]
pub struct PartitionResolver {
    data_dir: PathBuf,
    /// Normalized user identifier to partition key.
    users: BTreeMap<String, String>,
}

impl PartitionResolver {
    /// Create a resolver over `data_dir` for the given `(user, key)` pairs.
    pub fn new<I, U, K>(data_dir: impl Into<PathBuf>, users: I) -> Self
    where
        I: IntoIterator<Item = (U, K)>,
        U: AsRef<str>,
        K: Into<String>,
    {
        Self {
            data_dir: data_dir.into(),
            users: users
                .into_iter()
                .map(|(user, key)| (normalize_user(user.as_ref()), key.into()))
                .collect(),
        }
    }

    /// Create a resolver from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir(), &config.partitions.users)
    }

    /// The directory partition files live in.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Known user identifiers, normalized.
    pub fn known_users(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    /// Look up the partition key for a user without touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownUser`] if the user is not in the allow-list.
    pub fn partition_key(&self, user: &str) -> Result<&str> {
        self.users
            .get(&normalize_user(user))
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownUser {
                user: user.to_string(),
            })
    }

    /// Resolve a user to its partition, creating the partition if needed.
    ///
    /// Calling this repeatedly for the same user (in any letter case)
    /// returns equal handles and leaves existing records untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownUser`] for users outside the allow-list,
    /// [`Error::ConfigValidation`] if the user's key is malformed, or a
    /// storage error if the partition database cannot be created.
    pub fn resolve(&self, user: &str) -> Result<PartitionHandle> {
        let key = self.partition_key(user)?;
        if !is_valid_partition_key(key) {
            return Err(Error::ConfigValidation {
                message: format!("partition key '{key}' must match {PARTITION_KEY_PATTERN}"),
            });
        }
        let handle = PartitionHandle {
            key: key.to_string(),
            path: self.data_dir.join(format!("{key}.db")),
        };

        let created = !handle.path.exists();
        PartitionStore::initialize(&handle)?;
        if created {
            info!("Created partition '{}' at {}", key, handle.path.display());
        } else {
            debug!("Resolved partition '{}'", key);
        }

        Ok(handle)
    }

    /// Resolve a user and open a store over the partition.
    ///
    /// # Errors
    ///
    /// Same as [`PartitionResolver::resolve`].
    pub fn open(&self, user: &str) -> Result<PartitionStore> {
        self.resolve(user).map(PartitionStore::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordFields;
    use crate::storage::RecordStore;

    fn resolver(dir: &Path) -> PartitionResolver {
        PartitionResolver::new(dir, [("Anas", "anas"), ("jawad", "jawad")])
    }

    #[test]
    fn test_normalize_user() {
        assert_eq!(normalize_user("  Anas "), "anas");
        assert_eq!(normalize_user("JAWAD"), "jawad");
    }

    #[test]
    fn test_resolve_creates_partition_file() {
        let dir = tempfile::tempdir().unwrap();
        let handle = resolver(dir.path()).resolve("anas").unwrap();

        assert_eq!(handle.key(), "anas");
        assert_eq!(handle.path(), dir.path().join("anas.db"));
        assert!(handle.path().exists());
    }

    #[test]
    fn test_resolve_is_case_insensitive_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(dir.path());

        let first = resolver.resolve("Anas").unwrap();
        let second = resolver.resolve("ANAS").unwrap();
        let third = resolver.resolve("anas").unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_resolve_keeps_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(dir.path());

        let store = resolver.open("anas").unwrap();
        store.create(&RecordFields::default()).unwrap();

        let store = resolver.open("Anas").unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolver(dir.path()).resolve("../anas").unwrap_err();

        assert!(matches!(err, Error::UnknownUser { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_resolve_rejects_malformed_key() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = PartitionResolver::new(dir.path(), [("eve", "../eve")]);

        let err = resolver.resolve("eve").unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_partitions_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(dir.path());

        let anas = resolver.open("anas").unwrap();
        let jawad = resolver.open("jawad").unwrap();
        anas.create(&RecordFields::default()).unwrap();

        assert_eq!(anas.list_all().unwrap().len(), 1);
        assert!(jawad.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("data");

        let handle = resolver(&nested).resolve("jawad").unwrap();
        assert!(handle.path().exists());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/rentbook"));

        let resolver = PartitionResolver::from_config(&config);
        assert_eq!(resolver.data_dir(), Path::new("/srv/rentbook"));
        assert_eq!(resolver.known_users().collect::<Vec<_>>(), vec!["anas", "jawad"]);
        assert_eq!(resolver.partition_key("Jawad").unwrap(), "jawad");
    }
}
