//! Optional field validation in front of a record store.
//!
//! [`PartitionStore`](crate::storage::PartitionStore) accepts any string for
//! any field. Callers that want stricter input wrap the store in
//! [`Validated`], which checks fields before `create` and `update` and
//! forwards everything else untouched.

use tracing::warn;

use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use crate::record::{RecordFields, VehicleRecord};
use crate::storage::RecordStore;

/// A check applied to record fields before they are written.
pub trait FieldValidator {
    /// Accept or reject a field set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    fn validate(&self, fields: &RecordFields) -> Result<()>;
}

/// Accepts only partners from a fixed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerAllowList {
    partners: Vec<String>,
}

impl PartnerAllowList {
    /// Create an allow-list from partner labels.
    pub fn new<I, S>(partners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            partners: partners.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the validator described by the configuration, if enabled.
    #[must_use]
    pub fn from_config(config: &ValidationConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(config.partners.iter().cloned()))
    }
}

impl FieldValidator for PartnerAllowList {
    fn validate(&self, fields: &RecordFields) -> Result<()> {
        if self.partners.iter().any(|p| *p == fields.partner) {
            Ok(())
        } else {
            Err(Error::validation(
                "partner",
                format!(
                    "'{}' is not one of: {}",
                    fields.partner,
                    self.partners.join(", ")
                ),
            ))
        }
    }
}

/// A record store that validates fields before writing them.
#[derive(Debug, Clone)]
pub struct Validated<S, V> {
    inner: S,
    validator: V,
}

impl<S, V> Validated<S, V> {
    /// Wrap `inner` so writes pass through `validator` first.
    pub fn new(inner: S, validator: V) -> Self {
        Self { inner, validator }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: RecordStore, V: FieldValidator> Validated<S, V> {
    fn check(&self, fields: &RecordFields) -> Result<()> {
        self.validator.validate(fields).inspect_err(|e| {
            warn!("Rejected write to partition '{}': {}", self.inner.partition(), e);
        })
    }
}

impl<S: RecordStore, V: FieldValidator> RecordStore for Validated<S, V> {
    fn partition(&self) -> &str {
        self.inner.partition()
    }

    fn create(&self, fields: &RecordFields) -> Result<i64> {
        self.check(fields)?;
        self.inner.create(fields)
    }

    fn get(&self, id: i64) -> Result<VehicleRecord> {
        self.inner.get(id)
    }

    fn update(&self, id: i64, fields: &RecordFields) -> Result<()> {
        self.check(fields)?;
        self.inner.update(id, fields)
    }

    fn delete(&self, id: i64) -> Result<()> {
        self.inner.delete(id)
    }

    fn list_all(&self) -> Result<Vec<VehicleRecord>> {
        self.inner.list_all()
    }
}
