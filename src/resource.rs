// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The `windns_record` resource lifecycle.
//!
//! [`RecordResource`] maps create / read / update / delete / import onto a
//! [`DnsBackend`]. Every call reads fresh from the server; nothing is cached.
//!
//! # Update semantics
//!
//! Changing zone, name or type replaces the record set (delete, then create).
//! Otherwise the live set is read first and only the difference is written.
//! Values that are still desired are never touched. For multi-valued types
//! new values are added before stale ones are removed, so the set is never
//! empty mid-update. A CNAME node holds a single record, so its old target
//! is removed before the new one is added.
//!
//! # Partial failure
//!
//! If adding a value fails during create, the values added so far are
//! removed again before the error is returned, so a retried create does not
//! hit `AlreadyExists`. If that cleanup fails too, the set can be adopted
//! with [`RecordResource::import`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::DnsBackend;
use crate::constants::RESOURCE_TYPE_NAME;
use crate::errors::{Result, WinDnsError};
use crate::record::id::validate_record_values;
use crate::record::reconcile::{diff, matches, plan_update, RecordChange, UpdatePlan};
use crate::record::ttl::deserialize_optional_ttl;
use crate::record::{decode, DnsRecord, RecordId, RecordType};

/// Desired configuration of one `windns_record` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSpec {
    /// Host name relative to the zone
    pub name: String,
    /// Zone the record lives in
    pub zone_name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record data values
    pub records: Vec<String>,
    /// Create the matching PTR record (A and AAAA only)
    #[serde(default)]
    pub create_ptr: bool,
    /// TTL in seconds; `None` leaves the server default
    #[serde(
        default,
        deserialize_with = "deserialize_optional_ttl",
        skip_serializing_if = "Option::is_none"
    )]
    pub ttl: Option<u32>,
}

impl RecordSpec {
    /// Validate every attribute and return the record set identifier.
    ///
    /// # Errors
    ///
    /// Returns a validation error ([`WinDnsError::is_validation`]) before any
    /// remote command is issued.
    pub fn validate(&self) -> Result<RecordId> {
        let id = RecordId::new(&self.zone_name, &self.name, self.record_type)?;
        validate_record_values(self.record_type, &self.records)?;
        if self.create_ptr && !self.record_type.supports_create_ptr() {
            warn!(
                "create_ptr has no effect on {} records ({})",
                self.record_type, id
            );
        }
        Ok(id)
    }

    /// Desired record set.
    #[must_use]
    pub fn to_record(&self) -> DnsRecord {
        DnsRecord::new(
            &self.zone_name,
            &self.name,
            self.record_type,
            self.records.clone(),
        )
        .with_ttl(self.ttl)
    }
}

/// State persisted for a managed record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordState {
    /// Encoded identifier (`zone:name:TYPE`), used verbatim for import
    pub id: String,
    /// Host name relative to the zone
    pub name: String,
    /// Zone the record lives in
    pub zone_name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record data values
    pub records: Vec<String>,
    /// Whether PTR records were requested at creation
    #[serde(default)]
    pub create_ptr: bool,
    /// TTL in seconds as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl RecordState {
    /// Build state from a record read off the server.
    ///
    /// When `configured` matches the server values under normalization, the
    /// configured spelling is kept so an unchanged configuration never shows
    /// a diff (e.g. a PTR target written without its trailing dot).
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::InvalidCharacters`] if zone or name fail validation.
    pub fn from_record(
        record: DnsRecord,
        configured: Option<&[String]>,
        create_ptr: bool,
    ) -> Result<Self> {
        let id = record.id()?;
        let records = match configured {
            Some(configured) if matches(&record.records, configured, record.record_type) => {
                configured.to_vec()
            }
            _ => record.records,
        };

        Ok(Self {
            id,
            name: record.name,
            zone_name: record.zone_name,
            record_type: record.record_type,
            records,
            create_ptr,
            ttl: record.ttl,
        })
    }
}

/// Lifecycle operations for `windns_record` over a [`DnsBackend`].
#[derive(Debug, Clone)]
pub struct RecordResource<B: DnsBackend> {
    backend: B,
}

impl<B: DnsBackend> RecordResource<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn fetch(&self, id: &RecordId) -> Result<Option<DnsRecord>> {
        match self.backend.get_record(id).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create the record set.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call,
    /// [`WinDnsError::AlreadyExists`] if the set exists, or the backend's error.
    pub async fn create(&self, spec: &RecordSpec) -> Result<RecordState> {
        let id = spec.validate()?;
        info!("Creating {} {}", RESOURCE_TYPE_NAME, id);

        if self.fetch(&id).await?.is_some() {
            return Err(WinDnsError::AlreadyExists { id: id.to_string() });
        }

        for (added, value) in spec.records.iter().enumerate() {
            if let Err(e) = self
                .backend
                .add_value(&id, value, spec.ttl, spec.create_ptr)
                .await
            {
                self.rollback(&id, &spec.records[..added]).await;
                return Err(e);
            }
        }

        let record = self.backend.get_record(&id).await?;
        info!(
            "Created {} {} with {} value(s)",
            RESOURCE_TYPE_NAME,
            id,
            record.records.len()
        );
        RecordState::from_record(record, Some(&spec.records), spec.create_ptr)
    }

    /// Read the record set by identifier.
    ///
    /// Returns `Ok(None)` when the set no longer exists, so the caller can
    /// drop it from state.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::MalformedId`] / [`WinDnsError::InvalidCharacters`]
    /// for a bad identifier, or the backend's error.
    pub async fn read(&self, id: &str) -> Result<Option<RecordState>> {
        let record_id = decode(id)?;
        debug!("Reading {} {}", RESOURCE_TYPE_NAME, record_id);

        match self.fetch(&record_id).await? {
            Some(record) => Ok(Some(RecordState::from_record(record, None, false)?)),
            None => {
                warn!("{} {} no longer exists", RESOURCE_TYPE_NAME, record_id);
                Ok(None)
            }
        }
    }

    /// Re-read a managed record set, keeping the prior spelling of values
    /// the server still holds and the prior `create_ptr` flag.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read`].
    pub async fn refresh(&self, prior: &RecordState) -> Result<Option<RecordState>> {
        let record_id = decode(&prior.id)?;
        match self.fetch(&record_id).await? {
            Some(record) => Ok(Some(RecordState::from_record(
                record,
                Some(&prior.records),
                prior.create_ptr,
            )?)),
            None => Ok(None),
        }
    }

    /// Update the record set identified by `id` to match `spec`.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call,
    /// [`WinDnsError::NotFound`] if the set vanished, or the backend's error.
    pub async fn update(&self, id: &str, spec: &RecordSpec) -> Result<RecordState> {
        let current_id = decode(id)?;
        let desired_id = spec.validate()?;

        if current_id != desired_id {
            info!(
                "{} identity changed from {} to {}, replacing",
                RESOURCE_TYPE_NAME, current_id, desired_id
            );
            self.delete(id).await?;
            return self.create(spec).await;
        }

        let actual = self.backend.get_record(&current_id).await?;
        let desired = spec.to_record();

        match diff(Some(&desired), Some(&actual)) {
            RecordChange::Update(plan) => {
                info!(
                    "Updating {} {}: +{} -{} ttl={:?}",
                    RESOURCE_TYPE_NAME,
                    current_id,
                    plan.add.len(),
                    plan.remove.len(),
                    plan.ttl
                );
                self.apply_plan(&current_id, &plan, spec).await?;
            }
            _ => {
                debug!("{} {} already up to date", RESOURCE_TYPE_NAME, current_id);
            }
        }

        let record = self.backend.get_record(&current_id).await?;
        RecordState::from_record(record, Some(&spec.records), spec.create_ptr)
    }

    /// Remove values added by a create that failed part way.
    async fn rollback(&self, id: &RecordId, added: &[String]) {
        for value in added {
            if let Err(e) = self.backend.remove_value(id, value).await {
                warn!(
                    "Failed to roll back {} value {} after a failed create: {}",
                    id, value, e
                );
            }
        }
    }

    async fn apply_plan(
        &self,
        id: &RecordId,
        plan: &UpdatePlan,
        spec: &RecordSpec,
    ) -> Result<()> {
        if id.record_type.allows_multiple_values() {
            self.add_values(id, &plan.add, spec).await?;
            self.remove_values(id, &plan.remove).await?;
        } else {
            self.remove_values(id, &plan.remove).await?;
            self.add_values(id, &plan.add, spec).await?;
        }
        if let Some(ttl) = plan.ttl {
            self.backend.set_ttl(id, ttl).await?;
        }
        Ok(())
    }

    async fn add_values(
        &self,
        id: &RecordId,
        values: &[String],
        spec: &RecordSpec,
    ) -> Result<()> {
        for value in values {
            self.backend
                .add_value(id, value, spec.ttl, spec.create_ptr)
                .await?;
        }
        Ok(())
    }

    async fn remove_values(&self, id: &RecordId, values: &[String]) -> Result<()> {
        for value in values {
            self.backend.remove_value(id, value).await?;
        }
        Ok(())
    }

    /// Delete the record set. A set that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns a bad-identifier error or the backend's error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let record_id = decode(id)?;
        info!("Deleting {} {}", RESOURCE_TYPE_NAME, record_id);

        match self.backend.remove_record(&record_id).await {
            Err(e) if e.is_not_found() => {
                warn!("{} {} was already absent", RESOURCE_TYPE_NAME, record_id);
                Ok(())
            }
            other => other,
        }
    }

    /// Adopt an existing record set using only its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::NotFound`] if there is nothing to import.
    pub async fn import(&self, id: &str) -> Result<RecordState> {
        let record_id = decode(id)?;
        info!("Importing {} {}", RESOURCE_TYPE_NAME, record_id);
        let record = self.backend.get_record(&record_id).await?;
        RecordState::from_record(record, None, false)
    }

    /// Whether the record set exists; `NotFound` is reported as `false`.
    ///
    /// # Errors
    ///
    /// Returns a bad-identifier error or any non-absence backend error.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let record_id = decode(id)?;
        Ok(self.fetch(&record_id).await?.is_some())
    }

    /// Compute what [`Self::apply`] would do, without changing anything.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the backend's error.
    pub async fn plan(&self, spec: &RecordSpec) -> Result<RecordChange> {
        let id = spec.validate()?;
        let actual = self.fetch(&id).await?;
        Ok(diff(Some(&spec.to_record()), actual.as_ref()))
    }

    /// Create or update the record set so that it matches `spec`.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the backend's error.
    pub async fn apply(&self, spec: &RecordSpec) -> Result<(RecordChange, RecordState)> {
        let id = spec.validate()?;
        match self.fetch(&id).await? {
            None => {
                let state = self.create(spec).await?;
                Ok((RecordChange::Create, state))
            }
            Some(actual) => {
                let plan = plan_update(&spec.to_record(), &actual);
                if plan.is_empty() {
                    let state =
                        RecordState::from_record(actual, Some(&spec.records), spec.create_ptr)?;
                    return Ok((RecordChange::NoOp, state));
                }
                let state = self.update(&id.to_string(), spec).await?;
                Ok((RecordChange::Update(plan), state))
            }
        }
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod resource_tests;
