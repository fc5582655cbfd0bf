// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record set operations against a Windows DNS Server.
//!
//! [`DnsBackend`] is the seam between the resource lifecycle and the server.
//! [`PowerShellBackend`] implements it by building `DnsServer` cmdlet scripts,
//! running them through a [`CommandRunner`] and parsing the output.
//!
//! Each method issues exactly one remote command.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::{Result, WinDnsError};
use crate::powershell::ScriptBuilder;
use crate::record::{parser, DnsRecord, RecordId};
use crate::transport::CommandRunner;

/// Operations on record sets identified by zone, name and type.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// Fetch a record set.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::NotFound`] if the set does not exist.
    async fn get_record(&self, id: &RecordId) -> Result<DnsRecord>;

    /// Add one value to a record set, creating the set if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the value.
    async fn add_value(
        &self,
        id: &RecordId,
        value: &str,
        ttl: Option<u32>,
        create_ptr: bool,
    ) -> Result<()>;

    /// Remove one value from a record set.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the removal.
    async fn remove_value(&self, id: &RecordId, value: &str) -> Result<()>;

    /// Apply a TTL to every record of a set.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the change.
    async fn set_ttl(&self, id: &RecordId, ttl: u32) -> Result<()>;

    /// Remove a whole record set.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::NotFound`] if the set does not exist.
    async fn remove_record(&self, id: &RecordId) -> Result<()>;
}

/// Attach the queried identity to a bare `NotFound` coming from the transport or parser.
fn with_identity(err: WinDnsError, id: &RecordId) -> WinDnsError {
    if err.is_not_found() {
        WinDnsError::NotFound {
            zone: id.zone_name.clone(),
            name: id.name.clone(),
            record_type: id.record_type.to_string(),
        }
    } else {
        err
    }
}

/// [`DnsBackend`] driving `DnsServer` PowerShell cmdlets.
#[derive(Clone)]
pub struct PowerShellBackend {
    runner: Arc<dyn CommandRunner>,
    scripts: ScriptBuilder,
}

impl std::fmt::Debug for PowerShellBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerShellBackend")
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}

impl PowerShellBackend {
    /// Create a backend. `dns_server_hostname` is passed as `-ComputerName`.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, dns_server_hostname: Option<String>) -> Self {
        Self {
            runner,
            scripts: ScriptBuilder::new(dns_server_hostname),
        }
    }
}

#[async_trait]
impl DnsBackend for PowerShellBackend {
    async fn get_record(&self, id: &RecordId) -> Result<DnsRecord> {
        debug!("Reading {} record {} in zone {}", id.record_type, id.name, id.zone_name);
        let output = self
            .runner
            .run(&self.scripts.get_record(id))
            .await
            .map_err(|e| with_identity(e, id))?;

        let mut record =
            parser::parse(&output, id.record_type, &id.zone_name).map_err(|e| with_identity(e, id))?;

        // The cmdlet echoes the name as stored, which may differ in case.
        if record.name.eq_ignore_ascii_case(&id.name) {
            record.name.clone_from(&id.name);
        }
        Ok(record)
    }

    async fn add_value(
        &self,
        id: &RecordId,
        value: &str,
        ttl: Option<u32>,
        create_ptr: bool,
    ) -> Result<()> {
        info!(
            "Adding {} record {}.{} -> {} (TTL: {:?}, create_ptr: {})",
            id.record_type, id.name, id.zone_name, value, ttl, create_ptr
        );
        let script = self.scripts.add_record_value(
            &id.zone_name,
            &id.name,
            id.record_type,
            value,
            ttl,
            create_ptr && id.record_type.supports_create_ptr(),
        );
        self.runner.run(&script).await.map(|_| ())
    }

    async fn remove_value(&self, id: &RecordId, value: &str) -> Result<()> {
        info!(
            "Removing {} record value {}.{} -> {}",
            id.record_type, id.name, id.zone_name, value
        );
        let script = self
            .scripts
            .remove_record_value(&id.zone_name, &id.name, id.record_type, value);
        self.runner
            .run(&script)
            .await
            .map(|_| ())
            .map_err(|e| with_identity(e, id))
    }

    async fn set_ttl(&self, id: &RecordId, ttl: u32) -> Result<()> {
        info!(
            "Setting TTL of {} record {}.{} to {}s",
            id.record_type, id.name, id.zone_name, ttl
        );
        let record = DnsRecord::new(&id.zone_name, &id.name, id.record_type, Vec::new());
        self.runner
            .run(&self.scripts.set_record_ttl(&record, ttl))
            .await
            .map(|_| ())
            .map_err(|e| with_identity(e, id))
    }

    async fn remove_record(&self, id: &RecordId) -> Result<()> {
        info!(
            "Removing {} record set {}.{}",
            id.record_type, id.name, id.zone_name
        );
        self.runner
            .run(&self.scripts.remove_record_set(id))
            .await
            .map(|_| ())
            .map_err(|e| with_identity(e, id))
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod backend_tests;
