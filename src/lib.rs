// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # windns - Windows DNS Server record management
//!
//! windns manages DNS record sets on a Windows DNS Server by running
//! `DnsServer` PowerShell cmdlets, locally or over SSH through a jump host.
//!
//! ## Overview
//!
//! A record set is identified by zone, name and type and holds one or more
//! values. The crate provides:
//!
//! - A stable, reversible record identifier (`zone:name:TYPE`)
//! - Parsing of cmdlet output into a normalized record model
//! - Change detection that treats equivalent values as equal
//! - Create / read / update / delete / import of a `windns_record` resource
//!
//! ## Modules
//!
//! - [`record`] - Record model, identifier codec, parser and reconciler
//! - [`resource`] - The `windns_record` lifecycle
//! - [`backend`] - Record set operations against the DNS server
//! - [`powershell`] - `DnsServer` cmdlet script generation
//! - [`transport`] - Running scripts over SSH or locally
//! - [`config`] - Provider connection settings
//! - [`errors`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use windns::backend::PowerShellBackend;
//! use windns::config::ProviderConfig;
//! use windns::record::RecordType;
//! use windns::resource::{RecordResource, RecordSpec};
//! use windns::transport::runner_from_config;
//!
//! # async fn example() -> windns::errors::Result<()> {
//! let config = ProviderConfig {
//!     server_host: Some("jump01.example.com".to_string()),
//!     ssh_username: Some("svc-dns".to_string()),
//!     dns_server_hostname: Some("dns01.example.com".to_string()),
//!     ..ProviderConfig::default()
//! };
//! let runner = runner_from_config(&config)?;
//! let resource = RecordResource::new(PowerShellBackend::new(
//!     runner,
//!     config.dns_server_hostname.clone(),
//! ));
//!
//! let state = resource
//!     .create(&RecordSpec {
//!         name: "www".to_string(),
//!         zone_name: "example.com".to_string(),
//!         record_type: RecordType::A,
//!         records: vec!["203.0.113.10".to_string()],
//!         create_ptr: true,
//!         ttl: Some(300),
//!     })
//!     .await?;
//! assert_eq!(state.id, "example.com:www:A");
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod errors;
pub mod powershell;
pub mod record;
pub mod resource;
pub mod transport;

#[cfg(test)]
mod testing;
