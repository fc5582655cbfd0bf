// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for windns.
//!
//! Every failure a record operation can hit is one variant of [`WinDnsError`]:
//! - input validation (identifiers, names, record data)
//! - remote absence of a record set
//! - unexpected cmdlet output
//! - SSH / PowerShell transport failures
//!
//! Validation errors are always raised before any remote command is built.

use thiserror::Error;

/// Errors that can occur while managing Windows DNS records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WinDnsError {
    /// A zone or record name contains characters outside the allow-list.
    ///
    /// Raised before any script reaches the transport. Characters such as `;`
    /// would otherwise be interpreted by the remote shell.
    #[error("invalid characters detected in input: {field} '{value}'")]
    InvalidCharacters {
        /// The attribute that failed validation (e.g., "zone_name")
        field: String,
        /// The rejected value
        value: String,
    },

    /// A resource identifier does not have the `zone:name:TYPE` structure.
    #[error("malformed record id '{id}': {reason}")]
    MalformedId {
        /// The identifier as given
        id: String,
        /// What is wrong with it
        reason: String,
    },

    /// The record set does not exist on the server.
    ///
    /// The message keeps the `ObjectNotFound` marker the DNS cmdlets use so
    /// callers that only see strings can still recognize absence.
    #[error("ObjectNotFound: {record_type} record '{name}' in zone '{zone}'")]
    NotFound {
        /// Zone that was queried
        zone: String,
        /// Record name that was queried
        name: String,
        /// Record type that was queried
        record_type: String,
    },

    /// The record set already exists and cannot be created again.
    #[error("record '{id}' already exists, import it instead")]
    AlreadyExists {
        /// Identifier of the existing record set
        id: String,
    },

    /// The remote command returned output this crate does not understand.
    #[error("failed to parse DNS server output: {reason}")]
    Parse {
        /// Description of the unexpected shape
        reason: String,
    },

    /// The record type is not managed by this crate.
    #[error("unsupported record type '{value}' (supported: A, AAAA, CNAME, PTR, TXT)")]
    UnsupportedRecordType {
        /// The rejected type string
        value: String,
    },

    /// A record value is invalid for its record type.
    #[error("invalid {record_type} record data '{value}': {reason}")]
    InvalidRecordData {
        /// Record type the value was given for
        record_type: String,
        /// The rejected value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A TTL could not be parsed or is out of range.
    #[error("invalid TTL '{value}': {reason}")]
    InvalidTtl {
        /// The TTL as given
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The SSH client or local PowerShell could not be run to completion.
    #[error("transport error: {reason}")]
    Transport {
        /// What failed (spawn, timeout, I/O)
        reason: String,
    },

    /// The remote PowerShell command ran and failed.
    #[error("remote command failed: {stderr}")]
    RemoteCommand {
        /// Standard error of the remote command, verbatim
        stderr: String,
    },

    /// Provider configuration is incomplete or invalid.
    #[error("invalid configuration: {reason}")]
    Config {
        /// What is wrong with the configuration
        reason: String,
    },
}

impl WinDnsError {
    /// Returns `true` if the error signals that the record set does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the error was raised by local input validation,
    /// meaning no remote command was issued.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCharacters { .. }
                | Self::MalformedId { .. }
                | Self::UnsupportedRecordType { .. }
                | Self::InvalidRecordData { .. }
                | Self::InvalidTtl { .. }
        )
    }
}

/// Result alias used by the library API.
pub type Result<T, E = WinDnsError> = std::result::Result<T, E>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
