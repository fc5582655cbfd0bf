// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record types and the record set model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::WinDnsError;

/// DNS record types managed on the Windows DNS Server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    AAAA,
    /// Canonical name (alias) record
    CNAME,
    /// Reverse lookup pointer record
    PTR,
    /// Free-form text record
    TXT,
}

impl RecordType {
    /// All supported record types.
    pub const ALL: [Self; 5] = [Self::A, Self::AAAA, Self::CNAME, Self::PTR, Self::TXT];

    /// Upper-case name, as used by `-RRType` and in record identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::CNAME => "CNAME",
            Self::PTR => "PTR",
            Self::TXT => "TXT",
        }
    }

    /// Whether `Add-DnsServerResourceRecord -CreatePtr` applies to this type.
    #[must_use]
    pub const fn supports_create_ptr(self) -> bool {
        matches!(self, Self::A | Self::AAAA)
    }

    /// Whether a record set of this type may hold more than one value.
    #[must_use]
    pub const fn allows_multiple_values(self) -> bool {
        !matches!(self, Self::CNAME)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = WinDnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WinDnsError::UnsupportedRecordType {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for RecordType {
    type Error = WinDnsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

/// One DNS record set as seen on the server.
///
/// `(zone_name, name, record_type)` identifies the set; `records` holds the
/// data values in the order the server returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Host name relative to the zone (`@` for the apex)
    pub name: String,
    /// Zone the record lives in
    pub zone_name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record data values
    pub records: Vec<String>,
    /// Time to live in seconds, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl DnsRecord {
    /// Create a record set without a TTL.
    #[must_use]
    pub fn new(
        zone_name: impl Into<String>,
        name: impl Into<String>,
        record_type: RecordType,
        records: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            zone_name: zone_name.into(),
            record_type,
            records,
            ttl: None,
        }
    }

    /// Set the TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<u32>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Encoded identifier of this record set.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::InvalidCharacters`] if zone or name fail validation.
    pub fn id(&self) -> Result<String, WinDnsError> {
        super::id::encode(&self.zone_name, &self.name, self.record_type)
    }

    /// Fully qualified name of the record set, without trailing dot.
    #[must_use]
    pub fn fqdn(&self) -> String {
        let zone = self.zone_name.trim_end_matches('.');
        if self.name == crate::constants::APEX_RECORD_NAME || self.name.is_empty() {
            zone.to_string()
        } else {
            format!("{}.{zone}", self.name)
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
