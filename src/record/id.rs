// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record identifier codec and input validation.
//!
//! A record set is identified by `zone:name:TYPE`. The separator is outside
//! the character allow-list for zones and names, so decoding is unambiguous.
//!
//! Validation here is the boundary in front of the remote shell: zone and
//! name are checked against a strict allow-list before they are ever placed
//! in a PowerShell script.

use serde::Serialize;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::types::RecordType;
use crate::constants::{
    APEX_RECORD_NAME, MAX_DNS_NAME_LENGTH, RECORD_ID_PARTS, RECORD_ID_SEPARATOR,
};
use crate::errors::{Result, WinDnsError};

/// Decoded record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordId {
    /// Zone name
    pub zone_name: String,
    /// Record name relative to the zone
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

impl RecordId {
    /// Build a validated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::InvalidCharacters`] if zone or name fail validation.
    pub fn new(zone_name: &str, name: &str, record_type: RecordType) -> Result<Self> {
        validate_zone_name(zone_name)?;
        validate_record_name(name)?;
        Ok(Self {
            zone_name: zone_name.to_string(),
            name: name.to_string(),
            record_type,
        })
    }

    /// Encode back into the identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::InvalidCharacters`] if zone or name fail validation.
    pub fn encode(&self) -> Result<String> {
        encode(&self.zone_name, &self.name, self.record_type)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{RECORD_ID_SEPARATOR}{}{RECORD_ID_SEPARATOR}{}",
            self.zone_name, self.name, self.record_type
        )
    }
}

/// Build the identifier for a record set.
///
/// # Errors
///
/// Returns [`WinDnsError::InvalidCharacters`] if zone or name fail validation.
pub fn encode(zone_name: &str, name: &str, record_type: RecordType) -> Result<String> {
    validate_zone_name(zone_name)?;
    validate_record_name(name)?;

    Ok(format!(
        "{zone_name}{RECORD_ID_SEPARATOR}{name}{RECORD_ID_SEPARATOR}{record_type}"
    ))
}

/// Split an identifier into zone, name and type.
///
/// # Errors
///
/// Returns [`WinDnsError::MalformedId`] if the string does not have exactly
/// three non-empty parts or names an unknown type, and
/// [`WinDnsError::InvalidCharacters`] if zone or name fail validation.
pub fn decode(id: &str) -> Result<RecordId> {
    let parts: Vec<&str> = id.split(RECORD_ID_SEPARATOR).collect();
    if parts.len() != RECORD_ID_PARTS {
        return Err(WinDnsError::MalformedId {
            id: id.to_string(),
            reason: format!(
                "expected {RECORD_ID_PARTS} parts separated by '{RECORD_ID_SEPARATOR}', found {}",
                parts.len()
            ),
        });
    }

    let (zone_name, name, type_str) = (parts[0], parts[1], parts[2]);
    if zone_name.is_empty() || name.is_empty() || type_str.is_empty() {
        return Err(WinDnsError::MalformedId {
            id: id.to_string(),
            reason: "zone, name and type must all be non-empty".to_string(),
        });
    }

    let record_type = type_str
        .parse::<RecordType>()
        .map_err(|e| WinDnsError::MalformedId {
            id: id.to_string(),
            reason: e.to_string(),
        })?;

    validate_zone_name(zone_name)?;
    validate_record_name(name)?;

    Ok(RecordId {
        zone_name: zone_name.to_string(),
        name: name.to_string(),
        record_type,
    })
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

fn check_chars(field: &str, value: &str, extra: impl Fn(char) -> bool) -> Result<()> {
    if value.is_empty()
        || value.len() > MAX_DNS_NAME_LENGTH
        || !value.chars().all(|c| is_host_char(c) || extra(c))
    {
        return Err(WinDnsError::InvalidCharacters {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validate a zone name against the allow-list (letters, digits, `.`, `-`, `_`).
///
/// # Errors
///
/// Returns [`WinDnsError::InvalidCharacters`] on any other character or an empty value.
pub fn validate_zone_name(zone_name: &str) -> Result<()> {
    check_chars("zone_name", zone_name, |_| false)
}

/// Validate a record name; the zone allow-list plus `@` (apex) and `*` (wildcard).
///
/// # Errors
///
/// Returns [`WinDnsError::InvalidCharacters`] on any other character or an empty value.
pub fn validate_record_name(name: &str) -> Result<()> {
    if name == APEX_RECORD_NAME {
        return Ok(());
    }
    check_chars("name", name, |c| c == '*')
}

/// Validate a host name given as record data or configuration.
///
/// # Errors
///
/// Returns [`WinDnsError::InvalidCharacters`] on characters outside the allow-list.
pub fn validate_host_name(field: &str, host: &str) -> Result<()> {
    check_chars(field, host, |_| false)
}

/// Validate one record value for its type.
///
/// # Errors
///
/// Returns [`WinDnsError::InvalidRecordData`] if the value does not fit the type.
pub fn validate_record_value(record_type: RecordType, value: &str) -> Result<()> {
    let invalid = |reason: &str| WinDnsError::InvalidRecordData {
        record_type: record_type.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    match record_type {
        RecordType::A => value
            .parse::<Ipv4Addr>()
            .map(|_| ())
            .map_err(|_| invalid("not an IPv4 address")),
        RecordType::AAAA => value
            .parse::<Ipv6Addr>()
            .map(|_| ())
            .map_err(|_| invalid("not an IPv6 address")),
        RecordType::CNAME | RecordType::PTR => {
            let host = value.strip_suffix('.').unwrap_or(value);
            if !host.is_empty() && host.len() <= MAX_DNS_NAME_LENGTH && host.chars().all(is_host_char)
            {
                Ok(())
            } else {
                Err(invalid("not a valid host name"))
            }
        }
        RecordType::TXT => {
            if value.chars().any(char::is_control) {
                Err(invalid("control characters are not allowed"))
            } else {
                Ok(())
            }
        }
    }
}

/// Validate the full value list of a record set.
///
/// # Errors
///
/// Returns [`WinDnsError::InvalidRecordData`] for an empty list, multiple
/// values on a single-valued type, or any invalid value.
pub fn validate_record_values(record_type: RecordType, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(WinDnsError::InvalidRecordData {
            record_type: record_type.to_string(),
            value: String::new(),
            reason: "at least one record value is required".to_string(),
        });
    }
    if values.len() > 1 && !record_type.allows_multiple_values() {
        return Err(WinDnsError::InvalidRecordData {
            record_type: record_type.to_string(),
            value: values.join(","),
            reason: format!("{record_type} records hold exactly one value"),
        });
    }
    values
        .iter()
        .try_for_each(|v| validate_record_value(record_type, v))
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod id_tests;
