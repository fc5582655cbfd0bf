// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Parsing of `Get-DnsServerResourceRecord` output.
//!
//! The read script projects every record onto a flat object and serializes it
//! with `ConvertTo-Json -Compress`:
//!
//! ```text
//! [{"HostName":"www","RecordType":"A","TimeToLive":3600,"RecordData":"203.0.113.11"},
//!  {"HostName":"www","RecordType":"A","TimeToLive":3600,"RecordData":"203.0.113.12"}]
//! ```
//!
//! PowerShell emits a bare object instead of an array when there is exactly
//! one record; both shapes are accepted.

use serde::Deserialize;
use serde_json::Value;

use super::types::{DnsRecord, RecordType};
use crate::errors::{Result, WinDnsError};

/// One record as projected by the read script.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    /// Host name relative to the zone
    pub host_name: String,
    /// Record type as printed by the cmdlet
    pub record_type: String,
    /// TTL in whole seconds
    #[serde(default)]
    pub time_to_live: Option<u64>,
    /// Record data rendered as a string
    pub record_data: String,
}

/// Parse the read script's output into a record set.
///
/// Records of other types in the output are ignored.
///
/// # Errors
///
/// Returns [`WinDnsError::NotFound`] when the output holds no record of the
/// requested type, and [`WinDnsError::Parse`] when the output is not the
/// expected JSON shape.
pub fn parse(raw_output: &str, record_type: RecordType, zone_name: &str) -> Result<DnsRecord> {
    let raw_records = parse_raw(raw_output)?;

    let matching: Vec<RawRecord> = raw_records
        .into_iter()
        .filter(|r| r.record_type.eq_ignore_ascii_case(record_type.as_str()))
        .collect();

    let Some(first) = matching.first() else {
        return Err(WinDnsError::NotFound {
            zone: zone_name.to_string(),
            name: String::new(),
            record_type: record_type.to_string(),
        });
    };

    let name = first.host_name.clone();
    if let Some(other) = matching.iter().find(|r| r.host_name != name) {
        return Err(WinDnsError::Parse {
            reason: format!(
                "output mixes host names '{name}' and '{}'",
                other.host_name
            ),
        });
    }

    let ttl = first
        .time_to_live
        .map(|secs| {
            u32::try_from(secs).map_err(|_| WinDnsError::Parse {
                reason: format!("TimeToLive {secs} out of range"),
            })
        })
        .transpose()?;

    let records = matching.into_iter().map(|r| r.record_data).collect();

    Ok(DnsRecord::new(zone_name, name, record_type, records).with_ttl(ttl))
}

/// Parse the output into raw records without filtering.
///
/// # Errors
///
/// Returns [`WinDnsError::Parse`] when the output is not a JSON object or
/// an array of objects with the projected fields.
pub fn parse_raw(raw_output: &str) -> Result<Vec<RawRecord>> {
    let trimmed = raw_output.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| WinDnsError::Parse {
        reason: format!("output is not JSON: {e}"),
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        Value::Null => Vec::new(),
        other => {
            return Err(WinDnsError::Parse {
                reason: format!("expected object or array, got {other}"),
            })
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<RawRecord>(item).map_err(|e| WinDnsError::Parse {
                reason: format!("unexpected record shape: {e}"),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
