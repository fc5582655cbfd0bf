// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TTL parsing.
//!
//! TTLs are accepted in three spellings:
//! - plain seconds: `"300"` (or a bare integer in YAML/JSON)
//! - a number with a unit: `"30s"`, `"5m"`, `"1h"`, `"1d"`, `"1w"`
//! - Windows `TimeSpan` text: `"01:00:00"`, `"1.00:00:00"` (days.hours:minutes:seconds)
//!
//! All forms resolve to whole seconds and must not exceed
//! [`MAX_DNS_RECORD_TTL_SECS`](crate::constants::MAX_DNS_RECORD_TTL_SECS).

use serde::{Deserialize, Deserializer};

use crate::constants::MAX_DNS_RECORD_TTL_SECS;
use crate::errors::{Result, WinDnsError};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_DAY: u64 = 86400;
const SECONDS_PER_WEEK: u64 = 604_800;

/// Parse a TTL string into seconds.
///
/// # Examples
///
/// ```
/// use windns::record::ttl::parse_ttl;
///
/// assert_eq!(parse_ttl("300").unwrap(), 300);
/// assert_eq!(parse_ttl("5m").unwrap(), 300);
/// assert_eq!(parse_ttl("01:00:00").unwrap(), 3600);
/// assert_eq!(parse_ttl("1.00:00:00").unwrap(), 86400);
///
/// assert!(parse_ttl("").is_err());
/// assert!(parse_ttl("10x").is_err());
/// ```
///
/// # Errors
///
/// Returns [`WinDnsError::InvalidTtl`] if the format is invalid or the value
/// exceeds the protocol maximum.
pub fn parse_ttl(ttl_str: &str) -> Result<u32> {
    let trimmed = ttl_str.trim();
    let invalid = |reason: &str| WinDnsError::InvalidTtl {
        value: ttl_str.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("TTL cannot be empty"));
    }

    let seconds = if trimmed.contains(':') {
        parse_timespan(trimmed).ok_or_else(|| invalid("expected [d.]hh:mm:ss"))?
    } else {
        let split_pos = trimmed
            .chars()
            .position(|c| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (value_str, unit) = trimmed.split_at(split_pos);

        let value: u64 = value_str
            .parse()
            .map_err(|_| invalid("TTL value must be a non-negative integer"))?;

        let multiplier = match unit {
            "" | "s" => 1,
            "m" => SECONDS_PER_MINUTE,
            "h" => SECONDS_PER_HOUR,
            "d" => SECONDS_PER_DAY,
            "w" => SECONDS_PER_WEEK,
            _ => return Err(invalid("unsupported unit, use s, m, h, d or w")),
        };

        value
            .checked_mul(multiplier)
            .ok_or_else(|| invalid("TTL value too large (overflow)"))?
    };

    if seconds > u64::from(MAX_DNS_RECORD_TTL_SECS) {
        return Err(invalid(&format!(
            "exceeds maximum of {MAX_DNS_RECORD_TTL_SECS} seconds"
        )));
    }

    u32::try_from(seconds).map_err(|_| invalid("TTL value too large"))
}

/// Parse `[d.]hh:mm:ss` as printed by .NET `TimeSpan`.
fn parse_timespan(value: &str) -> Option<u64> {
    let (days, clock) = match value.split_once('.') {
        Some((d, rest)) if rest.contains(':') => (d.parse::<u64>().ok()?, rest),
        _ => (0, value),
    };

    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }

    days.checked_mul(SECONDS_PER_DAY)?
        .checked_add(hours.checked_mul(SECONDS_PER_HOUR)?)?
        .checked_add(minutes * SECONDS_PER_MINUTE)?
        .checked_add(seconds)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTtl {
    Seconds(u64),
    Text(String),
}

/// Serde helper accepting an optional TTL as integer seconds or TTL string.
///
/// # Errors
///
/// Returns a deserialization error if the value is not a valid TTL.
pub fn deserialize_optional_ttl<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTtl>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawTtl::Seconds(secs)) => parse_ttl(&secs.to_string())
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(RawTtl::Text(text)) => parse_ttl(&text).map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[path = "ttl_tests.rs"]
mod ttl_tests;
