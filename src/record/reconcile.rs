// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Declarative record reconciliation.
//!
//! Implements the observe → diff → act pattern for Windows DNS record sets:
//! 1. Normalize values per record type
//! 2. Compare desired and actual sets as multisets
//! 3. Produce the minimal change that brings the server in line
//!
//! Normalization rules:
//! - PTR and CNAME: a trailing root dot is insignificant
//! - AAAA: compared as IPv6 addresses (case and zero compression ignored)
//! - A and TXT: verbatim

use serde::Serialize;
use std::net::Ipv6Addr;

use super::types::{DnsRecord, RecordType};

/// Canonical form of a value for comparison.
#[must_use]
pub fn normalize(record_type: RecordType, value: &str) -> String {
    match record_type {
        RecordType::PTR | RecordType::CNAME => value.strip_suffix('.').unwrap_or(value).to_string(),
        RecordType::AAAA => value
            .parse::<Ipv6Addr>()
            .map_or_else(|_| value.to_ascii_lowercase(), |addr| addr.to_string()),
        RecordType::A | RecordType::TXT => value.to_string(),
    }
}

/// Check whether two values are equal under the type's normalization.
#[must_use]
pub fn value_eq(record_type: RecordType, a: &str, b: &str) -> bool {
    normalize(record_type, a) == normalize(record_type, b)
}

/// Multiset comparison of record data under the type's normalization.
///
/// Returns `true` iff both lists have the same length and every expected
/// value is matched by a distinct actual value. Order is ignored.
#[must_use]
pub fn matches(actual: &[String], expected: &[String], record_type: RecordType) -> bool {
    if actual.len() != expected.len() {
        return false;
    }

    let mut remaining: Vec<String> = actual.iter().map(|v| normalize(record_type, v)).collect();
    expected.iter().all(|want| {
        let want = normalize(record_type, want);
        match remaining.iter().position(|have| *have == want) {
            Some(idx) => {
                remaining.swap_remove(idx);
                true
            }
            None => false,
        }
    })
}

/// Changes needed to turn an existing record set into the desired one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    /// Values to add, as configured
    pub add: Vec<String>,
    /// Values to remove, as the server spells them
    pub remove: Vec<String>,
    /// TTL to apply to the whole set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl UpdatePlan {
    /// Returns `true` if the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.ttl.is_none()
    }
}

/// Remote operation required to reach the desired state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RecordChange {
    /// Server already matches
    NoOp,
    /// Record set is absent remotely and must be created
    Create,
    /// Same identifying triple, different data or TTL
    Update(UpdatePlan),
    /// Record set was removed from configuration and must be deleted
    Delete,
}

/// Compute the per-value plan between two sets of the same type.
///
/// Values present on both sides are left alone. A desired TTL of `None`
/// leaves the server's TTL untouched.
#[must_use]
pub fn plan_update(desired: &DnsRecord, actual: &DnsRecord) -> UpdatePlan {
    let record_type = desired.record_type;

    let mut unmatched_actual: Vec<&String> = actual.records.iter().collect();
    let mut add = Vec::new();
    for want in &desired.records {
        match unmatched_actual
            .iter()
            .position(|have| value_eq(record_type, have, want))
        {
            Some(idx) => {
                unmatched_actual.remove(idx);
            }
            None => add.push(want.clone()),
        }
    }
    let remove = unmatched_actual.into_iter().cloned().collect();

    let ttl = match desired.ttl {
        Some(want) if actual.ttl != Some(want) => Some(want),
        _ => None,
    };

    UpdatePlan { add, remove, ttl }
}

/// Decide which remote operation is needed.
///
/// `desired == None` means the record set was removed from configuration,
/// `actual == None` means it does not exist on the server.
#[must_use]
pub fn diff(desired: Option<&DnsRecord>, actual: Option<&DnsRecord>) -> RecordChange {
    match (desired, actual) {
        (None, None) => RecordChange::NoOp,
        (None, Some(_)) => RecordChange::Delete,
        (Some(_), None) => RecordChange::Create,
        (Some(desired), Some(actual)) => {
            let plan = plan_update(desired, actual);
            if plan.is_empty() {
                RecordChange::NoOp
            } else {
                RecordChange::Update(plan)
            }
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod reconcile_tests;
