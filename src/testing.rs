// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Test doubles for the transport and backend seams.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::net::Ipv6Addr;
use std::sync::Mutex;

use crate::backend::DnsBackend;
use crate::errors::{Result, WinDnsError};
use crate::record::{DnsRecord, RecordId, RecordType};
use crate::transport::CommandRunner;

/// TTL Windows DNS Server gives records added without `-TimeToLive`
const DEFAULT_RECORD_TTL_SECS: u32 = 3600;

/// Runner that returns queued responses and records every script it was given.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<String>>>,
    scripts: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            scripts: Mutex::new(Vec::new()),
        }
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, script: &str) -> Result<String> {
        self.scripts.lock().unwrap().push(script.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Operation seen by [`MemoryBackend`], for asserting on call sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Get(String),
    Add(String, String),
    Remove(String, String),
    SetTtl(String, u32),
    RemoveSet(String),
}

#[derive(Debug, Clone)]
struct StoredSet {
    name: String,
    values: Vec<String>,
    ttl: u32,
}

/// In-memory DNS server that canonicalizes data the way Windows DNS does:
/// PTR and CNAME targets gain a trailing dot, AAAA addresses are compressed
/// and lower-cased, and a CNAME node holds at most one record.
#[derive(Default)]
pub struct MemoryBackend {
    sets: Mutex<HashMap<(String, String, RecordType), StoredSet>>,
    ops: Mutex<Vec<Op>>,
    ptr_created: Mutex<Vec<String>>,
}

fn key(id: &RecordId) -> (String, String, RecordType) {
    (
        id.zone_name.to_ascii_lowercase(),
        id.name.to_ascii_lowercase(),
        id.record_type,
    )
}

fn canonical(record_type: RecordType, value: &str) -> String {
    match record_type {
        RecordType::PTR | RecordType::CNAME if !value.ends_with('.') => format!("{value}."),
        RecordType::AAAA => value
            .parse::<Ipv6Addr>()
            .map_or_else(|_| value.to_ascii_lowercase(), |addr| addr.to_string()),
        _ => value.to_string(),
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record set directly, bypassing the operation log.
    pub fn insert(&self, record: &DnsRecord) {
        let id = RecordId::new(&record.zone_name, &record.name, record.record_type).unwrap();
        self.sets.lock().unwrap().insert(
            key(&id),
            StoredSet {
                name: record.name.clone(),
                values: record
                    .records
                    .iter()
                    .map(|v| canonical(record.record_type, v))
                    .collect(),
                ttl: record.ttl.unwrap_or(DEFAULT_RECORD_TTL_SECS),
            },
        );
    }

    pub fn values(&self, id: &RecordId) -> Option<Vec<String>> {
        self.sets
            .lock()
            .unwrap()
            .get(&key(id))
            .map(|s| s.values.clone())
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    pub fn ptr_created(&self) -> Vec<String> {
        self.ptr_created.lock().unwrap().clone()
    }

    fn not_found(id: &RecordId) -> WinDnsError {
        WinDnsError::NotFound {
            zone: id.zone_name.clone(),
            name: id.name.clone(),
            record_type: id.record_type.to_string(),
        }
    }
}

#[async_trait]
impl DnsBackend for MemoryBackend {
    async fn get_record(&self, id: &RecordId) -> Result<DnsRecord> {
        self.ops.lock().unwrap().push(Op::Get(id.to_string()));
        let sets = self.sets.lock().unwrap();
        let set = sets
            .get(&key(id))
            .filter(|s| !s.values.is_empty())
            .ok_or_else(|| Self::not_found(id))?;
        Ok(
            DnsRecord::new(&id.zone_name, &set.name, id.record_type, set.values.clone())
                .with_ttl(Some(set.ttl)),
        )
    }

    async fn add_value(
        &self,
        id: &RecordId,
        value: &str,
        ttl: Option<u32>,
        create_ptr: bool,
    ) -> Result<()> {
        self.ops
            .lock()
            .unwrap()
            .push(Op::Add(id.to_string(), value.to_string()));
        let mut sets = self.sets.lock().unwrap();
        let set = sets.entry(key(id)).or_insert_with(|| StoredSet {
            name: id.name.clone(),
            values: Vec::new(),
            ttl: ttl.unwrap_or(DEFAULT_RECORD_TTL_SECS),
        });
        let value = canonical(id.record_type, value);
        if !id.record_type.allows_multiple_values() && !set.values.is_empty() {
            return Err(WinDnsError::RemoteCommand {
                stderr: format!(
                    "Failed to create resource record {value}: a CNAME record already exists at this node"
                ),
            });
        }
        if set.values.contains(&value) {
            return Err(WinDnsError::RemoteCommand {
                stderr: format!("Failed to create resource record {value}: already exists"),
            });
        }
        set.values.push(value.clone());
        if create_ptr {
            self.ptr_created.lock().unwrap().push(value);
        }
        Ok(())
    }

    async fn remove_value(&self, id: &RecordId, value: &str) -> Result<()> {
        self.ops
            .lock()
            .unwrap()
            .push(Op::Remove(id.to_string(), value.to_string()));
        let mut sets = self.sets.lock().unwrap();
        let set = sets.get_mut(&key(id)).ok_or_else(|| Self::not_found(id))?;
        let value = canonical(id.record_type, value);
        let idx = set
            .values
            .iter()
            .position(|v| *v == value)
            .ok_or_else(|| Self::not_found(id))?;
        set.values.remove(idx);
        if set.values.is_empty() {
            sets.remove(&key(id));
        }
        Ok(())
    }

    async fn set_ttl(&self, id: &RecordId, ttl: u32) -> Result<()> {
        self.ops
            .lock()
            .unwrap()
            .push(Op::SetTtl(id.to_string(), ttl));
        let mut sets = self.sets.lock().unwrap();
        let set = sets.get_mut(&key(id)).ok_or_else(|| Self::not_found(id))?;
        set.ttl = ttl;
        Ok(())
    }

    async fn remove_record(&self, id: &RecordId) -> Result<()> {
        self.ops.lock().unwrap().push(Op::RemoveSet(id.to_string()));
        self.sets
            .lock()
            .unwrap()
            .remove(&key(id))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}
