// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record set model, identifier codec, output parsing and reconciliation.
//!
//! Nothing in this module talks to the network; it is the pure core that the
//! [`backend`](crate::backend) and [`resource`](crate::resource) layers build on.

pub mod id;
pub mod parser;
pub mod reconcile;
pub mod ttl;
pub mod types;

pub use id::{decode, encode, RecordId};
pub use reconcile::{diff, matches, RecordChange, UpdatePlan};
pub use types::{DnsRecord, RecordType};
