// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for windns.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Resource Constants
// ============================================================================

/// Terraform resource type name managed by this crate
pub const RESOURCE_TYPE_NAME: &str = "windns_record";

/// Separator between the parts of a record identifier (`zone:name:TYPE`)
pub const RECORD_ID_SEPARATOR: char = ':';

/// Number of parts in a record identifier
pub const RECORD_ID_PARTS: usize = 3;

/// Record name that addresses the zone apex
pub const APEX_RECORD_NAME: &str = "@";

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Maximum TTL accepted by the DNS protocol (RFC 2181, 2^31 - 1)
pub const MAX_DNS_RECORD_TTL_SECS: u32 = 2_147_483_647;

/// Maximum length of a fully qualified domain name
pub const MAX_DNS_NAME_LENGTH: usize = 253;

// ============================================================================
// Transport Constants
// ============================================================================

/// Standard SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Default SSH client binary
pub const DEFAULT_SSH_BINARY: &str = "ssh";

/// Default PowerShell binary on the management host
pub const DEFAULT_POWERSHELL_BINARY: &str = "powershell";

/// Default upper bound for a single remote command (1 minute)
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// SSH connect timeout passed to the client (`-o ConnectTimeout`)
pub const SSH_CONNECT_TIMEOUT_SECS: u64 = 15;

/// Marker Windows DNS cmdlets put in errors for missing zones and records
pub const OBJECT_NOT_FOUND_MARKER: &str = "ObjectNotFound";

// ============================================================================
// Configuration Constants
// ============================================================================

/// Environment variable naming the provider configuration file
pub const CONFIG_FILE_ENV: &str = "WINDNS_CONFIG";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;
