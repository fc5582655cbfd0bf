// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider configuration.
//!
//! Configuration is read from an optional YAML file and then overlaid with
//! command-line flags (which themselves fall back to `WINDNS_*` environment
//! variables). Later sources win: flag > env > file > default.
//!
//! ```yaml
//! server_host: jump01.example.com
//! ssh_username: svc-dns
//! ssh_port: 22
//! ssh_identity_file: /home/svc/.ssh/id_ed25519
//! dns_server_hostname: dns01.example.com
//! command_timeout_secs: 60
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_POWERSHELL_BINARY, DEFAULT_SSH_BINARY, DEFAULT_SSH_PORT,
};
use crate::errors::{Result, WinDnsError};
use crate::record::id::validate_host_name;

/// Host and user end up as `ssh` arguments; a leading `-` would be read as an option.
fn validate_ssh_arg(field: &str, value: &str) -> Result<()> {
    validate_host_name(field, value)?;
    if value.starts_with('-') {
        return Err(WinDnsError::InvalidCharacters {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn default_ssh_port() -> u16 {
    DEFAULT_SSH_PORT
}

fn default_ssh_binary() -> String {
    DEFAULT_SSH_BINARY.to_string()
}

fn default_powershell_binary() -> String {
    DEFAULT_POWERSHELL_BINARY.to_string()
}

fn default_command_timeout_secs() -> u64 {
    DEFAULT_COMMAND_TIMEOUT_SECS
}

/// Connection settings for the Windows management host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// SSH host running PowerShell with the `DnsServer` module.
    /// `None` runs PowerShell locally.
    #[serde(default)]
    pub server_host: Option<String>,

    /// SSH login user
    #[serde(default)]
    pub ssh_username: Option<String>,

    /// SSH port
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Private key passed to `ssh -i`
    #[serde(default)]
    pub ssh_identity_file: Option<PathBuf>,

    /// DNS server addressed with `-ComputerName` when it differs from `server_host`
    #[serde(default)]
    pub dns_server_hostname: Option<String>,

    /// SSH client binary
    #[serde(default = "default_ssh_binary")]
    pub ssh_binary: String,

    /// PowerShell binary on the target host
    #[serde(default = "default_powershell_binary")]
    pub powershell_binary: String,

    /// Upper bound for a single remote command, in seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            server_host: None,
            ssh_username: None,
            ssh_port: DEFAULT_SSH_PORT,
            ssh_identity_file: None,
            dns_server_hostname: None,
            ssh_binary: default_ssh_binary(),
            powershell_binary: default_powershell_binary(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

/// Values that override the file configuration; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// SSH host
    pub server_host: Option<String>,
    /// SSH user
    pub ssh_username: Option<String>,
    /// SSH port
    pub ssh_port: Option<u16>,
    /// SSH private key
    pub ssh_identity_file: Option<PathBuf>,
    /// `-ComputerName` target
    pub dns_server_hostname: Option<String>,
    /// Command timeout in seconds
    pub command_timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::Config`] if the YAML is invalid or has unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| WinDnsError::Config {
            reason: format!("failed to parse configuration: {e}"),
        })
    }

    /// Read configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::Config`] if the file cannot be read or parsed.
    pub async fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading provider configuration from {}", path.display());
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WinDnsError::Config {
                reason: format!("failed to read {}: {e}", path.display()),
            })?;
        Self::from_yaml(&text)
    }

    /// Apply overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if overrides.server_host.is_some() {
            self.server_host = overrides.server_host;
        }
        if overrides.ssh_username.is_some() {
            self.ssh_username = overrides.ssh_username;
        }
        if let Some(port) = overrides.ssh_port {
            self.ssh_port = port;
        }
        if overrides.ssh_identity_file.is_some() {
            self.ssh_identity_file = overrides.ssh_identity_file;
        }
        if overrides.dns_server_hostname.is_some() {
            self.dns_server_hostname = overrides.dns_server_hostname;
        }
        if let Some(timeout) = overrides.command_timeout_secs {
            self.command_timeout_secs = timeout;
        }
        self
    }

    /// Command timeout as a `Duration`.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Check the configuration for values that cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::Config`] for a zero timeout, an SSH host without
    /// a user, or a zero port, and [`WinDnsError::InvalidCharacters`] for host
    /// names outside the allow-list.
    pub fn validate(&self) -> Result<()> {
        if self.command_timeout_secs == 0 {
            return Err(WinDnsError::Config {
                reason: "command_timeout_secs must be greater than zero".to_string(),
            });
        }

        if let Some(host) = &self.server_host {
            validate_ssh_arg("server_host", host)?;
            match &self.ssh_username {
                Some(user) if !user.trim().is_empty() => {
                    validate_ssh_arg("ssh_username", user)?;
                }
                _ => {
                    return Err(WinDnsError::Config {
                        reason: format!("ssh_username is required when server_host '{host}' is set"),
                    })
                }
            }
            if self.ssh_port == 0 {
                return Err(WinDnsError::Config {
                    reason: "ssh_port must be greater than zero".to_string(),
                });
            }
        }

        if let Some(dns_server) = &self.dns_server_hostname {
            validate_host_name("dns_server_hostname", dns_server)?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
