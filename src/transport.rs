// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Remote command execution.
//!
//! A [`CommandRunner`] runs one PowerShell script and returns its standard
//! output. Two runners are provided:
//!
//! - [`SshRunner`] spawns the system `ssh` client against the management host
//! - [`LocalRunner`] spawns PowerShell on this machine
//!
//! Both pass the script as `-EncodedCommand`, bound each run by the configured
//! timeout, and classify failures into [`WinDnsError`] variants. A failure
//! whose stderr carries the `ObjectNotFound` marker becomes
//! [`WinDnsError::NotFound`]; everything else is surfaced verbatim.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error};

use crate::config::ProviderConfig;
use crate::constants::{OBJECT_NOT_FOUND_MARKER, SSH_CONNECT_TIMEOUT_SECS};
use crate::errors::{Result, WinDnsError};
use crate::powershell::encode_command;

/// Executes PowerShell scripts on the DNS management host.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a script and return its standard output.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::NotFound`] for `ObjectNotFound` failures,
    /// [`WinDnsError::RemoteCommand`] for other script failures and
    /// [`WinDnsError::Transport`] if the process could not be run.
    async fn run(&self, script: &str) -> Result<String>;
}

/// Arguments that make PowerShell run an encoded script non-interactively.
#[must_use]
pub fn powershell_args(script: &str) -> Vec<String> {
    vec![
        "-NoProfile".to_string(),
        "-NonInteractive".to_string(),
        "-OutputFormat".to_string(),
        "Text".to_string(),
        "-EncodedCommand".to_string(),
        encode_command(script),
    ]
}

/// Map a finished process to output or a typed error.
///
/// # Errors
///
/// Returns [`WinDnsError::NotFound`] or [`WinDnsError::RemoteCommand`] when
/// `success` is false.
pub fn classify_output(success: bool, stdout: &[u8], stderr: &[u8]) -> Result<String> {
    let stdout = String::from_utf8_lossy(stdout).into_owned();
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();

    if success {
        return Ok(stdout);
    }

    if stderr.contains(OBJECT_NOT_FOUND_MARKER) || stdout.contains(OBJECT_NOT_FOUND_MARKER) {
        debug!("Remote command reported ObjectNotFound");
        return Err(WinDnsError::NotFound {
            zone: String::new(),
            name: String::new(),
            record_type: String::new(),
        });
    }

    let message = if stderr.is_empty() {
        stdout.trim().to_string()
    } else {
        stderr
    };
    error!("Remote command failed: {}", message);
    Err(WinDnsError::RemoteCommand { stderr: message })
}

async fn run_process(mut command: Command, timeout: Duration) -> Result<String> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| WinDnsError::Transport {
            reason: format!("command timed out after {}s", timeout.as_secs()),
        })?
        .map_err(|e| WinDnsError::Transport {
            reason: format!("failed to spawn process: {e}"),
        })?;

    classify_output(output.status.success(), &output.stdout, &output.stderr)
}

/// Runs scripts through the system `ssh` client.
#[derive(Debug, Clone)]
pub struct SshRunner {
    ssh_binary: String,
    destination: String,
    port: u16,
    identity_file: Option<std::path::PathBuf>,
    powershell_binary: String,
    timeout: Duration,
}

impl SshRunner {
    /// Build a runner from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WinDnsError::Config`] if `server_host` or `ssh_username` is missing.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let host = config.server_host.clone().ok_or_else(|| WinDnsError::Config {
            reason: "server_host is required for SSH".to_string(),
        })?;
        let user = config.ssh_username.clone().ok_or_else(|| WinDnsError::Config {
            reason: "ssh_username is required for SSH".to_string(),
        })?;

        Ok(Self {
            ssh_binary: config.ssh_binary.clone(),
            destination: format!("{user}@{host}"),
            port: config.ssh_port,
            identity_file: config.ssh_identity_file.clone(),
            powershell_binary: config.powershell_binary.clone(),
            timeout: config.command_timeout(),
        })
    }

    /// Full argument list passed to the SSH client.
    #[must_use]
    pub fn ssh_args(&self, script: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={SSH_CONNECT_TIMEOUT_SECS}"),
            "-p".to_string(),
            self.port.to_string(),
        ];
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        args.push(self.destination.clone());
        args.push("--".to_string());
        args.push(self.powershell_binary.clone());
        args.extend(powershell_args(script));
        args
    }
}

#[async_trait]
impl CommandRunner for SshRunner {
    async fn run(&self, script: &str) -> Result<String> {
        debug!("Running script on {} via SSH:\n{}", self.destination, script);
        let mut command = Command::new(&self.ssh_binary);
        command.args(self.ssh_args(script));
        run_process(command, self.timeout).await
    }
}

/// Runs scripts with PowerShell on the local machine.
#[derive(Debug, Clone)]
pub struct LocalRunner {
    powershell_binary: String,
    timeout: Duration,
}

impl LocalRunner {
    /// Build a runner from configuration.
    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            powershell_binary: config.powershell_binary.clone(),
            timeout: config.command_timeout(),
        }
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    async fn run(&self, script: &str) -> Result<String> {
        debug!("Running script locally:\n{}", script);
        let mut command = Command::new(&self.powershell_binary);
        command.args(powershell_args(script));
        run_process(command, self.timeout).await
    }
}

/// Pick the runner the configuration asks for.
///
/// # Errors
///
/// Returns an error if the configuration fails validation.
pub fn runner_from_config(config: &ProviderConfig) -> Result<Arc<dyn CommandRunner>> {
    config.validate()?;
    if config.server_host.is_some() {
        Ok(Arc::new(SshRunner::from_config(config)?))
    } else {
        Ok(Arc::new(LocalRunner::from_config(config)))
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod transport_tests;
