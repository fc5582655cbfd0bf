// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line interface for the `windns` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use windns::config::ConfigOverrides;
use windns::constants::CONFIG_FILE_ENV;
use windns::record::RecordType;

/// Manage DNS records on a Windows DNS Server over remote PowerShell
#[derive(Debug, Parser)]
#[command(
    name = "windns",
    version,
    about = "Manage Windows DNS Server records over remote PowerShell",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Provider configuration file (YAML)
    #[arg(long, short = 'c', env = CONFIG_FILE_ENV, global = true)]
    pub config: Option<PathBuf>,

    /// SSH host that runs the DNS cmdlets; omit to run PowerShell locally
    #[arg(long, env = "WINDNS_SERVER_HOST", global = true)]
    pub server_host: Option<String>,

    /// SSH user name
    #[arg(long, env = "WINDNS_SSH_USERNAME", global = true)]
    pub ssh_username: Option<String>,

    /// SSH port
    #[arg(long, env = "WINDNS_SSH_PORT", global = true)]
    pub ssh_port: Option<u16>,

    /// SSH private key
    #[arg(long, env = "WINDNS_SSH_IDENTITY_FILE", global = true)]
    pub ssh_identity_file: Option<PathBuf>,

    /// DNS server passed to the cmdlets as -ComputerName
    #[arg(long, env = "WINDNS_DNS_SERVER_HOSTNAME", global = true)]
    pub dns_server_hostname: Option<String>,

    /// Remote command timeout in seconds
    #[arg(long, env = "WINDNS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WINDNS_OUTPUT",
        default_value = "yaml",
        global = true
    )]
    pub output: OutputFormat,
}

impl GlobalOpts {
    /// Connection flags as configuration overrides.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            server_host: self.server_host.clone(),
            ssh_username: self.ssh_username.clone(),
            ssh_port: self.ssh_port,
            ssh_identity_file: self.ssh_identity_file.clone(),
            dns_server_hostname: self.dns_server_hostname.clone(),
            command_timeout_secs: self.timeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML (default)
    Yaml,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage windns_record resources
    #[command(subcommand)]
    Record(RecordCommand),

    /// Encode or decode record identifiers
    #[command(subcommand)]
    Id(IdCommand),
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Print the current state of a record set
    Get {
        /// Record identifier (zone:name:TYPE)
        #[arg(long)]
        id: String,
    },

    /// Show the change `apply` would make
    Plan {
        /// Record definition (YAML)
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Create or update a record set to match a definition
    Apply {
        /// Record definition (YAML)
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Delete a record set
    Delete {
        /// Record identifier (zone:name:TYPE)
        #[arg(long)]
        id: String,
    },

    /// Print adoptable state for an existing record set
    Import {
        /// Record identifier (zone:name:TYPE)
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum IdCommand {
    /// Build an identifier from zone, name and type
    Encode {
        /// Zone name
        #[arg(long)]
        zone: String,
        /// Record name (`@` for the zone apex)
        #[arg(long)]
        name: String,
        /// Record type
        #[arg(long = "type")]
        record_type: RecordType,
    },

    /// Split an identifier into zone, name and type
    Decode {
        /// Record identifier (zone:name:TYPE)
        id: String,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
