// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};
use windns::{
    backend::PowerShellBackend,
    config::ProviderConfig,
    constants::TOKIO_WORKER_THREADS,
    record::{decode, encode, RecordChange},
    resource::{RecordResource, RecordSpec, RecordState},
    transport::runner_from_config,
};

use crate::cli::{Cli, Command, GlobalOpts, IdCommand, OutputFormat, RecordCommand};

/// Result of `record apply`.
#[derive(Debug, Serialize)]
struct ApplyOutput {
    change: RecordChange,
    state: RecordState,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("windns")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_tracing() {
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG (default: info) and RUST_LOG_FORMAT=json|text.
    // Logs go to stderr; stdout carries command output only.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    init_tracing();
    debug!("Logging initialized with file and line number tracking");

    let output = cli.global.output;
    match cli.command {
        Command::Id(command) => run_id_command(command, output),
        Command::Record(command) => {
            let config = load_config(&cli.global).await?;
            run_record_command(command, &config, output).await
        }
    }
}

/// Resolve configuration: file (if any), then flags and `WINDNS_*` env.
async fn load_config(global: &GlobalOpts) -> Result<ProviderConfig> {
    let base = match &global.config {
        Some(path) => ProviderConfig::from_file(path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ProviderConfig::default(),
    };

    let config = base.with_overrides(global.overrides());
    config.validate().context("Invalid provider configuration")?;
    debug!(
        "Provider configuration: server_host={:?} dns_server_hostname={:?}",
        config.server_host, config.dns_server_hostname
    );
    Ok(config)
}

async fn read_spec(path: &Path) -> Result<RecordSpec> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse record definition {}", path.display()))
}

async fn run_record_command(
    command: RecordCommand,
    config: &ProviderConfig,
    output: OutputFormat,
) -> Result<()> {
    let runner = runner_from_config(config).context("Failed to set up command runner")?;
    let resource = RecordResource::new(PowerShellBackend::new(
        runner,
        config.dns_server_hostname.clone(),
    ));

    match command {
        RecordCommand::Get { id } => match resource.read(&id).await? {
            Some(state) => print(&state, output),
            None => bail!("Record {id} does not exist"),
        },
        RecordCommand::Plan { file } => {
            let spec = read_spec(&file).await?;
            let change = resource.plan(&spec).await?;
            print(&change, output)
        }
        RecordCommand::Apply { file } => {
            let spec = read_spec(&file).await?;
            let (change, state) = resource
                .apply(&spec)
                .await
                .with_context(|| format!("Failed to apply {}", file.display()))?;
            info!("Applied {}", state.id);
            print(&ApplyOutput { change, state }, output)
        }
        RecordCommand::Delete { id } => {
            resource
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete {id}"))?;
            info!("Deleted {id}");
            Ok(())
        }
        RecordCommand::Import { id } => {
            let state = resource
                .import(&id)
                .await
                .with_context(|| format!("Failed to import {id}"))?;
            print(&state, output)
        }
    }
}

fn run_id_command(command: IdCommand, output: OutputFormat) -> Result<()> {
    match command {
        IdCommand::Encode {
            zone,
            name,
            record_type,
        } => {
            println!("{}", encode(&zone, &name, record_type)?);
            Ok(())
        }
        IdCommand::Decode { id } => print(&decode(&id)?, output),
    }
}

fn print<T: Serialize>(value: &T, output: OutputFormat) -> Result<()> {
    let text = match output {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json => serde_json::to_string_pretty(value)? + "\n",
    };
    print!("{text}");
    Ok(())
}
