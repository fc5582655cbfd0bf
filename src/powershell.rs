// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PowerShell script generation for the `DnsServer` module cmdlets.
//!
//! Every literal is emitted as a single-quoted PowerShell string with embedded
//! quotes doubled, so record data (TXT in particular) is never evaluated.
//! Scripts are shipped to the host with `-EncodedCommand`, which takes the
//! script as base64 of its UTF-16LE bytes and keeps the SSH login shell out
//! of the picture.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::record::{DnsRecord, RecordId, RecordType};

/// Quote a value as a PowerShell single-quoted string literal.
///
/// PowerShell treats the typographic single quotes as quote characters too,
/// so they are doubled along with `'`.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Encode a script for `powershell -EncodedCommand`.
#[must_use]
pub fn encode_command(script: &str) -> String {
    let utf16: Vec<u8> = script
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    BASE64.encode(utf16)
}

/// Builds cmdlet invocations for one DNS server.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    /// `-ComputerName` target when the SSH host is not the DNS server itself
    computer_name: Option<String>,
}

impl ScriptBuilder {
    /// Create a builder. `computer_name` is passed as `-ComputerName` when set.
    #[must_use]
    pub fn new(computer_name: Option<String>) -> Self {
        Self { computer_name }
    }

    fn target(&self, zone_name: &str, name: &str) -> String {
        let mut args = format!("-ZoneName {} -Name {}", quote(zone_name), quote(name));
        if let Some(computer) = &self.computer_name {
            args.push_str(" -ComputerName ");
            args.push_str(&quote(computer));
        }
        args
    }

    /// Script that prints the record set as UTF-8 JSON (see [`crate::record::parser`]).
    #[must_use]
    pub fn get_record(&self, id: &RecordId) -> String {
        format!(
            "$ErrorActionPreference = 'Stop'\n\
             [Console]::OutputEncoding = [System.Text.Encoding]::UTF8\n\
             $records = @(Get-DnsServerResourceRecord {target} -RRType {rrtype} -ErrorAction Stop)\n\
             $projected = @($records | ForEach-Object {{\n\
             \x20   $data = switch ($_.RecordType) {{\n\
             \x20       'A' {{ $_.RecordData.IPv4Address.IPAddressToString }}\n\
             \x20       'AAAA' {{ $_.RecordData.IPv6Address.IPAddressToString }}\n\
             \x20       'CNAME' {{ $_.RecordData.HostNameAlias }}\n\
             \x20       'PTR' {{ $_.RecordData.PtrDomainName }}\n\
             \x20       'TXT' {{ $_.RecordData.DescriptiveText }}\n\
             \x20   }}\n\
             \x20   [PSCustomObject]@{{\n\
             \x20       HostName = $_.HostName\n\
             \x20       RecordType = $_.RecordType.ToString()\n\
             \x20       TimeToLive = [int64]$_.TimeToLive.TotalSeconds\n\
             \x20       RecordData = [string]$data\n\
             \x20   }}\n\
             }})\n\
             ConvertTo-Json -InputObject $projected -Compress",
            target = self.target(&id.zone_name, &id.name),
            rrtype = id.record_type,
        )
    }

    /// Script that adds one value to a record set.
    #[must_use]
    pub fn add_record_value(
        &self,
        zone_name: &str,
        name: &str,
        record_type: RecordType,
        value: &str,
        ttl: Option<u32>,
        create_ptr: bool,
    ) -> String {
        let data = match record_type {
            RecordType::A => format!("-A -IPv4Address {}", quote(value)),
            RecordType::AAAA => format!("-AAAA -IPv6Address {}", quote(value)),
            RecordType::CNAME => format!("-CName -HostNameAlias {}", quote(value)),
            RecordType::PTR => format!("-Ptr -PtrDomainName {}", quote(value)),
            RecordType::TXT => format!("-Txt -DescriptiveText {}", quote(value)),
        };

        let mut script = format!(
            "Add-DnsServerResourceRecord {} {data}",
            self.target(zone_name, name)
        );
        if let Some(ttl) = ttl {
            script.push_str(&format!(" -TimeToLive ([TimeSpan]::FromSeconds({ttl}))"));
        }
        if create_ptr && record_type.supports_create_ptr() {
            script.push_str(" -CreatePtr");
        }
        script.push_str(" -ErrorAction Stop");
        script
    }

    /// Script that removes one value from a record set.
    #[must_use]
    pub fn remove_record_value(
        &self,
        zone_name: &str,
        name: &str,
        record_type: RecordType,
        value: &str,
    ) -> String {
        format!(
            "Remove-DnsServerResourceRecord {} -RRType {record_type} -RecordData {} -Force -ErrorAction Stop",
            self.target(zone_name, name),
            quote(value)
        )
    }

    /// Script that removes every value of a record set.
    #[must_use]
    pub fn remove_record_set(&self, id: &RecordId) -> String {
        format!(
            "Remove-DnsServerResourceRecord {} -RRType {} -Force -ErrorAction Stop",
            self.target(&id.zone_name, &id.name),
            id.record_type
        )
    }

    /// Script that sets the TTL on every record of a set.
    #[must_use]
    pub fn set_record_ttl(&self, record: &DnsRecord, ttl: u32) -> String {
        let target = self.target(&record.zone_name, &record.name);
        let computer = self
            .computer_name
            .as_ref()
            .map(|c| format!(" -ComputerName {}", quote(c)))
            .unwrap_or_default();
        format!(
            "$ErrorActionPreference = 'Stop'\n\
             foreach ($old in @(Get-DnsServerResourceRecord {target} -RRType {rrtype} -ErrorAction Stop)) {{\n\
             \x20   $new = $old.Clone()\n\
             \x20   $new.TimeToLive = [TimeSpan]::FromSeconds({ttl})\n\
             \x20   Set-DnsServerResourceRecord -ZoneName {zone}{computer} -OldInputObject $old -NewInputObject $new -ErrorAction Stop\n\
             }}",
            rrtype = record.record_type,
            zone = quote(&record.zone_name),
        )
    }
}

#[cfg(test)]
#[path = "powershell_tests.rs"]
mod powershell_tests;
