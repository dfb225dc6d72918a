//! The lnx module contains the provider for stanza files consumed by the Linux native (ifupdown)
//! backend on Ubuntu.
//!
//! The native backend only needs the base grammar: an `auto` line for devices brought up at boot,
//! the `iface` line, and any addressing options.  A device's type isn't written out; on read it
//! is inferred from the bonding, bridging, and VLAN options ifupdown uses.
use super::stanza::{self, Stanza, Stanzas};
use super::{
    config_from_stanza, error, validate, write_addressing, IfProvider, IfType, Result,
    StoredConfig, StoredConfigProvider,
};
use crate::interface_name::InterfaceName;
use log::debug;
use snafu::ensure;
use std::path::Path;

const BOND_OPTIONS: &[&str] = &["bond-slaves", "bond_slaves", "bond-mode", "bond_mode"];
const BRIDGE_OPTIONS: &[&str] = &["bridge_ports", "bridge-ports"];
const VLAN_OPTIONS: &[&str] = &["vlan-raw-device", "vlan_raw_device"];

#[derive(Debug, Default, Clone, Copy)]
pub struct LnxUbuntu;

impl LnxUbuntu {
    fn if_type(stanza: &Stanza<'_>) -> IfType {
        if stanza.has_any_option(BOND_OPTIONS) {
            IfType::Bond
        } else if stanza.has_any_option(BRIDGE_OPTIONS) {
            IfType::Bridge
        } else if stanza.has_any_option(VLAN_OPTIONS) {
            IfType::Vlan
        } else {
            IfType::Ethernet
        }
    }
}

impl StoredConfigProvider for LnxUbuntu {
    fn backend(&self) -> IfProvider {
        IfProvider::Lnx
    }

    fn format_file(&self, path: &Path, configs: &[StoredConfig]) -> Result<String> {
        ensure!(!configs.is_empty(), error::NoConfigsSnafu { path });

        let mut out = String::new();
        for config in configs {
            validate(config, self.backend())?;
            ensure!(
                !config.if_type.is_ovs(),
                error::UnsupportedIfTypeSnafu {
                    name: config.name.to_string(),
                    if_type: config.if_type,
                    backend: self.backend(),
                }
            );

            debug!(
                "Formatting '{}' ({}, {}) for '{}'",
                config.name,
                config.if_type,
                config.method,
                path.display()
            );
            stanza::write_header(&mut out, &config.name, config.method, config.onboot)?;
            write_addressing(&mut out, config)?;
        }

        Ok(out)
    }

    fn parse_file(&self, name: &InterfaceName, contents: &str) -> Result<Vec<StoredConfig>> {
        let stanzas = Stanzas::read(contents)?;
        match stanzas.take(name) {
            Some(stanza) => {
                let if_type = Self::if_type(&stanza);
                Ok(vec![config_from_stanza(
                    name,
                    &stanza,
                    self.backend(),
                    if_type,
                )?])
            }
            None => {
                debug!("No stanza found for '{}'", name);
                Ok(Vec::new())
            }
        }
    }
}
