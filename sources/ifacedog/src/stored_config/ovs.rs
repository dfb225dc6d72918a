//! The ovs module contains the provider for stanza files describing Open vSwitch backed devices
//! on Ubuntu.
//!
//! Stanzas use the same base grammar as the native backend.  Each one also carries an `ovs_type`
//! option naming the kind of OVS device, which is how the type survives a trip through the file.
use super::stanza::{self, Stanzas};
use super::{
    config_from_stanza, error, validate, write_addressing, IfProvider, IfType, Result,
    StoredConfig, StoredConfigProvider,
};
use crate::interface_name::InterfaceName;
use log::debug;
use snafu::{ensure, OptionExt};
use std::path::Path;

const OVS_TYPE: &str = "ovs_type";

// Interface types and the `ovs_type` tokens that represent them
const OVS_TYPES: &[(IfType, &str)] = &[
    (IfType::OvsPort, "OVSPort"),
    (IfType::OvsBridge, "OVSBridge"),
    (IfType::OvsBond, "OVSBond"),
    (IfType::OvsIntPort, "OVSIntPort"),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct OvsUbuntu;

impl OvsUbuntu {
    fn ovs_type_token(if_type: IfType) -> Option<&'static str> {
        OVS_TYPES
            .iter()
            .find(|(t, _)| *t == if_type)
            .map(|(_, token)| *token)
    }

    fn if_type_from_token(token: &str) -> Option<IfType> {
        OVS_TYPES
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(if_type, _)| *if_type)
    }
}

impl StoredConfigProvider for OvsUbuntu {
    fn backend(&self) -> IfProvider {
        IfProvider::Ovs
    }

    fn format_file(&self, path: &Path, configs: &[StoredConfig]) -> Result<String> {
        ensure!(!configs.is_empty(), error::NoConfigsSnafu { path });

        let mut out = String::new();
        for config in configs {
            validate(config, self.backend())?;
            let ovs_type =
                Self::ovs_type_token(config.if_type).context(error::UnsupportedIfTypeSnafu {
                    name: config.name.to_string(),
                    if_type: config.if_type,
                    backend: self.backend(),
                })?;

            debug!(
                "Formatting '{}' ({}, {}) for '{}'",
                config.name,
                ovs_type,
                config.method,
                path.display()
            );
            stanza::write_header(&mut out, &config.name, config.method, config.onboot)?;
            stanza::write_option(&mut out, OVS_TYPE, ovs_type)?;
            write_addressing(&mut out, config)?;
        }

        Ok(out)
    }

    fn parse_file(&self, name: &InterfaceName, contents: &str) -> Result<Vec<StoredConfig>> {
        let stanzas = Stanzas::read(contents)?;
        let stanza = match stanzas.take(name) {
            Some(stanza) => stanza,
            None => {
                debug!("No stanza found for '{}'", name);
                return Ok(Vec::new());
            }
        };

        // Devices written before types were recorded are plain ports
        let if_type = match stanza.option(OVS_TYPE) {
            Some(token) => {
                Self::if_type_from_token(token).context(error::InvalidOvsTypeSnafu {
                    name: name.to_string(),
                    given: token,
                })?
            }
            None => IfType::OvsPort,
        };

        Ok(vec![config_from_stanza(
            name,
            &stanza,
            self.backend(),
            if_type,
        )?])
    }
}
