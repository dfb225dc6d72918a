//! The config module contains the structures needed to deserialize a desired-state TOML file into
//! the ordered list of `StoredConfig` handed to a provider.
//!
//! Each table is keyed by the device name:
//!
//! ```toml
//! [p2p2]
//! if-type = "ethernet"
//! method = "manual"
//! onboot = true
//! ```
//!
//! Every key is optional and defaults to the values of `StoredConfig::new`.
use crate::interface_name::InterfaceName;
use crate::stored_config::{IfProvider, IfType, Method, StoredConfig};
use indexmap::IndexMap;
use ipnet::IpNet;
use serde::Deserialize;
use snafu::ResultExt;
use std::convert::TryFrom;
use std::fs;
use std::net::IpAddr;
use std::path::Path;

/// The settings for one device, as written in the desired-state file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct DeviceConfig {
    if_type: Option<IfType>,
    if_provider: Option<IfProvider>,
    method: Option<Method>,
    onboot: Option<bool>,
    ipaddr: Option<IpNet>,
    gateway: Option<IpAddr>,
    mtu: Option<u32>,
}

/// Read and deserialize the desired-state file at `path`.
pub fn from_path<P>(path: P) -> Result<Vec<StoredConfig>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).context(error::ConfigReadFailedSnafu { path })?;
    deserialize_config(&config_str)
}

/// Deserialize desired-state TOML into configs, preserving the order of the tables.
pub fn deserialize_config(config_str: &str) -> Result<Vec<StoredConfig>> {
    // Use an IndexMap to preserve the order of the devices defined in the file; the stanza file
    // lists devices in the same order.
    let devices: IndexMap<String, DeviceConfig> =
        toml::from_str(config_str).context(error::ConfigParseSnafu)?;

    devices
        .into_iter()
        .map(|(name, device)| {
            let name = InterfaceName::try_from(name).context(error::InvalidInterfaceNameSnafu)?;
            let mut config = StoredConfig::new(name);
            if let Some(if_type) = device.if_type {
                config.if_type = if_type;
            }
            if let Some(method) = device.method {
                config.method = method;
            }
            if let Some(onboot) = device.onboot {
                config.onboot = onboot;
            }
            config.if_provider = device.if_provider;
            config.ipaddr = device.ipaddr;
            config.gateway = device.gateway;
            config.mtu = device.mtu;
            Ok(config)
        })
        .collect()
}

mod error {
    use crate::interface_name;
    use snafu::Snafu;
    use std::io;
    use std::path::PathBuf;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub enum Error {
        #[snafu(display("Failed to read interface config from '{}': {}", path.display(), source))]
        ConfigReadFailed { path: PathBuf, source: io::Error },

        #[snafu(display("Failed to parse interface config: {}", source))]
        ConfigParse { source: toml::de::Error },

        #[snafu(display("Invalid interface name: {}", source))]
        InvalidInterfaceName { source: interface_name::Error },
    }
}

pub use error::Error;
type Result<T> = std::result::Result<T, error::Error>;
