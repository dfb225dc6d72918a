//! The stored_config module contains the data structures and functions needed to create and read
//! Debian-style `/etc/network/interfaces` stanza files.
//!
//! A `StoredConfig` describes the persisted configuration of a single network device.  Providers
//! turn an ordered list of them into stanza file content, and recover them from existing content
//! when the caller needs to compare desired and actual state.  Providers never touch the
//! filesystem; reading and writing the file is left to the caller.
//!
//! The set of providers is closed (see `Provider`), and each one implements the
//! `StoredConfigProvider` trait.  The caller picks the provider explicitly.
pub mod lnx;
pub mod ovs;
pub(crate) mod stanza;
#[cfg(test)]
mod test_macros;

use crate::interface_name::InterfaceName;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use stanza::Stanza;
use std::net::IpAddr;
use std::path::Path;

/// The addressing method of an interface, rendered as the last token of an `iface` line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Bring the interface up with no IP configuration
    #[default]
    Manual,
    Static,
    Dhcp,
}

serde_plain::derive_fromstr_from_deserialize!(Method);
serde_plain::derive_display_from_serialize!(Method);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfType {
    #[default]
    Ethernet,
    Bond,
    Bridge,
    Vlan,
    OvsPort,
    OvsBridge,
    OvsBond,
    OvsIntPort,
}

serde_plain::derive_fromstr_from_deserialize!(IfType);
serde_plain::derive_display_from_serialize!(IfType);

impl IfType {
    /// Whether the device is backed by Open vSwitch
    pub fn is_ovs(&self) -> bool {
        matches!(
            self,
            IfType::OvsPort | IfType::OvsBridge | IfType::OvsBond | IfType::OvsIntPort
        )
    }
}

/// The backend family that produced (or will consume) a stanza file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfProvider {
    Lnx,
    Ovs,
}

serde_plain::derive_fromstr_from_deserialize!(IfProvider);
serde_plain::derive_display_from_serialize!(IfProvider);

/// The persisted configuration of one network device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredConfig {
    pub name: InterfaceName,
    pub if_type: IfType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_provider: Option<IfProvider>,
    pub method: Method,
    pub onboot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipaddr: Option<IpNet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
}

impl StoredConfig {
    /// A config for `name` with the defaults a freshly declared interface gets: brought up at
    /// boot, with no IP configuration.
    pub fn new(name: InterfaceName) -> Self {
        Self {
            name,
            if_type: IfType::default(),
            if_provider: None,
            method: Method::default(),
            onboot: true,
            ipaddr: None,
            gateway: None,
            mtu: None,
        }
    }
}

/// The capability every provider offers: turning configs into stanza file content and back.
pub trait StoredConfigProvider {
    /// The backend family this provider belongs to
    fn backend(&self) -> IfProvider;

    /// Render `configs`, in order, into the content of the stanza file at `path`.  The path is
    /// never written into the content.
    fn format_file(&self, path: &Path, configs: &[StoredConfig]) -> Result<String>;

    /// Recover the configs for the device `name` from existing stanza file content.  The result
    /// is empty if the device isn't described in `contents`.
    fn parse_file(&self, name: &InterfaceName, contents: &str) -> Result<Vec<StoredConfig>>;
}

/// The providers able to handle stanza files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    LnxUbuntu,
    OvsUbuntu,
}

serde_plain::derive_fromstr_from_deserialize!(Provider);
serde_plain::derive_display_from_serialize!(Provider);

impl Provider {
    fn inner(&self) -> &dyn StoredConfigProvider {
        match self {
            Provider::LnxUbuntu => &lnx::LnxUbuntu,
            Provider::OvsUbuntu => &ovs::OvsUbuntu,
        }
    }
}

impl StoredConfigProvider for Provider {
    fn backend(&self) -> IfProvider {
        self.inner().backend()
    }

    fn format_file(&self, path: &Path, configs: &[StoredConfig]) -> Result<String> {
        self.inner().format_file(path, configs)
    }

    fn parse_file(&self, name: &InterfaceName, contents: &str) -> Result<Vec<StoredConfig>> {
        self.inner().parse_file(name, contents)
    }
}

/// Check the parts of a config that every backend agrees on before it's rendered.
fn validate(config: &StoredConfig, backend: IfProvider) -> Result<()> {
    if let Some(given) = config.if_provider {
        ensure!(
            given == backend,
            error::ProviderMismatchSnafu {
                name: config.name.to_string(),
                given,
                expected: backend,
            }
        );
    }

    validate_addressing(config)
}

/// `static` needs an address; every other method must not carry one or a gateway.
fn validate_addressing(config: &StoredConfig) -> Result<()> {
    let name = config.name.to_string();

    if config.method == Method::Static {
        ensure!(
            config.ipaddr.is_some(),
            error::MissingAddressSnafu {
                name,
                method: config.method,
            }
        );
    } else {
        ensure!(
            config.ipaddr.is_none(),
            error::UnexpectedAddressingSnafu {
                name: &name,
                what: "ipaddr",
                method: config.method,
            }
        );
        ensure!(
            config.gateway.is_none(),
            error::UnexpectedAddressingSnafu {
                name,
                what: "gateway",
                method: config.method,
            }
        );
    }

    Ok(())
}

/// Write the address, gateway and MTU option lines that apply to `config`.
fn write_addressing(out: &mut String, config: &StoredConfig) -> Result<()> {
    if let Some(ipaddr) = &config.ipaddr {
        stanza::write_option(out, "address", ipaddr)?;
    }
    if let Some(gateway) = &config.gateway {
        stanza::write_option(out, "gateway", gateway)?;
    }
    if let Some(mtu) = &config.mtu {
        stanza::write_option(out, "mtu", mtu)?;
    }
    Ok(())
}

/// Build the config for a parsed stanza, interpreting the addressing options every backend
/// understands.  `if_type` is decided by the calling provider.
fn config_from_stanza(
    name: &InterfaceName,
    stanza: &Stanza<'_>,
    backend: IfProvider,
    if_type: IfType,
) -> Result<StoredConfig> {
    let ipaddr = match stanza.option("address") {
        Some(address) => Some(parse_address(name, address, stanza.option("netmask"))?),
        None => None,
    };

    let gateway = match stanza.option("gateway") {
        Some(gateway) => Some(gateway.parse::<IpAddr>().context(error::InvalidIpSnafu {
            name: name.to_string(),
            key: "gateway",
            value: gateway,
        })?),
        None => None,
    };

    let mtu = match stanza.option("mtu") {
        Some(mtu) => Some(mtu.parse::<u32>().context(error::InvalidMtuSnafu {
            name: name.to_string(),
            value: mtu,
        })?),
        None => None,
    };

    let config = StoredConfig {
        name: name.clone(),
        if_type,
        if_provider: Some(backend),
        method: stanza.method,
        onboot: stanza.onboot,
        ipaddr,
        gateway,
        mtu,
    };
    // Whatever we hand back must be accepted by format_file as is
    validate_addressing(&config)?;
    Ok(config)
}

/// An `address` option may carry its prefix (`10.0.0.1/24`), or rely on a separate `netmask`
/// option given either as a prefix length or a dotted mask.  A bare address with no netmask is a
/// host address.
fn parse_address(name: &InterfaceName, address: &str, netmask: Option<&str>) -> Result<IpNet> {
    if address.contains('/') {
        return address.parse::<IpNet>().context(error::InvalidAddressSnafu {
            name: name.to_string(),
            value: address,
        });
    }

    let addr = address.parse::<IpAddr>().context(error::InvalidIpSnafu {
        name: name.to_string(),
        key: "address",
        value: address,
    })?;

    let prefix = match netmask {
        None => match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        },
        Some(netmask) => match netmask.parse::<u8>() {
            Ok(prefix) => prefix,
            Err(_) => {
                let mask = netmask.parse::<IpAddr>().context(error::InvalidIpSnafu {
                    name: name.to_string(),
                    key: "netmask",
                    value: netmask,
                })?;
                ensure!(
                    mask.is_ipv4() == addr.is_ipv4(),
                    error::InvalidNetmaskSnafu {
                        name: name.to_string(),
                        value: netmask,
                        msg: "address family differs from the address",
                    }
                );
                mask_to_prefix(mask).ok_or_else(|| {
                    error::InvalidNetmaskSnafu {
                        name: name.to_string(),
                        value: netmask,
                        msg: "mask bits are not contiguous",
                    }
                    .build()
                })?
            }
        },
    };

    IpNet::new(addr, prefix).context(error::InvalidPrefixSnafu {
        name: name.to_string(),
        value: address,
    })
}

/// Convert a netmask like `255.255.255.0` into its prefix length; `None` if the one bits aren't
/// contiguous.
fn mask_to_prefix(mask: IpAddr) -> Option<u8> {
    let (bits, width) = match mask {
        IpAddr::V4(mask) => (u128::from(u32::from(mask)), 32),
        IpAddr::V6(mask) => (u128::from(mask), 128),
    };
    let ones = bits.count_ones();
    let expected = if ones == 0 {
        0
    } else {
        (u128::MAX >> (128 - ones)) << (width - ones)
    };
    (bits == expected).then_some(ones as u8)
}

mod error {
    use super::{IfProvider, IfType, Method};
    use snafu::Snafu;
    use std::path::PathBuf;

    /// Every error here means the input violates the stored config contract; none of them are
    /// transient.
    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub enum Error {
        #[snafu(display("No interface configuration given for '{}'", path.display()))]
        NoConfigs { path: PathBuf },

        #[snafu(display("Failed to build stanza file content: {}", source))]
        StanzaBuild { source: std::fmt::Error },

        #[snafu(display(
            "Interface '{}' belongs to the '{}' backend, cannot be handled by '{}'",
            name,
            given,
            expected
        ))]
        ProviderMismatch {
            name: String,
            given: IfProvider,
            expected: IfProvider,
        },

        #[snafu(display(
            "Interface '{}' has type '{}', which the '{}' backend does not support",
            name,
            if_type,
            backend
        ))]
        UnsupportedIfType {
            name: String,
            if_type: IfType,
            backend: IfProvider,
        },

        #[snafu(display("Interface '{}' uses method '{}', which requires 'ipaddr'", name, method))]
        MissingAddress { name: String, method: Method },

        #[snafu(display(
            "Interface '{}' sets '{}', which is only valid with method 'static', not '{}'",
            name,
            what,
            method
        ))]
        UnexpectedAddressing {
            name: String,
            what: String,
            method: Method,
        },

        #[snafu(display("Invalid method '{}' for interface '{}': {}", given, name, source))]
        InvalidMethod {
            name: String,
            given: String,
            source: serde_plain::Error,
        },

        #[snafu(display("Interface '{}' is described by more than one 'iface' stanza", name))]
        DuplicateStanza { name: String },

        #[snafu(display("Invalid address '{}' for interface '{}': {}", value, name, source))]
        InvalidAddress {
            name: String,
            value: String,
            source: ipnet::AddrParseError,
        },

        #[snafu(display("Invalid {} '{}' for interface '{}': {}", key, value, name, source))]
        InvalidIp {
            name: String,
            key: String,
            value: String,
            source: std::net::AddrParseError,
        },

        #[snafu(display("Invalid netmask '{}' for interface '{}': {}", value, name, msg))]
        InvalidNetmask {
            name: String,
            value: String,
            msg: String,
        },

        #[snafu(display("Invalid prefix for address '{}' on interface '{}': {}", value, name, source))]
        InvalidPrefix {
            name: String,
            value: String,
            source: ipnet::PrefixLenError,
        },

        #[snafu(display("Invalid mtu '{}' for interface '{}': {}", value, name, source))]
        InvalidMtu {
            name: String,
            value: String,
            source: std::num::ParseIntError,
        },

        #[snafu(display("Invalid ovs_type '{}' for interface '{}'", given, name))]
        InvalidOvsType { name: String, given: String },
    }
}

pub use error::Error;
pub type Result<T> = std::result::Result<T, error::Error>;
