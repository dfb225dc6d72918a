/*!
# Introduction

ifacedog reads and writes Debian-style `/etc/network/interfaces` stanza files.

A device's persisted configuration is described by a `StoredConfig`.  A provider renders an
ordered list of them into stanza file content:

```text
auto p2p2
iface p2p2 inet manual
```

and recovers them from existing content when desired and actual state need to be compared.  Two
providers exist: `lnx_ubuntu` for the Linux native backend and `ovs_ubuntu` for Open vSwitch
backed devices.  Providers are pure; reading and writing files is up to the caller.

The `config` module loads an ordered list of `StoredConfig` from a desired-state TOML file.
*/

#![deny(rust_2018_idioms)]

pub mod config;
pub mod interface_name;
pub mod stored_config;

pub use interface_name::InterfaceName;
pub use stored_config::{IfProvider, IfType, Method, Provider, StoredConfig, StoredConfigProvider};
