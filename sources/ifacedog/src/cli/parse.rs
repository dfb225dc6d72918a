use super::{error, print_json, Result};
use argh::FromArgs;
use ifacedog::{InterfaceName, Provider, StoredConfig, StoredConfigProvider};
use log::info;
use snafu::ResultExt;
use std::convert::TryFrom;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "parse")]
/// Print the configuration of one device in a stanza file as JSON
pub(crate) struct ParseArgs {
    #[argh(option, short = 'p')]
    /// provider to parse with: lnx_ubuntu|ovs_ubuntu
    provider: Provider,

    #[argh(option, short = 'd')]
    /// name of the network device
    device: String,

    #[argh(positional)]
    /// stanza file to read
    file: PathBuf,
}

pub(crate) fn run(args: ParseArgs) -> Result<()> {
    let configs = read(args.provider, &args.device, &args.file)?;
    print_json(&configs)
}

/// Read the stanza file at `path` and recover the configuration of `device` from it.
fn read(provider: Provider, device: &str, path: &Path) -> Result<Vec<StoredConfig>> {
    let name = InterfaceName::try_from(device).context(error::DeviceNameSnafu)?;
    let contents = fs::read_to_string(path).context(error::StanzaReadSnafu { path })?;

    let configs = provider
        .parse_file(&name, &contents)
        .context(error::StanzaParseSnafu { path })?;
    info!(
        "Found {} stanza(s) for '{}' in '{}'",
        configs.len(),
        name,
        path.display()
    );
    Ok(configs)
}
