use super::{error, Result};
use crate::DEFAULT_INTERFACES_FILE;
use argh::FromArgs;
use ifacedog::{config, Provider, StoredConfigProvider};
use log::info;
use snafu::{ensure, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "format")]
/// Render the devices described in a TOML file into a stanza file
pub(crate) struct FormatArgs {
    #[argh(option, short = 'p')]
    /// provider to format with: lnx_ubuntu|ovs_ubuntu
    provider: Provider,

    #[argh(option, short = 'c')]
    /// TOML file describing the devices
    config: PathBuf,

    #[argh(option, short = 'o')]
    /// stanza file to write; the content is printed if not given
    output: Option<PathBuf>,
}

/// Format the configured devices and write or print the result.
pub(crate) fn run(args: FormatArgs) -> Result<()> {
    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INTERFACES_FILE));
    let content = render(args.provider, &args.config, &target)?;

    match &args.output {
        Some(output) => {
            fs::write(output, &content).context(error::StanzaWriteSnafu { path: output })?;
            info!("Wrote stanza file '{}'", output.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Load the devices from `config_path` and render them for the stanza file at `target`.
fn render(provider: Provider, config_path: &Path, target: &Path) -> Result<String> {
    let configs =
        config::from_path(config_path).context(error::ConfigLoadSnafu { path: config_path })?;
    ensure!(
        !configs.is_empty(),
        error::NoInterfacesSnafu { path: config_path }
    );

    info!(
        "Formatting {} device(s) from '{}' with provider '{}'",
        configs.len(),
        config_path.display(),
        provider
    );
    provider
        .format_file(target, &configs)
        .context(error::StanzaFormatSnafu { path: target })
}
