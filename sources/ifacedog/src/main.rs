/*!
# Introduction

ifacedog is a small helper program to manage Debian-style `/etc/network/interfaces` stanza files
for network devices.

It contains two subcommands:
* `format`: renders the devices described in a TOML file into stanza file content, written to a
  file or printed
* `parse`: reads a stanza file and prints the configuration of one device as JSON

A provider must be chosen for either subcommand: `lnx_ubuntu` for the Linux native backend, or
`ovs_ubuntu` for Open vSwitch backed devices.
*/

#![deny(rust_2018_idioms)]

mod cli;

use argh::FromArgs;
use simplelog::{Config as LogConfig, LevelFilter, SimpleLogger};
use snafu::ResultExt;
use std::process;

/// The stanza file most devices are described in
const DEFAULT_INTERFACES_FILE: &str = "/etc/network/interfaces";

/// Stores user-supplied arguments.
#[derive(FromArgs, PartialEq, Debug)]
struct Args {
    /// log-level trace|debug|info|warn|error
    #[argh(option)]
    log_level: Option<LevelFilter>,

    #[argh(subcommand)]
    subcommand: SubCommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommand {
    Format(cli::FormatArgs),
    Parse(cli::ParseArgs),
}

fn setup_logger(args: &Args) -> Result<()> {
    let log_level = args.log_level.unwrap_or(LevelFilter::Info);
    SimpleLogger::init(log_level, LogConfig::default()).context(error::LoggerSnafu)
}

fn run() -> Result<()> {
    let args: Args = argh::from_env();
    setup_logger(&args)?;
    match args.subcommand {
        SubCommand::Format(args) => cli::format::run(args).context(error::CliSnafu)?,
        SubCommand::Parse(args) => cli::parse::run(args).context(error::CliSnafu)?,
    }
    Ok(())
}

// Returning a Result from main makes it print a Debug representation of the error, but with Snafu
// we have nice Display representations of the error, so we wrap "main" (run) and print any error.
// https://github.com/shepmaster/snafu/issues/110
fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Potential errors during ifacedog execution
mod error {
    use snafu::Snafu;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(super)))]
    pub(super) enum Error {
        #[snafu(display("Logger setup error: {}", source))]
        Logger { source: log::SetLoggerError },

        #[snafu(display("{}", source))]
        Cli { source: crate::cli::Error },
    }
}

type Result<T> = std::result::Result<T, error::Error>;
