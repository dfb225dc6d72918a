pub(crate) mod format;
pub(crate) mod parse;

pub(crate) use format::FormatArgs;
pub(crate) use parse::ParseArgs;
use serde::Serialize;
use snafu::ResultExt;

/// Helper function that serializes the input to JSON and prints it
fn print_json<S>(val: &S) -> Result<()>
where
    S: Serialize,
{
    let output = serde_json::to_string(val).context(error::JsonSerializeSnafu)?;
    println!("{}", output);
    Ok(())
}

/// Potential errors during ifacedog subcommands
mod error {
    use ifacedog::{config, interface_name, stored_config};
    use snafu::Snafu;
    use std::io;
    use std::path::PathBuf;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub(crate) enum Error {
        #[snafu(display("Unable to load interface config from '{}': {}", path.display(), source))]
        ConfigLoad {
            path: PathBuf,
            source: config::Error,
        },

        #[snafu(display("No interfaces defined in '{}'", path.display()))]
        NoInterfaces { path: PathBuf },

        #[snafu(display("Unable to format stanza file '{}': {}", path.display(), source))]
        StanzaFormat {
            path: PathBuf,
            source: stored_config::Error,
        },

        #[snafu(display("Unable to parse stanza file '{}': {}", path.display(), source))]
        StanzaParse {
            path: PathBuf,
            source: stored_config::Error,
        },

        #[snafu(display("Failed to read stanza file '{}': {}", path.display(), source))]
        StanzaRead { path: PathBuf, source: io::Error },

        #[snafu(display("Failed to write stanza file '{}': {}", path.display(), source))]
        StanzaWrite { path: PathBuf, source: io::Error },

        #[snafu(display("Invalid device name: {}", source))]
        DeviceName { source: interface_name::Error },

        #[snafu(display("Error serializing to JSON: {}", source))]
        JsonSerialize { source: serde_json::error::Error },
    }
}

pub(crate) use error::Error;
pub(crate) type Result<T> = std::result::Result<T, error::Error>;
