//! The interface_name module contains the definition of a network device name as it may appear in
//! an interfaces stanza file, and the code to support creating one from string.
//!
//! A name has to survive a trip through the line grammar: it is written as a single token of an
//! `auto` or `iface` line and read back by splitting on whitespace.  On top of that it has to be
//! something the kernel would accept as a device name (IFNAMSIZ less the trailing NUL).
use serde::{Deserialize, Serialize, Serializer};
use std::convert::TryFrom;
use std::fmt::Display;
use std::ops::Deref;

/// Longest name the kernel accepts
const MAX_NAME_LEN: usize = 15;

/// InterfaceName can only be created from a string that is usable as a single stanza token.
/// Validation is handled in the `TryFrom` implementation below.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct InterfaceName {
    inner: String,
}

impl InterfaceName {
    /// Why `input` can't be written as a device token, if it can't.
    fn token_problem(input: &str) -> Option<&'static str> {
        if input.is_empty() || input.len() > MAX_NAME_LEN {
            return Some("must be 1 to 15 bytes long");
        }
        // Covers line terminators too, so a name can never split a stanza line in two
        if input.contains(char::is_whitespace) {
            return Some("contains whitespace");
        }
        if input.starts_with('#') {
            return Some("would start a comment");
        }
        if input.contains('/') || input == "." || input == ".." {
            return Some("is not usable as a device name");
        }
        None
    }
}

impl TryFrom<String> for InterfaceName {
    type Error = error::Error;

    fn try_from(input: String) -> Result<Self> {
        if let Some(msg) = Self::token_problem(&input) {
            return error::InvalidNetworkDeviceNameSnafu { input, msg }.fail();
        }
        Ok(Self { inner: input })
    }
}

impl TryFrom<&str> for InterfaceName {
    type Error = error::Error;

    fn try_from(input: &str) -> Result<Self> {
        Self::try_from(input.to_string())
    }
}

impl Deref for InterfaceName {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Serialize for InterfaceName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner)
    }
}

impl Display for InterfaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

mod error {
    use snafu::Snafu;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub enum Error {
        #[snafu(display("Invalid network device name '{}': {}", input, msg))]
        InvalidNetworkDeviceName { input: String, msg: String },
    }
}

pub use error::Error;
type Result<T> = std::result::Result<T, error::Error>;
