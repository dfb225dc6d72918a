//! The stanza module contains the line grammar shared by all providers.
//!
//! A stanza file is read one physical line at a time.  The first token of a line decides what it
//! is: `auto` lines mark devices brought up at boot, `iface <name> inet <method>` lines open a
//! stanza for a device, and any other non-keyword line that follows an open stanza is one of its
//! options.  Everything else is ignored so hand edited files with comments or directives we don't
//! manage can still be read.
use super::{error, Method, Result};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use snafu::{ensure, ResultExt};
use std::fmt::{Display, Write};
use std::str::FromStr;

/// Indentation used for option lines
const OPTION_INDENT: &str = "    ";

// Keywords that begin a stanza of their own, besides `auto` and `iface`.  They close any open
// `iface` stanza.  Any `allow-*` keyword other than `allow-auto` also belongs here.
const OTHER_STANZA_KEYWORDS: &[&str] = &[
    "mapping",
    "source",
    "source-directory",
    "no-auto-down",
    "no-scripts",
];

lazy_static! {
    // iface p2p2 inet manual -> name=p2p2, method=manual
    static ref IFACE_LINE: Regex =
        Regex::new(r"^iface\s+(?P<name>\S+)\s+inet\s+(?P<method>\S+)\s*$").unwrap();
    //     address 10.0.0.1/24 -> key=address, val=10.0.0.1/24
    static ref OPTION_LINE: Regex =
        Regex::new(r"^\s*(?P<key>[A-Za-z0-9_-]+)\s+(?P<val>\S.*?)\s*$").unwrap();
}

/// A single classified line of a stanza file.
#[derive(Debug, PartialEq)]
pub(crate) enum Line<'a> {
    /// `auto <name> [<name>...]`, or its synonym `allow-auto`
    Auto(Vec<&'a str>),
    /// `iface <name> inet <method>`; the method is checked later so the error can name the device
    Iface { name: &'a str, method: &'a str },
    /// Any other stanza keyword, including `iface` lines for other address families
    OtherStanza,
    /// `<key> <value>`, meaningful only inside an open stanza
    Option { key: &'a str, value: &'a str },
    /// Blank lines, comments, and anything else we can't make sense of
    Ignored,
}

impl<'a> Line<'a> {
    pub(crate) fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Line::Ignored;
        }

        let mut tokens = trimmed.split_whitespace();
        // A non-empty trimmed line always has a first token
        let keyword = tokens.next().unwrap_or_default();
        match keyword {
            "auto" | "allow-auto" => {
                let names: Vec<&str> = tokens.collect();
                if names.is_empty() {
                    Line::OtherStanza
                } else {
                    Line::Auto(names)
                }
            }
            "iface" => match IFACE_LINE.captures(trimmed) {
                Some(cap) => match (cap.name("name"), cap.name("method")) {
                    (Some(name), Some(method)) => Line::Iface {
                        name: name.as_str(),
                        method: method.as_str(),
                    },
                    _ => Line::OtherStanza,
                },
                None => Line::OtherStanza,
            },
            k if k.starts_with("allow-") || OTHER_STANZA_KEYWORDS.contains(&k) => {
                Line::OtherStanza
            }
            _ => match OPTION_LINE.captures(trimmed) {
                Some(cap) => match (cap.name("key"), cap.name("val")) {
                    (Some(key), Some(value)) => Line::Option {
                        key: key.as_str(),
                        value: value.as_str(),
                    },
                    _ => Line::Ignored,
                },
                None => Line::Ignored,
            },
        }
    }
}

/// One finalized `iface` stanza.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Stanza<'a> {
    pub(crate) name: &'a str,
    pub(crate) method: Method,
    pub(crate) onboot: bool,
    options: Vec<(&'a str, &'a str)>,
}

impl<'a> Stanza<'a> {
    /// The value of the first option named `key`
    pub(crate) fn option(&self, key: &str) -> Option<&'a str> {
        self.options
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Whether any of the given option keys are present
    pub(crate) fn has_any_option(&self, keys: &[&str]) -> bool {
        self.options.iter().any(|(k, _)| keys.contains(k))
    }
}

#[derive(Debug, Default)]
struct Entry<'a> {
    onboot: bool,
    iface: Option<(Method, Vec<(&'a str, &'a str)>)>,
}

/// Stanzas accumulated from the content of a stanza file, in order of first appearance.
#[derive(Debug, Default)]
pub(crate) struct Stanzas<'a> {
    entries: IndexMap<&'a str, Entry<'a>>,
}

impl<'a> Stanzas<'a> {
    /// Read every line of `contents`.  Fails only on `iface` lines we can't trust: an unknown
    /// method, or a device described twice.
    pub(crate) fn read(contents: &'a str) -> Result<Self> {
        let mut stanzas = Self::default();
        // The device whose `iface` stanza is currently open, if any
        let mut open: Option<&'a str> = None;

        for line in contents.lines() {
            match Line::classify(line) {
                Line::Auto(names) => {
                    open = None;
                    for name in names {
                        stanzas.entries.entry(name).or_default().onboot = true;
                    }
                }
                Line::Iface { name, method } => {
                    let method = Method::from_str(method).context(error::InvalidMethodSnafu {
                        name,
                        given: method,
                    })?;
                    let entry = stanzas.entries.entry(name).or_default();
                    ensure!(entry.iface.is_none(), error::DuplicateStanzaSnafu { name });
                    entry.iface = Some((method, Vec::new()));
                    open = Some(name);
                }
                Line::OtherStanza => {
                    debug!("Skipping unmanaged stanza line '{}'", line.trim());
                    open = None;
                }
                Line::Option { key, value } => match open {
                    Some(name) => {
                        if let Some((_, options)) = stanzas
                            .entries
                            .get_mut(name)
                            .and_then(|e| e.iface.as_mut())
                        {
                            options.push((key, value));
                        }
                    }
                    None => debug!("Ignoring option line outside of a stanza: '{}'", line.trim()),
                },
                Line::Ignored => {}
            }
        }

        Ok(stanzas)
    }

    /// Finalize the accumulated entries into stanzas, materializing `onboot` for each.  Devices
    /// that only appear in `auto` lines have no stanza and are dropped.
    pub(crate) fn into_stanzas(self) -> impl Iterator<Item = Stanza<'a>> {
        self.entries
            .into_iter()
            .filter_map(|(name, entry)| match entry.iface {
                Some((method, options)) => Some(Stanza {
                    name,
                    method,
                    onboot: entry.onboot,
                    options,
                }),
                None => {
                    debug!("'{}' is marked auto but has no iface stanza", name);
                    None
                }
            })
    }

    /// The finalized stanza for the device `name`, if the content describes it.
    pub(crate) fn take(self, name: &str) -> Option<Stanza<'a>> {
        self.into_stanzas().find(|stanza| stanza.name == name)
    }
}

/// Write the `auto` line (if needed) and the `iface` line that start a device's stanza.
pub(crate) fn write_header<N>(out: &mut String, name: N, method: Method, onboot: bool) -> Result<()>
where
    N: Display,
{
    if onboot {
        writeln!(out, "auto {}", name).context(error::StanzaBuildSnafu)?;
    }
    writeln!(out, "iface {} inet {}", name, method).context(error::StanzaBuildSnafu)
}

/// Write an indented option line belonging to the current stanza.
pub(crate) fn write_option<V>(out: &mut String, key: &str, value: V) -> Result<()>
where
    V: Display,
{
    writeln!(out, "{}{} {}", OPTION_INDENT, key, value).context(error::StanzaBuildSnafu)
}
