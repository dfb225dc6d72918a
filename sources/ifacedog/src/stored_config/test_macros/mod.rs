//! The test_macros module contains macros meant to simplify testing across providers.
//!
//! Every provider has to honor the same contract for the base grammar: `auto` and `iface` lines,
//! device scoping, the `onboot` default, and method validation.  The macros are declarative and
//! define a new module containing all the tests, so each provider gets the same tests with nicely
//! formatted `cargo test` output naming the provider being exercised.
//!
//! Templates for the stanza files the tests read live in `test_data/stored_config/templates`.
#[cfg(test)]
pub(super) mod base_grammar;

pub(super) use base_grammar::provider_tests;

/// gen_boilerplate!() is a convenience macro meant to be used inside of test macros to generate
/// some generally useful boilerplate code.  It provides functions for gathering the template
/// directory and rendering stanza file templates for a pair of devices.
///
/// The macro receives whether the provider under test is OVS backed, which decides whether the
/// rendered files carry `ovs_type` options.
macro_rules! gen_boilerplate {
    ($ovs:expr) => {
        use handlebars::Handlebars;
        use serde::Serialize;
        use std::fs;
        use std::path::{Path, PathBuf};

        static OVS: bool = $ovs;

        fn templates() -> PathBuf {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("test_data")
                .join("stored_config")
                .join("templates")
        }

        #[derive(Serialize)]
        struct Context<'a> {
            first: &'a str,
            second: &'a str,
            ovs: bool,
        }

        fn render_template<P>(path: P, first: &str, second: &str) -> String
        where
            P: AsRef<Path>,
        {
            let path = path.as_ref();
            let template = fs::read_to_string(path).unwrap();

            let mut hb = Handlebars::new();
            hb.register_template_string("template", &template).unwrap();

            let context = Context {
                first,
                second,
                ovs: OVS,
            };
            hb.render("template", &context).unwrap()
        }
    };
}

pub(super) use gen_boilerplate;
