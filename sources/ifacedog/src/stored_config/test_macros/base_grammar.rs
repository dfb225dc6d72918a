//! The provider_tests macro contains tests that every provider must pass: formatting and reading
//! back the base `auto`/`iface` grammar, scoping reads to one device, and rejecting input that
//! violates the stored config contract.
//!
//! Arguments: the provider under test, the interface type its configs use, and whether the
//! provider is OVS backed.
macro_rules! provider_tests {
    ($provider:expr, $if_type:expr, $ovs:expr) => {
        mod base_grammar {
            use lazy_static::lazy_static;
            use regex::Regex;
            use std::convert::TryFrom;
            use $crate::interface_name::InterfaceName;
            use $crate::stored_config::test_macros::gen_boilerplate;
            use $crate::stored_config::{IfProvider, Method, StoredConfig, StoredConfigProvider};

            gen_boilerplate!($ovs);

            lazy_static! {
                static ref AUTO: Regex = Regex::new(r"(?m)^auto\s+(\S+)$").unwrap();
                static ref IFACE: Regex = Regex::new(r"(?m)^iface\s+(\S+)\s+inet\s+(\S+)$").unwrap();
            }

            const NAMES: &[&str] = &["p2p2", "eth0", "br-ex", "eth0.101", "bond0"];

            fn config(name: &str, onboot: bool) -> StoredConfig {
                let mut config = StoredConfig::new(InterfaceName::try_from(name).unwrap());
                config.if_type = $if_type;
                config.onboot = onboot;
                config
            }

            #[test]
            fn manual_round_trip() {
                for name in NAMES {
                    for onboot in [true, false] {
                        let desired = config(name, onboot);
                        let text = $provider
                            .format_file(Path::new("filepath"), &[desired.clone()])
                            .unwrap();
                        let parsed = $provider.parse_file(&desired.name, &text).unwrap();

                        assert_eq!(parsed.len(), 1, "{}", text);
                        assert_eq!(parsed[0].name, desired.name);
                        assert_eq!(parsed[0].method, desired.method);
                        assert_eq!(parsed[0].onboot, desired.onboot);
                        assert_eq!(parsed[0].if_type, desired.if_type);
                        assert_eq!(parsed[0].if_provider, Some($provider.backend()));
                    }
                }
            }

            #[test]
            fn line_patterns() {
                let configs = vec![config("p2p2", true), config("p2p3", false)];
                let text = $provider
                    .format_file(Path::new("filepath"), &configs)
                    .unwrap();

                let autos: Vec<&str> = AUTO
                    .captures_iter(&text)
                    .filter_map(|c| c.get(1))
                    .map(|m| m.as_str())
                    .collect();
                assert_eq!(autos, vec!["p2p2"]);

                let ifaces: Vec<(&str, &str)> = IFACE
                    .captures_iter(&text)
                    .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
                    .collect();
                assert_eq!(ifaces, vec![("p2p2", "manual"), ("p2p3", "manual")]);

                // The file path is only a hint for the provider, never content
                assert!(!text.contains("filepath"));
                assert!(text.ends_with('\n'));
                assert!(!text.contains("\n\n"));
            }

            #[test]
            fn order_preserved() {
                let configs: Vec<StoredConfig> = NAMES.iter().map(|n| config(n, true)).collect();
                let text = $provider
                    .format_file(Path::new("filepath"), &configs)
                    .unwrap();
                let ifaces: Vec<&str> = IFACE
                    .captures_iter(&text)
                    .filter_map(|c| c.get(1))
                    .map(|m| m.as_str())
                    .collect();
                assert_eq!(ifaces, NAMES.to_vec());
            }

            #[test]
            fn device_scoping() {
                let text = render_template(templates().join("two_devices.tmpl"), "eth0", "eth1");

                let first = InterfaceName::try_from("eth0").unwrap();
                let parsed = $provider.parse_file(&first, &text).unwrap();
                assert_eq!(parsed.len(), 1);
                assert_eq!(parsed[0].name, first);
                assert_eq!(parsed[0].method, Method::Manual);
                assert!(parsed[0].onboot);

                let second = InterfaceName::try_from("eth1").unwrap();
                let parsed = $provider.parse_file(&second, &text).unwrap();
                assert_eq!(parsed.len(), 1);
                assert_eq!(parsed[0].name, second);
                assert_eq!(parsed[0].method, Method::Dhcp);
            }

            #[test]
            fn onboot_defaults_false() {
                let text = render_template(templates().join("two_devices.tmpl"), "p2p2", "p2p3");
                let name = InterfaceName::try_from("p2p3").unwrap();
                let parsed = $provider.parse_file(&name, &text).unwrap();
                assert!(!parsed[0].onboot);
            }

            #[test]
            fn absent_device() {
                let text = render_template(templates().join("two_devices.tmpl"), "p2p2", "p2p3");
                let name = InterfaceName::try_from("p2p4").unwrap();
                assert!($provider.parse_file(&name, &text).unwrap().is_empty());
                assert!($provider.parse_file(&name, "").unwrap().is_empty());
            }

            #[test]
            fn unknown_method() {
                let name = InterfaceName::try_from("p2p2").unwrap();
                for method in ["loopback", "bogus", "Manual"] {
                    let text = format!("auto p2p2\niface p2p2 inet {}\n", method);
                    assert!($provider.parse_file(&name, &text).is_err());
                }
                // Any iface line counts, not just the one for the requested device
                let text = "iface p2p2 inet manual\niface p2p3 inet ppp\n";
                assert!($provider.parse_file(&name, text).is_err());
            }

            #[test]
            fn no_configs() {
                assert!($provider
                    .format_file(Path::new("filepath"), &[])
                    .is_err());
            }

            #[test]
            fn provider_mismatch() {
                let mut config = config("p2p2", true);
                config.if_provider = Some(match $provider.backend() {
                    IfProvider::Lnx => IfProvider::Ovs,
                    IfProvider::Ovs => IfProvider::Lnx,
                });
                assert!($provider
                    .format_file(Path::new("filepath"), &[config])
                    .is_err());
            }

            #[test]
            fn static_without_address() {
                let name = InterfaceName::try_from("eth1").unwrap();
                let text = "auto eth1\niface eth1 inet static\n    gateway 10.0.0.254\n";
                assert!($provider.parse_file(&name, text).is_err());
            }

            #[test]
            fn addressing_without_static() {
                let name = InterfaceName::try_from("eth1").unwrap();
                for (method, option) in [
                    ("manual", "address 10.0.0.1/24"),
                    ("dhcp", "address 10.0.0.1/24"),
                    ("manual", "gateway 10.0.0.254"),
                ] {
                    let text = format!("iface eth1 inet {}\n    {}\n", method, option);
                    assert!($provider.parse_file(&name, &text).is_err(), "{}", text);
                }
            }

            #[test]
            fn parsed_configs_format_again() {
                let name = InterfaceName::try_from("eth1").unwrap();
                let text = "auto eth1\niface eth1 inet static\n    address 10.0.0.1\n    netmask 255.255.255.0\n    mtu 1500\n";
                let parsed = $provider.parse_file(&name, text).unwrap();
                assert_eq!(parsed.len(), 1);
                assert!($provider
                    .format_file(Path::new("filepath"), &parsed)
                    .is_ok());
            }

            #[test]
            fn static_round_trip() {
                let mut desired = config("eth1", true);
                desired.method = Method::Static;
                desired.ipaddr = Some("172.16.1.10/20".parse().unwrap());
                desired.gateway = Some("172.16.0.1".parse().unwrap());
                desired.mtu = Some(1450);

                let text = $provider
                    .format_file(Path::new("filepath"), &[desired.clone()])
                    .unwrap();
                let parsed = $provider.parse_file(&desired.name, &text).unwrap();
                assert_eq!(parsed.len(), 1);
                assert_eq!(parsed[0].ipaddr, desired.ipaddr);
                assert_eq!(parsed[0].gateway, desired.gateway);
                assert_eq!(parsed[0].mtu, desired.mtu);
                assert_eq!(parsed[0].method, Method::Static);
            }
        }
    };
}

pub(crate) use provider_tests;
