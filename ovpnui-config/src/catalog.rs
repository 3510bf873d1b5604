//! Known-directive catalog
//!
//! The fixed set of directive names the model recognizes. Anything else in a
//! document is retained verbatim but never indexed.

/// Value-bearing directives with an illustrative default value
pub const VALUE_DIRECTIVES: &[(&str, &str)] = &[
    ("dev", "tun"),
    ("dev-node", "MyTap"),
    ("proto", "udp"),
    ("remote", "my-server-1 1194"),
    ("http-proxy", "[proxy server] [proxy port #]"),
    ("resolv-retry", "infinite"),
    ("user", "nobody"),
    ("group", "nogroup"),
    ("ns-cert-type", "server"),
    ("tls-auth", "ta.key 1"),
    ("cipher", "x"),
    ("verb", "3"),
    ("mute", "20"),
    ("tun-mtu", "1500"),
    ("route-delay", "0"),
];

/// Flag-only directives
pub const FLAG_DIRECTIVES: &[&str] = &[
    "client",
    "remote-random",
    "nobind",
    "persist-key",
    "persist-tun",
    "mute-replay-warnings",
    "comp-lzo",
    "redirect-gateway",
    "auth-user-pass",
    "auth-nocache",
    "float",
];

/// Directive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `name value`
    Value,
    /// `name`
    Flag,
}

/// Look up the kind of a catalog directive
pub fn kind_of(name: &str) -> Option<DirectiveKind> {
    if VALUE_DIRECTIVES.iter().any(|(n, _)| *n == name) {
        Some(DirectiveKind::Value)
    } else if FLAG_DIRECTIVES.contains(&name) {
        Some(DirectiveKind::Flag)
    } else {
        None
    }
}

/// Catalog default for a value directive
pub fn default_value(name: &str) -> Option<&'static str> {
    VALUE_DIRECTIVES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, default)| *default)
}
