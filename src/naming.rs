//! Naming policies: field identifier → flag, environment and command names.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use serde::{Deserialize, Serialize};

/// Case conversion applied to a field identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    /// Identifier used as written
    #[default]
    Unchanged,
    /// `listenaddr`
    Lower,
    /// `LISTENADDR`
    Upper,
    /// `listenAddr`
    CamelLower,
    /// `ListenAddr`
    CamelUpper,
    /// `listen_addr`
    SnakeLower,
    /// `LISTEN_ADDR`
    SnakeUpper,
    /// `listen-addr`
    KebabLower,
    /// `LISTEN-ADDR`
    KebabUpper,
}

impl Case {
    /// Convert `ident` to this case
    pub fn apply(self, ident: &str) -> String {
        match self {
            Case::Unchanged => ident.to_string(),
            Case::Lower => ident.to_lowercase(),
            Case::Upper => ident.to_uppercase(),
            Case::CamelLower => ident.to_lower_camel_case(),
            Case::CamelUpper => ident.to_upper_camel_case(),
            Case::SnakeLower => ident.to_snake_case(),
            Case::SnakeUpper => ident.to_shouty_snake_case(),
            Case::KebabLower => ident.to_kebab_case(),
            Case::KebabUpper => ident.to_shouty_kebab_case(),
        }
    }
}

/// Joins a namespace prefix and a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Splicer {
    /// `listen.addr`
    #[default]
    Dot,
    /// `listen-addr`
    Dash,
    /// `listen_addr`
    Underscore,
    /// `listenaddr`
    Concat,
}

impl Splicer {
    /// Join `prefix` and `name`; an empty prefix leaves `name` untouched
    pub fn splice(self, prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            return name.to_string();
        }
        let sep = match self {
            Splicer::Dot => ".",
            Splicer::Dash => "-",
            Splicer::Underscore => "_",
            Splicer::Concat => "",
        };
        format!("{prefix}{sep}{name}")
    }
}
