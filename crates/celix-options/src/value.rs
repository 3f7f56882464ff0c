//! Flag values and build targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// The concrete value of a flag.
///
/// Switches hold a boolean; scalars hold the raw string the user supplied,
/// which is checked against the flag's constraint by the validator rather
/// than at input time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Switch(bool),
    Scalar(String),
}

impl FlagValue {
    /// True only for `Switch(true)`. Scalars never count as enabled.
    pub fn is_on(&self) -> bool {
        matches!(self, FlagValue::Switch(true))
    }

    /// The scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FlagValue::Scalar(s) => Some(s),
            FlagValue::Switch(_) => None,
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FlagValue::Switch(_) => "switch",
            FlagValue::Scalar(_) => "scalar",
        }
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        FlagValue::Switch(b)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        FlagValue::Scalar(s.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> Self {
        FlagValue::Scalar(s)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Switch(b) => write!(f, "{b}"),
            FlagValue::Scalar(s) => write!(f, "{s}"),
        }
    }
}

/// Parse the textual spellings accepted for a switch: `true`/`false`,
/// `on`/`off`, `1`/`0`, case-insensitive.
pub fn parse_switch(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// The operating system a configuration is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Linux,
    Macos,
    Windows,
    #[serde(rename = "freebsd")]
    FreeBsd,
}

impl TargetOs {
    /// Every target, in declaration order.
    pub const ALL: [TargetOs; 4] = [
        TargetOs::Linux,
        TargetOs::Macos,
        TargetOs::Windows,
        TargetOs::FreeBsd,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Linux => "linux",
            TargetOs::Macos => "macos",
            TargetOs::Windows => "windows",
            TargetOs::FreeBsd => "freebsd",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetOs {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(TargetOs::Linux),
            "macos" | "darwin" | "osx" => Ok(TargetOs::Macos),
            "windows" | "win32" => Ok(TargetOs::Windows),
            "freebsd" => Ok(TargetOs::FreeBsd),
            _ => Err(OptionsError::UnknownTarget {
                name: s.to_string(),
            }),
        }
    }
}
