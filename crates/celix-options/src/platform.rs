//! Platform constraints and platform requirements.
//!
//! Constraints run after the implication cascade and are the only step that
//! switches a flag off. Requirements are read by the validator.

use serde::Serialize;

use crate::value::TargetOs;

/// Which targets a constraint applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "match", content = "os", rename_all = "kebab-case")]
pub enum OsMatch {
    Is(TargetOs),
    IsNot(TargetOs),
}

impl OsMatch {
    pub fn matches(&self, target: TargetOs) -> bool {
        match *self {
            OsMatch::Is(os) => os == target,
            OsMatch::IsNot(os) => os != target,
        }
    }
}

/// Forces `flag` to `value` on every matching target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformConstraint {
    pub name: &'static str,
    pub applies_to: OsMatch,
    pub flag: &'static str,
    pub value: bool,
}

/// A feature that can only be built on one operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformRequirement {
    pub flag: &'static str,
    pub requires: TargetOs,
}

pub const CONSTRAINTS: &[PlatformConstraint] = &[
    PlatformConstraint {
        name: "shm-v2-linux-only",
        applies_to: OsMatch::IsNot(TargetOs::Linux),
        flag: "build_rsa_remote_service_admin_shm_v2",
        value: false,
    },
    PlatformConstraint {
        name: "zeroconf-linux-only",
        applies_to: OsMatch::IsNot(TargetOs::Linux),
        flag: "build_rsa_discovery_zeroconf",
        value: false,
    },
    PlatformConstraint {
        name: "bonjour-linux-only",
        applies_to: OsMatch::IsNot(TargetOs::Linux),
        flag: "build_shell_bonjour",
        value: false,
    },
];

pub const REQUIREMENTS: &[PlatformRequirement] = &[
    PlatformRequirement {
        flag: "build_rsa_remote_service_admin_shm_v2",
        requires: TargetOs::Linux,
    },
    PlatformRequirement {
        flag: "build_rsa_discovery_zeroconf",
        requires: TargetOs::Linux,
    },
    PlatformRequirement {
        flag: "build_shell_bonjour",
        requires: TargetOs::Linux,
    },
];

/// Targets Celix can be built for at all.
pub const SUPPORTED_TARGETS: &[TargetOs] = &[TargetOs::Linux, TargetOs::Macos];
