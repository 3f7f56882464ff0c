//! Error types for option input and configuration validation.

use std::fmt;

use crate::value::TargetOs;

/// Errors caused by malformed caller input.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// The flag identifier is not in the registry.
    #[error("unknown option: {name}")]
    UnknownFlag { name: String },

    /// The value kind does not fit the flag.
    #[error("option '{flag}' expects a {expected} value, got '{found}'")]
    TypeMismatch {
        flag: String,
        expected: &'static str,
        found: String,
    },

    /// A `key=value` assignment could not be split.
    #[error("malformed option assignment '{input}' (expected key=value)")]
    MalformedAssignment { input: String },

    /// The target operating system is not in the closed set.
    #[error("unknown target operating system: {name}")]
    UnknownTarget { name: String },
}

/// Result type for option input handling.
pub type Result<T> = std::result::Result<T, OptionsError>;

/// Coarse classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    InvalidValue,
    UnsupportedPlatform,
}

/// A single failed validation check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A scalar flag fails its declared constraint.
    #[error("{flag} must be {constraint}, got '{value}'")]
    InvalidValue {
        flag: String,
        value: String,
        constraint: &'static str,
    },

    /// A flag is enabled (or requested) on a target it does not support.
    #[error("{flag} is only supported for {required}, not {target}")]
    UnsupportedPlatform {
        flag: String,
        required: TargetOs,
        target: TargetOs,
    },

    /// The target itself is not a supported build host.
    #[error("celix is only supported for {supported}, not {target}")]
    UnsupportedTarget { target: TargetOs, supported: String },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::InvalidValue { .. } => ViolationKind::InvalidValue,
            Violation::UnsupportedPlatform { .. } | Violation::UnsupportedTarget { .. } => {
                ViolationKind::UnsupportedPlatform
            }
        }
    }
}

/// Aggregated validation failure. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    violations: Vec<Violation>,
}

impl ConfigError {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        ConfigError { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation is of the given kind.
    pub fn has_kind(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind() == kind)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration")?;
        for (i, v) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_every_violation() {
        let err = ConfigError::new(vec![
            Violation::InvalidValue {
                flag: "celix_err_buffer_size".into(),
                value: "-1".into(),
                constraint: "a positive integer",
            },
            Violation::UnsupportedPlatform {
                flag: "build_shell_bonjour".into(),
                required: TargetOs::Linux,
                target: TargetOs::Macos,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("celix_err_buffer_size must be a positive integer, got '-1'"));
        assert!(msg.contains("build_shell_bonjour is only supported for linux, not macos"));
        assert!(err.has_kind(ViolationKind::InvalidValue));
        assert!(err.has_kind(ViolationKind::UnsupportedPlatform));
    }

    #[test]
    fn unsupported_target_is_a_platform_violation() {
        let v = Violation::UnsupportedTarget {
            target: TargetOs::Windows,
            supported: "linux, macos".into(),
        };
        assert_eq!(v.kind(), ViolationKind::UnsupportedPlatform);
    }
}
