//! Read-only validation of resolved configurations.
//!
//! Every check runs; failures are collected into one [`ConfigError`].

use tracing::debug;

use crate::error::{ConfigError, Violation};
use crate::platform::SUPPORTED_TARGETS;
use crate::registry::{Catalog, FlagKind};
use crate::resolve::ResolvedConfiguration;
use crate::value::{FlagValue, TargetOs};

#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    catalog: &'c Catalog,
}

impl<'c> Validator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Validator { catalog }
    }

    pub fn validate(
        &self,
        config: &ResolvedConfiguration,
        target: TargetOs,
    ) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if !SUPPORTED_TARGETS.contains(&target) {
            violations.push(Violation::UnsupportedTarget {
                target,
                supported: SUPPORTED_TARGETS
                    .iter()
                    .map(TargetOs::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        for flag in self.catalog.flags() {
            let FlagKind::Scalar { constraint, .. } = flag.kind else {
                continue;
            };
            let raw = config.get(flag.name).and_then(FlagValue::as_scalar);
            match raw {
                Some(raw) if constraint.accepts(raw) => {}
                _ => violations.push(Violation::InvalidValue {
                    flag: flag.name.to_string(),
                    value: raw.unwrap_or_default().to_string(),
                    constraint: constraint.describe(),
                }),
            }
        }

        // A platform constraint may already have switched the flag off, so an
        // explicit request counts as well.
        for req in self.catalog.requirements() {
            let wanted = config.is_on(req.flag)
                || config.requested(req.flag).is_some_and(FlagValue::is_on);
            if wanted && target != req.requires {
                violations.push(Violation::UnsupportedPlatform {
                    flag: req.flag.to_string(),
                    required: req.requires,
                    target,
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            debug!(count = violations.len(), %target, "configuration rejected");
            Err(ConfigError::new(violations))
        }
    }
}

/// Validate against the Celix catalog.
pub fn validate(config: &ResolvedConfiguration, target: TargetOs) -> Result<(), ConfigError> {
    Validator::new(Catalog::celix()).validate(config, target)
}
