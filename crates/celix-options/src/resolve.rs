//! The resolver: defaults, overrides, bulk enable, cascade, platform.
//!
//! Resolution is a pure function of the overrides, the target and the
//! catalog. It runs in a single pass:
//!
//! 1. every flag starts at its registry default;
//! 2. overrides are applied and remembered as explicit requests;
//! 3. if the umbrella flag (`build_all`) is explicitly on, every feature
//!    flag is switched on;
//! 4. implication rules run once, in order, each seeing the effects of the
//!    rules above it;
//! 5. platform constraints for the target are applied last and win over
//!    everything before them.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::overrides::Overrides;
use crate::registry::Catalog;
use crate::value::{FlagValue, TargetOs};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Origin {
    Default,
    Explicit,
    /// Switched on by the umbrella flag.
    Bulk,
    Implied { rule: &'static str },
    Platform { constraint: &'static str },
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Default => f.write_str("default"),
            Origin::Explicit => f.write_str("explicit"),
            Origin::Bulk => f.write_str("build_all"),
            Origin::Implied { rule } => write!(f, "rule {rule}"),
            Origin::Platform { constraint } => write!(f, "platform {constraint}"),
        }
    }
}

/// A complete assignment of every registered flag.
///
/// Equality and serialization cover the target and the values only; origins
/// and explicit requests are provenance kept for validation and reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfiguration {
    target: TargetOs,
    options: BTreeMap<&'static str, FlagValue>,
    #[serde(skip)]
    origins: BTreeMap<&'static str, Origin>,
    #[serde(skip)]
    requested: BTreeMap<&'static str, FlagValue>,
}

impl ResolvedConfiguration {
    pub fn target(&self) -> TargetOs {
        self.target
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.options.get(name)
    }

    /// Whether a switch is on. Unknown names and scalars read as off.
    pub fn is_on(&self, name: &str) -> bool {
        self.options.get(name).is_some_and(FlagValue::is_on)
    }

    pub fn origin(&self, name: &str) -> Option<Origin> {
        self.origins.get(name).copied()
    }

    /// The value the caller explicitly asked for, if any.
    pub fn requested(&self, name: &str) -> Option<&FlagValue> {
        self.requested.get(name)
    }

    /// All flags with their values, ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FlagValue)> + '_ {
        self.options.iter().map(|(&k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl PartialEq for ResolvedConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.options == other.options
    }
}

impl Eq for ResolvedConfiguration {}

/// Working state threaded through the single pass.
struct Working {
    options: BTreeMap<&'static str, FlagValue>,
    origins: BTreeMap<&'static str, Origin>,
}

impl Working {
    fn from_defaults(catalog: &Catalog) -> Self {
        let mut options = BTreeMap::new();
        let mut origins = BTreeMap::new();
        for flag in catalog.flags() {
            options.insert(flag.name, flag.default_value());
            origins.insert(flag.name, Origin::Default);
        }
        Working { options, origins }
    }

    fn is_on(&self, name: &str) -> bool {
        self.options.get(name).is_some_and(FlagValue::is_on)
    }

    fn set(&mut self, name: &'static str, value: FlagValue, origin: Origin) {
        self.options.insert(name, value);
        self.origins.insert(name, origin);
    }

    /// Switch a flag on, keeping the earlier origin if it already was.
    fn force_on(&mut self, name: &'static str, origin: Origin) -> bool {
        if self.is_on(name) {
            return false;
        }
        self.set(name, FlagValue::Switch(true), origin);
        true
    }
}

/// Resolves overrides against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'c> {
    catalog: &'c Catalog,
}

impl<'c> Resolver<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Resolver { catalog }
    }

    pub fn resolve(&self, overrides: &Overrides, target: TargetOs) -> ResolvedConfiguration {
        let catalog = self.catalog;
        let mut work = Working::from_defaults(catalog);

        for (name, value) in overrides.iter() {
            work.set(name, value.clone(), Origin::Explicit);
        }

        if let Some(umbrella) = catalog.umbrella() {
            if overrides.get(umbrella).is_some_and(FlagValue::is_on) {
                let mut count = 0usize;
                for flag in catalog.flags().iter().filter(|f| catalog.is_feature(f)) {
                    if work.force_on(flag.name, Origin::Bulk) {
                        count += 1;
                    }
                }
                debug!(umbrella, count, "bulk-enabled feature flags");
            }
        }

        for rule in catalog.rules() {
            if !rule.when.holds(|f| work.is_on(f)) {
                continue;
            }
            for &flag in rule.then {
                if work.force_on(flag, Origin::Implied { rule: rule.name }) {
                    trace!(rule = rule.name, flag, "implied");
                }
            }
        }

        for constraint in catalog.constraints() {
            if !constraint.applies_to.matches(target) {
                continue;
            }
            let forced = FlagValue::Switch(constraint.value);
            if work.options.get(constraint.flag) != Some(&forced) {
                debug!(
                    constraint = constraint.name,
                    flag = constraint.flag,
                    value = constraint.value,
                    %target,
                    "platform constraint overrides resolved value"
                );
                work.set(
                    constraint.flag,
                    forced,
                    Origin::Platform {
                        constraint: constraint.name,
                    },
                );
            }
        }

        ResolvedConfiguration {
            target,
            options: work.options,
            origins: work.origins,
            requested: overrides.iter().map(|(k, v)| (k, v.clone())).collect(),
        }
    }

    /// Resolve the same overrides for several targets.
    ///
    /// Each target is resolved on its own scoped thread; results come back in
    /// the order of `targets`.
    pub fn resolve_many(
        &self,
        overrides: &Overrides,
        targets: &[TargetOs],
    ) -> Vec<ResolvedConfiguration> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = targets
                .iter()
                .map(|&target| scope.spawn(move || self.resolve(overrides, target)))
                .collect();
            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(config) => config,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

/// Resolve against the Celix catalog.
pub fn resolve(overrides: &Overrides, target: TargetOs) -> ResolvedConfiguration {
    Resolver::new(Catalog::celix()).resolve(overrides, target)
}
