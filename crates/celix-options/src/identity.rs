//! Identity keys for artifact reuse.
//!
//! An identity key is the part of a resolved configuration that can change
//! the installed artifacts. Flags that only steer tests, examples, CI or
//! developer tooling are dropped, so configurations that differ only in those
//! flags share one key and one cached package.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::registry::Catalog;
use crate::resolve::ResolvedConfiguration;
use crate::value::{FlagValue, TargetOs};

/// Flags that never reach the installed package.
pub const IDENTITY_EXCLUSIONS: &[&str] = &[
    "build_all",
    // built but not installed
    "build_pubsub_integration",
    "build_pubsub_examples",
    "build_cxx_rsa_integration",
    "build_examples",
    "build_shell_bonjour",
    "enable_testing_dependency_manager_for_cxx11",
    "enable_testing_for_cxx14",
    "enable_cmake_warning_tests",
    "enable_testing_on_ci",
    "enable_ccache",
];

/// Ordered, reduced view of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IdentityKey {
    target: TargetOs,
    options: BTreeMap<&'static str, FlagValue>,
}

impl IdentityKey {
    pub fn target(&self) -> TargetOs {
        self.target
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.options.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FlagValue)> + '_ {
        self.options.iter().map(|(&k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Compact JSON with keys in identifier order.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).expect("identity key serialization should not fail")
    }

    /// SHA-256 of the canonical serialization.
    pub fn digest(&self) -> IdentityDigest {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_json().as_bytes());
        let hash = hasher.finalize();
        IdentityDigest(hash.iter().map(|b| format!("{b:02x}")).collect())
    }
}

/// Lowercase hex SHA-256 of an identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IdentityDigest(String);

impl IdentityDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'c> {
    catalog: &'c Catalog,
}

impl<'c> Normalizer<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Normalizer { catalog }
    }

    pub fn normalize(&self, config: &ResolvedConfiguration) -> IdentityKey {
        IdentityKey {
            target: config.target(),
            options: config
                .iter()
                .filter(|(name, _)| !self.catalog.is_identity_excluded(name))
                .map(|(name, value)| (name, value.clone()))
                .collect(),
        }
    }
}

/// Normalize against the Celix catalog.
pub fn normalize(config: &ResolvedConfiguration) -> IdentityKey {
    Normalizer::new(Catalog::celix()).normalize(config)
}
