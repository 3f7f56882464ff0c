//! User-supplied option overrides.

use std::collections::BTreeMap;

use crate::error::{OptionsError, Result};
use crate::registry::{Catalog, FlagKind};
use crate::resolve::ResolvedConfiguration;
use crate::value::{parse_switch, FlagValue};

/// A validated set of explicit option values.
///
/// Every key is a registered flag and every value has the flag's kind, so a
/// resolver never sees caller errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    entries: BTreeMap<&'static str, FlagValue>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build overrides from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(catalog: &Catalog, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FlagValue>,
    {
        let mut overrides = Self::new();
        for (name, value) in pairs {
            overrides.set(catalog, name.as_ref(), value)?;
        }
        Ok(overrides)
    }

    /// Feed every value of a resolved configuration back as explicit input.
    pub fn from_configuration(config: &ResolvedConfiguration) -> Self {
        Overrides {
            entries: config.iter().map(|(name, v)| (name, v.clone())).collect(),
        }
    }

    /// Set one override, checking the name and coercing the value.
    ///
    /// Switches accept booleans and the usual textual spellings
    /// (`true`/`false`, `on`/`off`, `1`/`0`). Scalars accept any text; the
    /// constraint is enforced later by the validator.
    pub fn set(&mut self, catalog: &Catalog, name: &str, value: impl Into<FlagValue>) -> Result<()> {
        let def = catalog.flag(name).ok_or_else(|| OptionsError::UnknownFlag {
            name: name.to_string(),
        })?;
        let value = match (def.kind, value.into()) {
            (FlagKind::Switch { .. }, FlagValue::Switch(b)) => FlagValue::Switch(b),
            (FlagKind::Switch { .. }, FlagValue::Scalar(s)) => match parse_switch(&s) {
                Some(b) => FlagValue::Switch(b),
                None => {
                    return Err(OptionsError::TypeMismatch {
                        flag: def.name.to_string(),
                        expected: "switch",
                        found: s,
                    })
                }
            },
            (FlagKind::Scalar { .. }, FlagValue::Scalar(s)) => FlagValue::Scalar(s),
            (FlagKind::Scalar { .. }, v @ FlagValue::Switch(_)) => {
                return Err(OptionsError::TypeMismatch {
                    flag: def.name.to_string(),
                    expected: "scalar",
                    found: v.to_string(),
                })
            }
        };
        self.entries.insert(def.name, value);
        Ok(())
    }

    /// Parse and apply a `name=value` assignment.
    pub fn set_assignment(&mut self, catalog: &Catalog, assignment: &str) -> Result<()> {
        let (name, value) = assignment
            .split_once('=')
            .map(|(n, v)| (n.trim(), v.trim()))
            .filter(|(n, _)| !n.is_empty())
            .ok_or_else(|| OptionsError::MalformedAssignment {
                input: assignment.to_string(),
            })?;
        self.set(catalog, name, value)
    }

    /// Merge `other` over `self`; later values win.
    pub fn extend(&mut self, other: Overrides) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FlagValue)> + '_ {
        self.entries.iter().map(|(&k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
