//! Cache variables handed to the external build generator.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use celix_options::{FlagValue, ResolvedConfiguration, TargetOs};

use crate::requirements::{Requirement, Scope};
use crate::version::VersionComponents;

/// Linker flags that let executables leave symbols for bundles to resolve.
pub fn exe_linker_flags(target: TargetOs) -> Option<&'static str> {
    match target {
        TargetOs::Linux => Some("-Wl,--unresolved-symbols=ignore-in-shared-libs"),
        TargetOs::Macos => Some("-Wl,-undefined -Wl,dynamic_lookup"),
        TargetOs::Windows | TargetOs::FreeBsd => None,
    }
}

/// Flat, ordered `NAME -> value` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ToolchainVariables(BTreeMap<String, String>);

impl ToolchainVariables {
    /// Project a configuration into generator variables.
    ///
    /// Every option appears upper-cased; switches become `ON`/`OFF` and
    /// scalars are passed through.
    pub fn from_configuration(
        config: &ResolvedConfiguration,
        requirements: &[Requirement],
        version: VersionComponents,
    ) -> Self {
        let mut vars = BTreeMap::new();
        for (name, value) in config.iter() {
            let encoded = match value {
                FlagValue::Switch(true) => "ON".to_string(),
                FlagValue::Switch(false) => "OFF".to_string(),
                FlagValue::Scalar(s) => s.clone(),
            };
            vars.insert(name.to_ascii_uppercase(), encoded);
        }

        let mdns = requirements
            .iter()
            .any(|r| r.scope == Scope::Host && r.name() == "mdnsresponder");
        if config.is_on("enable_testing") && mdns {
            vars.insert("BUILD_ERROR_INJECTOR_MDNSRESPONDER".into(), "ON".into());
        }

        if let Some(flags) = exe_linker_flags(config.target()) {
            vars.insert("CMAKE_EXE_LINKER_FLAGS".into(), flags.into());
        }

        for (name, value) in version.variables() {
            vars.insert(name.into(), value);
        }
        ToolchainVariables(vars)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a CMake initial-cache script (`cmake -C <file>`).
    pub fn to_cmake_cache(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.0 {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            let _ = writeln!(out, "set({name} \"{escaped}\" CACHE STRING \"\" FORCE)");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::requirements;
    use celix_options::{resolve, Catalog, Overrides};

    fn vars(pairs: &[(&str, bool)], target: TargetOs) -> ToolchainVariables {
        let o = Overrides::from_pairs(Catalog::celix(), pairs.iter().copied()).unwrap();
        let config = resolve(&o, target);
        let reqs = requirements(&config);
        ToolchainVariables::from_configuration(
            &config,
            &reqs,
            VersionComponents::parse("2.3.0").unwrap(),
        )
    }

    #[test]
    fn options_are_upper_cased() {
        let v = vars(&[("build_shell", true)], TargetOs::Linux);
        assert_eq!(v.get("BUILD_SHELL"), Some("ON"));
        assert_eq!(v.get("BUILD_PUBSUB"), Some("OFF"));
        assert_eq!(v.get("CELIX_ERR_BUFFER_SIZE"), Some("512"));
        assert!(v.get("build_shell").is_none());
    }

    #[test]
    fn linker_flags_switch_on_target() {
        let linux = vars(&[], TargetOs::Linux);
        assert_eq!(
            linux.get("CMAKE_EXE_LINKER_FLAGS"),
            Some("-Wl,--unresolved-symbols=ignore-in-shared-libs")
        );
        let macos = vars(&[], TargetOs::Macos);
        assert_eq!(
            macos.get("CMAKE_EXE_LINKER_FLAGS"),
            Some("-Wl,-undefined -Wl,dynamic_lookup")
        );
        assert!(vars(&[], TargetOs::Windows).get("CMAKE_EXE_LINKER_FLAGS").is_none());
    }

    #[test]
    fn version_components_are_exported() {
        let v = vars(&[], TargetOs::Linux);
        assert_eq!(v.get("CELIX_MAJOR"), Some("2"));
        assert_eq!(v.get("CELIX_MINOR"), Some("3"));
        assert_eq!(v.get("CELIX_MICRO"), Some("0"));
    }

    #[test]
    fn mdns_error_injector_needs_testing() {
        let plain = vars(&[("build_shell_bonjour", true)], TargetOs::Linux);
        assert!(plain.get("BUILD_ERROR_INJECTOR_MDNSRESPONDER").is_none());
        let tested = vars(
            &[("build_shell_bonjour", true), ("enable_testing", true)],
            TargetOs::Linux,
        );
        assert_eq!(tested.get("BUILD_ERROR_INJECTOR_MDNSRESPONDER"), Some("ON"));
    }

    #[test]
    fn cmake_cache_escapes_quotes() {
        let mut v = ToolchainVariables::default();
        v.0.insert("X".into(), "a \"b\"".into());
        assert_eq!(
            v.to_cmake_cache(),
            "set(X \"a \\\"b\\\"\" CACHE STRING \"\" FORCE)\n"
        );
    }
}
