//! `celix.toml` option profiles.
//!
//! A profile records the options a project builds Celix with:
//!
//! ```toml
//! [build]
//! target = "linux"
//!
//! [package]
//! version = "2.3.0"
//!
//! [options]
//! build_remote_shell = true
//! celix_err_buffer_size = 1024
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use celix_options::{Catalog, FlagValue, Overrides};

/// File name searched for when no profile is given.
pub const PROFILE_FILE: &str = "celix.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CelixProfile {
    #[serde(default)]
    pub build: Option<BuildSection>,
    #[serde(default)]
    pub package: Option<PackageSection>,
    /// Option overrides, by flag identifier.
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Target operating system.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageSection {
    /// Celix source version, split into CELIX_MAJOR/MINOR/MICRO.
    #[serde(default)]
    pub version: Option<String>,
}

impl CelixProfile {
    /// Search upward from `start_dir` for a `celix.toml` and load it.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(PROFILE_FILE);
            if candidate.is_file() {
                let profile = Self::load(&candidate)?;
                return Ok(Some((profile, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing celix.toml")
    }

    pub fn target(&self) -> Option<&str> {
        self.build.as_ref().and_then(|b| b.target.as_deref())
    }

    pub fn package_version(&self) -> Option<&str> {
        self.package.as_ref().and_then(|p| p.version.as_deref())
    }

    /// Convert the `[options]` table into checked overrides.
    pub fn overrides(&self, catalog: &Catalog) -> Result<Overrides> {
        let mut overrides = Overrides::new();
        for (name, value) in &self.options {
            let value = match value {
                toml::Value::Boolean(b) => FlagValue::Switch(*b),
                toml::Value::String(s) => FlagValue::Scalar(s.clone()),
                toml::Value::Integer(i) => FlagValue::Scalar(i.to_string()),
                other => bail!(
                    "option '{name}' has unsupported {} value in {PROFILE_FILE}",
                    other.type_str()
                ),
            };
            overrides.set(catalog, name, value)?;
        }
        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_profile() {
        let profile = CelixProfile::from_str(
            r#"
[build]
target = "macos"

[package]
version = "2.4.0"

[options]
build_shell_tui = true
celix_err_buffer_size = 1024
build_launcher = "on"
"#,
        )
        .unwrap();
        assert_eq!(profile.target(), Some("macos"));
        assert_eq!(profile.package_version(), Some("2.4.0"));
        let o = profile.overrides(Catalog::celix()).unwrap();
        assert_eq!(o.get("build_shell_tui"), Some(&FlagValue::Switch(true)));
        assert_eq!(o.get("build_launcher"), Some(&FlagValue::Switch(true)));
        assert_eq!(
            o.get("celix_err_buffer_size"),
            Some(&FlagValue::Scalar("1024".into()))
        );
    }

    #[test]
    fn empty_profile_is_valid() {
        let profile = CelixProfile::from_str("").unwrap();
        assert!(profile.target().is_none());
        assert!(profile.overrides(Catalog::celix()).unwrap().is_empty());
    }

    #[test]
    fn unknown_option_is_an_error() {
        let profile = CelixProfile::from_str("[options]\nbuild_warp_drive = true\n").unwrap();
        let err = profile.overrides(Catalog::celix()).unwrap_err();
        assert!(err.to_string().contains("build_warp_drive"));
    }

    #[test]
    fn array_values_are_rejected() {
        let profile = CelixProfile::from_str("[options]\nbuild_shell = [true]\n").unwrap();
        assert!(profile.overrides(Catalog::celix()).is_err());
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(CelixProfile::from_str("[options\nbuild_shell = ").is_err());
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROFILE_FILE),
            "[options]\nbuild_shell = true\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (profile, path) = CelixProfile::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(path, dir.path().join(PROFILE_FILE));
        assert_eq!(profile.options.len(), 1);
    }
}
