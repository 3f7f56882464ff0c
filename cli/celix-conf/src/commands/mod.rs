//! CLI command implementations.

pub mod flags;
pub mod identity;
pub mod resolve;
pub mod rules;
pub mod toolchain;
pub mod validate;

use anyhow::{bail, Context, Result};

use celix_options::{Catalog, Overrides, ResolvedConfiguration, Resolver, TargetOs, Validator};
use celix_toolchain::PACKAGE_VERSION;

use crate::profile::CelixProfile;

/// Output format shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn parse(s: Option<&str>) -> Result<Self> {
        match s.unwrap_or("text") {
            "text" | "human" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            other => bail!("unknown format: '{other}' (expected text or json)"),
        }
    }
}

/// Everything a command needs to resolve a configuration: the merged
/// overrides, the target and the package version.
#[derive(Debug, Clone)]
pub struct Session {
    pub catalog: &'static Catalog,
    pub overrides: Overrides,
    pub target: TargetOs,
    pub package_version: String,
}

impl Session {
    /// Merge profile settings with command-line settings. Command-line
    /// values win; options given on both are taken from the command line.
    pub fn build(
        profile: Option<&CelixProfile>,
        target: Option<&str>,
        options: &[String],
        package_version: Option<&str>,
    ) -> Result<Self> {
        let catalog = Catalog::celix();

        let mut overrides = match profile {
            Some(p) => p.overrides(catalog)?,
            None => Overrides::new(),
        };
        let mut cli = Overrides::new();
        for assignment in options {
            cli.set_assignment(catalog, assignment)
                .with_context(|| format!("in option '{assignment}'"))?;
        }
        overrides.extend(cli);

        let target = match target.or_else(|| profile.and_then(CelixProfile::target)) {
            Some(name) => name.parse::<TargetOs>()?,
            None => host_target()?,
        };

        let package_version = package_version
            .or_else(|| profile.and_then(CelixProfile::package_version))
            .unwrap_or(PACKAGE_VERSION)
            .to_string();

        tracing::debug!(
            %target,
            overrides = overrides.len(),
            %package_version,
            "session ready"
        );
        Ok(Session {
            catalog,
            overrides,
            target,
            package_version,
        })
    }

    pub fn resolve(&self) -> ResolvedConfiguration {
        Resolver::new(self.catalog).resolve(&self.overrides, self.target)
    }

    /// Resolve and refuse to go on with a configuration that fails validation.
    pub fn resolve_valid(&self) -> Result<ResolvedConfiguration> {
        let config = self.resolve();
        Validator::new(self.catalog).validate(&config, self.target)?;
        Ok(config)
    }
}

fn host_target() -> Result<TargetOs> {
    std::env::consts::OS
        .parse()
        .context("cannot infer the target from the host; pass --target")
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn session(target: TargetOs, options: &[&str]) -> Session {
        let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        Session::build(None, Some(target.as_str()), &options, None).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_formats() {
        assert_eq!(Format::parse(None).unwrap(), Format::Text);
        assert_eq!(Format::parse(Some("json")).unwrap(), Format::Json);
        assert!(Format::parse(Some("yaml")).is_err());
    }

    #[test]
    fn command_line_beats_profile() {
        let profile: CelixProfile = toml::from_str(
            r#"
[build]
target = "macos"

[package]
version = "2.4.1"

[options]
build_shell = true
enable_testing = true
"#,
        )
        .unwrap();
        let session = Session::build(
            Some(&profile),
            Some("linux"),
            &["enable_testing=false".to_string()],
            None,
        )
        .unwrap();
        assert_eq!(session.target, TargetOs::Linux);
        assert_eq!(session.package_version, "2.4.1");
        assert!(session.overrides.get("build_shell").unwrap().is_on());
        assert!(!session.overrides.get("enable_testing").unwrap().is_on());
    }

    #[test]
    fn profile_target_is_used() {
        let profile: CelixProfile = toml::from_str("[build]\ntarget = \"macos\"\n").unwrap();
        let session = Session::build(Some(&profile), None, &[], None).unwrap();
        assert_eq!(session.target, TargetOs::Macos);
        assert_eq!(session.package_version, PACKAGE_VERSION);
    }

    #[test]
    fn bad_assignment_names_the_input() {
        let err = Session::build(None, Some("linux"), &["build_shell".to_string()], None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("build_shell"));
    }

    #[test]
    fn unknown_target_is_rejected() {
        assert!(Session::build(None, Some("amiga"), &[], None).is_err());
    }
}
