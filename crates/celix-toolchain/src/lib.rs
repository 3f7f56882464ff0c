//! Projection of resolved Celix options for the outside world.
//!
//! Nothing here resolves anything: a [`Projection`] is a pure function of a
//! resolved configuration and the package version, consumed by the package
//! manager (requirements) and the build generator (cache variables).

pub mod error;
pub mod requirements;
pub mod variables;
pub mod version;

use serde::Serialize;

use celix_options::ResolvedConfiguration;

pub use error::{Result, ToolchainError};
pub use requirements::{requirements, Requirement, Scope};
pub use variables::{exe_linker_flags, ToolchainVariables};
pub use version::{VersionComponents, PACKAGE_VERSION};

/// Everything the external collaborators need from one configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    pub requirements: Vec<Requirement>,
    pub variables: ToolchainVariables,
}

impl Projection {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Project a configuration for the given package version.
pub fn project(config: &ResolvedConfiguration, version: &str) -> Result<Projection> {
    let version = VersionComponents::parse(version)?;
    let requirements = requirements(config);
    let variables = ToolchainVariables::from_configuration(config, &requirements, version);
    Ok(Projection {
        requirements,
        variables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use celix_options::{resolve, Overrides, TargetOs};

    #[test]
    fn project_defaults() {
        let config = resolve(&Overrides::new(), TargetOs::Linux);
        let p = project(&config, PACKAGE_VERSION).unwrap();
        assert_eq!(p.requirements.len(), 1);
        assert_eq!(p.variables.get("BUILD_ALL"), Some("OFF"));
        let json = p.to_json().unwrap();
        assert!(json.contains("\"override\": true"));
    }

    #[test]
    fn bad_version_fails() {
        let config = resolve(&Overrides::new(), TargetOs::Linux);
        assert!(matches!(
            project(&config, "two"),
            Err(ToolchainError::Version { .. })
        ));
    }
}
