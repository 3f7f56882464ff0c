//! Package version split into the components the build generator expects.

use serde::Serialize;

use crate::error::{Result, ToolchainError};

/// Version of the Celix sources the options describe.
pub const PACKAGE_VERSION: &str = "2.3.0";

/// Major, minor and micro parts of a package version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionComponents {
    pub major: u64,
    pub minor: u64,
    pub micro: u64,
}

impl VersionComponents {
    /// Parse a semantic version like "2.3.0". Pre-release and build
    /// metadata are accepted and dropped.
    pub fn parse(input: &str) -> Result<Self> {
        let v = semver::Version::parse(input.trim()).map_err(|source| ToolchainError::Version {
            input: input.to_string(),
            source,
        })?;
        Ok(VersionComponents {
            major: v.major,
            minor: v.minor,
            micro: v.patch,
        })
    }

    /// `(name, value)` pairs for the generator cache.
    pub fn variables(&self) -> [(&'static str, String); 3] {
        [
            ("CELIX_MAJOR", self.major.to_string()),
            ("CELIX_MINOR", self.minor.to_string()),
            ("CELIX_MICRO", self.micro.to_string()),
        ]
    }
}
