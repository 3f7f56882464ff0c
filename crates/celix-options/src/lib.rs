//! Build option resolution and identity for Apache Celix.
//!
//! Turns a partial set of user-chosen build options into a complete,
//! consistent configuration and a stable identity for artifact reuse.
//!
//! # Pipeline
//!
//! - **Registry** ([`registry`]): every recognised flag with its default.
//! - **Resolver** ([`resolve`]): defaults, explicit overrides, `build_all`,
//!   the ordered implication cascade ([`rules`]) and finally the platform
//!   constraints ([`platform`]).
//! - **Validator** ([`validate`]): scalar and platform checks, aggregated.
//! - **Normalizer** ([`identity`]): drops flags that cannot change the
//!   installed artifacts and hashes the rest.
//!
//! ```
//! use celix_options::{normalize, resolve, validate, Catalog, Overrides, TargetOs};
//!
//! let overrides = Overrides::from_pairs(Catalog::celix(), [("build_remote_shell", true)]).unwrap();
//! let config = resolve(&overrides, TargetOs::Linux);
//! assert!(config.is_on("build_framework"));
//! validate(&config, TargetOs::Linux).unwrap();
//! let key = normalize(&config);
//! assert_eq!(key.digest().as_str().len(), 64);
//! ```

pub mod error;
pub mod identity;
pub mod overrides;
pub mod platform;
pub mod registry;
pub mod resolve;
pub mod rules;
pub mod validate;
pub mod value;

pub use error::{ConfigError, OptionsError, Result, Violation, ViolationKind};
pub use identity::{normalize, IdentityDigest, IdentityKey, Normalizer};
pub use overrides::Overrides;
pub use registry::{Catalog, CatalogTables, FlagDef, FlagKind, ScalarConstraint};
pub use resolve::{resolve, Origin, ResolvedConfiguration, Resolver};
pub use rules::{lint_rule_order, ImplicationRule, OrderHazard, Trigger};
pub use validate::{validate, Validator};
pub use value::{FlagValue, TargetOs};
