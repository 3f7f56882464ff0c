//! The flag registry and the immutable catalog built around it.
//!
//! A [`Catalog`] bundles the flag registry with the implication rules,
//! platform constraints, platform requirements and identity exclusions that
//! operate on it. The tables are cross-checked once when the catalog is
//! built; a table that names an unknown flag is a programming defect and
//! aborts the process instead of surfacing as a runtime error.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::identity::IDENTITY_EXCLUSIONS;
use crate::platform::{PlatformConstraint, PlatformRequirement, CONSTRAINTS, REQUIREMENTS};
use crate::rules::{ImplicationRule, RULES};
use crate::value::FlagValue;

/// Constraint on a scalar flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarConstraint {
    PositiveInteger,
}

impl ScalarConstraint {
    /// Human-readable description used in validation messages.
    pub fn describe(&self) -> &'static str {
        match self {
            ScalarConstraint::PositiveInteger => "a positive integer",
        }
    }

    /// Check a raw scalar against the constraint.
    ///
    /// Positive integers are unbounded: an optional `+` followed by decimal
    /// digits that are not all zero.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            ScalarConstraint::PositiveInteger => {
                let raw = raw.trim();
                let digits = raw.strip_prefix('+').unwrap_or(raw);
                !digits.is_empty()
                    && digits.bytes().all(|b| b.is_ascii_digit())
                    && digits.bytes().any(|b| b != b'0')
            }
        }
    }
}

/// The type of a flag, with its declared default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Switch {
        default: bool,
    },
    Scalar {
        default: &'static str,
        constraint: ScalarConstraint,
    },
}

/// A registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDef {
    pub name: &'static str,
    pub kind: FlagKind,
}

impl FlagDef {
    pub const fn switch(name: &'static str, default: bool) -> Self {
        FlagDef {
            name,
            kind: FlagKind::Switch { default },
        }
    }

    pub const fn scalar(
        name: &'static str,
        default: &'static str,
        constraint: ScalarConstraint,
    ) -> Self {
        FlagDef {
            name,
            kind: FlagKind::Scalar {
                default,
                constraint,
            },
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.kind, FlagKind::Switch { .. })
    }

    pub fn default_value(&self) -> FlagValue {
        match self.kind {
            FlagKind::Switch { default } => FlagValue::Switch(default),
            FlagKind::Scalar { default, .. } => FlagValue::Scalar(default.to_string()),
        }
    }
}

/// Every recognised Celix build option.
pub const FLAGS: &[FlagDef] = &[
    FlagDef::switch("enable_testing", false),
    FlagDef::switch("enable_code_coverage", false),
    FlagDef::switch("enable_address_sanitizer", false),
    FlagDef::switch("enable_undefined_sanitizer", false),
    FlagDef::switch("enable_thread_sanitizer", false),
    FlagDef::switch("enable_testing_dependency_manager_for_cxx11", false),
    FlagDef::switch("enable_testing_for_cxx14", false),
    FlagDef::switch("build_all", false),
    FlagDef::switch("build_deployment_admin", false),
    FlagDef::switch("build_http_admin", false),
    FlagDef::switch("build_log_service", false),
    FlagDef::switch("build_log_helper", false),
    FlagDef::switch("build_log_service_api", false),
    FlagDef::switch("build_syslog_writer", false),
    FlagDef::switch("build_pubsub", false),
    FlagDef::switch("build_pubsub_wire_protocol_v1", false),
    FlagDef::switch("build_pubsub_wire_protocol_v2", false),
    FlagDef::switch("build_pubsub_json_serializer", false),
    FlagDef::switch("build_pubsub_avrobin_serializer", false),
    FlagDef::switch("build_pubsub_psa_zmq", false),
    FlagDef::switch("build_pubsub_examples", false),
    FlagDef::switch("build_pubsub_integration", false),
    FlagDef::switch("build_pubsub_psa_tcp", false),
    FlagDef::switch("build_pubsub_psa_udp_mc", false),
    FlagDef::switch("build_pubsub_psa_ws", false),
    FlagDef::switch("build_pubsub_discovery_etcd", false),
    FlagDef::switch("build_cxx_remote_service_admin", false),
    FlagDef::switch("build_cxx_rsa_integration", false),
    FlagDef::switch("build_remote_service_admin", false),
    FlagDef::switch("build_rsa_remote_service_admin_dfi", false),
    FlagDef::switch("build_rsa_discovery_common", false),
    FlagDef::switch("build_rsa_discovery_configured", false),
    FlagDef::switch("build_rsa_discovery_etcd", false),
    FlagDef::switch("build_rsa_remote_service_admin_shm_v2", false),
    FlagDef::switch("build_rsa_json_rpc", false),
    FlagDef::switch("build_rsa_discovery_zeroconf", false),
    FlagDef::switch("build_shell", false),
    FlagDef::switch("build_shell_api", false),
    FlagDef::switch("build_remote_shell", false),
    FlagDef::switch("build_shell_bonjour", false),
    FlagDef::switch("build_shell_tui", false),
    FlagDef::switch("build_shell_wui", false),
    FlagDef::switch("build_components_ready_check", false),
    FlagDef::switch("build_examples", false),
    FlagDef::switch("build_celix_etcdlib", false),
    FlagDef::switch("build_launcher", false),
    FlagDef::switch("build_promises", false),
    FlagDef::switch("build_pushstreams", false),
    FlagDef::switch("build_experimental", false),
    FlagDef::switch("build_celix_dfi", false),
    FlagDef::switch("build_dependency_manager", false),
    FlagDef::switch("build_dependency_manager_cxx", false),
    FlagDef::switch("build_framework", false),
    FlagDef::switch("build_rcm", false),
    FlagDef::switch("build_utils", false),
    FlagDef::switch("celix_cxx14", true),
    FlagDef::switch("celix_cxx17", true),
    FlagDef::switch("celix_install_deprecated_api", false),
    FlagDef::switch("celix_use_compression_for_bundle_zips", true),
    FlagDef::switch("enable_cmake_warning_tests", false),
    FlagDef::switch("enable_testing_on_ci", false),
    FlagDef::switch("framework_curlinit", true),
    FlagDef::switch("enable_ccache", false),
    FlagDef::scalar(
        "celix_err_buffer_size",
        "512",
        ScalarConstraint::PositiveInteger,
    ),
];

/// The umbrella switch that bulk-enables every feature flag.
pub const BUILD_ALL: &str = "build_all";

/// Prefix marking a flag as a feature flag for the bulk step.
pub const FEATURE_PREFIX: &str = "build_";

/// Raw tables a catalog is assembled from.
#[derive(Debug, Clone, Copy)]
pub struct CatalogTables {
    pub flags: &'static [FlagDef],
    pub rules: &'static [ImplicationRule],
    pub constraints: &'static [PlatformConstraint],
    pub requirements: &'static [PlatformRequirement],
    pub identity_exclusions: &'static [&'static str],
    pub umbrella: Option<&'static str>,
    pub feature_prefix: &'static str,
}

impl CatalogTables {
    /// The Celix tables.
    pub const fn celix() -> Self {
        CatalogTables {
            flags: FLAGS,
            rules: RULES,
            constraints: CONSTRAINTS,
            requirements: REQUIREMENTS,
            identity_exclusions: IDENTITY_EXCLUSIONS,
            umbrella: Some(BUILD_ALL),
            feature_prefix: FEATURE_PREFIX,
        }
    }
}

/// A cross-checked, immutable set of tables.
#[derive(Debug)]
pub struct Catalog {
    tables: CatalogTables,
    index: HashMap<&'static str, usize>,
    exclusions: BTreeSet<&'static str>,
}

static CELIX: LazyLock<Catalog> = LazyLock::new(|| Catalog::new(CatalogTables::celix()));

impl Catalog {
    /// The process-wide Celix catalog.
    pub fn celix() -> &'static Catalog {
        &CELIX
    }

    /// Build a catalog, aborting on any table defect.
    ///
    /// # Panics
    ///
    /// Panics if a rule, constraint, requirement or exclusion refers to a
    /// flag that is not registered, or targets a flag of the wrong kind.
    pub fn new(tables: CatalogTables) -> Self {
        let defects = table_defects(&tables);
        if !defects.is_empty() {
            panic!("inconsistent option tables:\n  {}", defects.join("\n  "));
        }
        let index = tables
            .flags
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name, i))
            .collect();
        let exclusions = tables.identity_exclusions.iter().copied().collect();
        Catalog {
            tables,
            index,
            exclusions,
        }
    }

    /// Look up a flag definition.
    pub fn flag(&self, name: &str) -> Option<&'static FlagDef> {
        let flags: &'static [FlagDef] = self.tables.flags;
        self.index.get(name).map(|&i| &flags[i])
    }

    /// All flags in declaration order.
    pub fn flags(&self) -> &'static [FlagDef] {
        self.tables.flags
    }

    pub fn rules(&self) -> &'static [ImplicationRule] {
        self.tables.rules
    }

    pub fn constraints(&self) -> &'static [PlatformConstraint] {
        self.tables.constraints
    }

    pub fn requirements(&self) -> &'static [PlatformRequirement] {
        self.tables.requirements
    }

    pub fn umbrella(&self) -> Option<&'static str> {
        self.tables.umbrella
    }

    /// Whether a flag takes part in the bulk-enable step.
    pub fn is_feature(&self, flag: &FlagDef) -> bool {
        flag.is_switch() && flag.name.starts_with(self.tables.feature_prefix)
    }

    /// Whether a flag is left out of identity keys.
    pub fn is_identity_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }
}

/// Collect every consistency problem in a set of tables.
fn table_defects(tables: &CatalogTables) -> Vec<String> {
    let mut defects = Vec::new();
    let mut kinds: HashMap<&str, bool> = HashMap::new();
    for flag in tables.flags {
        if kinds.insert(flag.name, flag.is_switch()).is_some() {
            defects.push(format!("flag '{}' is declared twice", flag.name));
        }
    }

    let mut expect_switch = |owner: &str, name: &str| match kinds.get(name) {
        None => defects.push(format!("{owner} refers to unknown flag '{name}'")),
        Some(false) => defects.push(format!("{owner} uses scalar flag '{name}' as a switch")),
        Some(true) => {}
    };

    for rule in tables.rules {
        let owner = format!("rule '{}'", rule.name);
        for &flag in rule.when.flags().iter().chain(rule.then) {
            expect_switch(owner.as_str(), flag);
        }
    }
    for c in tables.constraints {
        let owner = format!("platform constraint '{}'", c.name);
        expect_switch(owner.as_str(), c.flag);
    }
    for r in tables.requirements {
        expect_switch("platform requirement", r.flag);
    }
    if let Some(umbrella) = tables.umbrella {
        expect_switch("umbrella", umbrella);
    }
    for name in tables.identity_exclusions {
        if !kinds.contains_key(name) {
            defects.push(format!("identity exclusion refers to unknown flag '{name}'"));
        }
    }
    defects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Trigger;

    #[test]
    fn celix_tables_are_consistent() {
        assert!(table_defects(&CatalogTables::celix()).is_empty());
    }

    #[test]
    fn lookup_by_name() {
        let catalog = Catalog::celix();
        let flag = catalog.flag("celix_err_buffer_size").unwrap();
        assert_eq!(flag.default_value(), FlagValue::Scalar("512".into()));
        assert!(catalog.flag("build_nonsense").is_none());
    }

    #[test]
    fn feature_flags_follow_prefix() {
        let catalog = Catalog::celix();
        assert!(catalog.is_feature(catalog.flag("build_shell").unwrap()));
        assert!(!catalog.is_feature(catalog.flag("enable_testing").unwrap()));
        assert!(!catalog.is_feature(catalog.flag("celix_cxx17").unwrap()));
    }

    #[test]
    fn positive_integer_constraint() {
        let c = ScalarConstraint::PositiveInteger;
        assert!(c.accepts("512"));
        assert!(c.accepts(" 1 "));
        assert!(!c.accepts("0"));
        assert!(!c.accepts("-1"));
        assert!(!c.accepts("lots"));
        assert!(!c.accepts(""));
        assert!(!c.accepts("+"));
        assert!(!c.accepts("000"));
        assert!(!c.accepts("1.5"));
        assert!(c.accepts("+64"));
        assert!(c.accepts("0042"));
        assert!(c.accepts("99999999999999999999"));
    }

    #[test]
    #[should_panic(expected = "unknown flag 'build_missing'")]
    fn rule_with_unknown_flag_is_fatal() {
        const BROKEN: &[ImplicationRule] = &[ImplicationRule {
            name: "broken",
            when: Trigger::Any(&["build_shell"]),
            then: &["build_missing"],
        }];
        Catalog::new(CatalogTables {
            rules: BROKEN,
            ..CatalogTables::celix()
        });
    }

    #[test]
    #[should_panic(expected = "scalar flag 'celix_err_buffer_size'")]
    fn rule_forcing_a_scalar_is_fatal() {
        const BROKEN: &[ImplicationRule] = &[ImplicationRule {
            name: "broken",
            when: Trigger::Any(&["build_shell"]),
            then: &["celix_err_buffer_size"],
        }];
        Catalog::new(CatalogTables {
            rules: BROKEN,
            ..CatalogTables::celix()
        });
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn duplicate_flag_is_fatal() {
        const DUP: &[FlagDef] = &[
            FlagDef::switch("build_utils", false),
            FlagDef::switch("build_utils", true),
        ];
        Catalog::new(CatalogTables {
            flags: DUP,
            rules: &[],
            constraints: &[],
            requirements: &[],
            identity_exclusions: &[],
            umbrella: None,
            feature_prefix: FEATURE_PREFIX,
        });
    }
}
