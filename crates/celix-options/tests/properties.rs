//! Whole-pipeline properties over randomly chosen option sets.

use celix_options::identity::IDENTITY_EXCLUSIONS;
use celix_options::{
    normalize, resolve, validate, Catalog, FlagValue, Origin, Overrides, TargetOs, ViolationKind,
};
use proptest::prelude::*;

fn switch_names() -> Vec<&'static str> {
    Catalog::celix()
        .flags()
        .iter()
        .filter(|f| f.is_switch())
        .map(|f| f.name)
        .collect()
}

fn arb_target() -> impl Strategy<Value = TargetOs> {
    prop::sample::select(TargetOs::ALL.to_vec())
}

fn arb_overrides() -> impl Strategy<Value = Overrides> {
    let names = switch_names();
    (
        prop::collection::vec((prop::sample::select(names), any::<bool>()), 0..12),
        prop::option::of(prop_oneof![
            Just("512".to_string()),
            Just("-1".to_string()),
            Just("0".to_string()),
            "[0-9]{1,5}",
        ]),
    )
        .prop_map(|(switches, buffer)| {
            let catalog = Catalog::celix();
            let mut o = Overrides::from_pairs(catalog, switches).unwrap();
            if let Some(size) = buffer {
                o.set(catalog, "celix_err_buffer_size", size).unwrap();
            }
            o
        })
}

fn pairs(items: &[(&str, bool)]) -> Overrides {
    Overrides::from_pairs(Catalog::celix(), items.iter().copied()).unwrap()
}

proptest! {
    #[test]
    fn resolution_is_deterministic(o in arb_overrides(), target in arb_target()) {
        let a = resolve(&o, target);
        let b = resolve(&o, target);
        prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        prop_assert_eq!(normalize(&a).canonical_json(), normalize(&b).canonical_json());
    }

    #[test]
    fn every_flag_is_resolved(o in arb_overrides(), target in arb_target()) {
        let config = resolve(&o, target);
        for flag in Catalog::celix().flags() {
            prop_assert!(config.get(flag.name).is_some(), "{} unresolved", flag.name);
        }
    }

    #[test]
    fn resolving_a_resolution_is_idempotent(o in arb_overrides(), target in arb_target()) {
        let first = resolve(&o, target);
        let second = resolve(&Overrides::from_configuration(&first), target);
        prop_assert_eq!(&first, &second);
    }

    #[test]
    fn fired_rules_leave_targets_on(o in arb_overrides(), target in arb_target()) {
        let config = resolve(&o, target);
        let constrained: Vec<_> = Catalog::celix()
            .constraints()
            .iter()
            .filter(|c| c.applies_to.matches(target))
            .map(|c| c.flag)
            .collect();
        // the cascade is lint-clean, so the final state satisfies every rule
        for rule in Catalog::celix().rules() {
            if rule.when.holds(|f| config.is_on(f)) {
                for flag in rule.then {
                    if !constrained.contains(flag) {
                        prop_assert!(config.is_on(flag), "rule {} left {} off", rule.name, flag);
                    }
                }
            }
        }
    }

    #[test]
    fn platform_constraints_always_win(o in arb_overrides(), target in arb_target()) {
        let config = resolve(&o, target);
        for c in Catalog::celix().constraints() {
            if c.applies_to.matches(target) {
                prop_assert_eq!(config.get(c.flag), Some(&FlagValue::Switch(c.value)));
            }
        }
    }

    #[test]
    fn excluded_flags_do_not_change_identity(
        o in arb_overrides(),
        target in arb_target(),
        noise in prop::collection::vec(
            (prop::sample::select(vec!["enable_ccache", "enable_testing_on_ci", "enable_cmake_warning_tests", "enable_testing_for_cxx14"]), any::<bool>()),
            1..4,
        ),
    ) {
        let mut noisy = o.clone();
        noisy.extend(Overrides::from_pairs(Catalog::celix(), noise).unwrap());
        let a = normalize(&resolve(&o, target));
        let b = normalize(&resolve(&noisy, target));
        prop_assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn validation_never_mutates(o in arb_overrides(), target in arb_target()) {
        let config = resolve(&o, target);
        let before = config.clone();
        let _ = validate(&config, target);
        prop_assert_eq!(before, config);
    }
}

#[test]
fn scenario_a_empty_overrides_on_linux() {
    let config = resolve(&Overrides::new(), TargetOs::Linux);
    for (name, value) in config.iter() {
        if name.starts_with("build_") {
            assert_eq!(value, &FlagValue::Switch(false), "{name}");
        }
    }
    assert_eq!(
        config.get("celix_err_buffer_size"),
        Some(&FlagValue::Scalar("512".into()))
    );
    assert!(validate(&config, TargetOs::Linux).is_ok());
}

#[test]
fn scenario_b_remote_shell_chain() {
    let config = resolve(&pairs(&[("build_remote_shell", true)]), TargetOs::Linux);
    for flag in [
        "build_shell",
        "build_shell_api",
        "build_log_helper",
        "build_framework",
        "build_utils",
    ] {
        assert!(config.is_on(flag), "{flag}");
    }
    assert!(validate(&config, TargetOs::Linux).is_ok());
}

#[test]
fn scenario_c_bonjour_on_macos() {
    let config = resolve(&pairs(&[("build_shell_bonjour", true)]), TargetOs::Macos);
    let err = validate(&config, TargetOs::Macos).unwrap_err();
    assert!(err.has_kind(ViolationKind::UnsupportedPlatform));
    assert!(!config.is_on("build_shell_bonjour"));
    assert!(matches!(
        config.origin("build_shell_bonjour"),
        Some(Origin::Platform { .. })
    ));
}

#[test]
fn scenario_d_negative_buffer_size() {
    let mut o = Overrides::new();
    o.set(Catalog::celix(), "celix_err_buffer_size", "-1").unwrap();
    let config = resolve(&o, TargetOs::Linux);
    let err = validate(&config, TargetOs::Linux).unwrap_err();
    assert!(err.has_kind(ViolationKind::InvalidValue));
    assert!(!err.has_kind(ViolationKind::UnsupportedPlatform));
}

#[test]
fn scenario_e_build_all_on_linux() {
    let config = resolve(&pairs(&[("build_all", true)]), TargetOs::Linux);
    let mut count = 0;
    for (name, value) in config.iter() {
        if name.starts_with("build_") {
            assert!(value.is_on(), "{name}");
            count += 1;
        }
    }
    assert!(count > 40);
    assert!(validate(&config, TargetOs::Linux).is_ok());
}

#[test]
fn identity_drops_exactly_the_exclusions() {
    let key = normalize(&resolve(&pairs(&[("build_all", true)]), TargetOs::Linux));
    for name in IDENTITY_EXCLUSIONS {
        assert!(!key.contains(name));
    }
}
