//! Implication rules.
//!
//! Rules are evaluated exactly once, top to bottom, against the working
//! configuration as it stands at that point. A rule whose trigger is only
//! switched on by a rule further down the list does not fire. The order of
//! [`RULES`] is therefore part of the observable behaviour: every rule is
//! placed below all rules that can enable its trigger.

use serde::Serialize;

/// Condition under which a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "flags", rename_all = "kebab-case")]
pub enum Trigger {
    /// At least one of the flags is on.
    Any(&'static [&'static str]),
    /// Every flag is on.
    All(&'static [&'static str]),
}

impl Trigger {
    pub fn flags(&self) -> &'static [&'static str] {
        match *self {
            Trigger::Any(flags) | Trigger::All(flags) => flags,
        }
    }

    /// Evaluate the trigger with a lookup into the current configuration.
    pub fn holds(&self, is_on: impl Fn(&str) -> bool) -> bool {
        match *self {
            Trigger::Any(flags) => flags.iter().any(|&f| is_on(f)),
            Trigger::All(flags) => flags.iter().all(|&f| is_on(f)),
        }
    }
}

/// "When the trigger holds, force every flag in `then` on."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImplicationRule {
    pub name: &'static str,
    pub when: Trigger,
    pub then: &'static [&'static str],
}

const fn rule(
    name: &'static str,
    when: Trigger,
    then: &'static [&'static str],
) -> ImplicationRule {
    ImplicationRule { name, when, then }
}

/// The Celix cascade, in evaluation order.
pub const RULES: &[ImplicationRule] = &[
    rule(
        "code-coverage",
        Trigger::Any(&["enable_code_coverage"]),
        &["enable_testing"],
    ),
    rule(
        "examples",
        Trigger::Any(&["build_examples"]),
        &[
            "build_shell_tui",
            "build_shell_wui",
            "build_log_service",
            "build_syslog_writer",
        ],
    ),
    rule(
        "shell-bonjour",
        Trigger::Any(&["build_shell_bonjour"]),
        &["build_shell"],
    ),
    rule(
        "deployment-admin",
        Trigger::Any(&["build_deployment_admin"]),
        &["build_framework"],
    ),
    rule(
        "cxx-rsa-integration",
        Trigger::Any(&["build_cxx_rsa_integration"]),
        &[
            "build_cxx_remote_service_admin",
            "build_pushstreams",
            "build_promises",
            "build_log_helper",
            "build_shell",
            "build_shell_tui",
            "build_shell_api",
            "build_pubsub",
            "build_pubsub_wire_protocol_v2",
            "build_pubsub_json_serializer",
            "build_pubsub_psa_zmq",
            "build_pubsub_discovery_etcd",
        ],
    ),
    rule(
        "pubsub-integration",
        Trigger::Any(&["build_pubsub_integration"]),
        &[
            "build_pubsub",
            "build_shell_tui",
            "build_pubsub_json_serializer",
            "build_pubsub_wire_protocol_v2",
            "build_pubsub_wire_protocol_v1",
            "enable_testing",
        ],
    ),
    rule(
        "pubsub-examples",
        Trigger::Any(&["build_pubsub_examples"]),
        &[
            "build_log_service",
            "build_shell_tui",
            "build_pubsub_json_serializer",
            "build_pubsub_discovery_etcd",
            "build_pubsub_wire_protocol_v2",
            "build_pubsub_wire_protocol_v1",
        ],
    ),
    rule(
        "pubsub-discovery-etcd",
        Trigger::Any(&["build_pubsub_discovery_etcd"]),
        &["build_pubsub", "build_celix_etcdlib"],
    ),
    rule(
        "pubsub-psa-ws",
        Trigger::Any(&["build_pubsub_psa_ws"]),
        &["build_http_admin", "build_pubsub"],
    ),
    rule(
        "pubsub-admins",
        Trigger::Any(&[
            "build_pubsub_psa_zmq",
            "build_pubsub_psa_tcp",
            "build_pubsub_psa_udp_mc",
        ]),
        &["build_pubsub"],
    ),
    rule(
        "pubsub-wire-v1",
        Trigger::Any(&["build_pubsub_wire_protocol_v1"]),
        &["build_pubsub"],
    ),
    rule(
        "pubsub-wire-v2",
        Trigger::Any(&["build_pubsub_wire_protocol_v2"]),
        &["build_pubsub"],
    ),
    rule(
        "pubsub-serializers",
        Trigger::Any(&[
            "build_pubsub_json_serializer",
            "build_pubsub_avrobin_serializer",
        ]),
        &["build_pubsub"],
    ),
    rule(
        "pubsub",
        Trigger::Any(&["build_pubsub"]),
        &[
            "build_framework",
            "build_celix_dfi",
            "build_shell_api",
            "build_log_helper",
            "celix_install_deprecated_api",
        ],
    ),
    rule(
        "cxx-remote-service-admin",
        Trigger::Any(&["build_cxx_remote_service_admin"]),
        &["build_framework", "build_log_helper", "celix_cxx17"],
    ),
    rule(
        "rsa-discovery-etcd",
        Trigger::Any(&["build_rsa_discovery_etcd"]),
        &["build_celix_etcdlib", "build_rsa_discovery_common"],
    ),
    rule(
        "rsa-discovery-configured",
        Trigger::Any(&["build_rsa_discovery_configured"]),
        &["build_rsa_discovery_common"],
    ),
    rule(
        "rsa-components",
        Trigger::Any(&[
            "build_rsa_discovery_common",
            "build_rsa_discovery_zeroconf",
            "build_rsa_remote_service_admin_dfi",
            "build_rsa_json_rpc",
            "build_rsa_remote_service_admin_shm_v2",
        ]),
        &["build_remote_service_admin"],
    ),
    rule(
        "remote-service-admin",
        Trigger::Any(&["build_remote_service_admin"]),
        &[
            "build_framework",
            "build_log_helper",
            "build_celix_dfi",
            "celix_install_deprecated_api",
        ],
    ),
    rule(
        "remote-shell",
        Trigger::Any(&["build_remote_shell"]),
        &["build_shell"],
    ),
    rule(
        "shell-wui",
        Trigger::Any(&["build_shell_wui"]),
        &["build_shell", "build_http_admin"],
    ),
    rule(
        "shell-tui",
        Trigger::Any(&["build_shell_tui"]),
        &["build_shell"],
    ),
    rule(
        "shell",
        Trigger::Any(&["build_shell"]),
        &["build_shell_api", "build_log_helper", "build_framework"],
    ),
    rule(
        "http-admin",
        Trigger::Any(&["build_http_admin"]),
        &["build_framework"],
    ),
    rule(
        "syslog-writer",
        Trigger::Any(&["build_syslog_writer"]),
        &["build_log_service"],
    ),
    rule(
        "log-service",
        Trigger::Any(&["build_log_service"]),
        &[
            "build_log_service_api",
            "build_shell_api",
            "build_framework",
            "build_log_helper",
        ],
    ),
    rule(
        "shell-api",
        Trigger::Any(&["build_shell_api"]),
        &["build_utils"],
    ),
    rule(
        "log-helper",
        Trigger::Any(&["build_log_helper"]),
        &["build_log_service_api", "build_framework"],
    ),
    rule(
        "log-service-api",
        Trigger::Any(&["build_log_service_api"]),
        &["build_utils"],
    ),
    rule(
        "log-service-api-deprecated",
        Trigger::All(&["build_log_service_api", "celix_install_deprecated_api"]),
        &["build_framework"],
    ),
    rule(
        "components-ready-check",
        Trigger::Any(&["build_components_ready_check"]),
        &["build_framework"],
    ),
    rule("rcm", Trigger::Any(&["build_rcm"]), &["build_utils"]),
    rule(
        "launcher",
        Trigger::Any(&["build_launcher", "build_dependency_manager"]),
        &["build_framework"],
    ),
    rule(
        "dependency-manager-cxx",
        Trigger::Any(&["build_dependency_manager_cxx"]),
        &["build_framework", "celix_cxx14"],
    ),
    rule(
        "celix-dfi",
        Trigger::Any(&["build_celix_dfi"]),
        &["build_utils"],
    ),
    rule(
        "framework",
        Trigger::Any(&["build_framework"]),
        &["build_utils"],
    ),
    rule(
        "pushstreams",
        Trigger::Any(&["build_pushstreams"]),
        &["build_promises"],
    ),
    rule(
        "promises",
        Trigger::Any(&["build_promises"]),
        &["celix_cxx17"],
    ),
    rule("cxx17", Trigger::Any(&["celix_cxx17"]), &["celix_cxx14"]),
];

/// A trigger flag that is only forced on by a rule evaluated later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderHazard {
    /// The rule that may miss firing.
    pub rule: &'static str,
    /// Its trigger flag.
    pub trigger: &'static str,
    /// The later rule that forces the trigger on.
    pub forced_by: &'static str,
}

/// Report every place where single-pass evaluation can miss an implication.
///
/// An empty result means no rule depends on a later rule, so a single pass
/// reaches the same result as iterating to a fixed point.
pub fn lint_rule_order(rules: &[ImplicationRule]) -> Vec<OrderHazard> {
    let mut hazards = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        for &trigger in rule.when.flags() {
            for later in &rules[i + 1..] {
                if later.then.contains(&trigger) {
                    hazards.push(OrderHazard {
                        rule: rule.name,
                        trigger,
                        forced_by: later.name,
                    });
                }
            }
        }
    }
    hazards
}
