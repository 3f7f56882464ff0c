//! Third-party requirements implied by a resolved configuration.
//!
//! Each requirement is gated by one or more resolved options and carries a
//! linkage hint for the package manager. Version ranges are passed through
//! verbatim; solving them is the package manager's job.

use serde::Serialize;

use celix_options::ResolvedConfiguration;

/// Where a requirement is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Linked into the produced artifacts.
    Host,
    /// Only needed to build and run the tests.
    Test,
    /// A build tool.
    Tool,
}

/// A single requirement declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// `name/version-or-range`.
    pub reference: &'static str,
    pub scope: Scope,
    /// Ask for the shared variant of the library.
    pub shared: bool,
    /// Pin this version over any transitive request.
    #[serde(rename = "override")]
    pub force: bool,
    /// Extra package options (`option`, `value`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<(&'static str, &'static str)>,
}

impl Requirement {
    fn new(reference: &'static str, scope: Scope, shared: bool) -> Self {
        Requirement {
            reference,
            scope,
            shared,
            force: false,
            options: Vec::new(),
        }
    }

    /// Package name without the version part.
    pub fn name(&self) -> &'static str {
        let reference: &'static str = self.reference;
        reference.split('/').next().unwrap_or(reference)
    }
}

type Gate = fn(&ResolvedConfiguration) -> bool;

struct HostRequirement {
    reference: &'static str,
    when: Gate,
    shared: bool,
}

fn needs_utils(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_utils")
}

fn needs_uuid(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_framework") || c.is_on("build_pubsub")
}

fn needs_curl(c: &ResolvedConfiguration) -> bool {
    (c.is_on("build_framework") && c.is_on("framework_curlinit"))
        || c.is_on("build_celix_etcdlib")
        || c.is_on("build_deployment_admin")
        || c.is_on("build_rsa_discovery_common")
        || c.is_on("build_rsa_remote_service_admin_dfi")
        || c.is_on("build_launcher")
}

fn needs_zlib(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_deployment_admin")
}

fn needs_libxml2(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_rsa_discovery_common")
        || c.is_on("build_shell_bonjour")
        || (c.is_on("build_rsa_remote_service_admin_dfi") && c.is_on("enable_testing"))
}

fn needs_rapidjson(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_cxx_remote_service_admin")
}

fn needs_zmq(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_pubsub_psa_zmq")
}

fn needs_civetweb(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_http_admin")
        || c.is_on("build_rsa_discovery_common")
        || c.is_on("build_rsa_remote_service_admin_dfi")
}

fn needs_ffi(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_celix_dfi")
}

fn needs_jansson(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_celix_dfi") || c.is_on("build_celix_etcdlib")
}

fn needs_mdns(c: &ResolvedConfiguration) -> bool {
    c.is_on("build_rsa_discovery_zeroconf") || c.is_on("build_shell_bonjour")
}

const HOST: &[HostRequirement] = &[
    HostRequirement {
        reference: "libzip/[>=1.7.3 <2.0.0]",
        when: needs_utils,
        shared: true,
    },
    HostRequirement {
        reference: "util-linux-libuuid/2.39",
        when: needs_uuid,
        shared: true,
    },
    HostRequirement {
        reference: "libcurl/[>=7.64.1 <8.0.0]",
        when: needs_curl,
        shared: true,
    },
    HostRequirement {
        reference: "zlib/[>=1.2.8 <2.0.0]",
        when: needs_zlib,
        shared: true,
    },
    HostRequirement {
        reference: "libxml2/[>=2.9.9 <3.0.0]",
        when: needs_libxml2,
        shared: true,
    },
    HostRequirement {
        reference: "rapidjson/[>=1.1.0 <2.0.0]",
        when: needs_rapidjson,
        shared: false,
    },
    HostRequirement {
        reference: "zeromq/4.3.4",
        when: needs_zmq,
        shared: true,
    },
    HostRequirement {
        reference: "czmq/4.2.0",
        when: needs_zmq,
        shared: true,
    },
    HostRequirement {
        reference: "civetweb/1.16",
        when: needs_civetweb,
        shared: true,
    },
    HostRequirement {
        reference: "libffi/[>=3.2.1 <4.0.0]",
        when: needs_ffi,
        shared: true,
    },
    HostRequirement {
        reference: "jansson/[>=2.12 <3.0.0]",
        when: needs_jansson,
        shared: true,
    },
    HostRequirement {
        reference: "mdnsresponder/1310.140.1",
        when: needs_mdns,
        shared: false,
    },
];

/// civetweb 1.16 does not build against openssl 3.
const OPENSSL: &str = "openssl/1.1.1t";

/// Every requirement the configuration implies, host requirements first.
pub fn requirements(config: &ResolvedConfiguration) -> Vec<Requirement> {
    let mut out: Vec<Requirement> = HOST
        .iter()
        .filter(|r| (r.when)(config))
        .map(|r| Requirement::new(r.reference, Scope::Host, r.shared))
        .collect();

    out.push(Requirement {
        force: true,
        ..Requirement::new(
            OPENSSL,
            Scope::Host,
            needs_curl(config) || needs_civetweb(config),
        )
    });

    if config.is_on("enable_testing") {
        out.push(Requirement::new("gtest/1.10.0", Scope::Test, true));
        let mut cpputest = Requirement::new("cpputest/4.0", Scope::Test, false);
        if config.is_on("enable_address_sanitizer") {
            cpputest.options.push(("with_leak_detection", "False"));
        }
        out.push(cpputest);
    }

    if config.is_on("enable_ccache") {
        out.push(Requirement::new("ccache/4.6", Scope::Tool, false));
    }

    tracing::debug!(count = out.len(), target = %config.target(), "collected requirements");
    out
}
