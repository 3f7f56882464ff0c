//! celix-conf — resolve, check and fingerprint Apache Celix build options.

mod commands;
mod profile;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::{Format, Session};
use profile::CelixProfile;

#[derive(Parser)]
#[command(
    name = "celix-conf",
    version,
    about = "Resolve and fingerprint Apache Celix build options"
)]
struct Cli {
    /// Target operating system (linux, macos, windows, freebsd; default: host)
    #[arg(long, global = true)]
    target: Option<String>,
    /// Options profile (default: celix.toml, searched upward)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,
    /// Ignore any celix.toml found in the working tree
    #[arg(long, global = true)]
    no_profile: bool,
    /// Set an option, e.g. -o build_remote_shell=true (repeatable)
    #[arg(short = 'o', long = "option", global = true, value_name = "NAME=VALUE")]
    options: Vec<String>,
    /// Output format (text, json)
    #[arg(long, global = true)]
    format: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every recognised option with its default
    Flags,
    /// Show the implication rules and platform constraints
    Rules {
        /// Fail if a rule depends on a rule evaluated after it
        #[arg(long)]
        check: bool,
    },
    /// Resolve the options into a complete configuration
    Resolve {
        /// Show where each value came from
        #[arg(long)]
        explain: bool,
        /// Hide flags still at their default
        #[arg(long)]
        changed: bool,
        /// Resolve for every supported target
        #[arg(long)]
        all_targets: bool,
    },
    /// Check the resolved configuration against platform and value rules
    Validate,
    /// Print the artifact identity of the resolved configuration
    Identity {
        /// Print only the digest
        #[arg(long)]
        digest: bool,
    },
    /// Produce package requirements and build generator variables
    Toolchain {
        /// Emit mode (text, json, cmake); defaults to --format
        #[arg(long)]
        emit: Option<String>,
        /// Package version (default: from celix.toml, then the built-in version)
        #[arg(long)]
        package_version: Option<String>,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = Format::parse(cli.format.as_deref())?;
    let profile = if cli.no_profile {
        None
    } else {
        let cwd = std::env::current_dir()?;
        load_profile(cli.profile.as_deref(), &cwd)?
    };

    let session = |package_version: Option<&str>| {
        Session::build(
            profile.as_ref(),
            cli.target.as_deref(),
            &cli.options,
            package_version,
        )
    };

    match cli.command {
        Commands::Flags => commands::flags::run(celix_options::Catalog::celix(), format),

        Commands::Rules { check } => {
            commands::rules::run(celix_options::Catalog::celix(), format, check)
        }

        Commands::Resolve {
            explain,
            changed,
            all_targets,
        } => commands::resolve::run(
            &session(None)?,
            format,
            commands::resolve::ResolveOpts {
                explain,
                changed,
                all_targets,
            },
        ),

        Commands::Validate => commands::validate::run(&session(None)?, format),

        Commands::Identity { digest } => commands::identity::run(&session(None)?, format, digest),

        Commands::Toolchain {
            emit,
            package_version,
            output,
        } => {
            let emit = commands::toolchain::Emit::parse(emit.as_deref(), format)?;
            commands::toolchain::run(
                &session(package_version.as_deref())?,
                emit,
                output.as_deref(),
            )
        }
    }
}

/// Load the profile named on the command line, or search upward for one.
fn load_profile(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<Option<CelixProfile>> {
    if let Some(path) = explicit {
        return CelixProfile::load(path).map(Some);
    }
    match CelixProfile::find_and_load(cwd)? {
        Some((profile, path)) => {
            tracing::debug!(path = %path.display(), "using profile");
            Ok(Some(profile))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn write_profile(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(profile::PROFILE_FILE);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "celix-conf",
            "resolve",
            "--explain",
            "--target",
            "macos",
            "-o",
            "build_shell=true",
            "-o",
            "enable_testing=on",
        ])
        .unwrap();
        assert_eq!(cli.target.as_deref(), Some("macos"));
        assert_eq!(cli.options.len(), 2);
        assert!(matches!(cli.command, Commands::Resolve { explain: true, .. }));
    }

    #[test]
    fn explicit_profile_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_profile(dir.path(), "[options]\nbuild_shell = true\n");
        let profile = load_profile(Some(&path), Path::new("/")).unwrap().unwrap();
        assert_eq!(profile.options.len(), 1);
    }

    #[test]
    fn missing_explicit_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_profile(Some(&missing), dir.path()).is_err());
    }

    /// Profile → session → validate → identity → toolchain.
    #[test]
    fn profile_to_toolchain_workflow() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(
            dir.path(),
            r#"
[build]
target = "linux"

[package]
version = "2.4.0"

[options]
build_rsa_discovery_zeroconf = true
enable_testing = true
"#,
        );
        let profile = load_profile(None, dir.path()).unwrap().unwrap();
        let session = Session::build(Some(&profile), None, &[], None).unwrap();

        commands::validate::run(&session, Format::Text).unwrap();
        let digest = commands::identity::render(&session, Format::Text, true).unwrap();
        assert_eq!(digest.trim().len(), 64);

        let cmake =
            commands::toolchain::render(&session, commands::toolchain::Emit::Cmake).unwrap();
        assert!(cmake.contains("set(BUILD_RSA_DISCOVERY_ZEROCONF \"ON\""));
        assert!(cmake.contains("set(BUILD_ERROR_INJECTOR_MDNSRESPONDER \"ON\""));
        assert!(cmake.contains("set(CELIX_MINOR \"4\""));
    }

    #[test]
    fn same_profile_on_macos_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(dir.path(), "[options]\nbuild_rsa_discovery_zeroconf = true\n");
        let profile = load_profile(None, dir.path()).unwrap().unwrap();
        let session = Session::build(Some(&profile), Some("macos"), &[], None).unwrap();

        let err = commands::validate::run(&session, Format::Text).unwrap_err();
        assert!(err
            .to_string()
            .contains("build_rsa_discovery_zeroconf is only supported for linux, not macos"));
        assert!(commands::identity::render(&session, Format::Text, true).is_err());
    }
}
