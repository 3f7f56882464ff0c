//! `celix-conf validate` — check a configuration without producing anything.

use anyhow::Result;
use serde_json::json;

use celix_options::{ConfigError, Validator};

use super::{Format, Session};

/// Print the verdict; exits non-zero through the returned error when the
/// configuration is rejected.
pub fn run(session: &Session, format: Format) -> Result<()> {
    let (report, outcome) = render(session, format)?;
    print!("{report}");
    outcome?;
    Ok(())
}

pub fn render(
    session: &Session,
    format: Format,
) -> Result<(String, std::result::Result<(), ConfigError>)> {
    let config = session.resolve();
    let outcome = Validator::new(session.catalog).validate(&config, session.target);

    let report = match format {
        Format::Json => {
            let violations: Vec<_> = outcome
                .as_ref()
                .err()
                .map(|e| {
                    e.violations()
                        .iter()
                        .map(|v| json!({ "kind": format!("{:?}", v.kind()), "message": v.to_string() }))
                        .collect()
                })
                .unwrap_or_default();
            let value = json!({
                "target": session.target,
                "valid": outcome.is_ok(),
                "violations": violations,
            });
            serde_json::to_string_pretty(&value)? + "\n"
        }
        Format::Text => match &outcome {
            Ok(()) => format!("ok: configuration is valid for {}\n", session.target),
            Err(e) => {
                let mut out = format!("configuration rejected for {}:\n", session.target);
                for v in e.violations() {
                    out.push_str(&format!("  - {v}\n"));
                }
                out
            }
        },
    };
    Ok((report, outcome))
}
