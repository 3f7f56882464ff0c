//! `celix-conf resolve` — print the complete resolved configuration.

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::json;

use celix_options::platform::SUPPORTED_TARGETS;
use celix_options::{Origin, ResolvedConfiguration, Resolver};

use super::{Format, Session};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOpts {
    /// Show where each value came from.
    pub explain: bool,
    /// Hide flags still at their default.
    pub changed: bool,
    /// Resolve for every supported target instead of the session target.
    pub all_targets: bool,
}

pub fn run(session: &Session, format: Format, opts: ResolveOpts) -> Result<()> {
    print!("{}", render(session, format, opts)?);
    Ok(())
}

pub fn render(session: &Session, format: Format, opts: ResolveOpts) -> Result<String> {
    let configs = if opts.all_targets {
        Resolver::new(session.catalog).resolve_many(&session.overrides, SUPPORTED_TARGETS)
    } else {
        vec![session.resolve()]
    };

    match format {
        Format::Json => {
            let values: Vec<_> = configs.iter().map(|c| to_json(c, opts)).collect();
            let value = if opts.all_targets {
                serde_json::Value::Array(values)
            } else {
                values.into_iter().next().unwrap_or_default()
            };
            Ok(serde_json::to_string_pretty(&value)? + "\n")
        }
        Format::Text => {
            let mut out = String::new();
            for (i, config) in configs.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str(&format!("# target: {}\n", config.target()));
                for (name, value) in visible(config, opts) {
                    if opts.explain {
                        let origin = config.origin(name).unwrap_or(Origin::Default);
                        out.push_str(&format!("{name} = {:<8} # {origin}\n", value.to_string()));
                    } else {
                        out.push_str(&format!("{name} = {value}\n"));
                    }
                }
            }
            Ok(out)
        }
    }
}

fn visible(
    config: &ResolvedConfiguration,
    opts: ResolveOpts,
) -> impl Iterator<Item = (&'static str, &celix_options::FlagValue)> + '_ {
    config
        .iter()
        .filter(move |(name, _)| !opts.changed || config.origin(name) != Some(Origin::Default))
}

fn to_json(config: &ResolvedConfiguration, opts: ResolveOpts) -> serde_json::Value {
    if opts.explain {
        let options: BTreeMap<_, _> = visible(config, opts)
            .map(|(name, value)| {
                let origin = config.origin(name).unwrap_or(Origin::Default);
                (name, json!({ "value": value, "origin": origin }))
            })
            .collect();
        json!({ "target": config.target(), "options": options })
    } else {
        let options: BTreeMap<_, _> = visible(config, opts).collect();
        json!({ "target": config.target(), "options": options })
    }
}
