//! `celix-conf rules` — show the implication cascade and platform constraints.

use anyhow::{bail, Result};
use serde_json::json;

use celix_options::platform::OsMatch;
use celix_options::{lint_rule_order, Catalog, Trigger};

use super::Format;

/// Print the rules. With `check`, fail if the order lint reports anything.
pub fn run(catalog: &Catalog, format: Format, check: bool) -> Result<()> {
    print!("{}", render(catalog, format)?);
    let hazards = lint_rule_order(catalog.rules());
    if check && !hazards.is_empty() {
        bail!("{} rule order hazard(s)", hazards.len());
    }
    Ok(())
}

fn describe_trigger(trigger: &Trigger) -> String {
    match *trigger {
        Trigger::Any(flags) => flags.join(" | "),
        Trigger::All(flags) => flags.join(" & "),
    }
}

pub fn render(catalog: &Catalog, format: Format) -> Result<String> {
    let hazards = lint_rule_order(catalog.rules());
    match format {
        Format::Json => {
            let value = json!({
                "umbrella": catalog.umbrella(),
                "rules": catalog.rules(),
                "constraints": catalog.constraints(),
                "requirements": catalog.requirements(),
                "hazards": hazards,
            });
            Ok(serde_json::to_string_pretty(&value)? + "\n")
        }
        Format::Text => {
            let mut out = String::from("Implication rules (evaluated once, in order):\n");
            for (i, rule) in catalog.rules().iter().enumerate() {
                out.push_str(&format!(
                    "  {:>2}. {:<34} {} => {}\n",
                    i + 1,
                    rule.name,
                    describe_trigger(&rule.when),
                    rule.then.join(", ")
                ));
            }

            out.push_str("\nPlatform constraints (applied last):\n");
            for c in catalog.constraints() {
                let when = match c.applies_to {
                    OsMatch::Is(os) => format!("target is {os}"),
                    OsMatch::IsNot(os) => format!("target is not {os}"),
                };
                out.push_str(&format!(
                    "  {:<22} {when}: {} = {}\n",
                    c.name, c.flag, c.value
                ));
            }

            out.push('\n');
            if hazards.is_empty() {
                out.push_str("Rule order: ok\n");
            } else {
                for h in &hazards {
                    out.push_str(&format!(
                        "warning: rule '{}' reads {} which is only forced on later by '{}'\n",
                        h.rule, h.trigger, h.forced_by
                    ));
                }
            }
            Ok(out)
        }
    }
}
