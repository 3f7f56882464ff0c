//! `celix-conf flags` — list every recognised option.

use anyhow::Result;
use serde_json::json;

use celix_options::{Catalog, FlagKind, TargetOs};

use super::Format;

pub fn run(catalog: &Catalog, format: Format) -> Result<()> {
    print!("{}", render(catalog, format)?);
    Ok(())
}

fn required_os(catalog: &Catalog, name: &str) -> Option<TargetOs> {
    catalog
        .requirements()
        .iter()
        .find(|r| r.flag == name)
        .map(|r| r.requires)
}

pub fn render(catalog: &Catalog, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let flags: Vec<_> = catalog
                .flags()
                .iter()
                .map(|f| {
                    let (kind, constraint) = match f.kind {
                        FlagKind::Switch { .. } => ("switch", None),
                        FlagKind::Scalar { constraint, .. } => {
                            ("scalar", Some(constraint.describe()))
                        }
                    };
                    json!({
                        "name": f.name,
                        "kind": kind,
                        "default": f.default_value(),
                        "constraint": constraint,
                        "feature": catalog.is_feature(f),
                        "identity": !catalog.is_identity_excluded(f.name),
                        "requires": required_os(catalog, f.name),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&flags)? + "\n")
        }
        Format::Text => {
            let mut out = String::new();
            for f in catalog.flags() {
                let mut notes = Vec::new();
                if let FlagKind::Scalar { constraint, .. } = f.kind {
                    notes.push(constraint.describe().to_string());
                }
                if catalog.is_identity_excluded(f.name) {
                    notes.push("not in identity".to_string());
                }
                if let Some(os) = required_os(catalog, f.name) {
                    notes.push(format!("{os} only"));
                }
                let notes = if notes.is_empty() {
                    String::new()
                } else {
                    format!("  ({})", notes.join(", "))
                };
                out.push_str(&format!(
                    "  {:<45} {:<6}{notes}\n",
                    f.name,
                    f.default_value().to_string()
                ));
            }
            out.push_str(&format!("\n{} options.\n", catalog.flags().len()));
            Ok(out)
        }
    }
}
