//! `celix-conf identity` — print the artifact identity of a configuration.

use anyhow::Result;
use serde_json::json;

use celix_options::Normalizer;

use super::{Format, Session};

pub fn run(session: &Session, format: Format, digest_only: bool) -> Result<()> {
    print!("{}", render(session, format, digest_only)?);
    Ok(())
}

pub fn render(session: &Session, format: Format, digest_only: bool) -> Result<String> {
    let config = session.resolve_valid()?;
    let key = Normalizer::new(session.catalog).normalize(&config);
    let digest = key.digest();
    tracing::info!(%digest, flags = key.len(), "computed identity");

    if digest_only {
        return Ok(format!("{digest}\n"));
    }
    match format {
        Format::Json => {
            let value = json!({ "digest": digest, "key": key });
            Ok(serde_json::to_string_pretty(&value)? + "\n")
        }
        Format::Text => {
            let mut out = format!("digest: {digest}\ntarget: {}\n", key.target());
            for (name, value) in key.iter() {
                out.push_str(&format!("  {name} = {value}\n"));
            }
            Ok(out)
        }
    }
}
