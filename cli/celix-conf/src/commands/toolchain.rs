//! `celix-conf toolchain` — requirements and generator variables.

use std::path::Path;

use anyhow::{bail, Context, Result};

use celix_toolchain::{project, Projection};

use super::{Format, Session};

/// Output of the toolchain command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    Text,
    Json,
    /// CMake initial-cache script.
    Cmake,
}

impl Emit {
    /// `--emit` wins over the global `--format`.
    pub fn parse(emit: Option<&str>, format: Format) -> Result<Self> {
        match emit {
            None => Ok(match format {
                Format::Text => Emit::Text,
                Format::Json => Emit::Json,
            }),
            Some("text") => Ok(Emit::Text),
            Some("json") => Ok(Emit::Json),
            Some("cmake") => Ok(Emit::Cmake),
            Some(other) => bail!("unknown emit mode: '{other}' (expected text, json or cmake)"),
        }
    }
}

pub fn run(session: &Session, emit: Emit, output: Option<&Path>) -> Result<()> {
    let rendered = render(session, emit)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote toolchain output");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

pub fn render(session: &Session, emit: Emit) -> Result<String> {
    let config = session.resolve_valid()?;
    let projection = project(&config, &session.package_version)?;
    match emit {
        Emit::Json => Ok(projection.to_json()? + "\n"),
        Emit::Cmake => Ok(projection.variables.to_cmake_cache()),
        Emit::Text => Ok(render_text(&projection)),
    }
}

fn render_text(projection: &Projection) -> String {
    let mut out = String::from("Requirements:\n");
    for req in &projection.requirements {
        let mut notes = vec![format!("{:?}", req.scope).to_lowercase()];
        if req.shared {
            notes.push("shared".into());
        }
        if req.force {
            notes.push("override".into());
        }
        for (option, value) in &req.options {
            notes.push(format!("{option}={value}"));
        }
        out.push_str(&format!("  {:<32} [{}]\n", req.reference, notes.join(", ")));
    }
    out.push_str("\nVariables:\n");
    for (name, value) in projection.variables.iter() {
        out.push_str(&format!("  {name}={value}\n"));
    }
    out
}
