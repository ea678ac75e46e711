//! CLI-facing layer: workflow orchestration and CI output plumbing

pub mod orchestration;

pub use orchestration::{TagOutcome, Workflow};

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use std::io::Write;

/// Append a `name=value` output for the CI system to the file named by
/// `$GITHUB_OUTPUT`. A missing variable is a diagnostic, not an error, so
/// local runs stay usable.
pub fn write_ci_output(name: &str, value: &str, diagnostics: &mut Vec<Diagnostic>) -> Result<()> {
    let Ok(path) = std::env::var("GITHUB_OUTPUT") else {
        diagnostics.push(Diagnostic::CiOutputUnavailable {
            name: name.to_string(),
        });
        return Ok(());
    };

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{}={}", name, value)?;
    Ok(())
}
