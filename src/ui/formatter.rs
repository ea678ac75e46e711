//! Pure formatting functions for terminal output.
//!
//! All display logic lives here, separated from the workflow so that the
//! engine never prints anything itself.

use crate::cli::TagOutcome;
use crate::diagnostics::Diagnostic;
use console::style;

/// Print an error message in red to stderr.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Print a success message with a green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a status message with a yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Show what a tagging run produced: the version transition and every tag
/// that was applied.
pub fn display_outcome(outcome: &TagOutcome) {
    println!("\n{}", style("Version change:").bold());
    println!("  From: {}", style(&outcome.previous_version).red());
    println!("  To:   {}", style(&outcome.new_version).green());

    for tag in &outcome.tags {
        display_success(&format!("Tagged {}", tag));
    }
}

/// Print collected diagnostics as warnings.
pub fn display_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{} {}", style("⚠ WARNING:").yellow(), diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Output goes to the terminal; these just exercise the formatting paths.

    #[test]
    fn test_display_messages() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
    }

    #[test]
    fn test_display_outcome() {
        let outcome = TagOutcome {
            previous_version: "v1.0.0".to_string(),
            new_version: "v1.1.0".to_string(),
            tags: vec!["v1.1.0".to_string(), "v1".to_string()],
            diagnostics: Vec::new(),
        };
        display_outcome(&outcome);
    }

    #[test]
    fn test_display_diagnostics() {
        display_diagnostics(&[Diagnostic::UnparsableTag {
            tag: "weird".to_string(),
            reason: "not semver".to_string(),
        }]);
    }
}
