//! Terminal output helpers

pub mod formatter;

pub use formatter::{display_diagnostics, display_error, display_outcome, display_status, display_success};
