use std::path::Path;
use std::process;

use crate::commands::{print_json, state_or_exit};
use crate::{render, OutputFormat};

/// Exits 1 when rows are modified but the catalog cannot be synced.
/// An unmodified catalog is not a failure.
pub(crate) fn cmd_check(snapshot: &Path, edits: Option<&Path>, output: OutputFormat, quiet: bool) {
    let state = state_or_exit(snapshot, edits, output, quiet);
    let eligibility = state.sync_eligibility();

    if !quiet {
        match output {
            OutputFormat::Json => print_json(&eligibility),
            OutputFormat::Text => print!("{}", render::eligibility_summary(&eligibility)),
        }
    }

    if eligibility.modified_count > 0 && !eligibility.can_sync {
        process::exit(1);
    }
}
