use std::path::Path;

use crate::commands::{print_json, state_or_exit};
use crate::{render, OutputFormat};

pub(crate) fn cmd_rows(snapshot: &Path, edits: Option<&Path>, output: OutputFormat, quiet: bool) {
    let state = state_or_exit(snapshot, edits, output, quiet);
    let rows = state.computed_rows();
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Text => print!("{}", render::rows_table(&rows)),
    }
}

pub(crate) fn cmd_diff(snapshot: &Path, edits: Option<&Path>, output: OutputFormat, quiet: bool) {
    let state = state_or_exit(snapshot, edits, output, quiet);
    let changes = state.diff();
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&changes),
        OutputFormat::Text => print!("{}", render::change_list(&changes)),
    }
}
