use std::path::Path;

use pricesync_core::{ChangeRecord, ComputedRow, SyncEligibility};
use serde::Serialize;

use crate::commands::{exit_with, print_json};
use crate::{input, render, OutputFormat};

#[derive(Serialize)]
struct ReplayReport {
    rows: Vec<ComputedRow>,
    changes: Vec<ChangeRecord>,
    eligibility: SyncEligibility,
}

pub(crate) fn cmd_replay(snapshot: &Path, actions: &Path, output: OutputFormat, quiet: bool) {
    let state = match input::load_replay(snapshot, actions) {
        Ok(state) => state,
        Err(msg) => exit_with(&msg, output, quiet),
    };
    if quiet {
        return;
    }

    let report = ReplayReport {
        rows: state.computed_rows(),
        changes: state.diff(),
        eligibility: state.sync_eligibility(),
    };
    match output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", render::rows_table(&report.rows));
            println!();
            print!("{}", render::change_list(&report.changes));
            println!();
            print!("{}", render::eligibility_summary(&report.eligibility));
        }
    }
}
