mod check;
mod push;
mod replay;
mod rows;

pub(crate) use check::cmd_check;
pub(crate) use push::{cmd_push, PushOptions};
pub(crate) use replay::cmd_replay;
pub(crate) use rows::{cmd_diff, cmd_rows};

use std::path::Path;
use std::process;

use pricesync_core::WorkingState;
use serde::Serialize;

use crate::{input, report_error, OutputFormat};

/// Load state for a read-only command, exiting on failure.
fn state_or_exit(
    snapshot: &Path,
    edits: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) -> WorkingState {
    match input::load_state(snapshot, edits) {
        Ok(state) => state,
        Err(msg) => exit_with(&msg, output, quiet),
    }
}

fn exit_with(msg: &str, output: OutputFormat, quiet: bool) -> ! {
    report_error(msg, output, quiet);
    process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
    println!("{}", json);
}
