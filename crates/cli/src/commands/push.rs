use std::path::Path;

use pricesync_writeback::{prepare_sync, ErpWriter, OutboxWriter, SyncError, SyncReceipt};
use serde::Serialize;

use crate::commands::{exit_with, print_json};
use crate::config::load_config;
use crate::{input, OutputFormat};

pub(crate) struct PushOptions<'a> {
    pub snapshot: &'a Path,
    pub edits: &'a Path,
    pub reason: Option<&'a str>,
    pub outbox: Option<&'a Path>,
    pub read_only: bool,
    pub config: Option<&'a Path>,
    pub output: OutputFormat,
    pub quiet: bool,
}

#[derive(Serialize)]
struct PushReport<'a> {
    etag: &'a str,
    path: String,
    changes: usize,
    receipt: &'a SyncReceipt,
}

pub(crate) fn cmd_push(opts: PushOptions<'_>) {
    let (output, quiet) = (opts.output, opts.quiet);

    let config = load_config(opts.config)
        .unwrap_or_else(|msg| exit_with(&format!("error: {}", msg), output, quiet));
    let mut gate = config.sync.gate();
    gate.read_only |= opts.read_only;
    let outbox_dir = opts.outbox.unwrap_or(config.sync.outbox.as_path());

    let state = input::load_state(opts.snapshot, Some(opts.edits))
        .unwrap_or_else(|msg| exit_with(&msg, output, quiet));

    let payload = match prepare_sync(&state, gate, opts.reason) {
        Ok(payload) => payload,
        Err(SyncError::NotEligible {
            block_count,
            modified_count,
            blocked_items,
        }) => {
            let msg = format!(
                "error: catalog is not syncable: {} blocked row(s), {} modified (blocked: {})",
                block_count,
                modified_count,
                blocked_items.join(", ")
            );
            exit_with(&msg, output, quiet)
        }
        Err(e) => exit_with(&format!("error: {}", e), output, quiet),
    };

    let writer = OutboxWriter::new(outbox_dir);
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        exit_with(&format!("error: could not start runtime: {}", e), output, quiet)
    });
    let receipt = runtime
        .block_on(writer.submit(&payload))
        .unwrap_or_else(|e| exit_with(&format!("error: {}", e), output, quiet));

    if !receipt.success {
        let details: Vec<String> = receipt
            .item_errors
            .iter()
            .map(|(id, msg)| format!("{}: {}", id, msg))
            .collect();
        let msg = format!("error: write rejected: {}", details.join("; "));
        exit_with(&msg, output, quiet);
    }

    let path = writer.path_for(&payload);
    tracing::info!(etag = %payload.etag, path = %path.display(), "push complete");
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&PushReport {
            etag: &payload.etag,
            path: path.display().to_string(),
            changes: payload.changes.len(),
            receipt: &receipt,
        }),
        OutputFormat::Text => println!(
            "Wrote {} change(s) to {}",
            payload.changes.len(),
            path.display()
        ),
    }
}
