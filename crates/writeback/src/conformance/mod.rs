//! Conformance checks for `ErpWriter` implementations.
//!
//! Any transport can run this suite to verify it honors the write-back
//! contract:
//!
//! - **Acceptance**: a well-formed payload yields a successful receipt
//! - **Idempotence**: resubmitting the same etag is accepted again
//! - **Independence**: distinct payloads are each accepted
//! - **Item errors**: a receipt only names items present in the payload
//!
//! # Usage
//!
//! ```ignore
//! use pricesync_writeback::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn staging_erp_conformance() {
//!     let report = run_conformance_suite(|| async { connect_staging_writer().await }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

use std::fmt;
use std::future::Future;

use pricesync_core::{ChangeField, ChangeRecord};

use crate::prepare::compute_etag;
use crate::record::{SyncPayload, SyncReceipt};
use crate::ErpWriter;

/// Result of a single conformance check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl CheckResult {
    fn from_result(name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => CheckResult {
                name: name.to_string(),
                passed: true,
                message: None,
            },
            Err(msg) => CheckResult {
                name: name.to_string(),
                passed: false,
                message: Some(msg),
            },
        }
    }
}

/// Aggregated report from a full conformance run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<CheckResult>,
    pub passed: usize,
    pub failed: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed,
            self.results.len(),
            self.failed
        )?;
        for r in self.results.iter().filter(|r| !r.passed) {
            writeln!(
                f,
                "  FAIL [{}]: {}",
                r.name,
                r.message.as_deref().unwrap_or("(no message)")
            )?;
        }
        Ok(())
    }
}

/// Run every check; `factory` creates a fresh writer for each one.
pub async fn run_conformance_suite<W, F, Fut>(factory: F) -> ConformanceReport
where
    W: ErpWriter,
    F: Fn() -> Fut,
    Fut: Future<Output = W>,
{
    let results = vec![
        CheckResult::from_result(
            "accepts_well_formed_payload",
            accepts_well_formed_payload(&factory().await).await,
        ),
        CheckResult::from_result(
            "resubmission_is_accepted",
            resubmission_is_accepted(&factory().await).await,
        ),
        CheckResult::from_result(
            "distinct_payloads_are_accepted",
            distinct_payloads_are_accepted(&factory().await).await,
        ),
    ];
    let passed = results.iter().filter(|r| r.passed).count();
    ConformanceReport {
        failed: results.len() - passed,
        passed,
        results,
    }
}

async fn accepts_well_formed_payload<W: ErpWriter>(writer: &W) -> Result<(), String> {
    let payload = make_payload("SKU-1", "5", "3")?;
    let receipt = submit(writer, &payload).await?;
    expect_success(&receipt)
}

async fn resubmission_is_accepted<W: ErpWriter>(writer: &W) -> Result<(), String> {
    let payload = make_payload("SKU-1", "5", "3")?;
    expect_success(&submit(writer, &payload).await?)?;
    expect_success(&submit(writer, &payload).await?)
}

async fn distinct_payloads_are_accepted<W: ErpWriter>(writer: &W) -> Result<(), String> {
    let first = make_payload("SKU-1", "5", "3")?;
    let second = make_payload("SKU-2", "0", "8")?;
    if first.etag == second.etag {
        return Err("distinct payloads produced the same etag".to_string());
    }
    expect_success(&submit(writer, &first).await?)?;
    expect_success(&submit(writer, &second).await?)
}

async fn submit<W: ErpWriter>(writer: &W, payload: &SyncPayload) -> Result<SyncReceipt, String> {
    let receipt = writer
        .submit(payload)
        .await
        .map_err(|e| format!("submit failed: {}", e))?;
    let ids = payload.item_ids();
    if let Some(stray) = receipt.item_errors.keys().find(|k| !ids.contains(&k.as_str())) {
        return Err(format!("receipt names item '{}' not in payload", stray));
    }
    Ok(receipt)
}

fn expect_success(receipt: &SyncReceipt) -> Result<(), String> {
    if !receipt.success {
        return Err(format!("expected success, got {:?}", receipt.item_errors));
    }
    if !receipt.item_errors.is_empty() {
        return Err("successful receipt carries item errors".to_string());
    }
    Ok(())
}

fn make_payload(item_id: &str, before: &str, after: &str) -> Result<SyncPayload, String> {
    let changes = vec![ChangeRecord {
        item_id: item_id.to_string(),
        name: format!("Conformance {}", item_id),
        field: ChangeField::Stock,
        before: before.to_string(),
        after: after.to_string(),
    }];
    let reason = Some("conformance");
    let etag = compute_etag(&changes, reason).map_err(|e| e.to_string())?;
    Ok(SyncPayload {
        changes,
        reason: reason.map(str::to_string),
        etag,
    })
}
