use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::WriteError;
use crate::record::{SyncPayload, SyncReceipt};
use crate::traits::ErpWriter;

/// Writes each payload to `<dir>/<etag>.json` for a transport to pick up.
///
/// A payload whose file already exists is accepted without rewriting it.
#[derive(Debug, Clone)]
pub struct OutboxWriter {
    dir: PathBuf,
}

impl OutboxWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OutboxWriter { dir: dir.into() }
    }

    pub fn path_for(&self, payload: &SyncPayload) -> PathBuf {
        self.dir.join(format!("{}.json", payload.etag))
    }
}

#[async_trait]
impl ErpWriter for OutboxWriter {
    async fn submit(&self, payload: &SyncPayload) -> Result<SyncReceipt, WriteError> {
        let path = self.path_for(payload);
        if tokio::fs::try_exists(&path).await? {
            tracing::info!(path = %path.display(), "payload already in outbox");
            return Ok(SyncReceipt::accepted());
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let body = serde_json::to_vec_pretty(payload)?;
        // Write then rename so a reader never sees a partial file.
        let partial = path.with_extension("json.partial");
        tokio::fs::write(&partial, body).await?;
        tokio::fs::rename(&partial, &path).await?;

        tracing::info!(
            path = %path.display(),
            changes = payload.changes.len(),
            "payload written to outbox"
        );
        Ok(SyncReceipt::accepted())
    }
}
