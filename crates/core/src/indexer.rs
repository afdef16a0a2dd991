use crate::diff::detect_changes;
use crate::embeddings::Embedder;
use crate::loader::DocumentLoader;
use crate::metadata::{load_snapshot, save_snapshot};
use crate::scan::scan_folder;
use crate::traits::VectorIndex;
use crate::error::Result;
use crate::{IngestError, MetadataSnapshot};
use std::path::Path;
use tracing::{info, warn};

pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

/// Outcome of one synchronization run.
pub struct SyncReport {
    pub indexed: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub failed: Vec<FailedFile>,
}

/// Applies the minimal delta between the source folder and the vector index.
///
/// Each run scans the folder, diffs against the persisted snapshot, and only
/// touches the index for paths that were added, modified, or deleted since
/// the previous run. Re-running against an unchanged folder performs zero
/// embedding work.
pub struct Indexer<L, E, V> {
    loader: L,
    embedder: E,
    index: V,
}

impl<L, E, V> Indexer<L, E, V>
where
    L: DocumentLoader + Sync,
    E: Embedder + Send + Sync,
    V: VectorIndex + Send + Sync,
{
    pub fn new(loader: L, embedder: E, index: V) -> Self {
        Self {
            loader,
            embedder,
            index,
        }
    }

    /// Runs one best-effort synchronization pass.
    ///
    /// A file that fails to load, embed, or upsert is recorded in the report
    /// and the run continues; the new snapshot is persisted unconditionally
    /// afterwards, so a failed file is retried only once its modification
    /// time changes again. Only scan and snapshot I/O abort the run.
    pub async fn synchronize(&self, folder: &Path, metadata_path: &Path) -> Result<SyncReport> {
        let current = scan_folder(folder)?;
        let previous = match load_snapshot(metadata_path) {
            Ok(snapshot) => snapshot,
            Err(IngestError::MissingSnapshot(_)) => MetadataSnapshot::new(),
            Err(error) => return Err(error),
        };

        let changes = detect_changes(&current, &previous);
        info!(
            added = changes.added.len(),
            modified = changes.modified.len(),
            deleted = changes.deleted.len(),
            "synchronizing folder"
        );

        let mut report = SyncReport {
            indexed: 0,
            deleted: 0,
            unchanged: current.len() - changes.added.len() - changes.modified.len(),
            failed: Vec::new(),
        };

        let mut storage_checked = false;
        for path in changes.added.iter().chain(changes.modified.iter()) {
            let clear_stale = changes.modified.contains(path);
            match self.index_file(path, clear_stale, &mut storage_checked).await {
                Ok(()) => report.indexed += 1,
                Err(reason) => {
                    warn!(%path, %reason, "skipping file");
                    report.failed.push(FailedFile {
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }

        for path in &changes.deleted {
            match self.index.delete_document(path).await {
                Ok(()) => report.deleted += 1,
                Err(error) => {
                    warn!(%path, reason = %error, "failed to delete index entries");
                    report.failed.push(FailedFile {
                        path: path.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        save_snapshot(metadata_path, &current)?;
        Ok(report)
    }

    async fn index_file(
        &self,
        path: &str,
        clear_stale: bool,
        storage_checked: &mut bool,
    ) -> Result<(), String> {
        // A modified file may split into fewer chunks than last time, so its
        // old chunks are removed before the fresh set goes in.
        if clear_stale {
            self.index
                .delete_document(path)
                .await
                .map_err(|error| error.to_string())?;
        }

        let chunks = self
            .loader
            .load_chunks(Path::new(path))
            .map_err(|error| error.to_string())?;
        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|error| error.to_string())?;

        if !*storage_checked {
            if let Some(first) = embeddings.first() {
                self.index
                    .ensure_ready(first.len())
                    .await
                    .map_err(|error| error.to_string())?;
                *storage_checked = true;
            }
        }

        self.index
            .upsert_chunks(&chunks, &embeddings)
            .await
            .map_err(|error| error.to_string())
    }
}
