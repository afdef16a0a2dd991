use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Last-observed state of one source file, keyed by its path in a
/// [`MetadataSnapshot`]. `mod_time` is seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub mod_time: f64,
}

/// Path -> record mapping persisted between indexing runs. The sole durable
/// state of the pipeline; keys equal exactly the set of PDF files present in
/// the source folder as of the scan that produced it.
pub type MetadataSnapshot = BTreeMap<String, FileRecord>;

/// Diff of two snapshots. The three sets are pairwise disjoint; a path with
/// an unchanged modification time appears in none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}

/// A span of extracted text; the unit of embedding and indexing. Identity
/// for upsert/delete purposes is `source_path`: every chunk of one file is
/// replaced or removed together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub source_path: String,
    pub chunk_index: u64,
    pub page: u32,
    pub text: String,
}

/// One ranked hit returned by the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub source_path: String,
    pub score: f64,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkingOptions {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_chars: 500,
            overlap_chars: 100,
        }
    }
}
