pub mod answer;
pub mod chat;
pub mod chunking;
pub mod diff;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod indexer;
pub mod loader;
pub mod metadata;
pub mod models;
pub mod scan;
pub mod stores;
pub mod traits;

pub use answer::{IndexState, QaEngine};
pub use chat::{ChatModel, OllamaChat};
pub use chunking::{build_chunks, normalize_whitespace, split_chunks};
pub use diff::detect_changes;
pub use embeddings::{Embedder, OllamaEmbedder};
pub use error::{IngestError, QaError};
pub use extractor::{LopdfExtractor, PageText, PdfExtractor};
pub use indexer::{FailedFile, Indexer, SyncReport};
pub use loader::{DocumentLoader, PdfLoader};
pub use metadata::{load_snapshot, save_snapshot};
pub use models::{
    ChangeSet, ChunkingOptions, DocumentChunk, FileRecord, MetadataSnapshot, RetrievedChunk,
};
pub use scan::scan_folder;
pub use stores::QdrantStore;
pub use traits::VectorIndex;
