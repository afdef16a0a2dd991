use crate::chunking::build_chunks;
use crate::error::{IngestError, Result};
use crate::extractor::{LopdfExtractor, PdfExtractor};
use crate::models::{ChunkingOptions, DocumentChunk};
use std::path::Path;

/// Turns one source file into its embeddable chunks. The indexing
/// orchestrator only sees this seam, so tests can swap the PDF machinery
/// for a fake.
pub trait DocumentLoader {
    fn load_chunks(&self, path: &Path) -> Result<Vec<DocumentChunk>>;
}

/// Extracts page text with lopdf and splits it into overlapping chunks.
pub struct PdfLoader<X: PdfExtractor = LopdfExtractor> {
    extractor: X,
    options: ChunkingOptions,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            extractor: LopdfExtractor,
            options: ChunkingOptions::default(),
        }
    }
}

impl<X: PdfExtractor> PdfLoader<X> {
    pub fn new(extractor: X, options: ChunkingOptions) -> Self {
        Self { extractor, options }
    }
}

impl<X: PdfExtractor> DocumentLoader for PdfLoader<X> {
    fn load_chunks(&self, path: &Path) -> Result<Vec<DocumentChunk>> {
        path.file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| IngestError::MissingFileName(path.display().to_string()))?;

        let pages = self.extractor.extract_pages(path)?;
        build_chunks(&path.to_string_lossy(), &pages, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentLoader, PdfLoader};
    use crate::extractor::{PageText, PdfExtractor};
    use crate::models::ChunkingOptions;
    use crate::IngestError;
    use std::path::Path;

    struct CannedExtractor;

    impl PdfExtractor for CannedExtractor {
        fn extract_pages(&self, _path: &Path) -> Result<Vec<PageText>, IngestError> {
            Ok(vec![PageText {
                number: 1,
                text: "The quick brown fox jumps over the lazy dog".to_string(),
            }])
        }
    }

    #[test]
    fn loader_chunks_extracted_pages() {
        let loader = PdfLoader::new(
            CannedExtractor,
            ChunkingOptions {
                max_chars: 16,
                overlap_chars: 4,
            },
        );

        let chunks = loader.load_chunks(Path::new("/docs/fox.pdf")).unwrap();

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|chunk| chunk.source_path == "/docs/fox.pdf"));
    }
}
