use crate::error::{IngestError, Result};
use crate::extractor::PageText;
use crate::models::{ChunkingOptions, DocumentChunk};

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{a0}', " ")
}

/// Splits normalized text into overlapping character windows of at most
/// `max_chars`, each window starting `max_chars - overlap_chars` after the
/// previous one. Short inputs come back as a single chunk.
pub fn split_chunks(text: &str, options: ChunkingOptions) -> Result<Vec<String>> {
    if options.max_chars == 0 {
        return Err(IngestError::InvalidChunkConfig(
            "max_chars must be non-zero".to_string(),
        ));
    }
    if options.overlap_chars >= options.max_chars {
        return Err(IngestError::InvalidChunkConfig(format!(
            "overlap {} must be smaller than max chunk size {}",
            options.overlap_chars, options.max_chars
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let stride = options.max_chars - options.overlap_chars;

    let mut start = 0;
    while start < chars.len() {
        let end = (start + options.max_chars).min(chars.len());
        let piece: String = chars[start..end].iter().collect();
        if !piece.trim().is_empty() {
            chunks.push(piece);
        }
        if end == chars.len() {
            break;
        }
        start += stride;
    }

    Ok(chunks)
}

/// Builds the full chunk list for one document from its extracted pages,
/// numbering chunks with a document-global running index.
pub fn build_chunks(
    source_path: &str,
    pages: &[PageText],
    options: ChunkingOptions,
) -> Result<Vec<DocumentChunk>> {
    let mut chunks = Vec::new();
    let mut cursor = 0u64;

    for page in pages {
        let normalized = normalize_whitespace(&page.text);
        for piece in split_chunks(&normalized, options)? {
            chunks.push(DocumentChunk {
                source_path: source_path.to_string(),
                chunk_index: cursor,
                page: page.number,
                text: piece,
            });
            cursor = cursor.saturating_add(1);
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::{build_chunks, normalize_whitespace, split_chunks};
    use crate::extractor::PageText;
    use crate::models::ChunkingOptions;

    #[test]
    fn whitespace_is_normalized() {
        let input = "A  \t  lot\nof   spacing";
        assert_eq!(normalize_whitespace(input), "A lot of spacing");
    }

    #[test]
    fn short_text_is_one_chunk() {
        let options = ChunkingOptions::default();
        let chunks = split_chunks("short text", options).unwrap();
        assert_eq!(chunks, vec!["short text".to_string()]);
    }

    #[test]
    fn long_text_overlaps_by_configured_amount() {
        let options = ChunkingOptions {
            max_chars: 10,
            overlap_chars: 4,
        };
        let text = "abcdefghijklmnopqrst";

        let chunks = split_chunks(text, options).unwrap();

        assert_eq!(chunks[0], "abcdefghij");
        assert_eq!(chunks[1], "ghijklmnop");
        // Each window repeats the last 4 chars of its predecessor.
        assert!(chunks
            .windows(2)
            .all(|pair| pair[1].starts_with(&pair[0][pair[0].len() - 4..])));
    }

    #[test]
    fn zero_max_chars_is_rejected() {
        let options = ChunkingOptions {
            max_chars: 0,
            overlap_chars: 0,
        };
        assert!(split_chunks("anything", options).is_err());
    }

    #[test]
    fn chunk_index_runs_across_pages() {
        let options = ChunkingOptions {
            max_chars: 8,
            overlap_chars: 2,
        };
        let pages = vec![
            PageText {
                number: 1,
                text: "first page body text".to_string(),
            },
            PageText {
                number: 2,
                text: "second page body text".to_string(),
            },
        ];

        let chunks = build_chunks("/docs/a.pdf", &pages, options).unwrap();

        assert!(chunks.len() > 2);
        let indices: Vec<u64> = chunks.iter().map(|chunk| chunk.chunk_index).collect();
        assert_eq!(indices, (0..chunks.len() as u64).collect::<Vec<_>>());
        assert!(chunks.iter().all(|chunk| chunk.source_path == "/docs/a.pdf"));
        assert_eq!(chunks.first().map(|chunk| chunk.page), Some(1));
        assert_eq!(chunks.last().map(|chunk| chunk.page), Some(2));
    }
}
