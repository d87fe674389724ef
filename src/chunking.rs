//! Overlapping text splitter for embedding-sized chunks.
//!
//! The splitter is a pure sliding window over characters: chunks are at
//! most `chunk_size` characters and consecutive chunks share exactly
//! `chunk_overlap` characters, so cross-boundary context survives the
//! split. It has no error conditions of its own.

/// Splits long text into bounded, overlapping chunks.
#[derive(Clone, Copy, Debug)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

/// Chunk size used by the ingestion pipeline, in characters.
pub const CHUNK_SIZE: usize = 512;
/// Overlap between consecutive chunks, in characters.
pub const CHUNK_OVERLAP: usize = 100;

impl TextSplitter {
    /// Creates a splitter producing chunks of at most `chunk_size`
    /// characters with `chunk_overlap` characters shared between
    /// consecutive chunks.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_overlap >= chunk_size` or `chunk_size == 0`; the
    /// window could never advance.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        assert!(
            chunk_overlap < chunk_size,
            "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        );
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Splitter with the ingestion pipeline's fixed parameters.
    pub fn ingestion_default() -> Self {
        Self::new(CHUNK_SIZE, CHUNK_OVERLAP)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits `text` into ordered, overlapping chunks.
    ///
    /// Empty input yields no chunks; input at most `chunk_size` characters
    /// long yields a single chunk equal to the input.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0usize;
        loop {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}
