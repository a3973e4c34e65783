use chrono::{DateTime, Utc};
use tracing::debug;

/// A single recorded fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in emission order (0-indexed, empty fragments not counted)
    pub index: usize,
    pub data: Vec<u8>,
    pub received_at: DateTime<Utc>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Append-only buffer of recorded fragments for one session
///
/// Fragments keep their arrival order. Zero-size fragments are discarded.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Chunk>,
    total_bytes: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment. Returns its index, or `None` if it was empty.
    pub fn push(&mut self, data: Vec<u8>) -> Option<usize> {
        if data.is_empty() {
            debug!("Discarding empty chunk");
            return None;
        }

        let index = self.chunks.len();
        self.total_bytes += data.len();
        self.chunks.push(Chunk {
            index,
            data,
            received_at: Utc::now(),
        });

        Some(index)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Remove and return every fragment, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<Chunk> {
        self.total_bytes = 0;
        std::mem::take(&mut self.chunks)
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total_bytes = 0;
    }
}
