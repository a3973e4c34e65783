use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The assembled result of one completed recording session
#[derive(Debug, Clone, Serialize)]
pub struct RecordedArtifact {
    pub id: Uuid,

    /// Object URL the playback element and download link point at
    pub url: String,

    /// Media type of the container, e.g. `video/webm`
    pub mime_type: String,

    /// Suggested filename for the download link
    pub filename: String,

    /// Number of fragments concatenated into this artifact
    pub chunk_count: usize,

    pub size_bytes: usize,

    pub created_at: DateTime<Utc>,

    #[serde(skip)]
    data: Vec<u8>,
}

impl RecordedArtifact {
    pub(crate) fn new(
        id: Uuid,
        url: String,
        mime_type: String,
        filename: String,
        chunk_count: usize,
        data: Vec<u8>,
    ) -> Self {
        Self {
            id,
            url,
            mime_type,
            filename,
            chunk_count,
            size_bytes: data.len(),
            created_at: Utc::now(),
            data,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Link target for saving the artifact
    pub fn download(&self) -> Download {
        Download {
            href: self.url.clone(),
            filename: self.filename.clone(),
        }
    }
}

/// A download link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Download {
    pub href: String,
    pub filename: String,
}
