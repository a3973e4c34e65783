use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::artifact::RecordedArtifact;
use crate::media::ChunkBuffer;

/// Scheme prefix of the object URLs handed out for artifacts
pub const OBJECT_URL_PREFIX: &str = "blob:webcam-recorder/";

/// Concatenates a session's fragments into a single playable blob
#[derive(Debug, Clone)]
pub struct PlaybackAssembler {
    mime_type: String,
    download_filename: Option<String>,
}

impl PlaybackAssembler {
    pub fn new(mime_type: impl Into<String>, download_filename: Option<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            download_filename: download_filename.filter(|name| !name.trim().is_empty()),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Drain `buffer` into one artifact.
    ///
    /// Fragments are joined in buffer order and the buffer is left empty.
    pub fn assemble(&self, buffer: &mut ChunkBuffer) -> RecordedArtifact {
        let chunks = buffer.drain();
        let chunk_count = chunks.len();

        let mut data = Vec::with_capacity(chunks.iter().map(|c| c.len()).sum());
        for chunk in chunks {
            data.extend_from_slice(&chunk.data);
        }

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let filename = self
            .download_filename
            .clone()
            .unwrap_or_else(|| default_filename(&self.mime_type, created_at));

        info!(
            "Assembled recording {}: {} chunks, {} bytes ({})",
            id,
            chunk_count,
            data.len(),
            self.mime_type
        );

        RecordedArtifact::new(
            id,
            object_url(id),
            self.mime_type.clone(),
            filename,
            chunk_count,
            data,
        )
    }
}

/// Object URL for an artifact ID
pub fn object_url(id: Uuid) -> String {
    format!("{}{}", OBJECT_URL_PREFIX, id)
}

/// Download filename used when none is configured
pub fn default_filename(mime_type: &str, created_at: DateTime<Utc>) -> String {
    format!(
        "recording-{}.{}",
        created_at.format("%Y%m%d-%H%M%S"),
        extension_for(mime_type)
    )
}

/// File extension for a container media type, ignoring codec parameters
pub fn extension_for(mime_type: &str) -> &str {
    let base = mime_type.split(';').next().unwrap_or_default().trim();
    let subtype = base.split('/').nth(1).unwrap_or_default();

    match subtype {
        "webm" => "webm",
        "mp4" => "mp4",
        "ogg" => "ogv",
        "x-matroska" => "mkv",
        "quicktime" => "mov",
        other if !other.is_empty() && other.chars().all(|c| c.is_ascii_alphanumeric()) => other,
        _ => "bin",
    }
}
