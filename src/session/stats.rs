use serde::{Deserialize, Serialize};

use super::state::RecordingState;

/// Statistics about the recorder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current recording state
    pub state: RecordingState,

    /// Whether camera and microphone access is granted
    pub granted: bool,

    /// Number of sessions started since creation
    pub sessions_started: u64,

    /// Fragments buffered for the current session
    pub chunks_buffered: usize,

    /// Bytes buffered for the current session
    pub bytes_buffered: usize,

    /// Active recording time in seconds, paused intervals excluded
    pub recording_length_secs: f64,

    /// Size of the current recorded artifact, if any
    pub artifact_bytes: Option<usize>,
}
