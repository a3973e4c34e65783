use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::RecorderResult;
use crate::session::RecordingState;

/// Kind of media a track carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Microphone input
    Audio,
    /// Camera input
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "microphone"),
            MediaKind::Video => write!(f, "camera"),
        }
    }
}

/// Which kinds of media a single permission prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl MediaConstraints {
    pub fn audio_only() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }

    pub fn video_only() -> Self {
        Self {
            audio: false,
            video: true,
        }
    }
}

/// A single live capture track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaTrack {
    pub id: Uuid,
    pub kind: MediaKind,
    /// Human readable device label
    pub label: String,
}

impl MediaTrack {
    pub fn new(kind: MediaKind, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
        }
    }
}

/// Combined live audio+video stream handed to a recorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureStream {
    id: Uuid,
    tracks: Vec<MediaTrack>,
}

impl CaptureStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracks,
        }
    }

    /// Merge the video tracks of one grant with the audio tracks of another.
    ///
    /// Video tracks come first, followed by audio tracks. Tracks of the other
    /// kind in either input are ignored.
    pub fn combine(video_grant: &[MediaTrack], audio_grant: &[MediaTrack]) -> Self {
        let tracks = video_grant
            .iter()
            .filter(|t| t.kind == MediaKind::Video)
            .chain(audio_grant.iter().filter(|t| t.kind == MediaKind::Audio))
            .cloned()
            .collect();

        Self::new(tracks)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn tracks_of(&self, kind: MediaKind) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(move |t| t.kind == kind)
    }

    pub fn has_audio(&self) -> bool {
        self.tracks_of(MediaKind::Audio).next().is_some()
    }

    pub fn has_video(&self) -> bool {
        self.tracks_of(MediaKind::Video).next().is_some()
    }
}

/// Events emitted by a running recorder, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// A fragment of encoded media. May be empty.
    DataAvailable(Vec<u8>),
    /// The recorder flushed everything it had and finished
    Stopped,
}

/// Media device access (permission prompts)
///
/// Implementations:
/// - Virtual: configurable grant/deny devices (demo and tests)
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Whether capture is available at all on this platform
    fn is_supported(&self) -> bool;

    /// Prompt the user for the requested media and return the granted tracks
    async fn get_user_media(&self, constraints: MediaConstraints) -> RecorderResult<Vec<MediaTrack>>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// A recorder bound to one capture stream for one session
#[async_trait]
pub trait MediaRecorder: Send + Sync {
    /// Begin capture.
    ///
    /// Returns a channel receiver carrying recorded data followed by a single
    /// [`RecorderEvent::Stopped`] once `stop` has flushed all data.
    async fn start(&mut self) -> RecorderResult<mpsc::Receiver<RecorderEvent>>;

    async fn pause(&mut self) -> RecorderResult<()>;

    async fn resume(&mut self) -> RecorderResult<()>;

    /// Request finalization. Completion is signalled through the event channel.
    async fn stop(&mut self) -> RecorderResult<()>;

    fn state(&self) -> RecordingState;

    fn mime_type(&self) -> &str;
}

/// Creates a fresh recorder for every recording session
pub trait RecorderFactory: Send + Sync {
    /// Whether recorders for this media type can be created
    fn is_supported(&self, mime_type: &str) -> bool;

    fn create(
        &self,
        stream: &CaptureStream,
        mime_type: &str,
    ) -> RecorderResult<Box<dyn MediaRecorder>>;
}
