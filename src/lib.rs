pub mod config;
pub mod error;
pub mod http;
pub mod media;
pub mod playback;
pub mod session;
pub mod widget;

pub use config::Config;
pub use error::{RecorderError, RecorderResult};
pub use http::{create_router, AppState};
pub use media::{
    CaptureStream, ChunkBuffer, ChunkFeeder, DeviceBehavior, MediaDevices, MediaKind,
    MediaRecorder, MediaTrack, RecorderEvent, RecorderFactory, VirtualDevices,
    VirtualRecorderConfig, VirtualRecorderFactory,
};
pub use playback::{Download, PlaybackAssembler, RecordedArtifact};
pub use session::{PermissionGate, RecordingController, RecordingState, SessionStats};
pub use widget::{Control, Notifier, TracingNotifier, VideoRecorder, ViewModel};
