pub mod backend;
pub mod chunk;
pub mod virtual_backend;

pub use backend::{
    CaptureStream, MediaConstraints, MediaDevices, MediaKind, MediaRecorder, MediaTrack,
    RecorderEvent, RecorderFactory,
};
pub use chunk::{Chunk, ChunkBuffer};
pub use virtual_backend::{
    ChunkFeeder, DeviceBehavior, VirtualDevices, VirtualRecorder, VirtualRecorderConfig,
    VirtualRecorderFactory,
};
