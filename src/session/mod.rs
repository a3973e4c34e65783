//! Recording session management
//!
//! This module provides:
//! - `PermissionGate`: microphone + camera prompts merged into one stream
//! - `RecordingController`: the start/pause/resume/stop state machine
//! - `RecordingClock`: active recording time
//! - Session statistics

mod clock;
mod controller;
mod permission;
mod state;
mod stats;

pub use clock::RecordingClock;
pub use controller::{ArtifactSlot, RecordingController};
pub use permission::PermissionGate;
pub use state::{RecordingState, Transition};
pub use stats::SessionStats;
