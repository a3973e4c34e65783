use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    #[default]
    Inactive,
    /// Currently recording
    Recording,
    /// Recording is paused
    Paused,
}

/// A user-initiated change to the recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Start,
    Pause,
    Resume,
    Stop,
}

impl RecordingState {
    /// The state reached by applying `transition`, or `None` if it is not
    /// allowed from here.
    pub fn apply(self, transition: Transition) -> Option<RecordingState> {
        use RecordingState::*;
        use Transition::*;

        match (self, transition) {
            (Inactive, Start) => Some(Recording),
            (Recording, Pause) => Some(Paused),
            (Paused, Resume) => Some(Recording),
            (Recording, Stop) | (Paused, Stop) => Some(Inactive),
            (Inactive, Pause | Resume | Stop)
            | (Recording, Start | Resume)
            | (Paused, Start | Pause) => None,
        }
    }

    /// Whether a recorder exists for this state
    pub fn is_active(self) -> bool {
        match self {
            RecordingState::Inactive => false,
            RecordingState::Recording | RecordingState::Paused => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordingState::Inactive => "inactive",
            RecordingState::Recording => "recording",
            RecordingState::Paused => "paused",
        }
    }
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
