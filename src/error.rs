//! Error types for the recorder library

use crate::media::MediaKind;
use thiserror::Error;

/// Errors surfaced by the permission gate, the recorder and the widget
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    /// Capture or recording primitives are not available on this platform
    #[error("Unsupported platform: {0}")]
    Unsupported(String),

    #[error("Permission to access the {0} was denied")]
    PermissionDenied(MediaKind),

    #[error("No {0} device available")]
    DeviceUnavailable(MediaKind),

    #[error("Recorder error: {0}")]
    Recorder(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl RecorderError {
    /// Whether the user can recover by retrying the action manually
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RecorderError::PermissionDenied(_) | RecorderError::DeviceUnavailable(_)
        )
    }
}

pub type RecorderResult<T> = Result<T, RecorderError>;
