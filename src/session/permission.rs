use std::sync::Arc;
use tracing::{info, warn};

use crate::error::RecorderResult;
use crate::media::{CaptureStream, MediaConstraints, MediaDevices};

/// Requests camera and microphone access and holds the combined stream
pub struct PermissionGate {
    devices: Arc<dyn MediaDevices>,
    stream: Option<CaptureStream>,
}

impl PermissionGate {
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self {
            devices,
            stream: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.devices.is_supported()
    }

    /// Whether access is currently granted
    pub fn is_granted(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream(&self) -> Option<&CaptureStream> {
        self.stream.as_ref()
    }

    /// Prompt for the microphone, then for the camera, and combine the tracks.
    ///
    /// On failure the gate keeps whatever it held before the request.
    pub async fn request_access(&mut self) -> RecorderResult<&CaptureStream> {
        info!("Requesting microphone and camera access ({})", self.devices.name());

        let audio = self
            .devices
            .get_user_media(MediaConstraints::audio_only())
            .await
            .inspect_err(|e| warn!("Microphone request failed: {}", e))?;

        let video = self
            .devices
            .get_user_media(MediaConstraints::video_only())
            .await
            .inspect_err(|e| warn!("Camera request failed: {}", e))?;

        let stream = CaptureStream::combine(&video, &audio);

        info!(
            "Access granted: stream {} ({} tracks)",
            stream.id(),
            stream.tracks().len()
        );

        Ok(&*self.stream.insert(stream))
    }

    /// Drop the granted stream, forcing a new request before the next session
    pub fn revoke(&mut self) -> Option<CaptureStream> {
        let stream = self.stream.take();
        if let Some(stream) = &stream {
            info!("Access revoked for stream {}", stream.id());
        }
        stream
    }
}
