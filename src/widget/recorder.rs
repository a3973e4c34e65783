use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::notifier::Notifier;
use super::view::{self, Control, ViewInput, ViewModel};
use crate::config::RecorderConfig;
use crate::error::{RecorderError, RecorderResult};
use crate::media::{MediaDevices, RecorderFactory};
use crate::playback::PlaybackAssembler;
use crate::session::{ArtifactSlot, PermissionGate, RecordingController, RecordingState, SessionStats};

/// Alert shown when the microphone or camera prompt fails
pub const ACCESS_DENIED_ALERT: &str = "Permission to access camera and microphone was denied.";

/// Camera + microphone video recorder with a downloadable preview
pub struct VideoRecorder {
    gate: PermissionGate,
    controller: RecordingController,
    notifier: Arc<dyn Notifier>,
    last_alert: Option<String>,
}

impl VideoRecorder {
    /// Create the widget.
    ///
    /// Fails with [`RecorderError::Unsupported`] when the platform has no
    /// capture support or cannot record the configured media type.
    pub fn new(
        devices: Arc<dyn MediaDevices>,
        factory: Arc<dyn RecorderFactory>,
        settings: RecorderConfig,
        notifier: Arc<dyn Notifier>,
    ) -> RecorderResult<Self> {
        if !devices.is_supported() {
            error!("Media capture is not supported by backend {}", devices.name());
            return Err(RecorderError::Unsupported(format!(
                "media capture is not available ({})",
                devices.name()
            )));
        }

        if !factory.is_supported(&settings.mime_type) {
            error!("Recording {} is not supported", settings.mime_type);
            return Err(RecorderError::Unsupported(format!(
                "recording {} is not available",
                settings.mime_type
            )));
        }

        let assembler = PlaybackAssembler::new(settings.mime_type, settings.download_filename);

        info!(
            "Video recorder ready ({} devices, {})",
            devices.name(),
            assembler.mime_type()
        );

        Ok(Self {
            gate: PermissionGate::new(devices),
            controller: RecordingController::new(factory, assembler),
            notifier,
            last_alert: None,
        })
    }

    pub fn is_granted(&self) -> bool {
        self.gate.is_granted()
    }

    pub fn state(&self) -> RecordingState {
        self.controller.state()
    }

    /// Ask for microphone and camera access.
    ///
    /// Clears the previous recording first. Ignored while a session is
    /// running.
    pub async fn request_access(&mut self) -> RecorderResult<()> {
        if self.controller.state().is_active() {
            debug!("Access request ignored while {}", self.controller.state());
            return Ok(());
        }

        self.controller.clear_artifact();
        self.last_alert = None;

        match self.gate.request_access().await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.raise(&e);
                Err(e)
            }
        }
    }

    pub async fn start(&mut self) -> RecorderResult<()> {
        self.last_alert = None;

        let result = self.controller.start(self.gate.stream()).await;
        if let Err(e) = &result {
            self.raise(e);
        }
        result
    }

    pub async fn pause(&mut self) -> RecorderResult<()> {
        self.controller.pause().await
    }

    pub async fn resume(&mut self) -> RecorderResult<()> {
        self.controller.resume().await
    }

    /// Stop the session and revoke access; the recording appears once the
    /// recorder has flushed.
    pub async fn stop(&mut self) -> RecorderResult<()> {
        if !self.controller.state().is_active() {
            debug!("Stop ignored while {}", self.controller.state());
            return Ok(());
        }

        let result = self.controller.stop().await;
        self.gate.revoke();

        if let Err(e) = &result {
            self.raise(e);
        }
        result
    }

    /// Run the action behind a button
    pub async fn dispatch(&mut self, control: Control) -> RecorderResult<()> {
        debug!("Dispatching {}", control);

        match control {
            Control::GetCameraAccess => self.request_access().await,
            Control::StartRecording => self.start().await,
            Control::PauseRecording => self.pause().await,
            Control::ResumeRecording => self.resume().await,
            Control::StopRecording => self.stop().await,
        }
    }

    pub fn view(&self) -> ViewModel {
        let artifact = self.controller.artifact();

        view::render(ViewInput {
            granted: self.gate.is_granted(),
            state: self.controller.state(),
            artifact: artifact.as_deref(),
            live_stream: self.gate.stream().map(|s| s.id()),
            recording_length: self.controller.recording_length(),
            alert: self.last_alert.as_deref(),
        })
    }

    pub fn artifact(&self) -> ArtifactSlot {
        self.controller.artifact()
    }

    /// Receiver notified whenever the recording is published or cleared
    pub fn artifact_updates(&self) -> watch::Receiver<ArtifactSlot> {
        self.controller.artifact_updates()
    }

    /// Wait until the last session has been assembled
    pub async fn finalized(&mut self) {
        self.controller.finalized().await
    }

    pub async fn stats(&self) -> SessionStats {
        SessionStats {
            state: self.controller.state(),
            granted: self.gate.is_granted(),
            sessions_started: self.controller.sessions_started(),
            chunks_buffered: self.controller.buffered_chunks().await,
            bytes_buffered: self.controller.buffered_bytes().await,
            recording_length_secs: self.controller.recording_length().as_secs_f64(),
            artifact_bytes: self.controller.artifact().map(|a| a.size_bytes),
        }
    }

    fn raise(&mut self, error: &RecorderError) {
        let message = match error {
            RecorderError::PermissionDenied(_) | RecorderError::DeviceUnavailable(_) => {
                ACCESS_DENIED_ALERT.to_string()
            }
            other => other.to_string(),
        };

        warn!("{}", error);
        self.notifier.alert(&message);
        self.last_alert = Some(message);
    }
}
