use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::playback::{Download, RecordedArtifact};
use crate::session::RecordingState;

/// A user action exposed as a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    GetCameraAccess,
    StartRecording,
    PauseRecording,
    ResumeRecording,
    StopRecording,
}

impl Control {
    pub fn label(self) -> &'static str {
        match self {
            Control::GetCameraAccess => "Get Camera Access",
            Control::StartRecording => "Start Recording",
            Control::PauseRecording => "Pause Recording",
            Control::ResumeRecording => "Resume Recording",
            Control::StopRecording => "Stop Recording",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The visible controls for a permission/recording state
pub fn controls_for(granted: bool, state: RecordingState) -> Vec<Control> {
    if !granted {
        return vec![Control::GetCameraAccess];
    }

    match state {
        RecordingState::Inactive => vec![Control::StartRecording],
        RecordingState::Recording => vec![Control::PauseRecording, Control::StopRecording],
        RecordingState::Paused => vec![Control::ResumeRecording],
    }
}

/// Playback element plus download link for a recorded artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playback {
    pub artifact_id: Uuid,
    pub src: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub download: Download,
}

impl From<&RecordedArtifact> for Playback {
    fn from(artifact: &RecordedArtifact) -> Self {
        Self {
            artifact_id: artifact.id,
            src: artifact.url.clone(),
            mime_type: artifact.mime_type.clone(),
            size_bytes: artifact.size_bytes,
            download: artifact.download(),
        }
    }
}

/// Everything the view is computed from
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    pub granted: bool,
    pub state: RecordingState,
    pub artifact: Option<&'a RecordedArtifact>,
    /// Stream bound to the live preview element
    pub live_stream: Option<Uuid>,
    pub recording_length: Duration,
    pub alert: Option<&'a str>,
}

/// Rendered widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub controls: Vec<Control>,
    pub live_preview: Option<Uuid>,
    pub recording_length_secs: u64,
    pub playback: Option<Playback>,
    pub alert: Option<String>,
}

impl ViewModel {
    pub fn shows(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }
}

/// Pure rendering of the widget state
pub fn render(input: ViewInput<'_>) -> ViewModel {
    ViewModel {
        controls: controls_for(input.granted, input.state),
        live_preview: if input.state.is_active() {
            input.live_stream
        } else {
            None
        },
        recording_length_secs: input.recording_length.as_secs(),
        playback: input.artifact.map(Playback::from),
        alert: input.alert.map(str::to_string),
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alert) = &self.alert {
            writeln!(f, "! {}", alert)?;
        }

        let buttons: Vec<String> = self.controls.iter().map(|c| format!("[{}]", c)).collect();
        writeln!(f, "{}", buttons.join(" "))?;

        match self.live_preview {
            Some(stream) => writeln!(f, "<video live={}>", stream)?,
            None => writeln!(f, "<video>")?,
        }

        write!(f, "Recording Length: {} seconds", self.recording_length_secs)?;

        if let Some(playback) = &self.playback {
            write!(
                f,
                "\n<video src={} type={}>\n<a download={} href={}>Download Recording</a>",
                playback.src, playback.mime_type, playback.download.filename, playback.download.href
            )?;
        }

        Ok(())
    }
}
