// In-process media backend with virtual camera and microphone
//
// Used by the binary and by tests. Devices answer permission prompts from a
// configured behaviour; recorders emit synthetic fragments on a timeslice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::backend::{
    CaptureStream, MediaConstraints, MediaDevices, MediaKind, MediaRecorder, MediaTrack,
    RecorderEvent, RecorderFactory,
};
use crate::error::{RecorderError, RecorderResult};
use crate::session::RecordingState;

/// How a virtual device answers a permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceBehavior {
    #[default]
    Grant,
    Deny,
    /// No such device is attached
    Missing,
}

impl DeviceBehavior {
    fn to_u8(self) -> u8 {
        match self {
            DeviceBehavior::Grant => 0,
            DeviceBehavior::Deny => 1,
            DeviceBehavior::Missing => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => DeviceBehavior::Grant,
            1 => DeviceBehavior::Deny,
            _ => DeviceBehavior::Missing,
        }
    }
}

/// Virtual camera and microphone
pub struct VirtualDevices {
    audio: AtomicU8,
    video: AtomicU8,
    supported: AtomicBool,
    prompts: AtomicUsize,
}

impl VirtualDevices {
    pub fn new(audio: DeviceBehavior, video: DeviceBehavior) -> Self {
        Self {
            audio: AtomicU8::new(audio.to_u8()),
            video: AtomicU8::new(video.to_u8()),
            supported: AtomicBool::new(true),
            prompts: AtomicUsize::new(0),
        }
    }

    /// Devices that grant every prompt
    pub fn granting() -> Self {
        Self::new(DeviceBehavior::Grant, DeviceBehavior::Grant)
    }

    /// A platform without any capture support
    pub fn unsupported() -> Self {
        let devices = Self::granting();
        devices.supported.store(false, Ordering::SeqCst);
        devices
    }

    /// Change how future prompts for `kind` are answered
    pub fn set_behavior(&self, kind: MediaKind, behavior: DeviceBehavior) {
        self.slot(kind).store(behavior.to_u8(), Ordering::SeqCst);
    }

    pub fn behavior(&self, kind: MediaKind) -> DeviceBehavior {
        DeviceBehavior::from_u8(self.slot(kind).load(Ordering::SeqCst))
    }

    /// Number of permission prompts shown so far
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    fn slot(&self, kind: MediaKind) -> &AtomicU8 {
        match kind {
            MediaKind::Audio => &self.audio,
            MediaKind::Video => &self.video,
        }
    }

    fn answer(&self, kind: MediaKind) -> RecorderResult<MediaTrack> {
        match self.behavior(kind) {
            DeviceBehavior::Grant => {
                let label = match kind {
                    MediaKind::Audio => "Virtual Microphone",
                    MediaKind::Video => "Virtual Camera",
                };
                Ok(MediaTrack::new(kind, label))
            }
            DeviceBehavior::Deny => Err(RecorderError::PermissionDenied(kind)),
            DeviceBehavior::Missing => Err(RecorderError::DeviceUnavailable(kind)),
        }
    }
}

impl Default for VirtualDevices {
    fn default() -> Self {
        Self::granting()
    }
}

#[async_trait]
impl MediaDevices for VirtualDevices {
    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::SeqCst)
    }

    async fn get_user_media(&self, constraints: MediaConstraints) -> RecorderResult<Vec<MediaTrack>> {
        if !self.is_supported() {
            return Err(RecorderError::Unsupported(
                "media devices are not available".to_string(),
            ));
        }

        self.prompts.fetch_add(1, Ordering::SeqCst);

        // Waiting for the user to answer the prompt
        tokio::task::yield_now().await;

        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(self.answer(MediaKind::Audio)?);
        }
        if constraints.video {
            tracks.push(self.answer(MediaKind::Video)?);
        }

        debug!("Virtual prompt granted {} track(s)", tracks.len());

        Ok(tracks)
    }

    fn name(&self) -> &str {
        "virtual"
    }
}

/// Configuration for virtual recorders
#[derive(Debug, Clone)]
pub struct VirtualRecorderConfig {
    /// Size of each generated fragment in bytes
    pub chunk_size: usize,
    /// Interval between generated fragments; `None` only emits fed fragments
    pub timeslice: Option<Duration>,
    /// Size of the trailing fragment flushed on stop (0 emits an empty one)
    pub final_chunk_size: usize,
    /// Media types the recorder accepts
    pub supported_mime_types: Vec<String>,
}

impl Default for VirtualRecorderConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            timeslice: Some(Duration::from_millis(250)),
            final_chunk_size: 1024,
            supported_mime_types: vec!["video/webm".to_string(), "video/mp4".to_string()],
        }
    }
}

impl VirtualRecorderConfig {
    /// Recorder that only emits what a [`ChunkFeeder`] hands it, plus an
    /// empty fragment on stop
    pub fn manual() -> Self {
        Self {
            chunk_size: 0,
            timeslice: None,
            final_chunk_size: 0,
            ..Self::default()
        }
    }
}

/// Currently running recorder, reachable by feeders
struct LiveRecorder {
    events: mpsc::Sender<RecorderEvent>,
    state: watch::Receiver<RecordingState>,
}

type LiveSlot = Arc<Mutex<Option<LiveRecorder>>>;

/// Produces a [`VirtualRecorder`] per session
pub struct VirtualRecorderFactory {
    config: VirtualRecorderConfig,
    live: LiveSlot,
    created: AtomicUsize,
}

impl VirtualRecorderFactory {
    pub fn new(config: VirtualRecorderConfig) -> Self {
        Self {
            config,
            live: Arc::new(Mutex::new(None)),
            created: AtomicUsize::new(0),
        }
    }

    /// Handle for injecting fragments into whichever recorder is running
    pub fn feeder(&self) -> ChunkFeeder {
        ChunkFeeder {
            live: Arc::clone(&self.live),
        }
    }

    /// Number of recorders created so far
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl Default for VirtualRecorderFactory {
    fn default() -> Self {
        Self::new(VirtualRecorderConfig::default())
    }
}

impl RecorderFactory for VirtualRecorderFactory {
    fn is_supported(&self, mime_type: &str) -> bool {
        let base = mime_type.split(';').next().unwrap_or_default().trim();
        self.config
            .supported_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(base))
    }

    fn create(
        &self,
        stream: &CaptureStream,
        mime_type: &str,
    ) -> RecorderResult<Box<dyn MediaRecorder>> {
        if !self.is_supported(mime_type) {
            return Err(RecorderError::Unsupported(format!(
                "media type {} is not supported",
                mime_type
            )));
        }

        if !stream.has_video() {
            return Err(RecorderError::Recorder(
                "capture stream has no video track".to_string(),
            ));
        }

        self.created.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(VirtualRecorder::new(
            stream.id(),
            mime_type.to_string(),
            self.config.clone(),
            Arc::clone(&self.live),
        )))
    }
}

/// Recorder emitting synthetic fragments
pub struct VirtualRecorder {
    stream_id: Uuid,
    mime_type: String,
    config: VirtualRecorderConfig,
    state: watch::Sender<RecordingState>,
    events: Option<mpsc::Sender<RecorderEvent>>,
    generator: Option<JoinHandle<()>>,
    live: LiveSlot,
}

impl VirtualRecorder {
    fn new(stream_id: Uuid, mime_type: String, config: VirtualRecorderConfig, live: LiveSlot) -> Self {
        let (state, _) = watch::channel(RecordingState::Inactive);

        Self {
            stream_id,
            mime_type,
            config,
            state,
            events: None,
            generator: None,
            live,
        }
    }

    fn spawn_generator(&self, interval: Duration, events: mpsc::Sender<RecorderEvent>) -> JoinHandle<()> {
        let state = self.state.subscribe();
        let chunk_size = self.config.chunk_size;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            let mut sequence: u8 = 0;

            loop {
                ticker.tick().await;

                let recording = *state.borrow() == RecordingState::Recording;
                if !recording {
                    continue;
                }

                if events
                    .send(RecorderEvent::DataAvailable(vec![sequence; chunk_size]))
                    .await
                    .is_err()
                {
                    break;
                }

                sequence = sequence.wrapping_add(1);
            }
        })
    }

    fn current(&self) -> RecordingState {
        *self.state.borrow()
    }

    fn invalid_state(&self, action: &str) -> RecorderError {
        RecorderError::Recorder(format!("cannot {} while {}", action, self.current()))
    }
}

#[async_trait]
impl MediaRecorder for VirtualRecorder {
    async fn start(&mut self) -> RecorderResult<mpsc::Receiver<RecorderEvent>> {
        if self.current() != RecordingState::Inactive || self.events.is_some() {
            return Err(self.invalid_state("start"));
        }

        info!(
            "Starting virtual recorder on stream {} ({})",
            self.stream_id, self.mime_type
        );

        let (tx, rx) = mpsc::channel(100);
        self.state.send_replace(RecordingState::Recording);

        if let Some(interval) = self.config.timeslice {
            self.generator = Some(self.spawn_generator(interval, tx.clone()));
        }

        {
            let mut live = self.live.lock().await;
            *live = Some(LiveRecorder {
                events: tx.clone(),
                state: self.state.subscribe(),
            });
        }

        self.events = Some(tx);

        Ok(rx)
    }

    async fn pause(&mut self) -> RecorderResult<()> {
        if self.current() != RecordingState::Recording {
            return Err(self.invalid_state("pause"));
        }

        self.state.send_replace(RecordingState::Paused);
        Ok(())
    }

    async fn resume(&mut self) -> RecorderResult<()> {
        if self.current() != RecordingState::Paused {
            return Err(self.invalid_state("resume"));
        }

        self.state.send_replace(RecordingState::Recording);
        Ok(())
    }

    async fn stop(&mut self) -> RecorderResult<()> {
        let Some(events) = self.events.take() else {
            return Ok(());
        };

        info!("Stopping virtual recorder on stream {}", self.stream_id);

        if let Some(generator) = self.generator.take() {
            generator.abort();
            let _ = generator.await;
        }

        self.state.send_replace(RecordingState::Inactive);

        {
            let mut live = self.live.lock().await;
            *live = None;
        }

        // Flush whatever the encoder still holds, then signal completion
        let tail = vec![0xff; self.config.final_chunk_size];
        if events.send(RecorderEvent::DataAvailable(tail)).await.is_err()
            || events.send(RecorderEvent::Stopped).await.is_err()
        {
            warn!("Recorder events dropped: receiver closed before finalization");
        }

        Ok(())
    }

    fn state(&self) -> RecordingState {
        self.current()
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

impl Drop for VirtualRecorder {
    fn drop(&mut self) {
        if let Some(generator) = self.generator.take() {
            generator.abort();
        }

        // Dropped while running: release the feeder's sender so the event
        // stream closes
        if self.events.take().is_some() {
            if let Ok(mut live) = self.live.try_lock() {
                *live = None;
            }
        }
    }
}

/// Injects fragments into the running virtual recorder
#[derive(Clone)]
pub struct ChunkFeeder {
    live: LiveSlot,
}

impl ChunkFeeder {
    /// Emit one fragment.
    ///
    /// Returns `false` when no recorder is running or it is paused.
    pub async fn emit(&self, data: Vec<u8>) -> bool {
        let live = self.live.lock().await;
        let Some(recorder) = live.as_ref() else {
            return false;
        };

        let recording = *recorder.state.borrow() == RecordingState::Recording;
        if !recording {
            return false;
        }

        recorder
            .events
            .send(RecorderEvent::DataAvailable(data))
            .await
            .is_ok()
    }
}
