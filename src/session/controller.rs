use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::clock::RecordingClock;
use super::state::{RecordingState, Transition};
use crate::error::RecorderResult;
use crate::media::{CaptureStream, ChunkBuffer, MediaRecorder, RecorderEvent, RecorderFactory};
use crate::playback::{PlaybackAssembler, RecordedArtifact};

/// Latest recorded artifact, if any
pub type ArtifactSlot = Option<Arc<RecordedArtifact>>;

/// Drives one recorder at a time through start/pause/resume/stop and
/// publishes the assembled artifact once the recorder finalizes.
pub struct RecordingController {
    factory: Arc<dyn RecorderFactory>,
    assembler: Arc<PlaybackAssembler>,
    state: RecordingState,
    recorder: Option<Box<dyn MediaRecorder>>,

    /// Fragments of the current session
    buffer: Arc<Mutex<ChunkBuffer>>,

    clock: RecordingClock,
    artifact: Arc<watch::Sender<ArtifactSlot>>,

    /// Number of sessions started; a finalizing session only publishes its
    /// artifact if no newer session has started meanwhile
    generation: Arc<AtomicU64>,

    collector: Option<JoinHandle<()>>,
}

impl RecordingController {
    pub fn new(factory: Arc<dyn RecorderFactory>, assembler: PlaybackAssembler) -> Self {
        let (artifact, _) = watch::channel(None);

        Self {
            factory,
            assembler: Arc::new(assembler),
            state: RecordingState::Inactive,
            recorder: None,
            buffer: Arc::new(Mutex::new(ChunkBuffer::new())),
            clock: RecordingClock::new(),
            artifact: Arc::new(artifact),
            generation: Arc::new(AtomicU64::new(0)),
            collector: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn mime_type(&self) -> &str {
        self.assembler.mime_type()
    }

    /// Start a new session on `stream`.
    ///
    /// Ignored unless inactive and a stream is available.
    pub async fn start(&mut self, stream: Option<&CaptureStream>) -> RecorderResult<()> {
        let Some(next) = self.state.apply(Transition::Start) else {
            debug!("Start ignored while {}", self.state);
            return Ok(());
        };

        let Some(stream) = stream else {
            debug!("Start ignored: no capture stream granted");
            return Ok(());
        };

        let mut recorder = self.factory.create(stream, self.assembler.mime_type())?;
        let events = recorder.start().await?;

        let session = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // The previous artifact no longer belongs to the current session
        self.artifact.send_replace(None);

        let buffer = Arc::new(Mutex::new(ChunkBuffer::new()));
        self.buffer = Arc::clone(&buffer);
        self.clock.start(Instant::now());

        self.collector = Some(tokio::spawn(collect_session(
            events,
            buffer,
            Arc::clone(&self.assembler),
            Arc::clone(&self.artifact),
            Arc::clone(&self.generation),
            session,
        )));

        self.recorder = Some(recorder);
        self.state = next;

        info!(
            "Recording session {} started on stream {} ({})",
            session,
            stream.id(),
            self.assembler.mime_type()
        );

        Ok(())
    }

    /// Pause the running session. Ignored unless recording.
    pub async fn pause(&mut self) -> RecorderResult<()> {
        let Some(next) = self.state.apply(Transition::Pause) else {
            debug!("Pause ignored while {}", self.state);
            return Ok(());
        };

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.pause().await?;
        }

        self.clock.pause(Instant::now());
        self.state = next;
        info!("Recording paused");

        Ok(())
    }

    /// Resume a paused session. Ignored unless paused.
    pub async fn resume(&mut self) -> RecorderResult<()> {
        let Some(next) = self.state.apply(Transition::Resume) else {
            debug!("Resume ignored while {}", self.state);
            return Ok(());
        };

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.resume().await?;
        }

        self.clock.resume(Instant::now());
        self.state = next;
        info!("Recording resumed");

        Ok(())
    }

    /// Stop the session from recording or paused.
    ///
    /// Returns once the recorder was asked to finalize; the artifact is
    /// published later, when the recorder reports it has flushed.
    pub async fn stop(&mut self) -> RecorderResult<()> {
        let Some(next) = self.state.apply(Transition::Stop) else {
            debug!("Stop ignored while {}", self.state);
            return Ok(());
        };

        self.state = next;
        self.clock.stop(Instant::now());

        if let Some(mut recorder) = self.recorder.take() {
            recorder
                .stop()
                .await
                .inspect_err(|e| error!("Failed to stop recorder: {}", e))?;
        }

        info!(
            "Recording stopped after {:.1}s, waiting for finalization",
            self.clock.elapsed(Instant::now()).as_secs_f64()
        );

        Ok(())
    }

    /// Wait until the last started session has been assembled
    pub async fn finalized(&mut self) {
        if let Some(collector) = self.collector.take() {
            if let Err(e) = collector.await {
                error!("Chunk collector task panicked: {}", e);
            }
        }
    }

    pub fn artifact(&self) -> ArtifactSlot {
        self.artifact.borrow().clone()
    }

    /// Receiver notified whenever the artifact is published or cleared
    pub fn artifact_updates(&self) -> watch::Receiver<ArtifactSlot> {
        self.artifact.subscribe()
    }

    /// Forget the current artifact
    pub fn clear_artifact(&self) {
        if self.artifact.send_replace(None).is_some() {
            info!("Cleared previous recording");
        }
    }

    /// Active recording time of the current or last session
    pub fn recording_length(&self) -> Duration {
        self.clock.elapsed(Instant::now())
    }

    pub fn sessions_started(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn buffered_chunks(&self) -> usize {
        self.buffer.lock().await.len()
    }

    pub async fn buffered_bytes(&self) -> usize {
        self.buffer.lock().await.total_bytes()
    }
}

/// Consume one session's recorder events, then assemble and publish.
///
/// Assembly happens only after the recorder reports it stopped, so fragments
/// flushed between `stop` and finalization are included.
async fn collect_session(
    mut events: mpsc::Receiver<RecorderEvent>,
    buffer: Arc<Mutex<ChunkBuffer>>,
    assembler: Arc<PlaybackAssembler>,
    artifact: Arc<watch::Sender<ArtifactSlot>>,
    generation: Arc<AtomicU64>,
    session: u64,
) {
    loop {
        match events.recv().await {
            Some(RecorderEvent::DataAvailable(data)) => {
                let size = data.len();
                let mut buffer = buffer.lock().await;
                if let Some(index) = buffer.push(data) {
                    debug!("Session {}: chunk {} appended ({} bytes)", session, index, size);
                }
            }
            Some(RecorderEvent::Stopped) => break,
            None => {
                warn!("Session {}: recorder closed without a stop signal", session);
                break;
            }
        }
    }

    let assembled = {
        let mut buffer = buffer.lock().await;
        assembler.assemble(&mut buffer)
    };

    if generation.load(Ordering::SeqCst) != session {
        info!(
            "Session {}: discarding recording {}, a newer session has started",
            session, assembled.id
        );
        return;
    }

    artifact.send_replace(Some(Arc::new(assembled)));
}
