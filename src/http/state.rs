use crate::widget::VideoRecorder;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The recorder widget driven by the host page
    pub recorder: Arc<RwLock<VideoRecorder>>,
}

impl AppState {
    pub fn new(recorder: VideoRecorder) -> Self {
        Self {
            recorder: Arc::new(RwLock::new(recorder)),
        }
    }
}
