use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::media::{DeviceBehavior, VirtualRecorderConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub recorder: RecorderConfig,
    pub devices: DevicesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "webcam-recorder".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Container media type of the recording
    pub mime_type: String,
    /// Overrides the generated download filename
    pub download_filename: Option<String>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            mime_type: "video/webm".to_string(),
            download_filename: None,
        }
    }
}

/// Behaviour of the virtual camera, microphone and recorder
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    pub audio: DeviceBehavior,
    pub video: DeviceBehavior,
    pub chunk_size: usize,
    /// 0 disables generated fragments
    pub timeslice_ms: u64,
    pub final_chunk_size: usize,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            audio: DeviceBehavior::Grant,
            video: DeviceBehavior::Grant,
            chunk_size: 4096,
            timeslice_ms: 250,
            final_chunk_size: 1024,
        }
    }
}

impl DevicesConfig {
    pub fn recorder_config(&self) -> VirtualRecorderConfig {
        VirtualRecorderConfig {
            chunk_size: self.chunk_size,
            timeslice: (self.timeslice_ms > 0).then(|| Duration::from_millis(self.timeslice_ms)),
            final_chunk_size: self.final_chunk_size,
            ..VirtualRecorderConfig::default()
        }
    }
}

impl Config {
    /// Load from a config file (extension optional); missing keys and a
    /// missing file fall back to defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()
            .with_context(|| format!("Failed to read config {}", path))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid config {}", path))
    }
}
