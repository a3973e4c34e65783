// Tests for configuration loading

use anyhow::Result;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use webcam_recorder::{Config, DeviceBehavior};

#[test]
fn test_load_full_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("recorder.toml");
    fs::write(
        &path,
        r#"
[service]
name = "test-recorder"

[service.http]
bind = "0.0.0.0"
port = 8088

[recorder]
mime_type = "video/mp4"
download_filename = "clip.mp4"

[devices]
audio = "grant"
video = "deny"
chunk_size = 512
timeslice_ms = 0
final_chunk_size = 0
"#,
    )?;

    let cfg = Config::load(path.to_str().expect("utf-8 path"))?;

    assert_eq!(cfg.service.name, "test-recorder");
    assert_eq!(cfg.service.http.bind, "0.0.0.0");
    assert_eq!(cfg.service.http.port, 8088);
    assert_eq!(cfg.recorder.mime_type, "video/mp4");
    assert_eq!(cfg.recorder.download_filename.as_deref(), Some("clip.mp4"));
    assert_eq!(cfg.devices.audio, DeviceBehavior::Grant);
    assert_eq!(cfg.devices.video, DeviceBehavior::Deny);

    let recorder = cfg.devices.recorder_config();
    assert_eq!(recorder.chunk_size, 512);
    assert!(recorder.timeslice.is_none(), "0 disables generated chunks");

    Ok(())
}

#[test]
fn test_partial_config_uses_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("partial.toml");
    fs::write(&path, "[devices]\nvideo = \"missing\"\n")?;

    let cfg = Config::load(path.to_str().expect("utf-8 path"))?;

    assert_eq!(cfg.service.name, "webcam-recorder");
    assert_eq!(cfg.service.http.port, 3030);
    assert_eq!(cfg.recorder.mime_type, "video/webm");
    assert!(cfg.recorder.download_filename.is_none());
    assert_eq!(cfg.devices.video, DeviceBehavior::Missing);
    assert_eq!(
        cfg.devices.recorder_config().timeslice,
        Some(Duration::from_millis(250))
    );

    Ok(())
}

#[test]
fn test_missing_file_uses_defaults() -> Result<()> {
    let cfg = Config::load("/nonexistent/webcam-recorder")?;

    assert_eq!(cfg.recorder.mime_type, "video/webm");
    assert_eq!(cfg.devices.audio, DeviceBehavior::Grant);

    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "[devices]\nvideo = \"maybe\"\n")?;

    assert!(Config::load(path.to_str().expect("utf-8 path")).is_err());

    Ok(())
}

#[test]
fn test_repository_config_loads() -> Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/webcam-recorder");
    let cfg = Config::load(path)?;

    assert_eq!(cfg.service.name, "webcam-recorder");
    assert_eq!(cfg.recorder.mime_type, "video/webm");

    Ok(())
}
