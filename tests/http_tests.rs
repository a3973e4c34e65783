// Integration tests for the HTTP control surface
//
// These tests send requests through the router with `oneshot` and check the
// rendered view and the download endpoint.

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;
use webcam_recorder::config::RecorderConfig;
use webcam_recorder::http::ErrorResponse;
use webcam_recorder::widget::CollectingNotifier;
use webcam_recorder::{
    create_router, AppState, ChunkFeeder, DeviceBehavior, SessionStats, VideoRecorder,
    VirtualDevices, VirtualRecorderConfig, VirtualRecorderFactory,
};

fn setup(devices: VirtualDevices) -> Result<(Router, AppState, ChunkFeeder)> {
    let factory = VirtualRecorderFactory::new(VirtualRecorderConfig::manual());
    let feeder = factory.feeder();

    let recorder = VideoRecorder::new(
        Arc::new(devices),
        Arc::new(factory),
        RecorderConfig {
            mime_type: "video/webm".to_string(),
            download_filename: Some("meeting.webm".to_string()),
        },
        Arc::new(CollectingNotifier::new()),
    )?;

    let state = AppState::new(recorder);
    Ok((create_router(state.clone()), state, feeder))
}

async fn send(app: &Router, method: &str, uri: &str) -> Result<(StatusCode, Vec<u8>)> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())?;

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

    Ok((status, body.to_vec()))
}

async fn send_json(app: &Router, method: &str, uri: &str) -> Result<(StatusCode, serde_json::Value)> {
    let (status, body) = send(app, method, uri).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (app, _, _) = setup(VirtualDevices::granting())?;

    let (status, body) = send(&app, "GET", "/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    Ok(())
}

#[tokio::test]
async fn test_initial_view() -> Result<()> {
    let (app, _, _) = setup(VirtualDevices::granting())?;

    let (status, view) = send_json(&app, "GET", "/view").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["controls"], serde_json::json!(["get-camera-access"]));
    assert!(view["playback"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_full_session_and_download() -> Result<()> {
    let (app, state, feeder) = setup(VirtualDevices::granting())?;

    let (status, view) = send_json(&app, "POST", "/access").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["controls"], serde_json::json!(["start-recording"]));

    let (status, view) = send_json(&app, "POST", "/start").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        view["controls"],
        serde_json::json!(["pause-recording", "stop-recording"])
    );

    feeder.emit(vec![1; 10]).await;
    feeder.emit(vec![2; 20]).await;

    let (_, view) = send_json(&app, "POST", "/pause").await?;
    assert_eq!(view["controls"], serde_json::json!(["resume-recording"]));

    let (_, view) = send_json(&app, "POST", "/resume").await?;
    assert_eq!(
        view["controls"],
        serde_json::json!(["pause-recording", "stop-recording"])
    );

    let (status, _) = send_json(&app, "POST", "/stop").await?;
    assert_eq!(status, StatusCode::OK);

    state.recorder.write().await.finalized().await;

    let (_, view) = send_json(&app, "GET", "/view").await?;
    assert_eq!(view["controls"], serde_json::json!(["get-camera-access"]));
    assert_eq!(view["playback"]["size_bytes"], 30);
    assert_eq!(view["playback"]["download"]["filename"], "meeting.webm");

    let id = view["playback"]["artifact_id"]
        .as_str()
        .expect("artifact id")
        .to_string();

    let request = Request::builder()
        .uri(format!("/recordings/{}", id))
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "video/webm");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"meeting.webm\""
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let mut expected = vec![1u8; 10];
    expected.extend(vec![2u8; 20]);
    assert_eq!(body.to_vec(), expected);

    let (status, stats) = send(&app, "GET", "/stats").await?;
    assert_eq!(status, StatusCode::OK);
    let stats: SessionStats = serde_json::from_slice(&stats)?;
    assert_eq!(stats.sessions_started, 1);
    assert_eq!(stats.artifact_bytes, Some(30));
    assert_eq!(stats.chunks_buffered, 0);

    Ok(())
}

#[tokio::test]
async fn test_replaced_recording_is_gone() -> Result<()> {
    let (app, state, feeder) = setup(VirtualDevices::granting())?;

    send(&app, "POST", "/access").await?;
    send(&app, "POST", "/start").await?;
    feeder.emit(vec![1; 10]).await;
    send(&app, "POST", "/stop").await?;
    state.recorder.write().await.finalized().await;

    let id = state
        .recorder
        .read()
        .await
        .artifact()
        .expect("artifact")
        .id;

    // Requesting access again clears the recording
    send(&app, "POST", "/access").await?;

    let (status, body) = send(&app, "GET", &format!("/recordings/{}", id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body)?;
    assert!(error.error.contains(&id.to_string()));

    Ok(())
}

#[tokio::test]
async fn test_denied_access_returns_forbidden() -> Result<()> {
    let (app, _, _) = setup(VirtualDevices::new(DeviceBehavior::Grant, DeviceBehavior::Deny))?;

    let (status, body) = send(&app, "POST", "/access").await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let error: ErrorResponse = serde_json::from_slice(&body)?;
    assert!(error.error.contains("camera"));

    let (_, view) = send_json(&app, "GET", "/view").await?;
    assert_eq!(view["controls"], serde_json::json!(["get-camera-access"]));
    assert!(view["alert"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_invalid_actions_are_ignored() -> Result<()> {
    let (app, _, _) = setup(VirtualDevices::granting())?;

    for uri in ["/pause", "/resume", "/stop", "/start"] {
        let (status, view) = send_json(&app, "POST", uri).await?;
        assert_eq!(status, StatusCode::OK, "{} should be ignored", uri);
        assert_eq!(view["controls"], serde_json::json!(["get-camera-access"]));
    }

    Ok(())
}
