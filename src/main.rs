use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use webcam_recorder::{
    create_router, AppState, Config, MediaKind, TracingNotifier, VideoRecorder, VirtualDevices,
    VirtualRecorderFactory,
};

#[derive(Parser, Debug)]
#[command(name = "webcam-recorder", version, about = "Camera and microphone video recorder")]
struct Cli {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/webcam-recorder")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the recorder controls over HTTP
    Serve,
    /// Run a scripted session: access, start, pause, resume, stop
    Demo {
        /// Seconds of active recording
        #[arg(long, default_value_t = 3)]
        seconds: u64,
    },
}

fn build_recorder(cfg: &Config) -> Result<VideoRecorder> {
    let devices = VirtualDevices::new(cfg.devices.audio, cfg.devices.video);
    let factory = VirtualRecorderFactory::new(cfg.devices.recorder_config());

    info!(
        "Virtual devices: microphone={:?}, camera={:?}",
        devices.behavior(MediaKind::Audio),
        devices.behavior(MediaKind::Video)
    );

    VideoRecorder::new(
        Arc::new(devices),
        Arc::new(factory),
        cfg.recorder.clone(),
        Arc::new(TracingNotifier),
    )
    .context("Failed to create video recorder")
}

async fn serve(cfg: &Config) -> Result<()> {
    let state = AppState::new(build_recorder(cfg)?);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

async fn demo(cfg: &Config, seconds: u64) -> Result<()> {
    let mut recorder = build_recorder(cfg)?;
    info!("\n{}", recorder.view());

    if recorder.request_access().await.is_err() {
        info!("\n{}", recorder.view());
        return Ok(());
    }
    info!("\n{}", recorder.view());

    let half = Duration::from_millis(seconds * 500);

    recorder.start().await?;
    tokio::time::sleep(half).await;

    recorder.pause().await?;
    info!("\n{}", recorder.view());
    tokio::time::sleep(Duration::from_millis(500)).await;

    recorder.resume().await?;
    tokio::time::sleep(half).await;

    recorder.stop().await?;
    recorder.finalized().await;

    match recorder.artifact() {
        Some(artifact) => info!(
            "Recorded {} ({} chunks, {} bytes) as {}",
            artifact.url, artifact.chunk_count, artifact.size_bytes, artifact.filename
        ),
        None => info!("No recording produced"),
    }
    info!("\n{}", recorder.view());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Webcam Recorder v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Recording {}", cfg.recorder.mime_type);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cfg).await,
        Command::Demo { seconds } => demo(&cfg, seconds).await,
    }
}
