//! HTTP server assembly

use crate::routes;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use stemclean_core::{Config, Pipeline, PipelineStage};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
    /// Bounds concurrent pipeline runs; waiters queue in arrival order
    pub jobs: Arc<Semaphore>,
}

fn build_state(cfg: Config) -> AppState {
    let (progress_tx, progress_rx) = mpsc::channel(64);
    tokio::spawn(log_progress(progress_rx));

    let jobs = Arc::new(Semaphore::new(cfg.server.max_jobs.max(1)));
    let pipeline = Arc::new(Pipeline::new(cfg.clone(), progress_tx));

    AppState {
        cfg: Arc::new(cfg),
        pipeline,
        jobs,
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/process", get(routes::process))
        .route("/file", get(routes::file))
        .with_state(state)
}

/// Bind the configured address and serve until shutdown. Tool paths are
/// resolved up front so a missing binary fails boot, not the first request.
pub async fn serve(cfg: Config) -> anyhow::Result<()> {
    let yt_dlp = cfg.yt_dlp_path()?;
    let ffmpeg = cfg.ffmpeg_path()?;
    let python = cfg.python_path()?;
    debug!(
        "Tools: yt-dlp={}, ffmpeg={}, python={}",
        yt_dlp.display(),
        ffmpeg.display(),
        python.display()
    );

    let addr: SocketAddr = cfg.server.listen_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    serve_on(listener, cfg).await
}

/// Serve on an already-bound listener. Split from [`serve`] so tests can
/// bind an ephemeral port first.
pub async fn serve_on(listener: TcpListener, mut cfg: Config) -> anyhow::Result<()> {
    cfg.prepare_storage()?;
    let state = build_state(cfg);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn log_progress(mut rx: mpsc::Receiver<PipelineStage>) {
    while let Some(stage) = rx.recv().await {
        match stage {
            PipelineStage::Fetching { url } => debug!("Stage: fetching {}", url),
            PipelineStage::Separating { model } => debug!("Stage: separating with {}", model),
            PipelineStage::Trimming => debug!("Stage: trimming silence"),
            PipelineStage::Complete { output, duration } => debug!(
                "Stage: complete, {} in {:.1}s",
                output.display(),
                duration.as_secs_f32()
            ),
            PipelineStage::Failed { stage, error } => warn!("Stage {} failed: {}", stage, error),
        }
    }
}
