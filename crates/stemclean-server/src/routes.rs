//! Request handlers

use crate::error::ApiError;
use crate::server::AppState;
use crate::web::INDEX_HTML;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use stemclean_core::pipeline::DEFAULT_TRACK_NAME;
use stemclean_core::ProcessRequest;
use stemclean_split::StemKind;
use tracing::info;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Deserialize)]
pub struct ProcessParams {
    youtube_url: Option<String>,
    file_name: Option<String>,
    file_type: Option<String>,
    #[serde(default)]
    overwrite: bool,
}

/// GET /process: run the full pipeline for one URL and return a reference
/// to the finished file. Blocks until the pipeline completes; requests
/// beyond the job limit queue. The pipeline itself runs on a spawned task,
/// so a client that hangs up does not cancel work already under way.
pub async fn process(
    State(st): State<AppState>,
    params: Result<Query<ProcessParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;

    let url = params
        .youtube_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::Validation("youtube_url is required".to_string()))?;

    let name = params
        .file_name
        .unwrap_or_else(|| DEFAULT_TRACK_NAME.to_string());

    let file_type = params.file_type.unwrap_or_else(|| "vocals".to_string());
    let stem = StemKind::from_param(&file_type).ok_or_else(|| {
        ApiError::Validation("file_type must be 'vocals' or 'music'".to_string())
    })?;

    let req = ProcessRequest::new(url, name, stem, params.overwrite);

    let permit = st
        .jobs
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| ApiError::Internal("server is shutting down".to_string()))?;

    info!(job_id = %req.id, "Processing {} ({} stem)", req.url, req.stem);

    // Dropping this handler detaches the task instead of aborting it
    let pipeline = st.pipeline.clone();
    let task = tokio::spawn(async move {
        let _permit = permit;
        pipeline.run(&req).await
    });

    let output = task
        .await
        .map_err(|e| ApiError::Internal(format!("pipeline task failed: {e}")))??;

    Ok(Json(json!({"file": format!("/file?v={}", output.display())})))
}

#[derive(Debug, Deserialize)]
pub struct FileParams {
    v: Option<PathBuf>,
}

/// GET /file: serve a finished WAV. Paths that resolve outside the output
/// directory get the same 404 as absent files.
pub async fn file(
    State(st): State<AppState>,
    params: Result<Query<FileParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let requested = params
        .v
        .ok_or_else(|| ApiError::Validation("v is required".to_string()))?;

    let resolved = tokio::fs::canonicalize(&requested)
        .await
        .map_err(|_| ApiError::NotFound)?;
    if !resolved.starts_with(&st.cfg.storage.output_dir) {
        return Err(ApiError::NotFound);
    }

    let bytes = tokio::fs::read(&resolved)
        .await
        .map_err(|_| ApiError::NotFound)?;

    let file_name = resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio.wav".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}
