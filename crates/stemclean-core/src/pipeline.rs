//! Pipeline orchestration: fetch, separate, trim, finalize

use crate::config::Config;
use crate::error::StemCleanError;
use crate::fetcher::Fetcher;
use crate::trimmer::{SilenceTrimmer, DEFAULT_MIN_SILENCE, DEFAULT_THRESHOLD_DB};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use stemclean_split::{Spleeter, StemKind, SPLEETER_MODEL};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Track name used when a request leaves the name blank.
pub const DEFAULT_TRACK_NAME: &str = "audio";

/// One processing request, as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub id: Uuid,
    pub url: String,
    pub name: String,
    pub stem: StemKind,
    pub overwrite: bool,
}

impl ProcessRequest {
    pub fn new(url: String, name: String, stem: StemKind, overwrite: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            name,
            stem,
            overwrite,
        }
    }
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    Fetching { url: String },
    Separating { model: String },
    Trimming,
    Complete { output: PathBuf, duration: Duration },
    Failed { stage: String, error: String },
}

/// Sequences one request through fetch → separate → trim → finalize. Every
/// stage failure aborts the remainder; the per-request working directory is
/// dropped either way unless `keep_work_dirs` is set.
pub struct Pipeline {
    cfg: Config,
    progress_tx: mpsc::Sender<PipelineStage>,
}

impl Pipeline {
    pub fn new(cfg: Config, progress_tx: mpsc::Sender<PipelineStage>) -> Self {
        Self { cfg, progress_tx }
    }

    pub async fn run(&self, req: &ProcessRequest) -> Result<PathBuf, StemCleanError> {
        let start_time = Instant::now();

        let name = sanitize_track_name(&req.name);
        let final_path = self
            .cfg
            .storage
            .output_dir
            .join(format!("{}_sound.wav", name));

        // Collision policy: reusing a name clobbers nothing unless the
        // caller asked for it. Checked before any work is done.
        if final_path.exists() && !req.overwrite {
            return Err(StemCleanError::OutputExists(final_path));
        }

        let yt_dlp_path = self.cfg.yt_dlp_path()?;
        let ffmpeg_path = self.cfg.ffmpeg_path()?;
        let python_path = self.cfg.python_path()?;

        let work_dir = tempfile::Builder::new()
            .prefix(&format!("stemclean-{}-", req.id))
            .tempdir_in(self.cfg.work_base())?;
        let work_path = work_dir.path().to_path_buf();

        info!(job_id = %req.id, url = %req.url, "Starting pipeline");
        debug!("Working directory: {}", work_path.display());

        // Stage failures land in `result`; the keep/drop decision below
        // runs on every exit, not just success.
        let result: Result<PathBuf, StemCleanError> = async {
            // 1. Fetch
            let _ = self
                .progress_tx
                .send(PipelineStage::Fetching { url: req.url.clone() })
                .await;

            let fetcher = Fetcher::new(yt_dlp_path, work_path.clone());
            let audio_path = fetcher.fetch(&req.url, &name).await.map_err(|e| {
                let _ = self.progress_tx.try_send(PipelineStage::Failed {
                    stage: "fetch".to_string(),
                    error: e.to_string(),
                });
                e
            })?;

            // 2. Separate
            let _ = self
                .progress_tx
                .send(PipelineStage::Separating {
                    model: SPLEETER_MODEL.to_string(),
                })
                .await;

            let separator = Spleeter::new(python_path);
            let stems = separator.separate(&audio_path, &work_path).await.map_err(|e| {
                let _ = self.progress_tx.try_send(PipelineStage::Failed {
                    stage: "separate".to_string(),
                    error: e.to_string(),
                });
                e
            })?;

            // 3. Trim the selected stem
            let selected = stems.select(req.stem);

            let _ = self.progress_tx.send(PipelineStage::Trimming).await;

            let trimmer = SilenceTrimmer::new(ffmpeg_path);
            let trimmed = trimmer
                .trim(selected, DEFAULT_THRESHOLD_DB, DEFAULT_MIN_SILENCE)
                .await
                .map_err(|e| {
                    let _ = self.progress_tx.try_send(PipelineStage::Failed {
                        stage: "trim".to_string(),
                        error: e.to_string(),
                    });
                    e
                })?;

            if let Some(seconds) = trimmer.read_duration(&trimmed).await {
                debug!("Trimmed {} stem: {:.1}s of audible audio", req.stem, seconds);
            }

            // 4. Finalize into the served output directory
            tokio::fs::create_dir_all(&self.cfg.storage.output_dir).await?;
            move_file(&trimmed, &final_path).await?;

            let duration = start_time.elapsed();
            info!(
                job_id = %req.id,
                "Pipeline complete: {} ({:.1}s)",
                final_path.display(),
                duration.as_secs_f32()
            );

            let _ = self
                .progress_tx
                .send(PipelineStage::Complete {
                    output: final_path.clone(),
                    duration,
                })
                .await;

            Ok(final_path.clone())
        }
        .await;

        if self.cfg.storage.keep_work_dirs {
            // Prevent cleanup by forgetting the temp dir
            std::mem::forget(work_dir);
            debug!("Working files kept at: {}", work_path.display());
        }

        result
    }
}

/// Rename, falling back to copy+delete when source and target sit on
/// different filesystems.
async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(_) => {
            tokio::fs::copy(from, to).await?;
            tokio::fs::remove_file(from).await
        }
    }
}

/// Strip filesystem-reserved characters from a requested track name. Names
/// that reduce to nothing (or to dots only) fall back to the default.
pub fn sanitize_track_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_TRACK_NAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_track_name() {
        assert_eq!(sanitize_track_name("song1"), "song1");
        assert_eq!(sanitize_track_name("My Song"), "My Song");
        assert_eq!(sanitize_track_name("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_track_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_track_name(""), "audio");
        assert_eq!(sanitize_track_name("   "), "audio");
        assert_eq!(sanitize_track_name(".."), "audio");
    }

    #[tokio::test]
    async fn test_move_file() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.wav");
        let dst = tmp.path().join("b.wav");
        tokio::fs::write(&src, b"data").await.unwrap();

        move_file(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(tokio::fs::read(&dst).await.unwrap(), b"data");
    }

    fn offline_config(output_dir: &Path) -> Config {
        let mut cfg = Config::default();
        cfg.storage.output_dir = output_dir.to_path_buf();
        cfg.paths.yt_dlp = Some(PathBuf::from("/nonexistent/yt-dlp"));
        cfg.paths.ffmpeg = Some(PathBuf::from("/nonexistent/ffmpeg"));
        cfg.paths.python = Some(PathBuf::from("/nonexistent/python3"));
        cfg
    }

    #[tokio::test]
    async fn test_existing_output_fails_before_any_work() {
        let tmp = tempfile::tempdir().unwrap();
        tokio::fs::write(tmp.path().join("taken_sound.wav"), b"prior")
            .await
            .unwrap();

        let (tx, _rx) = mpsc::channel(8);
        let pipeline = Pipeline::new(offline_config(tmp.path()), tx);
        let req = ProcessRequest::new(
            "https://video.example/watch?id=abc".to_string(),
            "taken".to_string(),
            StemKind::Vocals,
            false,
        );

        match pipeline.run(&req).await {
            Err(StemCleanError::OutputExists(path)) => {
                assert!(path.ends_with("taken_sound.wav"));
            }
            other => panic!("expected OutputExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_overwrite_moves_past_collision_gate() {
        let tmp = tempfile::tempdir().unwrap();
        tokio::fs::write(tmp.path().join("taken_sound.wav"), b"prior")
            .await
            .unwrap();

        let (tx, _rx) = mpsc::channel(8);
        let pipeline = Pipeline::new(offline_config(tmp.path()), tx);
        let req = ProcessRequest::new(
            "https://video.example/watch?id=abc".to_string(),
            "taken".to_string(),
            StemKind::Vocals,
            true,
        );

        // The broken tool paths mean the run fails at fetch, which proves
        // the collision gate was passed.
        match pipeline.run(&req).await {
            Err(StemCleanError::Fetch(_)) => {}
            other => panic!("expected Fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_run_keeps_work_dir_when_configured() {
        let tmp = tempfile::tempdir().unwrap();
        let work_base = tmp.path().join("work");
        tokio::fs::create_dir_all(&work_base).await.unwrap();

        let mut cfg = offline_config(tmp.path());
        cfg.storage.work_dir = Some(work_base.clone());
        cfg.storage.keep_work_dirs = true;

        let (tx, _rx) = mpsc::channel(8);
        let pipeline = Pipeline::new(cfg, tx);
        let req = ProcessRequest::new(
            "https://video.example/watch?id=abc".to_string(),
            "kept".to_string(),
            StemKind::Vocals,
            false,
        );

        assert!(pipeline.run(&req).await.is_err());

        let kept: Vec<_> = std::fs::read_dir(&work_base)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("stemclean-"))
            .collect();
        assert_eq!(kept.len(), 1, "failed run should leave its work dir behind");
    }

    #[tokio::test]
    async fn test_failed_run_drops_work_dir_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let work_base = tmp.path().join("work");
        tokio::fs::create_dir_all(&work_base).await.unwrap();

        let mut cfg = offline_config(tmp.path());
        cfg.storage.work_dir = Some(work_base.clone());

        let (tx, _rx) = mpsc::channel(8);
        let pipeline = Pipeline::new(cfg, tx);
        let req = ProcessRequest::new(
            "https://video.example/watch?id=abc".to_string(),
            "dropped".to_string(),
            StemKind::Vocals,
            false,
        );

        assert!(pipeline.run(&req).await.is_err());
        assert_eq!(std::fs::read_dir(&work_base).unwrap().count(), 0);
    }
}
