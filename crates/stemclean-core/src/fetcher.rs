//! Remote audio retrieval using yt-dlp

use crate::error::FetchError;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Fetcher {
    yt_dlp_path: PathBuf,
    work_dir: PathBuf,
}

impl Fetcher {
    pub fn new(yt_dlp_path: PathBuf, work_dir: PathBuf) -> Self {
        Self { yt_dlp_path, work_dir }
    }

    /// Fetch the best available audio stream for `url` and transcode it to
    /// `<work_dir>/<name>.mp3` (192 kbps via yt-dlp's FFmpeg postprocessor).
    pub async fn fetch(&self, url: &str, name: &str) -> Result<PathBuf, FetchError> {
        if !validate_url(url) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        info!("Fetching audio from: {}", url);

        let output_template = self.work_dir.join(format!("{}.%(ext)s", name));

        let output = Command::new(&self.yt_dlp_path)
            .args([
                // Prefer m4a, fall back to the best stream available
                "-f", "bestaudio[ext=m4a]/bestaudio/best",
                // Single video even if the URL references a playlist
                "--no-playlist",
                // Skip formats that fail to negotiate instead of aborting
                "--ignore-errors",
                // Extract audio and transcode to mp3 at 192 kbps
                "--extract-audio",
                "--audio-format", "mp3",
                "--audio-quality", "192K",
                "--quiet",
                "--no-warnings",
                "-o",
            ])
            .arg(&output_template)
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);

            if stderr.contains("Video unavailable") || stderr.contains("Private video") {
                return Err(FetchError::VideoUnavailable(url.to_string()));
            }
            if stderr.contains("is not a valid URL") {
                return Err(FetchError::InvalidUrl(url.to_string()));
            }

            return Err(FetchError::YtDlpFailed(output.status.code()));
        }

        // --ignore-errors can leave a zero exit with nothing written
        let audio_path = self.work_dir.join(format!("{}.mp3", name));
        if !audio_path.exists() {
            return Err(FetchError::NoAudioStream);
        }

        debug!("Fetched audio to: {}", audio_path.display());
        Ok(audio_path)
    }
}

/// A fetchable URL needs an http(s) scheme; anything else is rejected before
/// the tool is spawned. Host restrictions stay with yt-dlp, which supports
/// far more than one site.
pub fn validate_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(validate_url("http://video.example/watch?id=abc"));
        assert!(!validate_url("ftp://example.com/file.mp3"));
        assert!(!validate_url("youtube.com/watch?v=abc"));
        assert!(!validate_url("file:///etc/passwd"));
        assert!(!validate_url(""));
    }
}
