//! Silence removal using FFmpeg's silenceremove filter

use crate::error::TrimError;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Amplitude below this is treated as silence.
pub const DEFAULT_THRESHOLD_DB: f32 = -40.0;
/// Quiet stretches shorter than this survive.
pub const DEFAULT_MIN_SILENCE: f32 = 0.1;

#[derive(Debug)]
pub struct SilenceTrimmer {
    ffmpeg_path: PathBuf,
}

impl SilenceTrimmer {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Remove leading, internal, and trailing silence from `input`, writing
    /// `<input-stem>_sound.wav` alongside it. Non-destructive.
    pub async fn trim(
        &self,
        input: &Path,
        threshold_db: f32,
        min_silence: f32,
    ) -> Result<PathBuf, TrimError> {
        let output = trimmed_path(input);
        let filter = silenceremove_filter(threshold_db, min_silence);

        info!("Trimming silence from {}", input.display());

        let status = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-loglevel", "error"])
            .arg("-i")
            .arg(input)
            .args(["-af", &filter])
            .arg("-y")
            .arg(&output)
            .status()
            .await?;

        if !status.success() {
            return Err(TrimError::FfmpegFailed(status.code()));
        }

        debug!("Trimmed to: {}", output.display());
        Ok(output)
    }

    /// Best-effort duration of an audio file, parsed from `ffmpeg -i`
    /// stderr. Used for logging only.
    pub async fn read_duration(&self, input: &Path) -> Option<f64> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-hide_banner")
            .arg("-i")
            .arg(input)
            .args(["-f", "null", "-"])
            .output()
            .await
            .ok()?;

        parse_duration(&String::from_utf8_lossy(&output.stderr))
    }
}

fn trimmed_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_sound.wav", stem))
}

fn silenceremove_filter(threshold_db: f32, min_silence: f32) -> String {
    format!(
        "silenceremove=start_periods=1:start_threshold={t}dB:start_silence={s}:\
         stop_periods=-1:stop_threshold={t}dB:stop_silence={s}",
        t = threshold_db,
        s = min_silence
    )
}

fn parse_duration(ffmpeg_output: &str) -> Option<f64> {
    // Look for pattern like "Duration: 00:03:45.12"
    let re = regex::Regex::new(r"Duration: (\d+):(\d+):(\d+)\.(\d+)").ok()?;
    let caps = re.captures(ffmpeg_output)?;

    let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    let centiseconds: f64 = caps.get(4)?.as_str().parse().ok()?;

    Some(hours * 3600.0 + minutes * 60.0 + seconds + centiseconds / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_string_default_policy() {
        assert_eq!(
            silenceremove_filter(DEFAULT_THRESHOLD_DB, DEFAULT_MIN_SILENCE),
            "silenceremove=start_periods=1:start_threshold=-40dB:start_silence=0.1:\
             stop_periods=-1:stop_threshold=-40dB:stop_silence=0.1"
        );
    }

    #[test]
    fn test_trimmed_path_alongside_input() {
        assert_eq!(
            trimmed_path(Path::new("/work/song/vocals.wav")),
            PathBuf::from("/work/song/vocals_sound.wav")
        );
        assert_eq!(trimmed_path(Path::new("audio.mp3")), PathBuf::from("audio_sound.wav"));
    }

    #[test]
    fn test_parse_duration() {
        let stderr = "Input #0, wav, from 'in.wav':\n  Duration: 00:03:45.12, bitrate: 1536 kb/s";
        let parsed = parse_duration(stderr).unwrap();
        assert!((parsed - 225.12).abs() < 1e-6);

        assert_eq!(parse_duration("no duration line"), None);
    }
}
