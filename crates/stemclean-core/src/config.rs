//! Configuration management for stemclean

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
    /// Path to Python binary (auto-detected if not set)
    pub python: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Pipelines allowed to run at once; further requests queue
    pub max_jobs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory finished artifacts are written to and served from
    pub output_dir: PathBuf,
    /// Base for per-request working directories (system temp if not set)
    pub work_dir: Option<PathBuf>,
    /// Keep per-request working directories after completion
    pub keep_work_dirs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                yt_dlp: None,
                ffmpeg: None,
                python: None,
            },
            server: ServerConfig {
                listen_addr: "127.0.0.1:8000".to_string(),
                max_jobs: 2,
            },
            storage: StorageConfig {
                output_dir: PathBuf::from("output"),
                work_dir: None,
                keep_work_dirs: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(config_dir) = dirs::config_dir() {
            let default_config = config_dir.join("stemclean/config.toml");
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment; double underscore separates section from
        // key, e.g. STEMCLEAN_STORAGE__OUTPUT_DIR
        figment = figment.merge(Env::prefixed("STEMCLEAN_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg")
                .map_err(|_| ConfigError::InvalidValue("ffmpeg not found in PATH".to_string()))
        }
    }

    /// Get Python path, auto-detecting if not configured. Spleeter must be
    /// importable by this interpreter.
    pub fn python_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.python {
            Ok(path.clone())
        } else {
            which::which("python3")
                .map_err(|_| ConfigError::InvalidValue("python3 not found in PATH".to_string()))
        }
    }

    /// Base directory under which per-request working directories are made
    pub fn work_base(&self) -> PathBuf {
        self.storage
            .work_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Create the storage directories if absent and pin the output directory
    /// to its canonical path (served file references are absolute).
    pub fn prepare_storage(&mut self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.storage.output_dir)?;
        self.storage.output_dir = self.storage.output_dir.canonicalize()?;
        if let Some(ref dir) = self.storage.work_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.listen_addr, "127.0.0.1:8000");
        assert!(cfg.server.max_jobs >= 1);
        assert_eq!(cfg.storage.output_dir, PathBuf::from("output"));
        assert!(cfg.storage.work_dir.is_none());
        assert!(!cfg.storage.keep_work_dirs);
    }

    #[test]
    fn test_prepare_storage_creates_and_canonicalizes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.storage.output_dir = tmp.path().join("out");

        cfg.prepare_storage().unwrap();

        assert!(cfg.storage.output_dir.is_dir());
        assert!(cfg.storage.output_dir.is_absolute());
    }
}
