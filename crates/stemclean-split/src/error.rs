//! Error types for stem separation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Python not found. Install Python 3.8+")]
    PythonNotFound,

    #[error("Spleeter not installed. Run: pip install spleeter")]
    SpleeterNotInstalled,

    #[error("Failed to load separation model: {0}")]
    ModelLoadFailed(String),

    #[error("Separation failed: {0}")]
    SeparationFailed(String),

    #[error("Separation finished without producing both stems under {}", .0.display())]
    MissingStems(std::path::PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
