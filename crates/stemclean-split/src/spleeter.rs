//! Spleeter two-stem separation driven through a Python interpreter

use crate::{SplitError, StemKind, StemPair};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Pretrained model descriptor handed to Spleeter. The model is fixed: the
/// service always separates into vocals + accompaniment.
pub const SPLEETER_MODEL: &str = "spleeter:2stems";

#[derive(Debug)]
pub struct Spleeter {
    python_path: PathBuf,
}

impl Spleeter {
    pub fn new(python_path: PathBuf) -> Self {
        Self { python_path }
    }

    /// Separate one audio file into vocal and accompaniment stems.
    ///
    /// Stems land under `<out_base>/<input-stem>/` following Spleeter's
    /// output convention. Either both stems are produced or this fails.
    pub async fn separate(&self, input: &Path, out_base: &Path) -> Result<StemPair, SplitError> {
        info!("Running {} separation on {}", SPLEETER_MODEL, input.display());

        // Inline Python script; input/output paths travel as argv so odd
        // characters in paths never reach the script source.
        let script = format!(
            r#"
import sys

try:
    from spleeter.separator import Separator
except ImportError as e:
    print(f"Missing dependency: {{e}}", file=sys.stderr)
    sys.exit(1)

input_path = sys.argv[1]
out_base = sys.argv[2]

try:
    separator = Separator("{model}")
except Exception as e:
    print(f"Failed to load model: {{e}}", file=sys.stderr)
    sys.exit(2)

try:
    separator.separate_to_file(input_path, out_base)
    print("Separation complete")
except Exception as e:
    print(f"Separation failed: {{e}}", file=sys.stderr)
    sys.exit(3)
"#,
            model = SPLEETER_MODEL,
        );

        let result = Command::new(&self.python_path)
            .arg("-c")
            .arg(&script)
            .arg(input)
            .arg(out_base)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SplitError::PythonNotFound
                } else {
                    SplitError::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);

        if !stdout.is_empty() {
            debug!("spleeter stdout: {}", stdout);
        }
        if !stderr.is_empty() {
            debug!("spleeter stderr: {}", stderr);
        }

        if !result.status.success() {
            let exit_code = result.status.code().unwrap_or(-1);
            return Err(match exit_code {
                1 => SplitError::SpleeterNotInstalled,
                2 => SplitError::ModelLoadFailed(stderr.trim().to_string()),
                3 => SplitError::SeparationFailed(stderr.trim().to_string()),
                _ => SplitError::SeparationFailed(format!(
                    "spleeter exited with code {}: {}",
                    exit_code,
                    stderr.trim()
                )),
            });
        }

        let stem_dir = out_base.join(input.file_stem().unwrap_or_default());
        let pair = StemPair {
            vocals: stem_dir.join(StemKind::Vocals.file_name()),
            accompaniment: stem_dir.join(StemKind::Accompaniment.file_name()),
        };

        if !pair.vocals.exists() || !pair.accompaniment.exists() {
            return Err(SplitError::MissingStems(stem_dir));
        }

        info!("Separation complete: {}", stem_dir.display());
        Ok(pair)
    }
}
