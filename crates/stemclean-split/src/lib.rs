//! Spleeter separation bridge for stemclean
//!
//! Drives the pretrained `spleeter:2stems` model through a Python
//! interpreter and owns the stem domain types used across the service.

mod error;
mod spleeter;

pub use error::SplitError;
pub use spleeter::{Spleeter, SPLEETER_MODEL};

use std::path::{Path, PathBuf};

/// Which of the two stems a request wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemKind {
    Vocals,
    Accompaniment,
}

impl StemKind {
    /// Parse the wire values accepted by the HTTP API.
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "vocals" => Some(StemKind::Vocals),
            "music" => Some(StemKind::Accompaniment),
            _ => None,
        }
    }

    /// File name Spleeter gives this stem inside the track directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            StemKind::Vocals => "vocals.wav",
            StemKind::Accompaniment => "accompaniment.wav",
        }
    }
}

impl std::fmt::Display for StemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StemKind::Vocals => write!(f, "vocals"),
            StemKind::Accompaniment => write!(f, "accompaniment"),
        }
    }
}

/// The two files a successful separation produces.
#[derive(Debug, Clone)]
pub struct StemPair {
    pub vocals: PathBuf,
    pub accompaniment: PathBuf,
}

impl StemPair {
    pub fn select(&self, kind: StemKind) -> &Path {
        match kind {
            StemKind::Vocals => &self.vocals,
            StemKind::Accompaniment => &self.accompaniment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_kind_wire_values() {
        assert_eq!(StemKind::from_param("vocals"), Some(StemKind::Vocals));
        assert_eq!(StemKind::from_param("music"), Some(StemKind::Accompaniment));
        assert_eq!(StemKind::from_param("drums"), None);
        assert_eq!(StemKind::from_param("Vocals"), None);
        assert_eq!(StemKind::from_param(""), None);
    }

    #[test]
    fn test_stem_pair_select() {
        let pair = StemPair {
            vocals: PathBuf::from("/out/track/vocals.wav"),
            accompaniment: PathBuf::from("/out/track/accompaniment.wav"),
        };
        assert_eq!(pair.select(StemKind::Vocals), Path::new("/out/track/vocals.wav"));
        assert_eq!(
            pair.select(StemKind::Accompaniment),
            Path::new("/out/track/accompaniment.wav")
        );
    }

    #[test]
    fn test_stem_file_names_follow_spleeter_layout() {
        let dir = Path::new("/out/track");
        let pair = StemPair {
            vocals: dir.join(StemKind::Vocals.file_name()),
            accompaniment: dir.join(StemKind::Accompaniment.file_name()),
        };

        assert_eq!(pair.vocals, Path::new("/out/track/vocals.wav"));
        assert_eq!(pair.accompaniment, Path::new("/out/track/accompaniment.wav"));

        // The file selected for a kind carries that kind's name
        for kind in [StemKind::Vocals, StemKind::Accompaniment] {
            assert_eq!(pair.select(kind).file_name().unwrap(), kind.file_name());
        }
    }
}
