//! Audio upload ingestion
//!
//! Validates the client-declared filename and stages the raw bytes on local
//! storage for the decoder. Content is not inspected here: an empty or
//! corrupt buffer with an accepted extension is staged and left for the
//! decoder to reject.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepted upload container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
    Ogg,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 4] = [
        AudioFormat::Wav,
        AudioFormat::Mp3,
        AudioFormat::M4a,
        AudioFormat::Ogg,
    ];

    /// Lowercase file extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Ogg => "ogg",
        }
    }

    /// Match a filename's extension, case-insensitively
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        Self::ALL
            .into_iter()
            .find(|format| extension.eq_ignore_ascii_case(format.extension()))
    }
}

/// An upload written to local storage
///
/// The file is removed when this value is dropped, so every exit path of a
/// request (success, decode failure, early return, panic unwind) cleans up.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Upload staging area
#[derive(Debug, Clone)]
pub struct UploadStager {
    dir: PathBuf,
}

impl UploadStager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Validate the filename and write the bytes to a fresh staging file
    ///
    /// Staging files get a random name created with exclusive-create
    /// semantics, so concurrent requests never share a path. The accepted
    /// extension is kept as the suffix for the decoder's format probe.
    pub fn stage(&self, bytes: &[u8], filename: &str) -> Result<StagedUpload, IngestError> {
        let format = AudioFormat::from_filename(filename)
            .ok_or_else(|| IngestError::UnsupportedFormat(filename.to_string()))?;

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile_in(&self.dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        tracing::debug!(
            filename = %filename,
            staged = %file.path().display(),
            bytes = bytes.len(),
            "Upload staged"
        );

        Ok(StagedUpload { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_matching_is_case_insensitive() {
        assert_eq!(AudioFormat::from_filename("engine.WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_filename("clip.Mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_filename("voice.m4a"), Some(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_filename("a.b.ogg"), Some(AudioFormat::Ogg));
    }

    #[test]
    fn test_format_rejects_other_extensions() {
        for name in ["notes.txt", "clip.flac", "wav", "clip.wav.exe", "clip.", ""] {
            assert_eq!(AudioFormat::from_filename(name), None, "{name}");
        }
    }

    #[test]
    fn test_unsupported_format_stages_nothing() {
        let dir = TempDir::new().unwrap();
        let stager = UploadStager::new(dir.path());

        let err = stager.stage(b"data", "readme.txt").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_staged_file_is_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let stager = UploadStager::new(dir.path());

        let staged = stager.stage(b"RIFF....", "engine.wav").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....");

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_buffer_is_accepted() {
        let dir = TempDir::new().unwrap();
        let stager = UploadStager::new(dir.path());

        let staged = stager.stage(&[], "silence.mp3").unwrap();
        assert_eq!(std::fs::metadata(staged.path()).unwrap().len(), 0);
        assert_eq!(staged.path().extension().and_then(|e| e.to_str()), Some("mp3"));
    }

    #[test]
    fn test_concurrent_uploads_get_distinct_paths() {
        let dir = TempDir::new().unwrap();
        let stager = UploadStager::new(dir.path());

        let a = stager.stage(b"a", "same.wav").unwrap();
        let b = stager.stage(b"b", "same.wav").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
