use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscoderError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Transcoder could not be started from {path:?}: {reason}")]
    EngineUnavailable { path: PathBuf, reason: String },

    #[error("Transcoder exited with code {exit_code}: {message}")]
    CommandFailed { exit_code: i32, message: String },

    #[error("Invalid workspace file name: {0}")]
    InvalidFileName(String),

    #[error("File not found in transcoder workspace: {0}")]
    FileNotFound(String),

    #[error("Unable to read audio duration from transcoder log")]
    DurationNotFound,
}

pub type TranscoderResult<T> = Result<T, TranscoderError>;
