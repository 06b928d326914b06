use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("CUE file is empty: {0}")]
    EmptyCueFile(PathBuf),
}

pub type CueResult<T> = Result<T, CueError>;
