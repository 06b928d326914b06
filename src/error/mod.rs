use std::path::PathBuf;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CueSplitterError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Output file already exists, use --force to overwrite it: {0}")]
    OutputAlreadyExists(PathBuf),

    #[error("CUE sheet does not match the audio")]
    CueMismatch,
}

pub type CueSplitterResult<T> = result::Result<T, CueSplitterError>;
