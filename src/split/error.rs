use crate::archive::error::ArchiveError;
use crate::cover::error::CoverError;
use crate::transcoder::error::TranscoderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error(transparent)]
    TranscoderError(#[from] TranscoderError),

    #[error(transparent)]
    CoverError(#[from] CoverError),

    #[error(transparent)]
    ArchiveError(#[from] ArchiveError),

    #[error("CUE sheet does not match the audio:\n{}", .0.join("\n"))]
    ValidationFailed(Vec<String>),

    #[error("None of the requested tracks {requested:?} exist, available tracks: {available:?}")]
    EmptyTrackSelection {
        requested: Vec<u32>,
        available: Vec<u32>,
    },

    #[error("Transcoder produced an empty file for {0}")]
    EmptyOutput(String),
}

pub type SplitJobResult<T> = Result<T, SplitError>;
