use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    HttpError(#[from] reqwest::Error),

    #[error(transparent)]
    ImageError(#[from] image::ImageError),

    #[error(transparent)]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Cover download from {url} failed with status {status}")]
    NoSuccessStatusCode { url: String, status: StatusCode },

    #[error("Cover image is empty")]
    EmptyImage,
}

pub type CoverResult<T> = Result<T, CoverError>;
