use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    ZipError(#[from] zip::result::ZipError),

    #[error("Archive already contains an entry named {0}")]
    DuplicateEntry(String),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
