use crate::cover::CoverSource;
use crate::split::metadata::AlbumInfo;
use crate::split::plan::TrackSplitPlan;
use crate::split::progress::ProgressCallback;
use crate::split::validate::ValidationOptions;

pub const DEFAULT_COMPRESSION_LEVEL: u8 = 5;

pub struct SplitOptions {
    pub cover: Option<CoverSource>,
    /// Track numbers to export, `None` or an empty list exports everything
    pub tracks: Option<Vec<u32>>,
    pub album_info: Option<AlbumInfo>,
    pub compression_level: u8,
    pub validation: ValidationOptions,
    pub on_progress: Option<ProgressCallback>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            cover: None,
            tracks: None,
            album_info: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            validation: ValidationOptions::default(),
            on_progress: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackOutput {
    pub name: String,
    pub data: Vec<u8>,
    pub plan: TrackSplitPlan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SplitOutput {
    Single(TrackOutput),
    Archive {
        name: String,
        data: Vec<u8>,
        tracks: Vec<TrackOutput>,
    },
}

impl SplitOutput {
    /// Name and bytes of the file the job produced.
    pub fn file(&self) -> (&str, &[u8]) {
        match self {
            SplitOutput::Single(track) => (&track.name, &track.data),
            SplitOutput::Archive { name, data, .. } => (name, data),
        }
    }
}
