use crate::cover::error::{CoverError, CoverResult};
use crate::split::metadata::sanitize_file_name;
use crate::util::fs::InputFile;
use crate::util::http::CLIENT;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use log::debug;
use std::path::Path;
use tokio::task;

pub mod error;

/// Covers are shrunk to fit inside a square of this size.
pub const COVER_BOUND: u32 = 640;
pub const COVER_JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone, PartialEq)]
pub enum CoverSource {
    File(InputFile),
    Url(String),
}

impl CoverSource {
    /// Parses a CLI value: `http(s)://` values are URLs, anything else a path.
    pub async fn from_arg(value: &str) -> CoverResult<Self> {
        if value.starts_with("http://") || value.starts_with("https://") {
            return Ok(Self::Url(value.to_string()));
        }

        Ok(Self::File(InputFile::read(value).await?))
    }

    /// Workspace name of the re-encoded cover.
    pub fn virtual_name(&self) -> String {
        let stem = match self {
            CoverSource::File(file) => file.stem().to_string(),
            CoverSource::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or_default();
                path.rsplit('/')
                    .next()
                    .and_then(|segment| Path::new(segment).file_stem())
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            }
        };

        let stem = sanitize_file_name(&stem);
        if stem.is_empty() {
            "cover.jpg".to_string()
        } else {
            format!("cover-{stem}.jpg")
        }
    }
}

pub async fn fetch_cover_bytes(source: &CoverSource) -> CoverResult<Vec<u8>> {
    let data = match source {
        CoverSource::File(file) => file.data.clone(),
        CoverSource::Url(url) => {
            debug!("Downloading cover from {url}");

            let res = CLIENT.get(url).send().await?;
            if !res.status().is_success() {
                return Err(CoverError::NoSuccessStatusCode {
                    url: url.clone(),
                    status: res.status(),
                });
            }

            res.bytes().await?.to_vec()
        }
    };

    if data.is_empty() {
        return Err(CoverError::EmptyImage);
    }

    Ok(data)
}

/// Fits the image inside `bound`×`bound` keeping its aspect ratio and
/// re-encodes it as JPEG. Smaller images are only re-encoded.
pub fn shrink_cover(data: &[u8], bound: u32) -> CoverResult<Vec<u8>> {
    let mut image = image::load_from_memory(data)?;

    if image.width() > bound || image.height() > bound {
        image = image.resize(bound, bound, FilterType::Lanczos3);
    }

    let rgb = image.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, COVER_JPEG_QUALITY).encode_image(&rgb)?;

    debug!(
        "Cover shrunk to {}x{} ({} bytes)",
        rgb.width(),
        rgb.height(),
        out.len()
    );

    Ok(out)
}

/// Runs [`shrink_cover`] with [`COVER_BOUND`] off the async runtime.
pub async fn shrink_cover_in_background(data: Vec<u8>) -> CoverResult<Vec<u8>> {
    task::spawn_blocking(move || shrink_cover(&data, COVER_BOUND)).await?
}
