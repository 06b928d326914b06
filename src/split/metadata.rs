use crate::cue::encoding::REPLACEMENT_CHARACTER;
use crate::cue::models::{CueSheet, CueTrack};
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref ILLEGAL_FILE_CHARS_RE: Regex = Regex::new(r#"[<>:"/\\|?*]+"#).unwrap();
}

pub const OUTPUT_EXTENSION: &str = "flac";

/// Replaces characters the transcoder workspace cannot hold in a file name.
pub fn sanitize_file_name(name: &str) -> String {
    ILLEGAL_FILE_CHARS_RE
        .replace_all(name, "_")
        .trim()
        .to_string()
}

/// Repairs apostrophes lost to a bad decode and NFC-normalizes the title.
pub fn normalize_title(title: &str) -> String {
    title.replace(REPLACEMENT_CHARACTER, "'").nfc().collect()
}

pub fn track_output_name(track: u32, title: &str) -> String {
    format!(
        "{track:02} - {}.{OUTPUT_EXTENSION}",
        sanitize_file_name(title)
    )
}

/// Album fields supplied by the caller. Non-empty values win over the sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumInfo {
    pub album: Option<String>,
    pub performer: Option<String>,
    pub date: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAlbum {
    pub album: String,
    pub performer: String,
    pub date: String,
    pub genre: String,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

fn pick(override_value: Option<&String>, sheet_value: Option<&String>) -> String {
    non_empty(override_value)
        .or_else(|| sheet_value.map(String::as_str))
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn track_or_album(track_value: Option<&String>, album_value: &str) -> String {
    non_empty(track_value).unwrap_or(album_value).to_string()
}

impl AlbumInfo {
    pub fn resolve(&self, sheet: &CueSheet) -> ResolvedAlbum {
        ResolvedAlbum {
            album: pick(self.album.as_ref(), sheet.album.as_ref()),
            performer: pick(self.performer.as_ref(), sheet.performer.as_ref()),
            date: pick(self.date.as_ref(), sheet.date.as_ref()),
            genre: pick(self.genre.as_ref(), sheet.genre.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackTags {
    pub album: String,
    pub album_artist: String,
    pub artist: String,
    pub date: String,
    pub genre: String,
    pub title: String,
    pub track_no: u32,
    /// Size of the whole album, not of the exported selection
    pub total_tracks: usize,
}

impl TrackTags {
    pub fn new(
        album: &ResolvedAlbum,
        cue_track: Option<&CueTrack>,
        title: String,
        track_no: u32,
        total_tracks: usize,
    ) -> Self {
        Self {
            album: album.album.clone(),
            album_artist: album.performer.clone(),
            artist: track_or_album(
                cue_track.and_then(|t| t.performer.as_ref()),
                &album.performer,
            ),
            date: track_or_album(cue_track.and_then(|t| t.date.as_ref()), &album.date),
            genre: track_or_album(cue_track.and_then(|t| t.genre.as_ref()), &album.genre),
            title,
            track_no,
            total_tracks,
        }
    }
}

/// `-metadata key=value` pairs for one track. Empty optional tags are left
/// out; title and track number are always written.
pub fn build_metadata_args(tags: &TrackTags) -> Vec<String> {
    let mut args = Vec::new();

    for (key, value) in [
        ("album", &tags.album),
        ("album_artist", &tags.album_artist),
        ("artist", &tags.artist),
        ("date", &tags.date),
        ("genre", &tags.genre),
    ] {
        if !value.is_empty() {
            push_tag(&mut args, key, value);
        }
    }

    push_tag(&mut args, "title", &tags.title);
    push_tag(
        &mut args,
        "track",
        &format!("{}/{}", tags.track_no, tags.total_tracks),
    );

    args
}

fn push_tag(args: &mut Vec<String>, key: &str, value: &str) {
    args.push("-metadata".to_string());
    args.push(format!("{key}={value}"));
}
