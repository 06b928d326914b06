use crate::cue::encoding::decode_cue_bytes;
use crate::cue::error::{CueError, CueResult};
use crate::cue::models::{CueSheet, CueTrack};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::path::{Path, PathBuf};

pub mod encoding;
pub mod error;
pub mod models;
pub mod timecode;

lazy_static! {
    static ref TRACK_NUMBER_RE: Regex = Regex::new(r"TRACK\s+(\d+)").unwrap();
    static ref INDEX_01_RE: Regex = Regex::new(r"INDEX 01\s+(\S+)").unwrap();
    static ref QUOTED_RE: Regex = Regex::new(r#""(.+?)""#).unwrap();
}

pub struct CueParser {
    cue_path: PathBuf,
}

impl CueParser {
    pub fn new(cue_path: impl AsRef<Path>) -> Self {
        Self {
            cue_path: cue_path.as_ref().to_path_buf(),
        }
    }

    /// Reads the sheet from disk, resolving its text encoding first.
    pub async fn parse(&self) -> CueResult<CueSheet> {
        let data = tokio::fs::read(&self.cue_path).await?;
        if data.is_empty() {
            return Err(CueError::EmptyCueFile(self.cue_path.clone()));
        }

        debug!("Read {} bytes from {:?}", data.len(), self.cue_path);

        Ok(parse_cue_bytes(&data))
    }
}

pub fn parse_cue_bytes(data: &[u8]) -> CueSheet {
    parse_cue_text(&decode_cue_bytes(data))
}

/// Parses CUE text into a [`CueSheet`].
///
/// Never fails: directives outside the supported set and malformed lines are
/// skipped. `REM COMMENT` lines are dropped before any other handling, so
/// `CueSheet::comment` stays empty.
pub fn parse_cue_text(text: &str) -> CueSheet {
    let mut sheet = CueSheet::default();
    // Position in `sheet.tracks` of the track that TITLE/PERFORMER/INDEX apply to
    let mut current: Option<usize> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("REM COMMENT") {
            continue;
        }

        if line.starts_with("REM ") {
            parse_rem(&mut sheet, line);
            continue;
        }

        if line.starts_with("FILE") {
            sheet.file = extract_quoted(line);
            continue;
        }

        if line.starts_with("TRACK") {
            let number = TRACK_NUMBER_RE
                .captures(line)
                .and_then(|c| c[1].parse::<u32>().ok())
                .unwrap_or(sheet.tracks.len() as u32 + 1);

            sheet.tracks.push(CueTrack {
                track: number,
                ..Default::default()
            });
            current = Some(sheet.tracks.len() - 1);
            continue;
        }

        if line.starts_with("TITLE") {
            // A TITLE without a quoted value leaves the previous value untouched
            if let Some(value) = extract_quoted(line) {
                match current {
                    Some(idx) => sheet.tracks[idx].title = Some(value),
                    None => sheet.album = Some(value),
                }
            }
            continue;
        }

        if line.starts_with("PERFORMER") {
            if let Some(value) = extract_quoted(line) {
                match current {
                    Some(idx) => sheet.tracks[idx].performer = Some(value),
                    None => sheet.performer = Some(value),
                }
            }
            continue;
        }

        if line.starts_with("INDEX 01") {
            if let (Some(idx), Some(captures)) = (current, INDEX_01_RE.captures(line)) {
                sheet.tracks[idx].index = Some(captures[1].to_string());
            }
        }
    }

    sheet
}

const REM_FIELDS: [&str; 5] = ["DATE", "GENRE", "CATALOG", "DISCNUMBER", "DISCTOTAL"];

fn parse_rem(sheet: &mut CueSheet, line: &str) {
    // Prefix match, so "REM DATEX" still lands on DATE like every other directive
    let Some(field) = REM_FIELDS
        .into_iter()
        .find(|field| line[4..].starts_with(field))
    else {
        return;
    };

    let value = extract_unquoted_after(line, &format!("REM {field}"));

    match field {
        "DATE" => sheet.date = Some(value),
        "GENRE" => sheet.genre = Some(value),
        "CATALOG" => sheet.catalog = Some(value),
        "DISCNUMBER" => sheet.disc_number = parse_number(&value),
        "DISCTOTAL" => sheet.total_discs = parse_number(&value),
        _ => {}
    }
}

fn parse_number(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }

    value.parse().ok()
}

/// First non-empty double-quoted substring of `line`.
fn extract_quoted(line: &str) -> Option<String> {
    QUOTED_RE.captures(line).map(|c| c[1].to_string())
}

/// Value following `prefix`: the quoted string if one directly follows,
/// otherwise the rest of the line with every quote removed.
fn extract_unquoted_after(line: &str, prefix: &str) -> String {
    let rest = line
        .strip_prefix(prefix)
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start);

    let Some(rest) = rest else {
        // No separator after the key, nothing to strip
        return line.replace('"', "").trim().to_string();
    };

    if let Some(quoted) = rest.strip_prefix('"') {
        if let Some(end) = quoted.find('"').filter(|end| *end > 0) {
            return quoted[..end].to_string();
        }
    }

    rest.replace('"', "").trim().to_string()
}
