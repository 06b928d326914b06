use crate::cue::models::CueSheet;
use crate::cue::timecode::{
    cue_index_to_seconds, format_cue_time, is_valid_cue_index, seconds_to_ffmpeg_time,
};
use log::warn;
use serde::Serialize;

/// Time window of one schedulable track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSplitPlan {
    pub track: u32,
    pub title: Option<String>,
    pub start_seconds: f64,
    /// Next track's start, the album duration for the last track, or unknown
    pub end_seconds: Option<f64>,
    pub start_time: String,
    pub duration_seconds: Option<f64>,
    pub duration_time: Option<String>,
}

/// Display row for a track listing, not used for transcoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSheetRow {
    pub no: u32,
    pub title: String,
    pub performer: Option<String>,
    pub index_raw: String,
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub duration: String,
}

/// Start offsets of every indexed track, in sheet order.
fn track_starts(sheet: &CueSheet) -> Vec<f64> {
    sheet
        .indexed_tracks()
        .map(|track| {
            let index = track.index.as_deref().unwrap_or_default();
            if !is_valid_cue_index(index) {
                warn!(
                    "Track {} has a malformed INDEX 01 ({index}), treating it as 00:00:00",
                    track.track
                );
            }
            cue_index_to_seconds(index)
        })
        .collect()
}

/// Builds the per-track split plan.
///
/// Tracks without an `INDEX 01` are dropped. Boundaries follow the order of
/// the sheet, not the sorted start times: the end of entry `i` is the start
/// of entry `i + 1`, and the last entry ends at `total_duration_seconds`.
pub fn build_split_plan(
    sheet: &CueSheet,
    total_duration_seconds: Option<f64>,
) -> Vec<TrackSplitPlan> {
    let starts = track_starts(sheet);

    sheet
        .indexed_tracks()
        .enumerate()
        .map(|(idx, track)| {
            let start = starts[idx];
            let end = starts.get(idx + 1).copied().or(total_duration_seconds);
            let duration_seconds = end.map(|end| (end - start).max(0.0));

            TrackSplitPlan {
                track: track.track,
                title: track.title.clone(),
                start_seconds: start,
                end_seconds: end,
                start_time: seconds_to_ffmpeg_time(start),
                duration_seconds,
                duration_time: duration_seconds.map(seconds_to_ffmpeg_time),
            }
        })
        .collect()
}

pub fn build_track_sheet(sheet: &CueSheet, album_total_seconds: f64) -> Vec<TrackSheetRow> {
    let starts = track_starts(sheet);

    sheet
        .indexed_tracks()
        .enumerate()
        .map(|(idx, track)| {
            let start = starts[idx];
            let end = starts.get(idx + 1).copied().unwrap_or(album_total_seconds);
            let duration_seconds = (end - start).max(0.0);

            TrackSheetRow {
                no: track.track,
                title: track
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Track {}", track.track)),
                performer: track.performer.clone().or_else(|| sheet.performer.clone()),
                index_raw: track.index.clone().unwrap_or_default(),
                start_seconds: start,
                duration_seconds,
                duration: format_cue_time(duration_seconds),
            }
        })
        .collect()
}
