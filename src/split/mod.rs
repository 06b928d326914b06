use crate::archive::ZipArchiver;
use crate::cover::{fetch_cover_bytes, shrink_cover_in_background};
use crate::cue::parse_cue_bytes;
use crate::split::error::{SplitError, SplitJobResult};
use crate::split::metadata::{
    OUTPUT_EXTENSION, TrackTags, build_metadata_args, normalize_title, sanitize_file_name,
    track_output_name,
};
use crate::split::models::{SplitOptions, SplitOutput, TrackOutput};
use crate::split::plan::{TrackSplitPlan, build_split_plan};
use crate::split::progress::{ProgressReporter, SplitPhase, SplitStep};
use crate::split::validate::validate_cue_against_duration;
use crate::transcoder::Transcoder;
use crate::util::fs::InputFile;
use log::{debug, info};
use std::time::Instant;

pub mod error;
pub mod metadata;
pub mod models;
pub mod plan;
pub mod progress;
pub mod validate;

const FALLBACK_INPUT_NAME: &str = "audio";
const FALLBACK_ARCHIVE_STEM: &str = "tracks";
// Track outputs always start with a track number, these prefixes never do
const INPUT_PREFIX: &str = "input-";
const TEMP_PREFIX: &str = ".split-tmp-";

/// Splits `source` into one FLAC file per CUE track.
///
/// Runs strictly sequentially against `transcoder`, reporting every phase and
/// step through the progress callback before doing the work. The first
/// failure aborts the whole job.
pub async fn split_audio_to_tracks(
    transcoder: &dyn Transcoder,
    source: &InputFile,
    cue_file: &InputFile,
    options: SplitOptions,
) -> SplitJobResult<SplitOutput> {
    let SplitOptions {
        cover,
        tracks,
        album_info,
        compression_level,
        validation,
        on_progress,
    } = options;
    let mut progress = ProgressReporter::new(on_progress);

    progress.phase(SplitPhase::PrepareInput, SplitStep::WriteInput);
    let input_name = format!(
        "{INPUT_PREFIX}{}",
        workspace_name(&source.name, FALLBACK_INPUT_NAME)
    );
    transcoder.write_file(&input_name, &source.data).await?;

    let cover_name = match &cover {
        Some(cover) => {
            progress.phase(SplitPhase::PrepareCover, SplitStep::FetchCover);
            let data = fetch_cover_bytes(cover).await?;

            progress.step(SplitStep::ShrinkCover);
            let data = shrink_cover_in_background(data).await?;

            progress.step(SplitStep::WriteCover);
            let name = cover.virtual_name();
            transcoder.write_file(&name, &data).await?;
            Some(name)
        }
        None => None,
    };

    progress.phase(SplitPhase::AnalyzeAudio, SplitStep::ProbeDuration);
    let duration = transcoder.probe_duration(&input_name).await?;
    info!("Audio duration: {duration:.2}s");

    progress.phase(SplitPhase::BuildPlan, SplitStep::ParseCue);
    let sheet = parse_cue_bytes(&cue_file.data);
    let plan = build_split_plan(&sheet, Some(duration));

    progress.step(SplitStep::ValidatePlan);
    let verdict = validate_cue_against_duration(&plan, duration, &validation);
    if !verdict.ok {
        return Err(SplitError::ValidationFailed(verdict.errors));
    }

    let selected = select_tracks(&plan, tracks.as_deref())?;
    let album = album_info.unwrap_or_default().resolve(&sheet);

    progress.start_processing(selected.len());
    let mut outputs = Vec::with_capacity(selected.len());

    for track_plan in selected {
        let started = Instant::now();
        let number = track_plan.track;
        let title = normalize_title(
            track_plan
                .title
                .as_deref()
                .unwrap_or(&format!("Track {number}")),
        );
        let temp_name = format!("{TEMP_PREFIX}{number:02}.{OUTPUT_EXTENSION}");
        let output_name = track_output_name(number, &title);

        progress.track_step(number, &title, SplitStep::ExtractTrack);
        let tags = TrackTags::new(&album, sheet.track(number), title.clone(), number, plan.len());
        let args = extraction_args(
            &input_name,
            &track_plan,
            compression_level,
            build_metadata_args(&tags),
            &temp_name,
        );
        transcoder.exec(&args).await?.ensure_success()?;

        match &cover_name {
            Some(cover_name) => {
                progress.track_step(number, &title, SplitStep::EmbedCover);
                let args = cover_remux_args(&temp_name, cover_name, &output_name);
                transcoder.exec(&args).await?.ensure_success()?;
            }
            None => {
                progress.track_step(number, &title, SplitStep::CopyTrack);
                let data = transcoder.read_file(&temp_name).await?;
                transcoder.write_file(&output_name, &data).await?;
            }
        }

        progress.track_step(number, &title, SplitStep::ReadTrack);
        let data = transcoder.read_file(&output_name).await?;
        if data.is_empty() {
            return Err(SplitError::EmptyOutput(output_name));
        }

        debug!("Track {number:02} done: {output_name} ({} bytes)", data.len());
        outputs.push(TrackOutput {
            name: output_name,
            data,
            plan: track_plan,
        });
        progress.track_done(started.elapsed());
    }

    info!(
        "Extracted {} of {} tracks",
        progress.state().done,
        plan.len()
    );

    let output = match <[TrackOutput; 1]>::try_from(outputs) {
        Ok([track]) => SplitOutput::Single(track),
        Err(tracks) => {
            progress.phase(SplitPhase::Zipping, SplitStep::AddToArchive);
            let mut archiver = ZipArchiver::new();
            for track in &tracks {
                archiver.add_entry(&track.name, &track.data)?;
            }

            progress.step(SplitStep::FinalizeArchive);
            let data = archiver.finish()?;
            let stem = if album.album.is_empty() {
                workspace_name(source.stem(), FALLBACK_ARCHIVE_STEM)
            } else {
                workspace_name(&album.album, FALLBACK_ARCHIVE_STEM)
            };

            SplitOutput::Archive {
                name: format!("{stem}.zip"),
                data,
                tracks,
            }
        }
    };

    progress.finish();
    Ok(output)
}

fn workspace_name(name: &str, fallback: &str) -> String {
    let name = sanitize_file_name(name);
    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// Narrows the plan to the requested track numbers, keeping plan order.
fn select_tracks(
    plan: &[TrackSplitPlan],
    requested: Option<&[u32]>,
) -> SplitJobResult<Vec<TrackSplitPlan>> {
    let Some(requested) = requested.filter(|requested| !requested.is_empty()) else {
        return Ok(plan.to_vec());
    };

    let selected: Vec<TrackSplitPlan> = plan
        .iter()
        .filter(|track| requested.contains(&track.track))
        .cloned()
        .collect();

    if selected.is_empty() {
        return Err(SplitError::EmptyTrackSelection {
            requested: requested.to_vec(),
            available: plan.iter().map(|track| track.track).collect(),
        });
    }

    Ok(selected)
}

fn extraction_args(
    input: &str,
    plan: &TrackSplitPlan,
    compression_level: u8,
    metadata: Vec<String>,
    output: &str,
) -> Vec<String> {
    let mut args = vec![
        "-ss".to_string(),
        plan.start_time.clone(),
        "-i".to_string(),
        input.to_string(),
    ];

    // Without a known length the track runs to the end of the input
    if let Some(duration) = &plan.duration_time {
        args.push("-t".to_string());
        args.push(duration.clone());
    }

    args.extend(
        ["-vn", "-map_metadata", "-1", "-c:a", "flac", "-compression_level"]
            .into_iter()
            .map(String::from),
    );
    args.push(compression_level.to_string());
    args.extend(metadata);
    args.push(output.to_string());
    args
}

fn cover_remux_args(audio: &str, cover: &str, output: &str) -> Vec<String> {
    [
        "-i",
        audio,
        "-i",
        cover,
        "-map",
        "0:a",
        "-map",
        "1:v",
        "-c:a",
        "copy",
        "-c:v",
        "copy",
        "-disposition:v:0",
        "attached_pic",
        "-metadata:s:v",
        "title=Album cover",
        "-metadata:s:v",
        "comment=Cover (front)",
        output,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
