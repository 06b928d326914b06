use crate::commands::{TranscoderArgs, ValidationArgs};
use crate::cover::CoverSource;
use crate::error::{CueSplitterError, CueSplitterResult};
use crate::split::metadata::AlbumInfo;
use crate::split::models::{DEFAULT_COMPRESSION_LEVEL, SplitOptions, SplitOutput};
use crate::split::progress::{SplitProgress, SplitStatus};
use crate::split::split_audio_to_tracks;
use crate::transcoder::ffmpeg::shared_ffmpeg;
use crate::util::fs::InputFile;
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Splits an album image into one tagged FLAC file per CUE track.
///
/// A single selected track is written as-is, several tracks are bundled into a ZIP archive.
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SplitCommand {
    /// Audio file the CUE sheet describes
    #[arg(value_name = "AUDIO")]
    pub audio: PathBuf,

    /// CUE sheet for the audio file
    #[arg(value_name = "CUE")]
    pub cue: PathBuf,

    /// Directory the result is written to
    #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
    pub output: PathBuf,

    /// Cover art to embed, either a file path or an http(s) URL
    #[arg(long, value_name = "PATH|URL")]
    pub cover: Option<String>,

    /// Only export these track numbers, comma separated
    #[arg(long, value_name = "N,...", value_delimiter = ',')]
    pub tracks: Vec<u32>,

    /// Album title, overrides the CUE sheet
    #[arg(long)]
    pub album: Option<String>,

    /// Album artist, overrides the CUE sheet
    #[arg(long)]
    pub performer: Option<String>,

    /// Release date, overrides the CUE sheet
    #[arg(long)]
    pub date: Option<String>,

    /// Genre, overrides the CUE sheet
    #[arg(long)]
    pub genre: Option<String>,

    /// FLAC compression level
    #[arg(
        long,
        value_name = "LEVEL",
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u8).range(0..=12)
    )]
    pub compression_level: u8,

    #[command(flatten)]
    pub validation: ValidationArgs,

    #[command(flatten)]
    pub transcoder: TranscoderArgs,

    /// Force overwrite of the output file if it already exists
    #[arg(long, short = 'f', default_value_t = false)]
    pub force: bool,
}

impl SplitCommand {
    fn album_info(&self) -> AlbumInfo {
        AlbumInfo {
            album: self.album.clone(),
            performer: self.performer.clone(),
            date: self.date.clone(),
            genre: self.genre.clone(),
        }
    }
}

pub async fn split_album(pb: MultiProgress, cmd: SplitCommand) -> Result<()> {
    let audio = InputFile::read(&cmd.audio)
        .await
        .with_context(|| format!("failed to read audio '{}'", cmd.audio.display()))?;
    let cue = InputFile::read(&cmd.cue)
        .await
        .with_context(|| format!("failed to read CUE sheet '{}'", cmd.cue.display()))?;

    let cover = match &cmd.cover {
        Some(value) => Some(
            CoverSource::from_arg(value)
                .await
                .with_context(|| format!("failed to read cover '{value}'"))?,
        ),
        None => None,
    };

    let transcoder = shared_ffmpeg(&cmd.transcoder.ffmpeg).await?;

    let bar = pb.add(ProgressBar::new(0));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));

    let handle = bar.clone();
    let options = SplitOptions {
        cover,
        tracks: Some(cmd.tracks.clone()),
        album_info: Some(cmd.album_info()),
        compression_level: cmd.compression_level,
        validation: (&cmd.validation).into(),
        on_progress: Some(Box::new(move |progress: &SplitProgress| {
            handle.set_length(progress.total as u64);
            handle.set_position(progress.done as u64);
            handle.set_message(describe_progress(progress));
        })),
    };

    let result = split_audio_to_tracks(&*transcoder, &audio, &cue, options)
        .await
        .with_context(|| format!("failed to split '{}'", cmd.audio.display()));

    bar.finish_and_clear();
    let output = result?;

    let (name, data) = output.file();
    let path = write_output(&cmd.output, name, data, cmd.force).await?;
    info!("Wrote {}", path.display());

    if let SplitOutput::Archive { tracks, .. } = &output {
        for track in tracks {
            info!("  {}", track.name);
        }
    }

    Ok(())
}

fn describe_progress(progress: &SplitProgress) -> String {
    let message = match &progress.track {
        Some(track) => format!(
            "{:02} - {}: {}",
            track.number, track.title, progress.step
        ),
        None => format!("{}: {}", progress.phase, progress.step),
    };

    match progress.eta_seconds {
        Some(eta) if progress.status == SplitStatus::Running && eta > 0 => {
            format!("{message} (~{eta}s left)")
        }
        _ => message,
    }
}

/// Writes the job result into `dir`, refusing to replace files unless `force` is set.
pub async fn write_output(
    dir: &Path,
    name: &str,
    data: &[u8],
    force: bool,
) -> CueSplitterResult<PathBuf> {
    let path = dir.join(name);

    if fs::try_exists(&path).await? && !force {
        return Err(CueSplitterError::OutputAlreadyExists(path));
    }

    fs::create_dir_all(dir).await?;
    fs::write(&path, data).await?;

    Ok(path)
}
