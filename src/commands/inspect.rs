use crate::commands::{TranscoderArgs, ValidationArgs};
use crate::cue::CueParser;
use crate::cue::models::CueSheet;
use crate::cue::timecode::format_cue_time;
use crate::error::CueSplitterError;
use crate::split::metadata::sanitize_file_name;
use crate::split::plan::{TrackSheetRow, TrackSplitPlan, build_split_plan, build_track_sheet};
use crate::split::validate::{CueValidationResult, validate_cue_against_duration};
use crate::transcoder::Transcoder;
use crate::transcoder::ffmpeg::shared_ffmpeg;
use crate::util::fs::InputFile;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

/// Prints the tracks of a CUE sheet and checks it against the audio.
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InspectCommand {
    /// CUE sheet to inspect
    #[arg(value_name = "CUE")]
    pub cue: PathBuf,

    /// Probe this audio file for its duration and validate the sheet against it
    #[arg(long, value_name = "PATH", conflicts_with = "duration")]
    pub audio: Option<PathBuf>,

    /// Album duration in seconds, used instead of probing
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    #[command(flatten)]
    pub validation: ValidationArgs,

    #[command(flatten)]
    pub transcoder: TranscoderArgs,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub sheet: CueSheet,
    pub duration_seconds: Option<f64>,
    pub rows: Vec<TrackSheetRow>,
    pub plan: Vec<TrackSplitPlan>,
    pub validation: Option<CueValidationResult>,
}

impl InspectReport {
    pub fn new(sheet: CueSheet, duration: Option<f64>, validation_args: &ValidationArgs) -> Self {
        let rows = build_track_sheet(&sheet, duration.unwrap_or_default());
        let plan = build_split_plan(&sheet, duration);
        let validation = duration.map(|duration| {
            validate_cue_against_duration(&plan, duration, &validation_args.into())
        });

        Self {
            sheet,
            duration_seconds: duration,
            rows,
            plan,
            validation,
        }
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        let sheet = &self.sheet;

        for (label, value) in [
            ("Album", &sheet.album),
            ("Performer", &sheet.performer),
            ("Date", &sheet.date),
            ("Genre", &sheet.genre),
            ("Catalog", &sheet.catalog),
            ("File", &sheet.file),
        ] {
            if let Some(value) = value {
                lines.push(format!("{label:<10} {value}"));
            }
        }

        if let Some(disc) = sheet.disc_number {
            let total = sheet
                .total_discs
                .map(|total| format!("/{total}"))
                .unwrap_or_default();
            lines.push(format!("{:<10} {disc}{total}", "Disc"));
        }

        let duration = self
            .duration_seconds
            .map(format_cue_time)
            .unwrap_or_else(|| "unknown".to_string());
        lines.push(format!("{:<10} {duration}", "Duration"));
        lines.push(String::new());

        lines.push(format!("{:>3}  {:<9} {:<9} Title", "No", "Start", "Length"));
        for row in &self.rows {
            let performer = row
                .performer
                .as_ref()
                .map(|performer| format!(" / {performer}"))
                .unwrap_or_default();
            lines.push(format!(
                "{:>3}  {:<9} {:<9} {}{performer}",
                format!("{:02}", row.no),
                row.index_raw,
                row.duration,
                row.title
            ));
        }

        if let Some(validation) = &self.validation {
            lines.push(String::new());
            if validation.ok {
                lines.push("CUE sheet matches the audio.".to_string());
            } else {
                lines.push("CUE sheet does not match the audio:".to_string());
                for error in &validation.errors {
                    lines.push(format!("  - {error}"));
                }
            }
        }

        lines.join("\n")
    }
}

pub async fn inspect_cue(cmd: InspectCommand) -> Result<()> {
    let sheet = CueParser::new(&cmd.cue)
        .parse()
        .await
        .with_context(|| format!("failed to read CUE sheet '{}'", cmd.cue.display()))?;

    let duration = match (cmd.duration, &cmd.audio) {
        (Some(duration), _) => Some(duration),
        (None, Some(audio)) => {
            let file = InputFile::read(audio)
                .await
                .with_context(|| format!("failed to read audio '{}'", audio.display()))?;
            let transcoder = shared_ffmpeg(&cmd.transcoder.ffmpeg).await?;

            let name = sanitize_file_name(&file.name);
            transcoder.write_file(&name, &file.data).await?;
            Some(transcoder.probe_duration(&name).await?)
        }
        (None, None) => None,
    };

    let report = InspectReport::new(sheet, duration, &cmd.validation);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render());
    }

    if report.validation.is_some_and(|validation| !validation.ok) {
        return Err(CueSplitterError::CueMismatch.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::parse_cue_text;

    const CUE: &str = r#"REM DATE 2004
PERFORMER "Quartet"
TITLE "Suite"
FILE "suite.wav" WAVE
  TRACK 01 AUDIO
    TITLE "Prelude"
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    TITLE "Fugue"
    PERFORMER "Soloist"
    INDEX 01 02:00:00
"#;

    fn defaults() -> ValidationArgs {
        ValidationArgs {
            tolerance: 2.0,
            min_track: 1.0,
        }
    }

    #[test]
    fn report_without_duration_skips_validation() {
        let report = InspectReport::new(parse_cue_text(CUE), None, &defaults());

        assert!(report.validation.is_none());
        assert_eq!(report.plan.len(), 2);
        assert_eq!(report.plan[1].end_seconds, None);

        let text = report.render();
        assert!(text.contains("Album      Suite"));
        assert!(text.contains("Duration   unknown"));
        assert!(text.contains(" 02  02:00:00  00:00:00  Fugue / Soloist"));
        assert!(!text.contains("match the audio"));
    }

    #[test]
    fn report_lists_validation_errors() {
        let report = InspectReport::new(parse_cue_text(CUE), Some(120.5), &defaults());

        let validation = report.validation.as_ref().unwrap();
        assert!(!validation.ok);

        let text = report.render();
        assert!(text.contains("CUE sheet does not match the audio:"));
        assert!(text.contains("  - Track 2 has a very short duration (0.50s)."));
    }

    #[test]
    fn report_serializes_as_camel_case() {
        let report = InspectReport::new(parse_cue_text(CUE), Some(300.0), &defaults());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["durationSeconds"], 300.0);
        assert_eq!(json["validation"]["ok"], true);
        assert_eq!(json["plan"][1]["startTime"], "00:02:00.000");
        assert_eq!(json["rows"][0]["title"], "Prelude");
    }

    #[tokio::test]
    async fn supplied_duration_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.cue");
        tokio::fs::write(&path, CUE).await.unwrap();

        let cmd = InspectCommand {
            cue: path,
            audio: None,
            duration: Some(100.0),
            validation: defaults(),
            transcoder: TranscoderArgs {
                ffmpeg: PathBuf::from("ffmpeg"),
            },
            json: false,
        };

        let err = inspect_cue(cmd).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CueSplitterError>(),
            Some(CueSplitterError::CueMismatch)
        ));
    }
}
