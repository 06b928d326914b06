use crate::transcoder::error::{TranscoderError, TranscoderResult};
use async_trait::async_trait;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

pub mod error;
pub mod ffmpeg;
#[cfg(test)]
pub mod memory;

// How many trailing log lines a failed command reports
const FAILURE_LOG_LINES: usize = 5;

lazy_static! {
    static ref DURATION_RE: Regex = Regex::new(r"Duration:\s+(\d+):(\d+):(\d+\.\d+)").unwrap();
}

/// Result of one transcoder invocation.
#[derive(Debug, Clone, Default)]
pub struct TranscodeOutput {
    pub exit_code: i32,
    /// Every line the transcoder logged, in order
    pub log: Vec<String>,
}

impl TranscodeOutput {
    pub fn ensure_success(&self) -> TranscoderResult<()> {
        if self.exit_code == 0 {
            return Ok(());
        }

        let start = self.log.len().saturating_sub(FAILURE_LOG_LINES);
        Err(TranscoderError::CommandFailed {
            exit_code: self.exit_code,
            message: self.log[start..].join("\n"),
        })
    }
}

/// An ffmpeg-compatible engine working on a flat, name-keyed file store.
///
/// Implementations are not required to handle concurrent `exec` calls; the
/// splitter drives one call at a time.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn write_file(&self, name: &str, data: &[u8]) -> TranscoderResult<()>;

    async fn read_file(&self, name: &str) -> TranscoderResult<Vec<u8>>;

    async fn exec(&self, args: &[String]) -> TranscoderResult<TranscodeOutput>;

    /// Measures the duration of a workspace file in seconds.
    async fn probe_duration(&self, input: &str) -> TranscoderResult<f64> {
        let args: Vec<String> = ["-i", input, "-f", "null", "-"]
            .into_iter()
            .map(String::from)
            .collect();

        let output = self.exec(&args).await?;
        let duration = parse_duration_from_log(&output.log)
            .ok_or(TranscoderError::DurationNotFound)?;

        debug!("Probed duration of {input}: {duration:.3}s");
        Ok(duration)
    }
}

/// Scans log lines for `Duration: HH:MM:SS.ms`, the last match wins.
pub fn parse_duration_from_log(lines: &[String]) -> Option<f64> {
    lines
        .iter()
        .filter_map(|line| DURATION_RE.captures(line))
        .filter_map(|captures| {
            let hours = captures[1].parse::<f64>().ok()?;
            let minutes = captures[2].parse::<f64>().ok()?;
            let seconds = captures[3].parse::<f64>().ok()?;
            Some(hours * 3600.0 + minutes * 60.0 + seconds)
        })
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcoder::memory::MemoryTranscoder;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn parses_ffmpeg_duration_line() {
        let log = lines(
            "Input #0, flac, from 'album.flac':\n  Duration: 00:42:17.53, start: 0.000000, bitrate: 912 kb/s\n  Stream #0:0: Audio: flac, 44100 Hz, stereo, s16",
        );

        let duration = parse_duration_from_log(&log).unwrap();
        assert!((duration - (42.0 * 60.0 + 17.53)).abs() < 1e-9);
    }

    #[test]
    fn missing_duration_line_yields_none() {
        assert_eq!(parse_duration_from_log(&lines("Duration: N/A, bitrate: N/A")), None);
        assert_eq!(parse_duration_from_log(&[]), None);
    }

    #[test]
    fn failed_command_reports_log_tail() {
        let output = TranscodeOutput {
            exit_code: 1,
            log: lines("a\nb\nc\nd\ne\nf\nInvalid argument"),
        };

        match output.ensure_success() {
            Err(TranscoderError::CommandFailed { exit_code, message }) => {
                assert_eq!(exit_code, 1);
                assert_eq!(message, "c\nd\ne\nf\nInvalid argument");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn probe_runs_null_output_command() {
        let transcoder = MemoryTranscoder::new(125.5);
        transcoder.write_file("in.flac", b"audio").await.unwrap();

        let duration = transcoder.probe_duration("in.flac").await.unwrap();

        assert_eq!(duration, 125.5);
        assert_eq!(
            transcoder.calls()[0],
            vec!["-i", "in.flac", "-f", "null", "-"]
        );
    }

    #[tokio::test]
    async fn probe_without_duration_fails() {
        let transcoder = MemoryTranscoder::without_duration();
        transcoder.write_file("in.flac", b"audio").await.unwrap();

        let result = transcoder.probe_duration("in.flac").await;
        assert!(matches!(result, Err(TranscoderError::DurationNotFound)));
    }
}
