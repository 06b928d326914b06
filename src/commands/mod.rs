use crate::commands::inspect::InspectCommand;
use crate::commands::split::SplitCommand;
use crate::split::validate::ValidationOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod inspect;
pub mod split;

/// CLI for splitting single-file albums into tagged FLAC tracks using their CUE sheet.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Split(SplitCommand),
    Inspect(InspectCommand),
}

/// How strictly the CUE sheet is checked against the audio.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ValidationArgs {
    /// Allowed difference in seconds between the audio and the CUE sheet
    #[arg(long, value_name = "SECONDS", default_value_t = 2.0)]
    pub tolerance: f64,

    /// Shortest acceptable track in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0)]
    pub min_track: f64,
}

impl From<&ValidationArgs> for ValidationOptions {
    fn from(args: &ValidationArgs) -> Self {
        Self {
            tolerance_seconds: args.tolerance,
            min_track_seconds: args.min_track,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TranscoderArgs {
    /// ffmpeg executable used for probing and encoding
    #[arg(long, value_name = "PATH", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn validation_defaults_match_options() {
        let cli = Cli::parse_from(["cue-splitter", "inspect", "album.cue"]);
        let Commands::Inspect(cmd) = cli.command else {
            panic!("expected inspect");
        };

        assert_eq!(
            ValidationOptions::from(&cmd.validation),
            ValidationOptions::default()
        );
        assert_eq!(cmd.transcoder.ffmpeg, PathBuf::from("ffmpeg"));
    }
}
