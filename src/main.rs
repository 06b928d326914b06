use crate::commands::inspect::inspect_cue;
use crate::commands::split::split_album;
use crate::commands::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

mod archive;
mod commands;
mod cover;
mod cue;
mod error;
mod split;
mod transcoder;
mod util;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let logger = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let pb = MultiProgress::new();

    LogWrapper::new(pb.clone(), logger).try_init()?;
    log::set_max_level(level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Split(cmd) => split_album(pb.clone(), cmd).await?,
        Commands::Inspect(cmd) => inspect_cue(cmd).await?,
    }

    Ok(())
}
