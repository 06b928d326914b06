use crate::transcoder::error::{TranscoderError, TranscoderResult};
use crate::transcoder::{TranscodeOutput, Transcoder};
use async_trait::async_trait;
use log::{debug, info, trace};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::sync::OnceCell;

/// ffmpeg run as a child process inside a private scratch directory.
///
/// The scratch directory plays the role of the engine's file store: names
/// passed to [`Transcoder::write_file`] and used in command arguments are
/// resolved relative to it, and it is removed when the engine is dropped.
#[derive(Debug)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
    workspace: TempDir,
}

impl FfmpegTranscoder {
    pub async fn load(binary: impl AsRef<Path>) -> TranscoderResult<Self> {
        let binary = binary.as_ref().to_path_buf();

        let output = Command::new(&binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| TranscoderError::EngineUnavailable {
                path: binary.clone(),
                reason: err.to_string(),
            })?;

        if !output.status.success() {
            return Err(TranscoderError::EngineUnavailable {
                path: binary,
                reason: format!("-version exited with {}", output.status),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout);
        info!(
            "Loaded {}",
            version.lines().next().unwrap_or("ffmpeg (unknown version)")
        );

        let workspace = tempfile::Builder::new()
            .prefix("cue-splitter-")
            .tempdir()?;

        debug!("Transcoder workspace: {:?}", workspace.path());

        Ok(Self { binary, workspace })
    }

    fn resolve(&self, name: &str) -> TranscoderResult<PathBuf> {
        let path = Path::new(name);
        let is_plain = path.components().count() == 1
            && path.file_name().is_some_and(|file_name| file_name == name);

        if !is_plain {
            return Err(TranscoderError::InvalidFileName(name.to_string()));
        }

        Ok(self.workspace.path().join(name))
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn write_file(&self, name: &str, data: &[u8]) -> TranscoderResult<()> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, data).await?;

        trace!("Wrote {} bytes to workspace file {name}", data.len());
        Ok(())
    }

    async fn read_file(&self, name: &str) -> TranscoderResult<Vec<u8>> {
        let path = self.resolve(name)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(TranscoderError::FileNotFound(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn exec(&self, args: &[String]) -> TranscoderResult<TranscodeOutput> {
        debug!("ffmpeg {}", args.join(" "));

        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-nostdin", "-y"])
            .args(args)
            .current_dir(self.workspace.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        // ffmpeg logs to stderr, stdout only carries piped output
        let log: Vec<String> = String::from_utf8_lossy(&output.stderr)
            .lines()
            .chain(String::from_utf8_lossy(&output.stdout).lines())
            .map(str::to_string)
            .collect();

        for line in &log {
            trace!("[ffmpeg] {line}");
        }

        Ok(TranscodeOutput {
            // Killed by a signal has no code
            exit_code: output.status.code().unwrap_or(-1),
            log,
        })
    }
}

/// Lazily loaded, process-wide engine handle.
///
/// The first caller runs the loader; callers arriving while it is in flight
/// wait for the same load. A failed load leaves the slot empty.
pub struct EngineSlot<T> {
    cell: OnceCell<Arc<T>>,
}

impl<T> EngineSlot<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    pub async fn get_or_load<F, Fut>(&self, load: F) -> TranscoderResult<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = TranscoderResult<T>>,
    {
        self.cell
            .get_or_try_init(|| async move { load().await.map(Arc::new) })
            .await
            .cloned()
    }
}

impl<T> Default for EngineSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

static FFMPEG_ENGINE: EngineSlot<FfmpegTranscoder> = EngineSlot::new();

/// Returns the shared ffmpeg engine, loading it on first use.
///
/// `binary` is only consulted by the call that performs the load.
pub async fn shared_ffmpeg(binary: &Path) -> TranscoderResult<Arc<FfmpegTranscoder>> {
    FFMPEG_ENGINE
        .get_or_load(|| FfmpegTranscoder::load(binary))
        .await
}
