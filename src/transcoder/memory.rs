use crate::transcoder::error::{TranscoderError, TranscoderResult};
use crate::transcoder::{TranscodeOutput, Transcoder};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory stand-in for the ffmpeg engine.
///
/// Probes report a fixed duration; every other command "encodes" by writing
/// its own argument list to the last argument's file name.
pub struct MemoryTranscoder {
    files: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<Vec<String>>>,
    duration: Option<f64>,
    fail_marker: Option<String>,
}

impl MemoryTranscoder {
    pub fn new(duration: f64) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            duration: Some(duration),
            fail_marker: None,
        }
    }

    pub fn without_duration() -> Self {
        Self {
            duration: None,
            ..Self::new(0.0)
        }
    }

    /// Makes any command containing `marker` in one of its arguments exit with 1.
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }

    fn failed(message: &str) -> TranscodeOutput {
        TranscodeOutput {
            exit_code: 1,
            log: vec![message.to_string()],
        }
    }
}

fn format_log_duration(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds % 3600.0) / 60.0).floor();
    let rest = seconds - hours * 3600.0 - minutes * 60.0;
    format!("{:02}:{:02}:{:05.2}", hours as u64, minutes as u64, rest)
}

#[async_trait]
impl Transcoder for MemoryTranscoder {
    async fn write_file(&self, name: &str, data: &[u8]) -> TranscoderResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), data.to_vec());
        Ok(())
    }

    async fn read_file(&self, name: &str) -> TranscoderResult<Vec<u8>> {
        self.file(name)
            .ok_or_else(|| TranscoderError::FileNotFound(name.to_string()))
    }

    async fn exec(&self, args: &[String]) -> TranscoderResult<TranscodeOutput> {
        self.calls.lock().unwrap().push(args.to_vec());

        let inputs: Vec<&String> = args
            .windows(2)
            .filter(|pair| pair[0] == "-i")
            .map(|pair| &pair[1])
            .collect();

        for input in &inputs {
            if self.file(input).is_none() {
                return Ok(Self::failed(&format!("{input}: No such file or directory")));
            }
        }

        if let Some(marker) = &self.fail_marker {
            if args.iter().any(|arg| arg.contains(marker.as_str())) {
                return Ok(Self::failed("Conversion failed!"));
            }
        }

        if args.ends_with(&["-f".to_string(), "null".to_string(), "-".to_string()]) {
            let mut log = vec![format!("Input #0, flac, from '{}':", inputs[0])];
            if let Some(duration) = self.duration {
                log.push(format!(
                    "  Duration: {}, start: 0.000000, bitrate: 1000 kb/s",
                    format_log_duration(duration)
                ));
            }

            return Ok(TranscodeOutput { exit_code: 0, log });
        }

        let Some(output) = args.last() else {
            return Ok(Self::failed("At least one output file must be specified"));
        };

        self.write_file(output, args.join(" ").as_bytes()).await?;

        Ok(TranscodeOutput {
            exit_code: 0,
            log: vec![format!("Output #0, flac, to '{output}':")],
        })
    }
}
