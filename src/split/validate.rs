use crate::split::plan::TrackSplitPlan;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationOptions {
    /// Allowed gap between the measured duration and the plan's last end
    pub tolerance_seconds: f64,
    pub min_track_seconds: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            tolerance_seconds: 2.0,
            min_track_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CueValidationResult {
    pub ok: bool,
    pub errors: Vec<String>,
}

/// Cross-checks a split plan against the measured audio duration.
///
/// Every problem is collected; only an empty plan stops the checks early.
pub fn validate_cue_against_duration(
    plan: &[TrackSplitPlan],
    audio_duration_seconds: f64,
    options: &ValidationOptions,
) -> CueValidationResult {
    let tolerance = options.tolerance_seconds;
    let mut errors = Vec::new();

    let Some(last) = plan.last() else {
        errors.push("CUE does not have a valid track.".to_string());
        return CueValidationResult { ok: false, errors };
    };

    match last.end_seconds {
        None => errors.push(
            "The last track does not have an end time (perhaps the audio duration is unknown)."
                .to_string(),
        ),
        Some(end) => {
            let diff = (audio_duration_seconds - end).abs();
            if diff > tolerance {
                errors.push(format!(
                    "Audio duration ({audio_duration_seconds:.2}s) not compatible with CUE (≈{end:.2}s), difference {diff:.2}s."
                ));
            }
        }
    }

    for track in plan {
        if let Some(duration) = track.duration_seconds {
            if duration < options.min_track_seconds {
                errors.push(format!(
                    "Track {} has a very short duration ({duration:.2}s).",
                    track.track
                ));
            }
        }

        if track.start_seconds >= audio_duration_seconds - tolerance {
            errors.push(format!(
                "Track {} starts at the end of the audio file (start {:.2}s, audio duration {audio_duration_seconds:.2}s).",
                track.track, track.start_seconds
            ));
        }
    }

    CueValidationResult {
        ok: errors.is_empty(),
        errors,
    }
}
