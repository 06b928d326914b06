// CUE timecodes count minutes:seconds:frames, 75 frames per second (Red Book)
pub const FRAMES_PER_SECOND: u32 = 75;

/// Converts a raw `MM:SS:FF` index into seconds.
///
/// A malformed index (non-numeric or negative component) yields `0.0`, which
/// places the track at the start of the file instead of failing the plan.
pub fn cue_index_to_seconds(index: &str) -> f64 {
    let mut parts = index.split(':').map(parse_component);

    let (Some(mm), Some(ss), Some(ff)) = (parts.next(), parts.next(), parts.next()) else {
        return 0.0;
    };

    match (mm, ss, ff) {
        (Some(mm), Some(ss), Some(ff)) if mm >= 0.0 && ss >= 0.0 && ff >= 0.0 => {
            mm * 60.0 + ss + ff / FRAMES_PER_SECOND as f64
        }
        _ => 0.0,
    }
}

/// Returns `true` when [`cue_index_to_seconds`] can read the index without
/// falling back to zero.
pub fn is_valid_cue_index(index: &str) -> bool {
    let parts: Vec<_> = index.split(':').map(parse_component).collect();
    parts.len() >= 3
        && parts[..3]
            .iter()
            .all(|p| p.is_some_and(|value| value >= 0.0))
}

// Empty components count as zero, anything else must be a finite number
fn parse_component(component: &str) -> Option<f64> {
    let component = component.trim();
    if component.is_empty() {
        return Some(0.0);
    }

    component.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats seconds as `HH:MM:SS.mmm`, the form ffmpeg accepts for `-ss`/`-t`.
pub fn seconds_to_ffmpeg_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds % 3600.0) / 60.0).floor();
    let rest = seconds - hours * 3600.0 - minutes * 60.0;

    format!("{:02}:{:02}:{:06.3}", hours as u64, minutes as u64, rest)
}

/// Formats seconds as a CUE-style `MM:SS:FF`, rounded to the nearest frame.
pub fn format_cue_time(seconds: f64) -> String {
    let total_frames = (seconds * FRAMES_PER_SECOND as f64).round().max(0.0) as u64;
    let frames_per_minute = FRAMES_PER_SECOND as u64 * 60;

    let minutes = total_frames / frames_per_minute;
    let secs = (total_frames % frames_per_minute) / FRAMES_PER_SECOND as u64;
    let frames = total_frames % FRAMES_PER_SECOND as u64;

    format!("{minutes:02}:{secs:02}:{frames:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_converts_minutes_seconds_and_frames() {
        let seconds = cue_index_to_seconds("03:06:20");
        assert!((seconds - (3.0 * 60.0 + 6.0 + 20.0 / 75.0)).abs() < 1e-9);
        assert!((seconds - 186.2666).abs() < 1e-3);
    }

    #[test]
    fn index_zero_is_start_of_file() {
        assert_eq!(cue_index_to_seconds("00:00:00"), 0.0);
    }

    #[test]
    fn malformed_index_falls_back_to_zero() {
        assert_eq!(cue_index_to_seconds("ab:06:20"), 0.0);
        assert_eq!(cue_index_to_seconds("03:06"), 0.0);
        assert_eq!(cue_index_to_seconds("-1:06:20"), 0.0);
        assert_eq!(cue_index_to_seconds(""), 0.0);
        assert!(!is_valid_cue_index("03:xx:20"));
        assert!(is_valid_cue_index("03:06:20"));
    }

    #[test]
    fn ffmpeg_time_pads_every_component() {
        assert_eq!(seconds_to_ffmpeg_time(0.0), "00:00:00.000");
        assert_eq!(seconds_to_ffmpeg_time(5.5), "00:00:05.500");
        assert_eq!(seconds_to_ffmpeg_time(186.2), "00:03:06.200");
        assert_eq!(seconds_to_ffmpeg_time(3723.25), "01:02:03.250");
    }

    #[test]
    fn cue_time_rounds_to_nearest_frame() {
        assert_eq!(format_cue_time(186.27), "03:06:20");
        assert_eq!(format_cue_time(cue_index_to_seconds("03:06:20")), "03:06:20");
        assert_eq!(format_cue_time(0.0), "00:00:00");
        assert_eq!(format_cue_time(61.0), "01:01:00");
    }
}
