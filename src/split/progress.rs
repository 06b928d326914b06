use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitStatus {
    Running,
    Done,
}

/// Phases of a split job, always entered in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitPhase {
    PrepareInput,
    PrepareCover,
    AnalyzeAudio,
    BuildPlan,
    Processing,
    Zipping,
    Done,
}

impl Display for SplitPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SplitPhase::PrepareInput => "Preparing input",
            SplitPhase::PrepareCover => "Preparing cover",
            SplitPhase::AnalyzeAudio => "Analyzing audio",
            SplitPhase::BuildPlan => "Building split plan",
            SplitPhase::Processing => "Splitting tracks",
            SplitPhase::Zipping => "Creating archive",
            SplitPhase::Done => "Done",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitStep {
    WriteInput,
    FetchCover,
    ShrinkCover,
    WriteCover,
    ProbeDuration,
    ParseCue,
    ValidatePlan,
    ExtractTrack,
    EmbedCover,
    CopyTrack,
    ReadTrack,
    TrackDone,
    AddToArchive,
    FinalizeArchive,
    Finished,
}

impl Display for SplitStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SplitStep::WriteInput => "loading audio into the transcoder",
            SplitStep::FetchCover => "fetching cover art",
            SplitStep::ShrinkCover => "resizing cover art",
            SplitStep::WriteCover => "loading cover art into the transcoder",
            SplitStep::ProbeDuration => "reading audio duration",
            SplitStep::ParseCue => "parsing CUE sheet",
            SplitStep::ValidatePlan => "checking CUE against audio",
            SplitStep::ExtractTrack => "extracting",
            SplitStep::EmbedCover => "embedding cover",
            SplitStep::CopyTrack => "finishing",
            SplitStep::ReadTrack => "collecting",
            SplitStep::TrackDone => "done",
            SplitStep::AddToArchive => "adding tracks",
            SplitStep::FinalizeArchive => "writing archive",
            SplitStep::Finished => "finished",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackProgress {
    pub number: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitProgress {
    pub status: SplitStatus,
    pub phase: SplitPhase,
    pub step: SplitStep,
    pub track: Option<TrackProgress>,
    pub done: usize,
    pub total: usize,
    pub eta_seconds: Option<u64>,
}

impl Default for SplitProgress {
    fn default() -> Self {
        Self {
            status: SplitStatus::Running,
            phase: SplitPhase::PrepareInput,
            step: SplitStep::WriteInput,
            track: None,
            done: 0,
            total: 0,
            eta_seconds: None,
        }
    }
}

/// Synchronous progress sink. Must return quickly, the job waits on it.
pub type ProgressCallback = Box<dyn Fn(&SplitProgress) + Send + Sync>;

/// Seconds left at the average pace of the tracks finished so far.
pub fn estimate_eta_seconds(elapsed: Duration, completed: usize, remaining: usize) -> u64 {
    if completed == 0 {
        return 0;
    }

    let average = elapsed.as_secs_f64() / completed as f64;
    (average * remaining as f64).round().max(0.0) as u64
}

/// Owns the job's progress state and forwards every change to the callback.
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    state: SplitProgress,
    elapsed: Duration,
}

impl ProgressReporter {
    pub fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            state: SplitProgress::default(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn state(&self) -> &SplitProgress {
        &self.state
    }

    pub fn phase(&mut self, phase: SplitPhase, step: SplitStep) {
        self.state.phase = phase;
        self.state.step = step;
        self.state.track = None;
        self.emit();
    }

    pub fn step(&mut self, step: SplitStep) {
        self.state.step = step;
        self.emit();
    }

    pub fn start_processing(&mut self, total: usize) {
        self.state.total = total;
        self.state.done = 0;
        self.state.eta_seconds = None;
        self.phase(SplitPhase::Processing, SplitStep::ExtractTrack);
    }

    pub fn track_step(&mut self, number: u32, title: &str, step: SplitStep) {
        self.state.step = step;
        self.state.track = Some(TrackProgress {
            number,
            title: title.to_string(),
        });
        self.emit();
    }

    pub fn track_done(&mut self, took: Duration) {
        self.elapsed += took;
        self.state.step = SplitStep::TrackDone;
        self.state.done += 1;

        let remaining = self.state.total.saturating_sub(self.state.done);
        self.state.eta_seconds = Some(estimate_eta_seconds(
            self.elapsed,
            self.state.done,
            remaining,
        ));
        self.emit();
    }

    pub fn finish(&mut self) {
        self.state.status = SplitStatus::Done;
        self.state.eta_seconds = Some(0);
        self.phase(SplitPhase::Done, SplitStep::Finished);
    }

    fn emit(&self) {
        if let Some(callback) = &self.callback {
            callback(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording() -> (ProgressCallback, Arc<Mutex<Vec<SplitProgress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let callback: ProgressCallback =
            Box::new(move |progress| sink.lock().unwrap().push(progress.clone()));
        (callback, events)
    }

    #[test]
    fn eta_uses_average_of_completed_tracks() {
        assert_eq!(estimate_eta_seconds(Duration::from_secs(20), 2, 3), 30);
        assert_eq!(estimate_eta_seconds(Duration::from_millis(2500), 2, 1), 1);
        assert_eq!(estimate_eta_seconds(Duration::from_secs(20), 2, 0), 0);
        assert_eq!(estimate_eta_seconds(Duration::from_secs(20), 0, 4), 0);
    }

    #[test]
    fn reporter_forwards_every_transition() {
        let (callback, events) = recording();
        let mut reporter = ProgressReporter::new(Some(callback));

        reporter.phase(SplitPhase::AnalyzeAudio, SplitStep::ProbeDuration);
        reporter.start_processing(4);
        reporter.track_step(1, "One", SplitStep::ExtractTrack);
        reporter.track_done(Duration::from_secs(10));
        reporter.finish();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].phase, SplitPhase::AnalyzeAudio);
        assert_eq!(events[1].total, 4);
        assert_eq!(events[2].track.as_ref().map(|t| t.number), Some(1));
        assert_eq!(events[3].done, 1);
        assert_eq!(events[3].step, SplitStep::TrackDone);
        assert_eq!(events[3].track.as_ref().map(|t| t.number), Some(1));
        assert_eq!(events[3].eta_seconds, Some(30));
        assert_eq!(events[4].status, SplitStatus::Done);
        assert_eq!(events[4].phase, SplitPhase::Done);
    }

    #[test]
    fn reporter_without_callback_still_tracks_state() {
        let mut reporter = ProgressReporter::new(None);
        reporter.start_processing(2);
        reporter.track_done(Duration::from_secs(3));

        assert_eq!(reporter.state().done, 1);
        assert_eq!(reporter.state().eta_seconds, Some(3));
    }
}
