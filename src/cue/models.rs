use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CueSheet {
    /// Source audio referenced by `FILE "..."`, often missing in hand-made sheets
    pub file: Option<String>,
    /// Global `TITLE` seen before the first `TRACK`
    pub album: Option<String>,
    pub performer: Option<String>,
    pub date: Option<String>,
    pub genre: Option<String>,
    pub catalog: Option<String>,
    pub comment: Option<String>,
    pub disc_number: Option<f64>,
    pub total_discs: Option<f64>,
    pub tracks: Vec<CueTrack>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CueTrack {
    pub track: u32,
    pub title: Option<String>,
    /// Overrides the album performer when present
    pub performer: Option<String>,
    /// Raw `INDEX 01` timecode (`MM:SS:FF`)
    pub index: Option<String>,
    pub date: Option<String>,
    pub genre: Option<String>,
}

impl CueSheet {
    pub fn track(&self, number: u32) -> Option<&CueTrack> {
        self.tracks.iter().find(|t| t.track == number)
    }

    /// Tracks that carry an `INDEX 01` and can therefore be scheduled.
    pub fn indexed_tracks(&self) -> impl Iterator<Item = &CueTrack> {
        self.tracks
            .iter()
            .filter(|t| t.index.as_deref().is_some_and(|i| !i.is_empty()))
    }
}
