use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// One catalog entry parsed from the dataset
///
/// Identity is the (artists, track name) pair: `PartialEq` and `Hash` only look
/// at those two fields, so two rows of the same recording with different
/// popularity snapshots compare equal.
#[derive(Debug, Clone)]
pub struct Song {
    pub track_id: String,
    pub artists: String,
    pub album: String,
    pub track_name: String,
    pub popularity: u8,    // 0-100
    pub duration_ms: u32,
    pub explicit: bool,
    pub tempo: Option<f32>, // Lenient, the audio feature columns are not always numeric
    pub genre: String,
}

impl Song {
    /// Check whether this song is the given artist/track pair
    pub fn is(&self, artists: &str, track_name: &str) -> bool {
        self.artists == artists && self.track_name == track_name
    }

    /// Tempo from the dataset if present, otherwise the typical BPM for the genre
    pub fn estimated_bpm(&self) -> Option<u32> {
        self.tempo
            .filter(|t| t.is_finite() && *t > 0.0)
            .map(|t| t.round() as u32)
            .or_else(|| genre_bpm(&self.genre))
    }

    /// Duration formatted as m:ss
    pub fn duration_display(&self) -> String {
        let secs = self.duration_ms / 1000;
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.artists == other.artists && self.track_name == other.track_name
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.artists.hash(state);
        self.track_name.hash(state);
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" by {} [{}] ({}, pop {}{})",
            self.track_name,
            self.artists,
            self.album,
            self.duration_display(),
            self.popularity,
            if self.explicit { ", explicit" } else { "" }
        )
    }
}

impl Default for Song {
    fn default() -> Self {
        Song {
            track_id: String::new(),
            artists: "Unknown".to_string(),
            album: "Unknown".to_string(),
            track_name: "Unknown".to_string(),
            popularity: 0,
            duration_ms: 0,
            explicit: false,
            tempo: None,
            genre: "unknown".to_string(),
        }
    }
}

/// Typical tempo per genre, keyed by lower-cased genre name
static GENRE_BPM: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    HashMap::from([
        ("acoustic", 95),
        ("ambient", 70),
        ("blues", 90),
        ("classical", 80),
        ("country", 110),
        ("dance", 124),
        ("disco", 118),
        ("drum-and-bass", 174),
        ("dubstep", 140),
        ("edm", 128),
        ("folk", 100),
        ("funk", 110),
        ("hip-hop", 95),
        ("house", 124),
        ("indie", 115),
        ("jazz", 120),
        ("k-pop", 120),
        ("latin", 100),
        ("metal", 140),
        ("pop", 118),
        ("punk", 160),
        ("r-n-b", 90),
        ("reggae", 80),
        ("rock", 120),
        ("soul", 95),
        ("techno", 130),
        ("trance", 138),
    ])
});

/// Look up the typical BPM for a genre
pub fn genre_bpm(genre: &str) -> Option<u32> {
    GENRE_BPM.get(genre.to_lowercase().as_str()).copied()
}
