use crate::models::Song;
use std::collections::{HashMap, HashSet};

/// Aggregate statistics about a set of songs
#[derive(Debug, Clone, Default)]
pub struct PlaylistSummary {
    pub total_songs: usize,
    pub total_duration_ms: u64,
    pub average_popularity: f32,
    pub explicit_count: usize,
    pub artist_count: usize,
    pub genre_distribution: HashMap<String, usize>,
    pub average_bpm: Option<f32>, // None when no song has a known or estimated tempo
}

impl PlaylistSummary {
    pub fn from_songs<'a, I>(songs: I) -> Self
    where
        I: IntoIterator<Item = &'a Song>,
    {
        let mut summary = PlaylistSummary::default();
        let mut popularity_sum = 0u64;
        let mut artists: HashSet<&str> = HashSet::new();
        let mut bpms: Vec<u32> = Vec::new();

        for song in songs {
            summary.total_songs += 1;
            summary.total_duration_ms += u64::from(song.duration_ms);
            popularity_sum += u64::from(song.popularity);
            if song.explicit {
                summary.explicit_count += 1;
            }
            artists.insert(song.artists.as_str());
            *summary
                .genre_distribution
                .entry(song.genre.clone())
                .or_insert(0) += 1;
            if let Some(bpm) = song.estimated_bpm() {
                bpms.push(bpm);
            }
        }

        if summary.total_songs > 0 {
            summary.average_popularity = popularity_sum as f32 / summary.total_songs as f32;
        }
        summary.artist_count = artists.len();
        if !bpms.is_empty() {
            summary.average_bpm = Some(bpms.iter().sum::<u32>() as f32 / bpms.len() as f32);
        }
        summary
    }

    /// Most common genre, ties broken alphabetically
    pub fn top_genre(&self) -> Option<(&str, usize)> {
        self.genre_distribution
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(genre, count)| (genre.as_str(), *count))
    }
}
