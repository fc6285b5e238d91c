use super::Preferences;
use crate::models::Song;

/// Song filtering functionality using static helper functions
pub struct SongFilters;

impl SongFilters {
    /// Check if a song matches the genre preference (exact match)
    pub fn matches_genre(song: &Song, preferences: &Preferences) -> bool {
        let Some(genre) = &preferences.genre else {
            return true;
        };
        song.genre == *genre
    }

    /// Check if a song matches the explicit preference
    pub fn matches_explicit(song: &Song, preferences: &Preferences) -> bool {
        preferences.explicit.is_none_or(|explicit| song.explicit == explicit)
    }

    /// Check if a song is no longer than the duration ceiling
    pub fn matches_duration(song: &Song, preferences: &Preferences) -> bool {
        preferences
            .max_duration_ms
            .is_none_or(|max| song.duration_ms <= max)
    }

    /// Check if a song is at least as popular as the popularity floor
    pub fn matches_popularity(song: &Song, preferences: &Preferences) -> bool {
        preferences
            .min_popularity
            .is_none_or(|min| song.popularity >= min)
    }

    /// Apply every set preference; unset dimensions never reject a song
    pub fn matches(preferences: &Preferences, song: &Song) -> bool {
        Self::matches_genre(song, preferences)
            && Self::matches_explicit(song, preferences)
            && Self::matches_duration(song, preferences)
            && Self::matches_popularity(song, preferences)
    }
}

/// Shorthand for `SongFilters::matches`
pub fn matches(preferences: &Preferences, song: &Song) -> bool {
    SongFilters::matches(preferences, song)
}
