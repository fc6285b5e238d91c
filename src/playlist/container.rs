use crate::error::{PlaylistError, Result};
use crate::models::Song;
use std::collections::HashSet;

/// Ordered collection of songs where no two songs share a track name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    songs: Vec<Song>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Song> {
        self.songs.iter()
    }

    /// Check if a song with this track name is already present
    pub fn contains_track_name(&self, track_name: &str) -> bool {
        self.songs.iter().any(|s| s.track_name == track_name)
    }

    /// Append a song, rejecting it if its track name is already present
    pub fn add(&mut self, song: Song) -> Result<()> {
        if self.contains_track_name(&song.track_name) {
            return Err(PlaylistError::DuplicateTrackName(song.track_name));
        }
        self.songs.push(song);
        Ok(())
    }

    /// Remove the song matching both artist and track name, returning it
    pub fn remove(&mut self, artists: &str, track_name: &str) -> Result<Song> {
        let index = self
            .songs
            .iter()
            .position(|s| s.is(artists, track_name))
            .ok_or_else(|| PlaylistError::not_found(artists, track_name))?;
        Ok(self.songs.remove(index))
    }

    /// Stable sort by popularity; equal popularity keeps the current order
    pub fn sort_by_popularity(&mut self, ascending: bool) {
        if ascending {
            self.songs.sort_by_key(|s| s.popularity);
        } else {
            self.songs.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        }
    }

    /// Union of two playlists
    ///
    /// Songs are deduplicated by track name, which also removes equal songs
    /// (same artists and track name). The first occurrence wins, so when two
    /// different songs share a track name the one from `self` is kept. The
    /// result is ordered by track name, then artists.
    pub fn union(&self, other: &Playlist) -> Playlist {
        let mut result = Playlist::new();
        let mut track_names: HashSet<&str> = HashSet::new();
        for song in self.songs.iter().chain(other.songs.iter()) {
            if track_names.insert(song.track_name.as_str()) {
                result.songs.push(song.clone());
            }
        }
        result.songs.sort_by(|a, b| {
            a.track_name
                .cmp(&b.track_name)
                .then_with(|| a.artists.cmp(&b.artists))
        });
        result
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Song;
    type IntoIter = std::slice::Iter<'a, Song>;

    fn into_iter(self) -> Self::IntoIter {
        self.songs.iter()
    }
}
