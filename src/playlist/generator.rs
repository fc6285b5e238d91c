use super::Playlist;
use crate::error::{PlaylistError, Result};
use crate::models::Song;
use rand::Rng;
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::str::FromStr;
use tracing::debug;

/// Default number of songs in a generated queue
pub const DEFAULT_QUEUE_LENGTH: usize = 10;

/// Song field a queue can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Popularity,
    Duration,
    Explicit,
    Genre,
    Album,
    Artist,
    Track,
}

impl SortField {
    /// Ascending comparison of two songs on this field
    pub fn compare(self, a: &Song, b: &Song) -> Ordering {
        match self {
            SortField::Popularity => a.popularity.cmp(&b.popularity),
            SortField::Duration => a.duration_ms.cmp(&b.duration_ms),
            SortField::Explicit => a.explicit.cmp(&b.explicit),
            SortField::Genre => a.genre.cmp(&b.genre),
            SortField::Album => a.album.cmp(&b.album),
            SortField::Artist => a.artists.cmp(&b.artists),
            SortField::Track => a.track_name.cmp(&b.track_name),
        }
    }
}

impl FromStr for SortField {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "popularity" => Ok(SortField::Popularity),
            "duration" | "duration_ms" => Ok(SortField::Duration),
            "explicit" => Ok(SortField::Explicit),
            "genre" => Ok(SortField::Genre),
            "album" | "album_name" => Ok(SortField::Album),
            "artist" | "artists" => Ok(SortField::Artist),
            "track" | "track_name" => Ok(SortField::Track),
            _ => Err(PlaylistError::InvalidField(s.to_string())),
        }
    }
}

/// Songs lined up for playback, front first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    songs: VecDeque<Song>,
}

impl Queue {
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            songs: songs.into(),
        }
    }

    /// Song at position 0
    pub fn now_playing(&self) -> Option<&Song> {
        self.songs.front()
    }

    /// Song at position 1
    pub fn up_next(&self) -> Option<&Song> {
        self.songs.get(1)
    }

    /// Drop the current song and return it
    pub fn advance(&mut self) -> Option<Song> {
        self.songs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }
}

/// Builds playback queues from a playlist
pub struct QueueGenerator;

impl QueueGenerator {
    /// Generate a queue of at most `length` songs
    ///
    /// With a sort field the songs are stably sorted ascending, or descending
    /// when `reverse` is set. Without one they are shuffled with `rng`.
    /// A `length` larger than the playlist returns every song.
    pub fn generate<R: Rng + ?Sized>(
        playlist: &Playlist,
        sort_field: Option<SortField>,
        length: usize,
        reverse: bool,
        rng: &mut R,
    ) -> Queue {
        let mut songs: Vec<Song> = playlist.songs().to_vec();

        match sort_field {
            Some(field) if reverse => songs.sort_by(|a, b| field.compare(b, a)),
            Some(field) => songs.sort_by(|a, b| field.compare(a, b)),
            None => songs.shuffle(rng),
        }

        if length < songs.len() {
            songs.truncate(length);
        } else {
            debug!(
                "Requested queue length {} covers the whole playlist ({} songs)",
                length,
                songs.len()
            );
        }

        Queue::new(songs)
    }
}
