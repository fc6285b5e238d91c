use crate::dataset::{self, ScanPolicy};
use crate::error::{PlaylistError, Result};
use crate::models::Song;
use crate::playlist::{Playlist, Preferences, Queue, QueueGenerator, SortField, matches};
use rand::Rng;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, warn};

/// Receives songs for actual audio output
#[cfg_attr(test, mockall::automock)]
pub trait PlaybackSink {
    fn play(&mut self, song: &Song) -> anyhow::Result<()>;
}

/// Counts from loading a dataset into a user's playlist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub scanned: usize,
    pub matched: usize,
    pub added: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

/// A listener with their own preferences, playlist and queue
#[derive(Debug, Clone, Default)]
pub struct User {
    pub name: String,
    pub preferences: Preferences,
    pub playlist: Playlist,
    pub queue: Queue,
}

impl User {
    pub fn new(name: impl Into<String>, preferences: Preferences) -> Self {
        Self {
            name: name.into(),
            preferences,
            playlist: Playlist::new(),
            queue: Queue::default(),
        }
    }

    /// Scan a dataset and add every song matching the preferences
    ///
    /// Songs added before a failing line are kept.
    pub fn load_matches<R: BufRead>(&mut self, reader: R, policy: ScanPolicy) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        self.scan_into(reader, policy, &mut report)?;
        Ok(report)
    }

    /// Like `load_matches`, but a read that stops part way is logged and the
    /// counts up to that point are returned
    pub fn load_matches_keeping_partial<R: BufRead>(&mut self, reader: R, policy: ScanPolicy) -> LoadReport {
        let mut report = LoadReport::default();
        if let Err(e) = self.scan_into(reader, policy, &mut report) {
            warn!(
                "{}: dataset read stopped after {} songs, keeping {} in the playlist: {e}",
                self.name,
                report.scanned,
                self.playlist.len()
            );
        }
        report
    }

    fn scan_into<R: BufRead>(&mut self, reader: R, policy: ScanPolicy, report: &mut LoadReport) -> Result<()> {
        let preferences = &self.preferences;
        let playlist = &mut self.playlist;

        let scan = dataset::scan_dataset(reader, policy, |song| {
            report.scanned += 1;
            if !matches(preferences, &song) {
                return;
            }
            report.matched += 1;
            match playlist.add(song) {
                Ok(()) => report.added += 1,
                Err(PlaylistError::DuplicateTrackName(track)) => {
                    debug!("Skipping duplicate track '{track}'");
                    report.duplicates += 1;
                }
                Err(e) => debug!("Skipping song: {e}"),
            }
        })?;

        report.skipped = scan.skipped;
        info!(
            "{}: {} of {} songs matched, {} added to playlist",
            self.name, report.matched, report.scanned, report.added
        );
        Ok(())
    }

    /// Open a dataset file and load matching songs from it
    ///
    /// Only a file that cannot be opened is an error. A read that fails part
    /// way keeps what was loaded, see `load_matches_keeping_partial`.
    pub fn load_matches_from_path(
        &mut self,
        path: impl AsRef<Path>,
        policy: ScanPolicy,
    ) -> Result<LoadReport> {
        let reader = dataset::open_dataset(path)?;
        Ok(self.load_matches_keeping_partial(reader, policy))
    }

    /// Replace the queue with a freshly generated one
    pub fn refresh_queue<R: Rng + ?Sized>(
        &mut self,
        sort_field: Option<SortField>,
        length: usize,
        reverse: bool,
        rng: &mut R,
    ) -> &Queue {
        self.queue = QueueGenerator::generate(&self.playlist, sort_field, length, reverse, rng);
        &self.queue
    }

    /// Send the current song to the sink and move the queue forward
    ///
    /// The queue only advances once the sink accepts the song.
    pub fn play_next<S: PlaybackSink + ?Sized>(&mut self, sink: &mut S) -> anyhow::Result<Option<Song>> {
        let Some(song) = self.queue.now_playing() else {
            return Ok(None);
        };
        sink.play(song)?;
        Ok(self.queue.advance())
    }
}
