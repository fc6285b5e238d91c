use thiserror::Error;

/// Result type alias using `PlaylistError`
pub type Result<T> = std::result::Result<T, PlaylistError>;

/// Errors raised by the dataset parser, the preference model, the playlist
/// container and the queue generator
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// A dataset line does not fit the 21-column layout
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A song with this track name is already in the playlist
    #[error("Duplicate track name: {0}")]
    DuplicateTrackName(String),

    /// No song with this artist and track name is in the playlist
    #[error("Song not found: {track} by {artist}")]
    NotFound { artist: String, track: String },

    /// A preference value without a usable dimension, or a value the dimension rejects
    #[error("Invalid preference usage: {0}")]
    InvalidPreferenceUsage(String),

    /// Unknown sort field name
    #[error("Invalid sort field: {0}")]
    InvalidField(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Preferences file errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlaylistError {
    /// Create a malformed record error
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self::NotFound {
            artist: artist.into(),
            track: track.into(),
        }
    }

    /// Create an invalid preference usage error
    pub fn invalid_preference(msg: impl Into<String>) -> Self {
        Self::InvalidPreferenceUsage(msg.into())
    }
}
