use crate::error::{PlaylistError, Result};
use crate::models::Song;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Number of tab-separated columns in every dataset row
pub const COLUMN_COUNT: usize = 21;

// Zero-based column positions
const COL_ROW_ID: usize = 0;
const COL_TRACK_ID: usize = 1;
const COL_ARTISTS: usize = 2;
const COL_ALBUM: usize = 3;
const COL_TRACK_NAME: usize = 4;
const COL_POPULARITY: usize = 5;
const COL_DURATION: usize = 6;
const COL_EXPLICIT: usize = 7;
const COL_TEMPO: usize = 18;
const COL_GENRE: usize = 20;

/// What to do when a line does not fit the column layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// Log and skip the line
    #[default]
    SkipMalformed,
    /// Stop the scan at the first malformed line
    Strict,
}

/// Counts from one dataset scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub parsed: usize,
    pub skipped: usize,
}

/// Parse one dataset row into a `Song`
///
/// `line_number` is only used for error reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<Song> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split('\t').collect();

    if fields.len() != COLUMN_COUNT {
        return Err(PlaylistError::malformed(
            line_number,
            format!("expected {COLUMN_COUNT} columns, found {}", fields.len()),
        ));
    }

    fields[COL_ROW_ID].trim().parse::<u64>().map_err(|_| {
        PlaylistError::malformed(
            line_number,
            format!("row id '{}' is not an integer", fields[COL_ROW_ID]),
        )
    })?;

    let artists = required_text(&fields, COL_ARTISTS, "artists", line_number)?;
    let track_name = required_text(&fields, COL_TRACK_NAME, "track name", line_number)?;
    let genre = required_text(&fields, COL_GENRE, "genre", line_number)?;

    let popularity = fields[COL_POPULARITY]
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| {
            PlaylistError::malformed(
                line_number,
                format!("popularity '{}' is not in 0-100", fields[COL_POPULARITY]),
            )
        })?;

    let duration_ms = fields[COL_DURATION].trim().parse::<u32>().map_err(|_| {
        PlaylistError::malformed(
            line_number,
            format!("duration '{}' is not an integer", fields[COL_DURATION]),
        )
    })?;

    let explicit = parse_explicit(fields[COL_EXPLICIT]).ok_or_else(|| {
        PlaylistError::malformed(
            line_number,
            format!("explicit flag '{}' is not TRUE or FALSE", fields[COL_EXPLICIT]),
        )
    })?;

    Ok(Song {
        track_id: fields[COL_TRACK_ID].trim().to_string(),
        artists,
        album: fields[COL_ALBUM].trim().to_string(),
        track_name,
        popularity,
        duration_ms,
        explicit,
        tempo: fields[COL_TEMPO].trim().parse::<f32>().ok(),
        genre,
    })
}

/// Interpret the explicit column, only the literals TRUE and FALSE are accepted
fn parse_explicit(field: &str) -> Option<bool> {
    let field = field.trim();
    if field.eq_ignore_ascii_case("true") {
        Some(true)
    } else if field.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn required_text(fields: &[&str], index: usize, name: &str, line_number: usize) -> Result<String> {
    let value = fields[index].trim();
    if value.is_empty() {
        return Err(PlaylistError::malformed(line_number, format!("{name} is empty")));
    }
    Ok(value.to_string())
}

/// Scan a dataset line by line, handing every parsed song to `on_song`
///
/// The first line is the header and is always skipped. Songs already handed
/// over stay with the caller even if the scan later fails.
pub fn scan_dataset<R, F>(mut reader: R, policy: ScanPolicy, mut on_song: F) -> Result<ScanReport>
where
    R: BufRead,
    F: FnMut(Song),
{
    let mut report = ScanReport::default();
    let mut buf: Vec<u8> = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        if line_number == 1 {
            debug!("Skipping dataset header");
            continue;
        }

        // Invalid UTF-8 only spoils its own line
        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => parse_line(line, line_number),
            Err(e) => Err(PlaylistError::malformed(
                line_number,
                format!("line is not valid UTF-8 ({e})"),
            )),
        };

        match parsed {
            Ok(song) => {
                report.parsed += 1;
                on_song(song);
            }
            Err(e) if policy == ScanPolicy::SkipMalformed => {
                warn!("{e}, skipping");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Dataset scan complete: {} parsed, {} skipped",
        report.parsed, report.skipped
    );
    Ok(report)
}

/// Open a dataset file for scanning
pub fn open_dataset(path: impl AsRef<Path>) -> Result<BufReader<File>> {
    let path = path.as_ref();
    debug!("Opening dataset {}", path.display());
    Ok(BufReader::new(File::open(path)?))
}
