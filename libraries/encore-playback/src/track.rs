//! Track metadata and the text track format
//!
//! A track file starts with a header line `<title> <seconds>`. The title is
//! either a double-quoted string (with `\"` and `\\` escapes) or a single
//! word. Everything after the header is content that only the device reads.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable track metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Where the device finds the media
    pub locator: PathBuf,

    /// Track title
    pub title: String,

    /// Track duration (whole seconds)
    pub duration: Duration,
}

impl Track {
    pub fn new(locator: impl Into<PathBuf>, title: impl Into<String>, duration: Duration) -> Self {
        Self {
            locator: locator.into(),
            title: title.into(),
            duration,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file_name = self
            .locator
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        writeln!(f, "Filename: {}", file_name)?;
        writeln!(f, "Title: {}", self.title)?;
        write!(f, "Duration: {}s", self.duration.as_secs())
    }
}

/// Source of track metadata
///
/// The player only needs a locator -> Track mapping; where the metadata comes
/// from is up to the implementor.
pub trait TrackLoader {
    fn load(&self, locator: &Path) -> Result<Track>;
}

/// Loads tracks from text files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTrackLoader;

impl TrackLoader for FileTrackLoader {
    fn load(&self, locator: &Path) -> Result<Track> {
        load_track(locator)
    }
}

/// Open a track file and parse its header
pub fn load_track(path: &Path) -> Result<Track> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PlaybackError::TrackNotFound(path.to_path_buf()),
        _ => PlaybackError::Io(e),
    })?;
    parse_track(path, BufReader::new(file))
}

/// Parse a track header from any reader
///
/// `locator` is recorded as-is in the returned track.
pub fn parse_track<R: BufRead>(locator: &Path, mut reader: R) -> Result<Track> {
    let malformed = |reason: String| PlaybackError::MalformedHeader {
        path: locator.to_path_buf(),
        reason,
    };

    let mut header = String::new();
    if reader.read_line(&mut header)? == 0 {
        return Err(malformed("empty track file".to_string()));
    }

    let (title, seconds) = parse_header(&header).map_err(malformed)?;
    Ok(Track::new(locator, title, Duration::from_secs(seconds)))
}

fn parse_header(line: &str) -> std::result::Result<(String, u64), String> {
    let line = line.trim_start();

    let (title, rest) = if let Some(quoted) = line.strip_prefix('"') {
        let mut title = String::new();
        let mut end = None;
        let mut chars = quoted.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped)) => title.push(escaped),
                    None => break,
                },
                '"' => {
                    end = Some(i + 1);
                    break;
                }
                _ => title.push(c),
            }
        }
        let end = end.ok_or_else(|| "unterminated quoted title".to_string())?;
        (title, &quoted[end..])
    } else {
        let end = line.find(char::is_whitespace).unwrap_or(line.len());
        if end == 0 {
            return Err("missing title".to_string());
        }
        (line[..end].to_string(), &line[end..])
    };

    let seconds = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| "missing duration".to_string())?;
    let seconds = seconds
        .parse::<u64>()
        .map_err(|e| format!("invalid duration '{}': {}", seconds, e))?;

    Ok((title, seconds))
}
