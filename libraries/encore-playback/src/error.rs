//! Error types for playback management

use std::path::PathBuf;
use thiserror::Error;

/// Playback errors
///
/// Only track loading can fail. Unplayable media, empty playlists and
/// out-of-range positions are handled by the player itself.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track file does not exist or cannot be opened
    #[error("Track not found: {}", .0.display())]
    TrackNotFound(PathBuf),

    /// Track header line is missing or unreadable
    #[error("Malformed track header in {}: {reason}", path.display())]
    MalformedHeader { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
