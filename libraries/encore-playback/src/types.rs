//! Core types for the player

use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Traversal direction through the active ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Initial player modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Wrap around at either end of the playlist (default: off)
    pub repeat: bool,

    /// Traverse the shuffled order (default: off)
    pub random: bool,
}

/// Point-in-time summary of the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub playing: bool,
    pub repeat: bool,
    pub random: bool,

    /// Selected position in display order
    pub selection: Option<usize>,

    /// Track of the active selection
    pub track: Option<Track>,

    /// Device position in the current track
    pub elapsed: Duration,

    /// Number of tracks in the playlist
    pub len: usize,
}
