//! Ordered playlist with stable entry ids
//!
//! Every entry gets an id from a monotonically increasing counter when it is
//! inserted. Ids are never reused or changed, which lets the player find the
//! same logical track in two independently ordered playlists.

use crate::shuffle::shuffle_in_place;
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Stable identity of a playlist entry
pub type StableId = u64;

/// A track together with its stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub id: StableId,
    pub track: Track,
}

/// Ordered, editable sequence of tracks
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,

    /// Id handed to the next inserted track
    next_id: StableId,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track, returning its new id
    pub fn push_back(&mut self, track: Track) -> StableId {
        let pos = self.entries.len();
        self.insert_at(pos, track)
    }

    /// Insert a track at `pos`, returning its new id
    ///
    /// Positions past the end append.
    pub fn insert_at(&mut self, pos: usize, track: Track) -> StableId {
        let id = self.next_id;
        self.next_id += 1;
        let pos = pos.min(self.entries.len());
        self.entries.insert(pos, PlaylistEntry { id, track });
        id
    }

    /// Insert an entry that already has an id (mirroring another playlist)
    pub(crate) fn insert_entry(&mut self, pos: usize, entry: PlaylistEntry) {
        debug_assert!(self.position_of(entry.id).is_none(), "duplicate stable id");
        self.next_id = self.next_id.max(entry.id + 1);
        let pos = pos.min(self.entries.len());
        self.entries.insert(pos, entry);
    }

    /// Remove the entry at `pos`
    ///
    /// Returns `None` and leaves the playlist untouched when `pos` is out of range.
    pub fn remove(&mut self, pos: usize) -> Option<PlaylistEntry> {
        (pos < self.entries.len()).then(|| self.entries.remove(pos))
    }

    /// Move the entry at `from` to `to`, shifting the entries in between
    ///
    /// Returns `false` (and does nothing) when either index is out of range or
    /// both are equal.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from >= len || to >= len || from == to {
            return false;
        }

        if from < to {
            self.entries[from..=to].rotate_left(1);
        } else {
            self.entries[to..=from].rotate_right(1);
        }
        true
    }

    /// Drop every entry whose locator already appeared earlier
    ///
    /// Keeps the first occurrence; survivors keep their relative order.
    pub fn remove_duplicates(&mut self) {
        let mut seen = HashSet::new();
        self.entries
            .retain(|entry| seen.insert(entry.track.locator.clone()));
    }

    /// Randomise the order; membership and ids are unchanged
    pub fn shuffle(&mut self) {
        shuffle_in_place(&mut self.entries);
    }

    /// Entries in playlist order
    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn get(&self, pos: usize) -> Option<&PlaylistEntry> {
        self.entries.get(pos)
    }

    /// Position of the entry with the given id
    pub fn position_of(&self, id: StableId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Track> for Playlist {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut playlist = Self::new();
        for track in iter {
            playlist.push_back(track);
        }
        playlist
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracks: {}", self.entries.len())?;
        for entry in &self.entries {
            write!(f, "\n- {}", entry.track.title)?;
        }
        Ok(())
    }
}
