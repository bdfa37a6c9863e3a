//! Selection index translation
//!
//! A selection is an index into one playlist ordering. Edits that shift
//! positions must shift the selection the same way so it keeps naming a
//! live entry.

use crate::playlist::{Playlist, StableId};
use std::path::PathBuf;

/// Where a selected index ends up after `move_entry(from, to)`
///
/// The moved entry carries its selection along; entries between the two
/// positions shift by one against the direction of the move.
pub fn follow_move(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < index && index <= to {
        index - 1
    } else if to <= index && index < from {
        index + 1
    } else {
        index
    }
}

/// Where a selected index ends up after an insertion at `pos`
pub fn after_insertion(index: usize, pos: usize) -> usize {
    if pos <= index {
        index + 1
    } else {
        index
    }
}

/// Where a selected index ends up after the entry at `removed` is deleted
///
/// Entries after the removed one slide left. Removing the selected entry
/// keeps the index, which now names the following entry; if there is no
/// following entry the selection is cleared.
pub fn after_removal(index: usize, removed: usize, new_len: usize) -> Option<usize> {
    let index = if removed < index { index - 1 } else { index };
    (index < new_len).then_some(index)
}

/// Identity of a selected entry, used to find it again after a rebuild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedEntry {
    pub id: StableId,
    pub locator: PathBuf,
}

impl SelectedEntry {
    pub fn at(playlist: &Playlist, index: Option<usize>) -> Option<Self> {
        let entry = playlist.get(index?)?;
        Some(Self {
            id: entry.id,
            locator: entry.track.locator.clone(),
        })
    }

    /// Position in `playlist` by id, falling back to the first entry with the
    /// same locator
    pub fn resolve(&self, playlist: &Playlist) -> Option<usize> {
        playlist.position_of(self.id).or_else(|| {
            playlist
                .entries()
                .iter()
                .position(|entry| entry.track.locator == self.locator)
        })
    }
}
