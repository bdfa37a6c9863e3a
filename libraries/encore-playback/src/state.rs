//! Player state machine
//!
//! Every transition lives here and assumes exclusive access. The public
//! [`Player`](crate::Player) handle takes its lock once per call and then
//! works on this state, so internal helpers (`play` calling `step`, `step`
//! resuming through `play`) never re-acquire anything.
//!
//! Two orderings of the same entries are kept:
//! - `displayed`: the order shown to the user
//! - `shuffled`: an independent order used in random mode
//!
//! Both always hold the same set of stable ids. Each has its own selection
//! index; only the one matching the current mode is active.

use crate::{
    device::PlaybackDevice,
    events::{PlayerEvent, SelectionObserver},
    playlist::{Playlist, PlaylistEntry, StableId},
    selection::{after_insertion, after_removal, follow_move, SelectedEntry},
    shuffle::slot_after,
    track::Track,
    types::{Direction, PlayerConfig, PlayerStatus},
};
use std::time::Duration;
use tracing::{debug, info};

pub(crate) struct PlayerState {
    device: Box<dyn PlaybackDevice>,

    displayed: Playlist,
    shuffled: Playlist,

    /// Selection in `displayed` (active when random mode is off)
    selection: Option<usize>,

    /// Selection in `shuffled` (active when random mode is on)
    random_selection: Option<usize>,

    playing: bool,
    repeat: bool,
    random: bool,

    observer: Option<SelectionObserver>,
}

impl PlayerState {
    pub(crate) fn new(
        device: Box<dyn PlaybackDevice>,
        playlist: Playlist,
        config: PlayerConfig,
    ) -> Self {
        let mut state = Self {
            device,
            shuffled: playlist.clone(),
            displayed: playlist,
            selection: None,
            random_selection: None,
            playing: false,
            repeat: config.repeat,
            random: false,
            observer: None,
        };
        state.set_random_mode(config.random);
        state
    }

    pub(crate) fn device_mut(&mut self) -> &mut dyn PlaybackDevice {
        self.device.as_mut()
    }

    // ===== Playback Control =====

    /// Start playback, selecting the first playable track if needed
    pub(crate) fn play(&mut self) {
        if self.playing {
            return;
        }
        if self.active_selection().is_none() {
            self.step(Direction::Forward);
        }
        if self.active_selection().is_some() {
            self.playing = true;
            self.device.play();
        }
    }

    pub(crate) fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.device.pause();
        self.playing = false;
    }

    /// Pause and always rewind the device
    pub(crate) fn stop(&mut self) {
        if self.playing {
            self.device.pause();
            self.playing = false;
        }
        self.device.set_elapsed_time(Duration::ZERO);
    }

    /// Advance the active selection to the next playable track
    ///
    /// Tracks the device refuses are skipped. At the end of the list the
    /// selection stays put unless repeat is on, in which case the search
    /// restarts from the other end exactly once.
    ///
    /// Returns the newly selected index in the active ordering, or `None`
    /// when nothing further could be selected.
    pub(crate) fn step(&mut self, direction: Direction) -> Option<usize> {
        let was_playing = self.playing;
        self.stop();

        let mut wrapped = false;
        loop {
            if let Some(index) = self.scan(direction) {
                self.set_active_selection(Some(index));
                if was_playing {
                    self.play();
                }
                return Some(index);
            }

            if !self.repeat || wrapped || self.active_playlist().is_empty() {
                debug!("No playable track left ({:?})", direction);
                return None;
            }
            debug!("Wrapping around the playlist ({:?})", direction);
            wrapped = true;
            self.set_active_selection(None);
        }
    }

    /// Find the first track after (or before) the active selection that the
    /// device accepts; the accepted track stays opened on the device
    fn scan(&mut self, direction: Direction) -> Option<usize> {
        let current = self.active_selection();
        if current.is_none() && self.random {
            // Fresh pass through the shuffled order
            self.shuffled.shuffle();
        }

        let Self {
            device,
            displayed,
            shuffled,
            random,
            ..
        } = self;
        let playlist: &Playlist = if *random { shuffled } else { displayed };
        let len = playlist.len();

        let candidates: Vec<usize> = match (direction, current) {
            (Direction::Forward, None) => (0..len).collect(),
            (Direction::Forward, Some(index)) => (index + 1..len).collect(),
            (Direction::Backward, None) => (0..len).rev().collect(),
            (Direction::Backward, Some(index)) => (0..index.min(len)).rev().collect(),
        };

        candidates.into_iter().find(|&index| {
            let locator = &playlist.entries()[index].track.locator;
            let accepted = device.open_media(locator);
            if !accepted {
                debug!("Skipping unplayable track {}", locator.display());
            }
            accepted
        })
    }

    /// Select the track at `n` in display order
    ///
    /// `n` is clamped to `len - 1`, the last track. The legacy bound was
    /// `len`, one past the end. Returns `false` when the playlist
    /// is empty or the device refuses the track; playback then stays stopped
    /// and the selection is unchanged.
    pub(crate) fn select(&mut self, n: usize) -> bool {
        if self.displayed.is_empty() {
            return false;
        }
        let was_playing = self.playing;
        self.stop();

        let index = n.min(self.displayed.len() - 1);
        let locator = &self.displayed.entries()[index].track.locator;
        if !self.device.open_media(locator) {
            debug!("Cannot select unplayable track {}", locator.display());
            return false;
        }

        self.selection = Some(index);
        if self.random {
            self.prepare_random_mode();
        }
        if was_playing {
            self.play();
        }
        true
    }

    // ===== Modes =====

    /// Reshuffle and put the display selection first in the shuffled order
    fn prepare_random_mode(&mut self) {
        self.shuffled.shuffle();
        self.random_selection = None;

        let selected = self.selection.and_then(|index| self.displayed.get(index));
        if let Some(id) = selected.map(|entry| entry.id) {
            if let Some(pos) = self.shuffled.position_of(id) {
                self.shuffled.move_entry(pos, 0);
                self.random_selection = Some(0);
            }
        }
    }

    pub(crate) fn set_random_mode(&mut self, value: bool) {
        if value == self.random {
            return;
        }
        if value {
            self.prepare_random_mode();
        } else {
            // Continue in display order from the track actually selected
            let selected = SelectedEntry::at(&self.shuffled, self.random_selection);
            self.selection = selected.and_then(|entry| entry.resolve(&self.displayed));
        }
        self.random = value;
        info!("Random mode {}", if value { "on" } else { "off" });
    }

    pub(crate) fn set_repeat_mode(&mut self, value: bool) {
        self.repeat = value;
        info!("Repeat mode {}", if value { "on" } else { "off" });
    }

    // ===== Playlist Editing =====

    pub(crate) fn push_back(&mut self, track: Track) -> StableId {
        let id = self.displayed.push_back(track.clone());
        self.mirror_insertion(PlaylistEntry { id, track });
        id
    }

    pub(crate) fn insert_at(&mut self, pos: usize, track: Track) -> StableId {
        let pos = pos.min(self.displayed.len());
        let id = self.displayed.insert_at(pos, track.clone());
        self.selection = self.selection.map(|index| after_insertion(index, pos));
        self.mirror_insertion(PlaylistEntry { id, track });
        id
    }

    /// Add a displayed entry to the shuffled order
    ///
    /// While random playback is under way the entry lands somewhere after the
    /// current track so it does not interrupt what is playing; otherwise it
    /// is appended.
    fn mirror_insertion(&mut self, entry: PlaylistEntry) {
        let slot = match (self.random, self.random_selection) {
            (true, Some(current)) => slot_after(current, self.shuffled.len()),
            _ => self.shuffled.len(),
        };
        self.shuffled.insert_entry(slot, entry);
    }

    /// Remove the track at `pos` (display order) from both orderings
    pub(crate) fn remove(&mut self, pos: usize) -> Option<Track> {
        let removed = self.displayed.remove(pos)?;
        let len = self.displayed.len();
        self.selection = self
            .selection
            .and_then(|index| after_removal(index, pos, len));

        if let Some(random_pos) = self.shuffled.position_of(removed.id) {
            self.shuffled.remove(random_pos);
            let len = self.shuffled.len();
            self.random_selection = self
                .random_selection
                .and_then(|index| after_removal(index, random_pos, len));
        }
        Some(removed.track)
    }

    /// Move a track in display order; the shuffled order is unaffected
    pub(crate) fn move_track(&mut self, from: usize, to: usize) -> bool {
        if !self.displayed.move_entry(from, to) {
            return false;
        }
        self.selection = self.selection.map(|index| follow_move(index, from, to));
        true
    }

    /// Drop repeated locators, keeping each first occurrence
    ///
    /// The shuffled order is rebuilt from the result; both selections follow
    /// their entry by identity.
    pub(crate) fn remove_duplicates(&mut self) {
        let selected = SelectedEntry::at(&self.displayed, self.selection);
        let random_selected = SelectedEntry::at(&self.shuffled, self.random_selection);

        let before = self.displayed.len();
        self.displayed.remove_duplicates();
        self.shuffled = self.displayed.clone();
        if self.random {
            self.shuffled.shuffle();
        }

        self.selection = selected.and_then(|entry| entry.resolve(&self.displayed));
        self.random_selection = random_selected.and_then(|entry| entry.resolve(&self.shuffled));
        debug!(
            "Removed {} duplicate tracks",
            before - self.displayed.len()
        );
    }

    // ===== Device Notifications =====

    /// React to the device finishing the current track
    ///
    /// Advancing to another track reports `SelectionChanged` whether or not
    /// playback resumed (the user may have paused meanwhile); only running
    /// out of playable tracks reports `PlaylistEnded`.
    pub(crate) fn on_track_finished(&mut self) -> PlayerEvent {
        let advanced = self.step(Direction::Forward);

        let index = self.selection_index();
        match advanced {
            Some(_) => PlayerEvent::SelectionChanged {
                index,
                track: self.current_track(),
            },
            None => PlayerEvent::PlaylistEnded { index },
        }
    }

    pub(crate) fn set_observer(&mut self, observer: Option<SelectionObserver>) {
        self.observer = observer;
    }

    pub(crate) fn observer(&self) -> Option<SelectionObserver> {
        self.observer.clone()
    }

    // ===== Queries =====

    fn active_selection(&self) -> Option<usize> {
        if self.random {
            self.random_selection
        } else {
            self.selection
        }
    }

    fn set_active_selection(&mut self, index: Option<usize>) {
        if self.random {
            self.random_selection = index;
        } else {
            self.selection = index;
        }
    }

    fn active_playlist(&self) -> &Playlist {
        if self.random {
            &self.shuffled
        } else {
            &self.displayed
        }
    }

    fn active_entry(&self) -> Option<&PlaylistEntry> {
        self.active_playlist().get(self.active_selection()?)
    }

    /// Selected position in display order, whichever ordering is active
    pub(crate) fn selection_index(&self) -> Option<usize> {
        if self.random {
            let entry = self.shuffled.get(self.random_selection?)?;
            self.displayed.position_of(entry.id)
        } else {
            self.selection
        }
    }

    pub(crate) fn current_track(&self) -> Option<Track> {
        self.active_entry().map(|entry| entry.track.clone())
    }

    pub(crate) fn displayed(&self) -> &Playlist {
        &self.displayed
    }

    pub(crate) fn shuffled(&self) -> &Playlist {
        &self.shuffled
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.playing
    }

    pub(crate) fn is_random_mode(&self) -> bool {
        self.random
    }

    pub(crate) fn is_repeat_mode(&self) -> bool {
        self.repeat
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.device.elapsed_time()
    }

    pub(crate) fn status(&self) -> PlayerStatus {
        PlayerStatus {
            playing: self.playing,
            repeat: self.repeat,
            random: self.random,
            selection: self.selection_index(),
            track: self.current_track(),
            elapsed: self.elapsed(),
            len: self.displayed.len(),
        }
    }
}
