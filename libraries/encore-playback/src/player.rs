//! Thread-safe player handle
//!
//! Wraps [`PlayerState`] in a mutex that every public operation takes exactly
//! once. Device notifications arrive on their own thread; they are turned
//! into [`DeviceEvent`]s on a channel and applied by a dedicated event thread
//! under the same lock.
//!
//! ```text
//! Device thread           Event thread                 Caller threads
//!      │ finished()            │                              │
//!      │──DeviceEvent─────────>│ lock, next(), unlock         │ lock, op, unlock
//!      │                       │ observer(&PlayerEvent)       │
//! ```

use crate::{
    device::{DeviceEvent, PlaybackDevice},
    error::Result,
    events::{PlayerEvent, SelectionObserver},
    playlist::{Playlist, PlaylistEntry, StableId},
    state::PlayerState,
    track::{Track, TrackLoader},
    types::{Direction, PlayerConfig, PlayerStatus},
};
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Playback controller for one playlist and one device
///
/// All methods take `&self`; the player can be shared between threads
/// behind an `Arc`.
pub struct Player {
    state: Arc<Mutex<PlayerState>>,

    /// Dropping this stops the event thread
    shutdown_tx: Option<Sender<()>>,

    event_thread: Option<JoinHandle<()>>,
}

impl Player {
    /// Create a player with repeat and random mode off
    pub fn new(device: impl PlaybackDevice + 'static, playlist: Playlist) -> Self {
        Self::with_config(device, playlist, PlayerConfig::default())
    }

    /// Create a player with the given initial modes
    pub fn with_config(
        device: impl PlaybackDevice + 'static,
        playlist: Playlist,
        config: PlayerConfig,
    ) -> Self {
        let (event_tx, event_rx) = unbounded::<DeviceEvent>();
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();

        let mut state = PlayerState::new(Box::new(device), playlist, config);
        state
            .device_mut()
            .register_on_finished(Box::new(move || {
                // The player may already be gone; nothing to do then
                event_tx.send(DeviceEvent::Finished).ok();
            }));

        let state = Arc::new(Mutex::new(state));
        let thread_state = Arc::clone(&state);

        // Spawning only fails when the OS is out of threads; fall back to a
        // player without device notifications rather than failing construction.
        let event_thread = thread::Builder::new()
            .name("encore-player-events".to_string())
            .spawn(move || Self::event_loop(&thread_state, &event_rx, &shutdown_rx))
            .map_err(|e| tracing::error!("Failed to spawn player event thread: {}", e))
            .ok();

        Self {
            state,
            shutdown_tx: Some(shutdown_tx),
            event_thread,
        }
    }

    fn event_loop(
        state: &Mutex<PlayerState>,
        event_rx: &Receiver<DeviceEvent>,
        shutdown_rx: &Receiver<()>,
    ) {
        loop {
            select! {
                recv(event_rx) -> event => match event {
                    Ok(DeviceEvent::Finished) => Self::handle_track_finished(state),
                    Err(_) => break,
                },
                recv(shutdown_rx) -> _ => break,
            }
        }
        debug!("Player event thread stopped");
    }

    fn handle_track_finished(state: &Mutex<PlayerState>) {
        let (event, observer) = {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            let event = state.on_track_finished();
            (event, state.observer())
        };

        debug!("Track finished: {:?}", event);
        if let Some(observer) = observer {
            observer(&event);
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Playback Control =====

    /// Start playback
    ///
    /// Without a selection the first playable track is selected first. Does
    /// nothing if already playing or if nothing can be played.
    pub fn play(&self) {
        self.lock().play();
    }

    /// Pause playback, keeping the position
    pub fn pause(&self) {
        self.lock().pause();
    }

    /// Stop playback and rewind the current track
    pub fn stop(&self) {
        self.lock().stop();
    }

    /// Go to the next playable track
    pub fn next(&self) {
        self.lock().step(Direction::Forward);
    }

    /// Go to the previous playable track
    pub fn previous(&self) {
        self.lock().step(Direction::Backward);
    }

    /// Select the track at `pos` in display order
    ///
    /// Positions past the end select the last track. Returns `false` if the
    /// playlist is empty or the device cannot open the track.
    pub fn select(&self, pos: usize) -> bool {
        self.lock().select(pos)
    }

    // ===== Modes =====

    /// Turn random traversal on or off
    ///
    /// Turning it on reshuffles and continues with the currently selected
    /// track first.
    pub fn set_random_mode(&self, value: bool) {
        self.lock().set_random_mode(value);
    }

    pub fn is_random_mode(&self) -> bool {
        self.lock().is_random_mode()
    }

    pub fn set_repeat_mode(&self, value: bool) {
        self.lock().set_repeat_mode(value);
    }

    pub fn is_repeat_mode(&self) -> bool {
        self.lock().is_repeat_mode()
    }

    // ===== Playlist Editing =====

    /// Append a track, returning its stable id
    pub fn push_back(&self, track: Track) -> StableId {
        self.lock().push_back(track)
    }

    /// Insert a track at `pos` in display order (clamped to the end)
    pub fn insert_at(&self, pos: usize, track: Track) -> StableId {
        self.lock().insert_at(pos, track)
    }

    /// Load a track and add it at `position`, or at the end
    ///
    /// The playlist is only touched once loading succeeded.
    pub fn add_from(
        &self,
        loader: &dyn TrackLoader,
        locator: &Path,
        position: Option<usize>,
    ) -> Result<StableId> {
        let track = loader.load(locator)?;
        Ok(match position {
            Some(pos) => self.insert_at(pos, track),
            None => self.push_back(track),
        })
    }

    /// Remove the track at `pos`; out-of-range positions are ignored
    pub fn remove(&self, pos: usize) -> Option<Track> {
        self.lock().remove(pos)
    }

    /// Move a track within the display order
    ///
    /// Returns `false` if either position is out of range or they are equal.
    pub fn move_track(&self, from: usize, to: usize) -> bool {
        self.lock().move_track(from, to)
    }

    /// Remove repeated tracks (same locator), keeping the first of each
    pub fn remove_duplicates(&self) {
        self.lock().remove_duplicates();
    }

    // ===== Observer =====

    /// Install the observer for player-initiated selection changes
    pub fn set_on_selection_changed<F>(&self, observer: F)
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        let observer: SelectionObserver = Arc::new(observer);
        self.lock().set_observer(Some(observer));
    }

    pub fn clear_on_selection_changed(&self) {
        self.lock().set_observer(None);
    }

    // ===== State =====

    pub fn is_playing(&self) -> bool {
        self.lock().is_playing()
    }

    /// Selected position in display order
    pub fn selection_index(&self) -> Option<usize> {
        self.lock().selection_index()
    }

    /// Track of the active selection
    pub fn current_track(&self) -> Option<Track> {
        self.lock().current_track()
    }

    /// Entries in display order
    pub fn tracks(&self) -> Vec<PlaylistEntry> {
        self.lock().displayed().entries().to_vec()
    }

    /// Entries in shuffled order
    pub fn shuffled_tracks(&self) -> Vec<PlaylistEntry> {
        self.lock().shuffled().entries().to_vec()
    }

    /// Track at `pos` in display order
    pub fn track(&self, pos: usize) -> Option<Track> {
        self.lock()
            .displayed()
            .get(pos)
            .map(|entry| entry.track.clone())
    }

    /// Display-order listing, as shown by `Playlist`'s `Display`
    pub fn describe_tracks(&self) -> String {
        self.lock().displayed().to_string()
    }

    pub fn len(&self) -> usize {
        self.lock().displayed().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().displayed().is_empty()
    }

    /// Device position in the current track
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed()
    }

    pub fn status(&self) -> PlayerStatus {
        self.lock().status()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown_tx.take();
        if let Some(handle) = self.event_thread.take() {
            // An observer dropping the last handle runs on the event thread itself
            if handle.thread().id() != thread::current().id() {
                handle.join().ok();
            }
        }
    }
}
