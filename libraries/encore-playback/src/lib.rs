//! Encore - Playback Control
//!
//! Platform-agnostic playlist traversal for Encore.
//!
//! This crate provides:
//! - Tracks and track header loading
//! - Playlists with stable entry ids
//! - A display ordering and an independent shuffled ordering
//! - Next/previous traversal that skips tracks the device cannot open
//! - Repeat (wrap around once) and random modes
//! - Playlist editing that keeps the selection on the same track
//! - Notification when the device finishes a track
//!
//! # Architecture
//!
//! The actual media rendering is provided by the platform through the
//! [`PlaybackDevice`] trait. The [`Player`] serializes every operation,
//! including the device's "finished" notification, behind a single lock.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use encore_playback::{FinishedCallback, PlaybackDevice, Player, Playlist, Track};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! // A device that accepts any media and never finishes
//! #[derive(Default)]
//! struct SilentDevice {
//!     elapsed: Duration,
//! }
//!
//! impl PlaybackDevice for SilentDevice {
//!     fn open_media(&mut self, _locator: &Path) -> bool {
//!         true
//!     }
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn set_elapsed_time(&mut self, elapsed: Duration) {
//!         self.elapsed = elapsed;
//!     }
//!     fn elapsed_time(&self) -> Duration {
//!         self.elapsed
//!     }
//!     fn register_on_finished(&mut self, _callback: FinishedCallback) {}
//! }
//!
//! let playlist: Playlist = vec![
//!     Track::new("intro.track", "Intro", Duration::from_secs(30)),
//!     Track::new("theme.track", "Theme", Duration::from_secs(180)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let player = Player::new(SilentDevice::default(), playlist);
//! player.play();
//! assert_eq!(player.selection_index(), Some(0));
//!
//! player.next();
//! assert_eq!(player.current_track().unwrap().title, "Theme");
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust,ignore
//! player.set_random_mode(true);
//! player.set_repeat_mode(true);
//!
//! player.set_on_selection_changed(|event| println!("{:?}", event));
//! ```

mod device;
mod error;
mod events;
mod player;
mod playlist;
pub mod selection;
mod shuffle;
mod state;
mod track;
pub mod types;

// Public exports
pub use device::{DeviceEvent, FinishedCallback, PlaybackDevice};
pub use error::{PlaybackError, Result};
pub use events::{PlayerEvent, SelectionObserver};
pub use player::Player;
pub use playlist::{Playlist, PlaylistEntry, StableId};
pub use track::{load_track, parse_track, FileTrackLoader, Track, TrackLoader};
pub use types::{Direction, PlayerConfig, PlayerStatus};
