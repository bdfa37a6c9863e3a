//! Encore - Playback Devices
//!
//! [`PlaybackDevice`](encore_playback::PlaybackDevice) implementations.
//!
//! [`ThreadDevice`] "plays" text tracks: a background thread prints one line
//! of the track body per tick while playing and reports the end of the track
//! through the finished callback.
//!
//! # Example
//!
//! ```rust,no_run
//! use encore_device::ThreadDevice;
//! use encore_playback::{load_track, Player, Playlist};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let device = ThreadDevice::new(std::io::stdout(), Duration::from_secs(1))?;
//! let mut playlist = Playlist::new();
//! playlist.push_back(load_track(Path::new("song.track"))?);
//!
//! let player = Player::new(device, playlist);
//! player.play();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod thread_device;

pub use error::{DeviceError, Result};
pub use thread_device::ThreadDevice;
