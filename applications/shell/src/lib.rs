//! Encore Shell Library
//!
//! Interactive command shell driving an Encore player on a simulated device.
//!
//! This library exposes the shell and its setup for testing purposes.

pub mod config;
pub mod error;
pub mod shell;

use encore_device::ThreadDevice;
use encore_playback::{load_track, Player, PlayerEvent, Playlist};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

// Re-export commonly used types for convenience
pub use config::ShellConfig;
pub use error::{Result, ShellError};
pub use shell::Shell;

/// Build the initial playlist from track files
///
/// Files that fail to load are logged and skipped.
pub fn initial_playlist<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Playlist {
    let mut playlist = Playlist::new();
    for path in paths {
        match load_track(path) {
            Ok(track) => {
                playlist.push_back(track);
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    info!("Loaded {} tracks", playlist.len());
    playlist
}

/// Create a player rendering to stdout with the configured tracks and modes
pub fn build_player(config: &ShellConfig, extra_tracks: &[PathBuf]) -> Result<Player> {
    config.validate()?;

    let device = ThreadDevice::new(io::stdout(), Duration::from_millis(config.tick_ms))?;
    let playlist = initial_playlist(config.tracks.iter().chain(extra_tracks));
    let player = Player::with_config(device, playlist, config.player_config());
    player.set_on_selection_changed(|event| {
        let mut stdout = io::stdout().lock();
        announce(event, &mut stdout).ok();
    });
    Ok(player)
}

/// Print a player-initiated selection change
pub fn announce<W: Write>(event: &PlayerEvent, output: &mut W) -> io::Result<()> {
    match event {
        PlayerEvent::SelectionChanged {
            track: Some(track), ..
        } => writeln!(output, "Now playing: {}", track.title),
        PlayerEvent::SelectionChanged { track: None, .. } => Ok(()),
        PlayerEvent::PlaylistEnded { .. } => writeln!(output, "End of playlist"),
    }
}
