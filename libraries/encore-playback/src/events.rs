//! Player events
//!
//! Emitted to the selection observer after advances the player triggers on
//! its own (a track finishing on the device). Advances requested through the
//! public API are not reported, the caller already knows about them.

use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Another track was selected (playing unless paused meanwhile)
    SelectionChanged {
        /// Selected position in display order
        index: Option<usize>,
        /// The newly selected track
        track: Option<Track>,
    },

    /// Nothing further could be played
    ///
    /// Raised when the end of the playlist was reached with repeat off, or
    /// when no track in the playlist could be opened.
    PlaylistEnded {
        /// Selection left in place (display order)
        index: Option<usize>,
    },
}

/// Observer invoked with every [`PlayerEvent`]
///
/// Runs on the player's event thread after the player lock is released, so
/// it may call back into the player.
pub type SelectionObserver = Arc<dyn Fn(&PlayerEvent) + Send + Sync + 'static>;
