//! Playback device capability
//!
//! Abstracts the component that actually renders media. The player never
//! assumes the device succeeds: `open_media` returning `false` means "skip
//! this track".

use std::path::Path;
use std::time::Duration;

/// Callback fired by a device when the opened media has played to the end
pub type FinishedCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Platform playback device
///
/// Implementors must stop progressing (pause and rewind) once media ends,
/// before firing the finished callback. The callback may run on any thread
/// and must not be invoked while the device holds a lock that
/// [`open_media`](PlaybackDevice::open_media) also takes.
pub trait PlaybackDevice: Send {
    /// Load media for playback
    ///
    /// Returns `false` if the media cannot be played.
    fn open_media(&mut self, locator: &Path) -> bool;

    /// Start or resume progression (idempotent)
    fn play(&mut self);

    /// Halt progression, keeping the position (idempotent)
    fn pause(&mut self);

    fn set_elapsed_time(&mut self, elapsed: Duration);

    fn elapsed_time(&self) -> Duration;

    /// Install the finished callback, replacing any previous one
    fn register_on_finished(&mut self, callback: FinishedCallback);
}

/// Notifications a device sends to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The opened media played to its end
    Finished,
}
