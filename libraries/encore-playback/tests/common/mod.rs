//! Shared test fixtures

#![allow(dead_code)]

use encore_playback::{FinishedCallback, PlaybackDevice, Playlist, Track};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub fn create_test_track(n: u64) -> Track {
    Track::new(
        format!("file{}", n),
        format!("Title{}", n),
        Duration::from_secs(n),
    )
}

pub fn build_playlist(numbers: &[u64]) -> Playlist {
    numbers.iter().map(|&n| create_test_track(n)).collect()
}

pub fn path_of(n: u64) -> PathBuf {
    PathBuf::from(format!("file{}", n))
}

#[derive(Default)]
pub struct MockState {
    pub path: Option<PathBuf>,
    pub paused: bool,
    pub elapsed: Duration,
    pub open_calls: usize,
    pub unplayable: HashSet<PathBuf>,
    callback: Option<Arc<dyn Fn() + Send + Sync>>,
}

/// Recording device; clones share the same state
#[derive(Clone)]
pub struct MockDevice {
    state: Arc<Mutex<MockState>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                paused: true,
                ..MockState::default()
            })),
        }
    }

    /// Device that refuses the tracks with the given numbers
    pub fn refusing(numbers: &[u64]) -> Self {
        let device = Self::new();
        device.state().unplayable = numbers.iter().map(|&n| path_of(n)).collect();
        device
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.state().path.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    /// Simulate the media reaching its end
    pub fn finish(&self) {
        let callback = {
            let mut state = self.state();
            state.paused = true;
            state.elapsed = Duration::ZERO;
            state.callback.clone()
        };
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl PlaybackDevice for MockDevice {
    fn open_media(&mut self, locator: &Path) -> bool {
        let mut state = self.state();
        state.open_calls += 1;
        if state.unplayable.contains(locator) {
            return false;
        }
        state.path = Some(locator.to_path_buf());
        true
    }

    fn play(&mut self) {
        let mut state = self.state();
        state.paused = false;
        state.elapsed = Duration::from_secs(1);
    }

    fn pause(&mut self) {
        self.state().paused = true;
    }

    fn set_elapsed_time(&mut self, elapsed: Duration) {
        self.state().elapsed = elapsed;
    }

    fn elapsed_time(&self) -> Duration {
        self.state().elapsed
    }

    fn register_on_finished(&mut self, callback: FinishedCallback) {
        self.state().callback = Some(Arc::from(callback));
    }
}
