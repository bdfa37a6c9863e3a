//! Background-thread playback device
//!
//! Renders text tracks: every tick while playing, the line at the current
//! elapsed second is written to the output and the position advances by one
//! second. Past the last line the device pauses, rewinds, and fires the
//! finished callback.
//!
//! ## Architecture
//!
//! ```text
//! Player (any thread)            Device Thread
//!        │                              │
//!        │  open_media / play / pause   │
//!        │──────── shared state ───────>│ every tick:
//!        │                              │   write line, elapsed += 1s
//!        │                              │   or at the end:
//!        │  finished callback           │   pause, rewind, notify
//!        │<─────────────────────────────│
//! ```

use crate::error::Result;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use encore_playback::{FinishedCallback, PlaybackDevice};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const SECOND: Duration = Duration::from_secs(1);

/// State shared with the progression thread
struct Shared {
    /// Track body (header line excluded), one line per second
    content: Vec<String>,
    elapsed: Duration,
    paused: bool,
    on_finished: Option<Arc<dyn Fn() + Send + Sync>>,
}

/// Outcome of one progression tick
enum Tick {
    Idle,
    Line(String),
    Finished(Option<Arc<dyn Fn() + Send + Sync>>),
}

impl Shared {
    fn tick(&mut self) -> Tick {
        if self.paused {
            return Tick::Idle;
        }

        let position = self.elapsed.as_secs() as usize;
        match self.content.get(position) {
            Some(line) => {
                let line = line.clone();
                self.elapsed += SECOND;
                Tick::Line(line)
            }
            None => {
                // Stop progressing before anyone hears about the end
                self.paused = true;
                self.elapsed = Duration::ZERO;
                Tick::Finished(self.on_finished.clone())
            }
        }
    }
}

/// Playback device driven by its own thread
pub struct ThreadDevice {
    shared: Arc<Mutex<Shared>>,

    /// Dropping this stops the progression thread
    stop_tx: Option<Sender<()>>,

    thread: Option<JoinHandle<()>>,
}

impl ThreadDevice {
    /// Start a device writing rendered lines to `output`, one per `tick`
    pub fn new<W>(output: W, tick: Duration) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        let shared = Arc::new(Mutex::new(Shared {
            content: Vec::new(),
            elapsed: Duration::ZERO,
            paused: true,
            on_finished: None,
        }));
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let thread_shared = Arc::clone(&shared);

        let thread = thread::Builder::new()
            .name("encore-device".to_string())
            .spawn(move || {
                let mut output = output;
                loop {
                    match stop_rx.recv_timeout(tick) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    Self::progress(&thread_shared, &mut output);
                }
                debug!("Device thread stopped");
            })?;

        Ok(Self {
            shared,
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }

    fn progress<W: Write>(shared: &Mutex<Shared>, output: &mut W) {
        let tick = lock(shared).tick();
        match tick {
            Tick::Idle => {}
            Tick::Line(line) => {
                if let Err(e) = writeln!(output, "{}", line).and_then(|()| output.flush()) {
                    warn!("Failed to write track output: {}", e);
                }
            }
            Tick::Finished(callback) => {
                debug!("Media finished");
                if let Some(callback) = callback {
                    callback();
                }
            }
        }
    }

    fn shared(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlaybackDevice for ThreadDevice {
    /// Load the body of a track file; the first line is the header
    fn open_media(&mut self, locator: &Path) -> bool {
        let text = match fs::read_to_string(locator) {
            Ok(text) => text,
            Err(e) => {
                debug!("Cannot open {}: {}", locator.display(), e);
                return false;
            }
        };

        let mut lines = text.lines();
        if lines.next().is_none() {
            debug!("Cannot open {}: empty file", locator.display());
            return false;
        }

        let mut shared = self.shared();
        shared.content = lines.map(str::to_string).collect();
        shared.elapsed = Duration::ZERO;
        true
    }

    fn play(&mut self) {
        self.shared().paused = false;
    }

    fn pause(&mut self) {
        self.shared().paused = true;
    }

    fn set_elapsed_time(&mut self, elapsed: Duration) {
        self.shared().elapsed = elapsed;
    }

    fn elapsed_time(&self) -> Duration {
        self.shared().elapsed
    }

    fn register_on_finished(&mut self, callback: FinishedCallback) {
        self.shared().on_finished = Some(Arc::from(callback));
    }
}

impl Drop for ThreadDevice {
    fn drop(&mut self) {
        self.stop_tx.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Device thread panicked");
            }
        }
    }
}
