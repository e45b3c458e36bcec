//! Playback controls for a step trace.
//!
//! The controller owns the trace, the current position and the render
//! target. Advancing is driven by a self-rescheduling tick task on the tokio
//! runtime; the public methods are synchronous and only arm or disarm that
//! task.
//!
//! Every transition that preempts a pending tick (`pause`, `reset`, `load`)
//! bumps a generation counter and aborts the task. A tick whose generation
//! no longer matches does nothing, so a stale timer can never move a trace
//! that was reset or replaced.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use algoviz_trace::Trace;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::DEFAULT_SPEED_MS;
use crate::error::{Error, Result};
use crate::render::{render_at, Frame, RenderTarget};

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No trace loaded yet
    Idle,
    /// Trace loaded, at the beginning, not playing
    Ready,
    /// Advancing one step per tick
    Playing,
    /// Stopped mid-trace
    Paused,
    /// Position reached the end of the trace
    Finished,
}

struct Inner {
    trace: Trace,
    position: usize,
    state: PlaybackState,
    speed_ms: u64,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    target: Box<dyn RenderTarget>,
    /// Frames the target refused since the last load
    missed_frames: usize,
}

impl Inner {
    /// Hand a frame to the target. A refusal is warned about once per
    /// loaded trace; later ones are only logged at debug.
    fn present(&mut self, frame: Frame) {
        if let Err(err) = self.target.present(frame) {
            self.missed_frames += 1;
            if self.missed_frames == 1 {
                tracing::warn!(error = %err, "frame not presented");
            } else {
                tracing::debug!(error = %err, missed = self.missed_frames, "frame not presented");
            }
        }
    }

    /// Invalidate and abort any scheduled tick.
    fn cancel_pending(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Render the current step and move past it.
    ///
    /// Returns whether steps remain.
    fn advance(&mut self) -> bool {
        if self.position < self.trace.len() {
            let frame = render_at(&self.trace, self.position);
            self.present(frame);
            self.position += 1;
        }
        if self.position >= self.trace.len() {
            self.state = PlaybackState::Finished;
            tracing::debug!(steps = self.trace.len(), "playback finished");
            false
        } else {
            true
        }
    }

    fn progress(&self) -> f64 {
        if self.trace.is_empty() {
            0.0
        } else {
            self.position as f64 / self.trace.len() as f64
        }
    }
}

/// Steps through a trace at a configurable speed.
pub struct PlaybackController {
    inner: Arc<Mutex<Inner>>,
    runtime: Handle,
}

impl PlaybackController {
    /// Create an idle controller at the default speed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(target: impl RenderTarget + 'static) -> Result<Self> {
        Self::with_speed(target, DEFAULT_SPEED_MS)
    }

    /// Create an idle controller at `speed_ms` milliseconds per step.
    pub fn with_speed(target: impl RenderTarget + 'static, speed_ms: u64) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                trace: Trace::empty(),
                position: 0,
                state: PlaybackState::Idle,
                speed_ms: speed_ms.max(1),
                generation: 0,
                pending: None,
                target: Box::new(target),
                missed_frames: 0,
            })),
            runtime,
        })
    }

    /// Replace the trace, rewind, and show its first step.
    pub fn load(&self, trace: Trace) {
        let mut inner = self.lock();
        inner.cancel_pending();
        inner.trace = trace;
        inner.position = 0;
        inner.state = PlaybackState::Ready;
        inner.missed_frames = 0;
        let frame = render_at(&inner.trace, 0);
        inner.present(frame);
        tracing::debug!(steps = inner.trace.len(), "trace loaded");
    }

    /// Start or resume playback.
    ///
    /// Renders the current step right away, then schedules the next tick.
    /// A finished trace starts over. Does nothing while already playing or
    /// before anything was loaded.
    pub fn play(&self) {
        let mut inner = self.lock();
        match inner.state {
            PlaybackState::Idle | PlaybackState::Playing => {
                tracing::debug!(state = ?inner.state, "play ignored");
                return;
            }
            PlaybackState::Finished => inner.position = 0,
            PlaybackState::Ready | PlaybackState::Paused => {}
        }

        inner.cancel_pending();
        inner.state = PlaybackState::Playing;
        tracing::debug!(position = inner.position, speed_ms = inner.speed_ms, "playing");
        if inner.advance() {
            self.schedule(&mut inner);
        }
    }

    /// Stop advancing, keeping the position.
    pub fn pause(&self) {
        let mut inner = self.lock();
        if inner.state != PlaybackState::Playing {
            tracing::debug!(state = ?inner.state, "pause ignored");
            return;
        }
        inner.cancel_pending();
        inner.state = PlaybackState::Paused;
        tracing::debug!(position = inner.position, "paused");
    }

    /// Rewind to the first step and show it.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if inner.state == PlaybackState::Idle {
            tracing::debug!("reset ignored, nothing loaded");
            return;
        }
        inner.cancel_pending();
        inner.position = 0;
        inner.state = PlaybackState::Ready;
        let frame = render_at(&inner.trace, 0);
        inner.present(frame);
        tracing::debug!("reset");
    }

    /// Set milliseconds per step; 0 is treated as 1.
    ///
    /// A tick that is already scheduled keeps its delay.
    pub fn set_speed(&self, ms: u64) {
        let mut inner = self.lock();
        inner.speed_ms = ms.max(1);
        tracing::debug!(speed_ms = inner.speed_ms, "speed changed");
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    pub fn position(&self) -> usize {
        self.lock().position
    }

    pub fn speed_ms(&self) -> u64 {
        self.lock().speed_ms
    }

    /// The loaded trace (shared, not copied).
    pub fn trace(&self) -> Trace {
        self.lock().trace.clone()
    }

    /// Whether a tick is scheduled and not yet run to completion.
    pub fn has_pending_tick(&self) -> bool {
        self.lock()
            .pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn status(&self) -> PlaybackStatus {
        let inner = self.lock();
        PlaybackStatus {
            position: inner.position,
            total: inner.trace.len(),
            state: inner.state,
            speed_ms: inner.speed_ms,
            progress: inner.progress(),
            pending_tick: inner
                .pending
                .as_ref()
                .is_some_and(|handle| !handle.is_finished()),
        }
    }

    fn schedule(&self, inner: &mut Inner) {
        let shared = Arc::clone(&self.inner);
        let generation = inner.generation;
        let delay = inner.speed_ms;
        inner.pending = Some(self.runtime.spawn(run_ticks(shared, generation, delay)));
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.lock().cancel_pending();
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tick until the trace ends or this generation is preempted.
async fn run_ticks(shared: Arc<Mutex<Inner>>, generation: u64, mut delay_ms: u64) {
    loop {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        match tick(&shared, generation) {
            Some(next) => delay_ms = next,
            None => return,
        }
    }
}

/// Advance one step; returns the delay before the next tick, if any.
fn tick(shared: &Mutex<Inner>, generation: u64) -> Option<u64> {
    let mut inner = lock(shared);
    if inner.generation != generation || inner.state != PlaybackState::Playing {
        return None;
    }
    if inner.advance() {
        Some(inner.speed_ms)
    } else {
        inner.pending = None;
        None
    }
}

/// Playback status for sending to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub position: usize,
    pub total: usize,
    pub state: PlaybackState,
    pub speed_ms: u64,
    /// Fraction of the trace already shown, 0.0 to 1.0
    pub progress: f64,
    pub pending_tick: bool,
}
