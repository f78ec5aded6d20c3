//! Playback controls for algorithm traces.
//!
//! The cursor starts before the first step (`None`) and moves at most one
//! step per advance. Every operation that must cancel a scheduled advance
//! bumps [`Playback::generation`]; a tick carrying an older generation is
//! ignored.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stepgraph_core::{Step, Trace};

/// Default delay between automatic advances.
pub const DEFAULT_SPEED_MS: u64 = 500;
/// Fastest allowed playback.
pub const MIN_SPEED_MS: u64 = 100;
/// Slowest allowed playback.
pub const MAX_SPEED_MS: u64 = 2000;

/// Current state of playback, derived from cursor and play flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No trace loaded
    Idle,
    /// Trace loaded, cursor before the first step
    Ready,
    /// Cursor on a step, not playing
    Stepping,
    /// Advancing automatically
    Playing,
    /// Cursor on the last step, not playing
    Finished,
}

/// Result of one advance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cursor moved to this index
    Advanced(usize),
    /// Already on the last step; playback stopped
    Finished,
    /// Tick scheduled under an older generation
    Stale,
    /// Nothing to do (no trace, or not playing)
    NotPlaying,
}

/// Playback controller for one trace.
#[derive(Debug)]
pub struct Playback {
    trace: Arc<Trace>,
    cursor: Option<usize>,
    playing: bool,
    speed: Duration,
    default_speed: Duration,
    generation: u64,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    /// Create an idle controller with no trace.
    pub fn new() -> Self {
        Self {
            trace: Arc::new(Trace::default()),
            cursor: None,
            playing: false,
            speed: Duration::from_millis(DEFAULT_SPEED_MS),
            default_speed: Duration::from_millis(DEFAULT_SPEED_MS),
            generation: 0,
        }
    }

    /// Replace the trace, rewind and stop.
    pub fn load_steps(&mut self, trace: impl Into<Arc<Trace>>) {
        self.trace = trace.into();
        self.cursor = None;
        self.playing = false;
        self.invalidate();
    }

    /// Drop the trace and restore the default speed.
    pub fn clear(&mut self) {
        self.load_steps(Trace::default());
        self.speed = self.default_speed;
    }

    /// Get the loaded trace.
    pub fn trace(&self) -> &Arc<Trace> {
        &self.trace
    }

    /// Get the cursor position; `None` is before the first step.
    pub fn current_step_index(&self) -> Option<usize> {
        self.cursor
    }

    /// Get the step under the cursor.
    pub fn current_step(&self) -> Option<&Step> {
        self.cursor.and_then(|i| self.trace.get(i))
    }

    /// Get the total number of steps.
    pub fn total_steps(&self) -> usize {
        self.trace.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Get the delay between automatic advances.
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Counter identifying the current scheduling epoch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        if self.trace.is_empty() {
            PlaybackState::Idle
        } else if self.playing {
            PlaybackState::Playing
        } else if self.cursor.is_none() {
            PlaybackState::Ready
        } else if self.at_last() {
            PlaybackState::Finished
        } else {
            PlaybackState::Stepping
        }
    }

    /// Start automatic playback.
    ///
    /// Returns `true` if playback started. Does nothing when there are no
    /// steps, when the cursor is already on the last step, or when already
    /// playing.
    pub fn play(&mut self) -> bool {
        if self.trace.is_empty() || self.at_last() || self.playing {
            return false;
        }
        self.playing = true;
        self.invalidate();
        true
    }

    /// Stop automatic playback, keeping the cursor.
    pub fn pause(&mut self) {
        self.playing = false;
        self.invalidate();
    }

    /// Stop and rewind before the first step. The trace is kept.
    pub fn reset(&mut self) {
        self.playing = false;
        self.cursor = None;
        self.invalidate();
    }

    /// Set the delay for future advances, clamped to the allowed range.
    pub fn set_speed(&mut self, ms: u64) {
        self.speed = Duration::from_millis(ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS));
    }

    /// Set the speed that [`Playback::clear`] restores, and apply it now.
    pub fn set_default_speed(&mut self, ms: u64) {
        self.set_speed(ms);
        self.default_speed = self.speed;
    }

    /// Scheduled advance issued under `generation`.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation {
            return TickOutcome::Stale;
        }
        if !self.playing {
            return TickOutcome::NotPlaying;
        }
        self.advance()
    }

    /// Manual advance. Cancels automatic playback first.
    pub fn step_forward(&mut self) -> TickOutcome {
        if self.playing {
            self.pause();
        }
        self.advance()
    }

    /// Step backward one step. Cancels automatic playback.
    pub fn step_backward(&mut self) -> Option<usize> {
        self.pause();
        self.cursor = self.cursor.and_then(|i| i.checked_sub(1));
        self.cursor
    }

    /// Jump to a position, clamped to the last step. Cancels automatic playback.
    pub fn seek(&mut self, index: Option<usize>) -> Option<usize> {
        self.pause();
        self.cursor = match (index, self.last_index()) {
            (Some(i), Some(last)) => Some(i.min(last)),
            _ => None,
        };
        self.cursor
    }

    /// Calculate progress as fraction of steps shown (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        match self.cursor {
            Some(i) if !self.trace.is_empty() => (i + 1) as f64 / self.trace.len() as f64,
            _ => 0.0,
        }
    }

    fn advance(&mut self) -> TickOutcome {
        let Some(last) = self.last_index() else {
            return TickOutcome::NotPlaying;
        };
        let next = self.cursor.map_or(0, |i| i + 1);
        if next > last {
            self.cursor = Some(last);
            if self.playing {
                self.playing = false;
                self.invalidate();
            }
            return TickOutcome::Finished;
        }
        self.cursor = Some(next);
        TickOutcome::Advanced(next)
    }

    fn last_index(&self) -> Option<usize> {
        self.trace.len().checked_sub(1)
    }

    fn at_last(&self) -> bool {
        self.cursor.is_some() && self.cursor == self.last_index()
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub current_step_index: Option<usize>,
    pub total_steps: usize,
    pub state: PlaybackState,
    pub is_playing: bool,
    pub speed_ms: u64,
    pub progress: f64,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            current_step_index: playback.cursor,
            total_steps: playback.total_steps(),
            state: playback.state(),
            is_playing: playback.playing,
            speed_ms: playback.speed.as_millis() as u64,
            progress: playback.progress(),
        }
    }
}
