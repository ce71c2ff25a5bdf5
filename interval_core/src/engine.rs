//! Timer engine for running a preset.
//!
//! The engine is a clock-driven state machine with no threads of its own.
//! After every tick it requests another frame from its [`FrameScheduler`];
//! the driver delivers frames back through [`IntervalTimer::pump`].
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start--> Running --pause--> Paused --resume--> Running
//!    ^                  |
//!    +----complete------+      (reset from any state -> Stopped)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = IntervalTimer::new(listener, MonotonicClock::new(), frames);
//! timer.start(&preset);
//! while timer.pump() {}
//! ```

use crate::clock::Clock;
use crate::frames::{FrameHandle, FrameScheduler};
use crate::listener::TimerListener;
use crate::schedule::{build_schedule, Schedule};
use crate::{DisplayState, Preset, Step, TimerState};

/// Runs a preset's schedule against a clock and reports to a listener
pub struct IntervalTimer<L, C, F> {
    listener: L,
    clock: C,
    frames: F,
    schedule: Schedule,
    state: TimerState,
    current_index: usize,
    /// Milliseconds left in the current step. Dips below zero on the frame
    /// that crosses a step boundary.
    remaining_in_step_ms: i64,
    last_frame_ms: u64,
    pending_frame: Option<FrameHandle>,
}

impl<L, C, F> IntervalTimer<L, C, F>
where
    L: TimerListener,
    C: Clock,
    F: FrameScheduler,
{
    pub fn new(listener: L, clock: C, frames: F) -> Self {
        Self {
            listener,
            clock,
            frames,
            schedule: Schedule::default(),
            state: TimerState::Stopped,
            current_index: 0,
            remaining_in_step_ms: 0,
            last_frame_ms: 0,
            pending_frame: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining_in_step_ms(&self) -> i64 {
        self.remaining_in_step_ms
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.schedule.get(self.current_index)
    }

    /// Display state at this instant; `None` once the schedule is exhausted.
    pub fn display_state(&self) -> Option<DisplayState> {
        DisplayState::compute(&self.schedule, self.current_index, self.remaining_in_step_ms)
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start `preset` from its first step, discarding any previous run.
    pub fn start(&mut self, preset: &Preset) {
        self.cancel_pending_frame();
        self.schedule = build_schedule(preset);
        self.current_index = 0;
        self.state = TimerState::Running;

        tracing::info!(
            "Starting '{}': {} steps, {}s total",
            preset.name,
            self.schedule.len(),
            self.schedule.total_duration_secs()
        );

        let Some(first) = self.schedule.get(0) else {
            tracing::warn!("Preset '{}' has an empty schedule", preset.name);
            self.remaining_in_step_ms = 0;
            self.complete();
            return;
        };
        self.remaining_in_step_ms = first.duration_ms();
        self.last_frame_ms = self.clock.now_ms();
        self.tick();
    }

    pub fn pause(&mut self) {
        if self.state != TimerState::Running {
            return;
        }
        self.state = TimerState::Paused;
        self.cancel_pending_frame();
        tracing::debug!(
            "Paused at step {} with {}ms left",
            self.current_index,
            self.remaining_in_step_ms
        );
    }

    pub fn resume(&mut self) {
        if self.state != TimerState::Paused {
            return;
        }
        self.state = TimerState::Running;
        // Re-anchor so time spent paused is not counted.
        self.last_frame_ms = self.clock.now_ms();
        tracing::debug!("Resumed at step {}", self.current_index);
        self.tick();
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Stopped;
        self.cancel_pending_frame();
        self.schedule = Schedule::default();
        self.current_index = 0;
        self.remaining_in_step_ms = 0;
        tracing::debug!("Timer reset");
    }

    /// Deliver one frame from the scheduler.
    ///
    /// Returns `false` when no frame is outstanding, i.e. the timer is
    /// stopped or paused.
    pub fn pump(&mut self) -> bool {
        let Some(frame) = self.frames.next_frame() else {
            return false;
        };
        if self.pending_frame == Some(frame) {
            self.pending_frame = None;
            self.tick();
        }
        true
    }

    /// Advance by the time elapsed since the previous frame.
    ///
    /// Overshoot past a step boundary is dropped rather than carried into
    /// the next step, so coarse frames drift slightly late.
    pub fn tick(&mut self) {
        if self.state != TimerState::Running {
            return;
        }

        let now = self.clock.now_ms();
        let delta = now.saturating_sub(self.last_frame_ms);
        self.last_frame_ms = now;
        self.remaining_in_step_ms = self
            .remaining_in_step_ms
            .saturating_sub(i64::try_from(delta).unwrap_or(i64::MAX));

        if self.remaining_in_step_ms <= 0 {
            self.current_index += 1;
            let Some(step) = self.schedule.get(self.current_index) else {
                self.complete();
                return;
            };
            self.remaining_in_step_ms = step.duration_ms();
            tracing::debug!(
                "Step {} of {}: {:?} for {}s",
                self.current_index + 1,
                self.schedule.len(),
                step.kind,
                step.duration
            );
            self.listener.on_step_change(step);
        }

        if let Some(state) = self.display_state() {
            self.listener.on_tick(&state);
        }

        self.cancel_pending_frame();
        self.pending_frame = Some(self.frames.schedule_frame());
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) {
        self.state = TimerState::Stopped;
        self.cancel_pending_frame();
        tracing::info!("Schedule complete");
        self.listener.on_complete();
    }

    fn cancel_pending_frame(&mut self) {
        if let Some(frame) = self.pending_frame.take() {
            self.frames.cancel_frame(frame);
        }
    }
}
