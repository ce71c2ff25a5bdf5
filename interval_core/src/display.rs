//! Derived presentation state for a running timer.

use crate::schedule::Schedule;
use crate::types::{secs_to_ms, StepKind};
use serde::{Deserialize, Serialize};

/// What a display should show at a given instant
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DisplayState {
    pub step_kind: StepKind,
    /// Whole seconds left in the step, rounded up.
    pub time_remaining: i64,
    pub rep_index: u32,
    pub total_reps: u32,
    /// Fraction of the current repetition elapsed, 0.0 .. 1.0.
    pub progress: f64,
}

impl DisplayState {
    /// Derive the display state for step `index` with `remaining_in_step_ms`
    /// left in it. Returns `None` past the end of the schedule.
    pub fn compute(schedule: &Schedule, index: usize, remaining_in_step_ms: i64) -> Option<Self> {
        let step = schedule.get(index)?;

        let remaining_in_rep = schedule.remaining_in_rep_ms(index, remaining_in_step_ms);
        let total_ms = if step.is_long_break() {
            step.duration_ms()
        } else {
            secs_to_ms(step.total_rep_duration)
        };
        let progress = if total_ms == 0 {
            0.0
        } else {
            1.0 - remaining_in_rep as f64 / total_ms as f64
        };

        Some(Self {
            step_kind: step.kind,
            time_remaining: ceil_secs(remaining_in_step_ms),
            rep_index: step.rep_index,
            total_reps: step.total_reps,
            progress,
        })
    }

    /// "Set 2/8", or "Long Break" during the trailing break
    pub fn rep_label(&self) -> String {
        match self.step_kind {
            StepKind::LongBreak => "Long Break".to_string(),
            _ => format!("Set {}/{}", self.rep_index, self.total_reps),
        }
    }
}

// Ceiling so the display never reads 0 while time is left.
fn ceil_secs(ms: i64) -> i64 {
    ms.saturating_add(999).div_euclid(1000)
}

/// Format seconds as `m:ss`
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
