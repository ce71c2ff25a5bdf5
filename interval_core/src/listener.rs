//! Notification contract between the timer engine and its caller.

use crate::{DisplayState, Step};
use std::sync::mpsc::Sender;

/// Receives timer notifications, synchronously, from inside a tick
pub trait TimerListener {
    /// Once per frame while running, unless the run completes on that frame.
    fn on_tick(&mut self, state: &DisplayState);

    /// The timer moved on to `step`.
    fn on_step_change(&mut self, step: &Step);

    /// The schedule is exhausted. Fires exactly once per run.
    fn on_complete(&mut self);
}

/// A timer notification as a value
#[derive(Clone, Debug, PartialEq)]
pub enum TimerEvent {
    Tick(DisplayState),
    StepChanged(Step),
    Completed,
}

/// Records notifications in order
impl TimerListener for Vec<TimerEvent> {
    fn on_tick(&mut self, state: &DisplayState) {
        self.push(TimerEvent::Tick(state.clone()));
    }

    fn on_step_change(&mut self, step: &Step) {
        self.push(TimerEvent::StepChanged(step.clone()));
    }

    fn on_complete(&mut self) {
        self.push(TimerEvent::Completed);
    }
}

/// Forwards notifications over a channel. A hung-up receiver is not an error.
impl TimerListener for Sender<TimerEvent> {
    fn on_tick(&mut self, state: &DisplayState) {
        if self.send(TimerEvent::Tick(state.clone())).is_err() {
            tracing::debug!("Tick dropped, receiver gone");
        }
    }

    fn on_step_change(&mut self, step: &Step) {
        if self.send(TimerEvent::StepChanged(step.clone())).is_err() {
            tracing::debug!("Step change dropped, receiver gone");
        }
    }

    fn on_complete(&mut self) {
        if self.send(TimerEvent::Completed).is_err() {
            tracing::debug!("Completion dropped, receiver gone");
        }
    }
}
