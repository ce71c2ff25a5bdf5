//! Keyboard controls for a real-time run.
//!
//! Input is line based: type a key and press Enter. An empty line toggles.

use interval_core::{Clock, FrameScheduler, IntervalTimer, Preset, TimerListener, TimerState};
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread;

pub const HELP: &str = "p/space: pause/resume   r: reset   q: quit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Toggle,
    Reset,
    Quit,
}

impl Control {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "p" => Some(Control::Toggle),
            "r" => Some(Control::Reset),
            "q" => Some(Control::Quit),
            _ => None,
        }
    }
}

/// Read controls from `input` on a helper thread.
///
/// The channel disconnects when the input reaches EOF.
pub fn spawn_reader<R>(input: R) -> Receiver<Control>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Stopped reading controls: {}", e);
                    break;
                }
            };
            match Control::parse(&line) {
                Some(control) => {
                    if tx.send(control).is_err() {
                        break;
                    }
                }
                None => tracing::debug!("Ignoring unknown control '{}'", line.trim()),
            }
        }
    });
    rx
}

/// Apply `control` to the timer. Returns `false` when the run should end.
///
/// Toggle pauses a running timer, resumes a paused one and starts `preset`
/// afresh after a reset.
pub fn apply<L, C, F>(
    timer: &mut IntervalTimer<L, C, F>,
    preset: &Preset,
    control: Control,
) -> bool
where
    L: TimerListener,
    C: Clock,
    F: FrameScheduler,
{
    match control {
        Control::Toggle => match timer.state() {
            TimerState::Running => timer.pause(),
            TimerState::Paused => timer.resume(),
            TimerState::Stopped => timer.start(preset),
        },
        Control::Reset => timer.reset(),
        Control::Quit => return false,
    }
    true
}
