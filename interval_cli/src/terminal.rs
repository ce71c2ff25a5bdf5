//! Terminal rendering and audible cues for a running timer.

use interval_core::{format_clock, DisplayState, Step, TimerListener};
use std::io::{self, Write};

const BAR_WIDTH: usize = 20;
const BELL: &str = "\x07";

/// Renders timer notifications as a single, redrawn status line
pub struct TerminalDisplay<W: Write> {
    out: W,
    bell: bool,
    last_line: Option<String>,
    step_changes: usize,
    completed: bool,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout(bell: bool) -> Self {
        Self::new(io::stdout(), bell)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, bell: bool) -> Self {
        Self {
            out,
            bell,
            last_line: None,
            step_changes: 0,
            completed: false,
        }
    }

    pub fn step_changes(&self) -> usize {
        self.step_changes
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Print `message` on its own line below the status line
    pub fn notice(&mut self, message: &str) {
        let _ = write!(self.out, "\n{}\n", message);
        let _ = self.out.flush();
        self.last_line = None;
    }

    fn cue(&mut self) {
        if self.bell {
            let _ = self.out.write_all(BELL.as_bytes());
        }
    }
}

/// One status line, e.g. `WORK        0:18  Set 1/8     [####----------------]`
pub fn render_line(state: &DisplayState) -> String {
    format!(
        "{:<10} {:>6}  {:<10}  {}",
        state.step_kind.label().to_uppercase(),
        format_clock(state.time_remaining),
        state.rep_label(),
        progress_bar(state.progress)
    )
}

fn progress_bar(progress: f64) -> String {
    let filled = (progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

impl<W: Write> TimerListener for TerminalDisplay<W> {
    fn on_tick(&mut self, state: &DisplayState) {
        let line = render_line(state);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return;
        }
        // Display failures only stall the display, never the timer.
        let _ = write!(self.out, "\r{}", line);
        let _ = self.out.flush();
        self.last_line = Some(line);
    }

    fn on_step_change(&mut self, step: &Step) {
        self.step_changes += 1;
        self.cue();
        let _ = writeln!(self.out);
        self.last_line = None;
        tracing::debug!("Cue for {:?} step", step.kind);
    }

    fn on_complete(&mut self) {
        self.cue();
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{:<10} {:>6}", "DONE", format_clock(0));
        let _ = writeln!(self.out, "\n✓ Workout complete!");
        let _ = self.out.flush();
        self.last_line = None;
        self.completed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interval_core::StepKind;

    fn state(kind: StepKind, time_remaining: i64, progress: f64) -> DisplayState {
        DisplayState {
            step_kind: kind,
            time_remaining,
            rep_index: 1,
            total_reps: 8,
            progress,
        }
    }

    #[test]
    fn test_render_line() {
        let line = render_line(&state(StepKind::Work, 18, 0.5));
        assert!(line.starts_with("WORK"));
        assert!(line.contains("0:18"));
        assert!(line.contains("Set 1/8"));
        assert!(line.contains("[##########----------]"));
    }

    #[test]
    fn test_long_break_line() {
        let line = render_line(&state(StepKind::LongBreak, 90, 0.0));
        assert!(line.starts_with("LONG BREAK"));
        assert!(line.contains("1:30"));
        assert!(line.contains("Long Break"));
    }

    #[test]
    fn test_unchanged_line_not_redrawn() {
        let mut display = TerminalDisplay::new(Vec::new(), false);
        display.on_tick(&state(StepKind::Work, 5, 0.1));
        display.on_tick(&state(StepKind::Work, 5, 0.1));

        let out = String::from_utf8(display.out.clone()).unwrap();
        assert_eq!(out.matches('\r').count(), 1);
    }

    #[test]
    fn test_bell_on_cues_only_when_enabled() {
        let step = Step {
            kind: StepKind::Rest,
            duration: 10,
            rep_index: 1,
            total_rep_duration: 30,
            total_reps: 8,
        };

        let mut quiet = TerminalDisplay::new(Vec::new(), false);
        quiet.on_step_change(&step);
        quiet.on_complete();
        assert!(!String::from_utf8(quiet.out.clone()).unwrap().contains(BELL));

        let mut loud = TerminalDisplay::new(Vec::new(), true);
        loud.on_step_change(&step);
        loud.on_complete();
        let out = String::from_utf8(loud.out.clone()).unwrap();
        assert_eq!(out.matches(BELL).count(), 2);
        assert!(out.contains("Workout complete"));
        assert_eq!(loud.step_changes(), 1);
        assert!(loud.is_complete());
    }

    #[test]
    fn test_notice_forces_redraw() {
        let mut display = TerminalDisplay::new(Vec::new(), false);
        display.on_tick(&state(StepKind::Work, 5, 0.1));
        display.notice("⏸ Paused");
        display.on_tick(&state(StepKind::Work, 5, 0.1));

        let out = String::from_utf8(display.out.clone()).unwrap();
        assert!(out.contains("\n⏸ Paused\n"));
        assert_eq!(out.matches('\r').count(), 2);
        assert!(!display.is_complete());
    }
}
