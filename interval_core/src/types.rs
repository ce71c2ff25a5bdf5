//! Core domain types for the interval timer.
//!
//! This module defines the fundamental types used throughout the system:
//! - Presets and the sets they repeat
//! - Scheduled steps produced from a preset
//! - Timer state

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Preset Types
// ============================================================================

/// Kind of a user-defined set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Work,
    Rest,
}

/// A single timed set within a preset (e.g., "work 20s")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetSpec {
    #[serde(rename = "type")]
    pub kind: SetKind,
    /// Duration in seconds.
    pub duration: u64,
}

impl SetSpec {
    pub fn work(duration: u64) -> Self {
        Self {
            kind: SetKind::Work,
            duration,
        }
    }

    pub fn rest(duration: u64) -> Self {
        Self {
            kind: SetKind::Rest,
            duration,
        }
    }
}

/// A named workout: `sets` repeated `repetitions` times, followed by an
/// optional long break.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub sets: Vec<SetSpec>,
    pub repetitions: u32,
    /// Trailing long break in seconds; 0 means none.
    #[serde(default)]
    pub break_duration: u64,
}

impl Preset {
    /// Generate a fresh preset identifier
    pub fn new_id() -> String {
        format!("preset-{}", uuid::Uuid::new_v4())
    }

    /// Total running time in seconds, including the long break
    pub fn total_duration_secs(&self) -> u64 {
        self.sets
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration))
            .saturating_mul(u64::from(self.repetitions))
            .saturating_add(self.break_duration)
    }

    /// Check the preset is runnable.
    ///
    /// The schedule builder and timer accept anything; callers are expected to
    /// reject presets here before storing or starting them.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidPreset("name must not be empty".into()));
        }
        if self.sets.is_empty() {
            return Err(Error::InvalidPreset(format!(
                "'{}' must have at least one set",
                self.name
            )));
        }
        if let Some(pos) = self.sets.iter().position(|s| s.duration == 0) {
            return Err(Error::InvalidPreset(format!(
                "set {} of '{}' has zero duration",
                pos + 1,
                self.name
            )));
        }
        if self.repetitions == 0 {
            return Err(Error::InvalidPreset(format!(
                "'{}' must repeat at least once",
                self.name
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Schedule Types
// ============================================================================

/// Kind of a scheduled step
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Work,
    Rest,
    LongBreak,
}

impl StepKind {
    /// Human readable name used by displays
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Work => "work",
            StepKind::Rest => "rest",
            StepKind::LongBreak => "long break",
        }
    }
}

impl From<SetKind> for StepKind {
    fn from(kind: SetKind) -> Self {
        match kind {
            SetKind::Work => StepKind::Work,
            SetKind::Rest => StepKind::Rest,
        }
    }
}

/// One concrete unit of a schedule
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    /// Duration in seconds.
    pub duration: u64,
    /// 1-based repetition this step belongs to.
    pub rep_index: u32,
    /// Sum of set durations in one repetition (the break's own duration for a long break).
    pub total_rep_duration: u64,
    pub total_reps: u32,
}

impl Step {
    /// Get step duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        secs_to_ms(self.duration)
    }

    pub fn is_long_break(&self) -> bool {
        self.kind == StepKind::LongBreak
    }
}

pub(crate) fn secs_to_ms(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
}

// ============================================================================
// Timer State
// ============================================================================

/// Lifecycle state of the timer engine
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hiit() -> Preset {
        Preset {
            id: "p".into(),
            name: "HIIT".into(),
            sets: vec![SetSpec::work(20), SetSpec::rest(10)],
            repetitions: 8,
            break_duration: 60,
        }
    }

    #[test]
    fn test_total_duration_includes_break() {
        assert_eq!(hiit().total_duration_secs(), 30 * 8 + 60);
    }

    #[test]
    fn test_total_duration_saturates() {
        let mut preset = hiit();
        preset.sets = vec![SetSpec::work(u64::MAX / 2)];
        preset.repetitions = 3;
        assert_eq!(preset.total_duration_secs(), u64::MAX);
    }

    #[test]
    fn test_validate_accepts_runnable_preset() {
        assert!(hiit().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_sets() {
        let mut preset = hiit();
        preset.sets.clear();
        assert!(matches!(preset.validate(), Err(Error::InvalidPreset(_))));
    }

    #[test]
    fn test_validate_rejects_zero_repetitions_and_durations() {
        let mut preset = hiit();
        preset.repetitions = 0;
        assert!(preset.validate().is_err());

        let mut preset = hiit();
        preset.sets[1].duration = 0;
        let err = preset.validate().unwrap_err();
        assert!(err.to_string().contains("set 2"));
    }

    #[test]
    fn test_preset_json_field_names() {
        let json = serde_json::to_value(hiit()).unwrap();
        assert_eq!(json["sets"][0]["type"], "work");
        assert_eq!(json["break_duration"], 60);

        let parsed: Preset = serde_json::from_str(
            r#"{"id":"x","name":"X","sets":[{"type":"rest","duration":5}],"repetitions":1}"#,
        )
        .unwrap();
        assert_eq!(parsed.sets[0].kind, SetKind::Rest);
        assert_eq!(parsed.break_duration, 0);
    }

    #[test]
    fn test_step_kind_labels() {
        assert_eq!(StepKind::LongBreak.label(), "long break");
        assert_eq!(StepKind::from(SetKind::Work), StepKind::Work);
    }
}
