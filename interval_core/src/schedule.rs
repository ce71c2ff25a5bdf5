//! Schedule builder: expands a preset into a flat list of steps.

use crate::{Preset, Step, StepKind};
use serde::{Deserialize, Serialize};

/// Ordered, flattened steps for one run of a preset
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    pub steps: Vec<Step>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.steps
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration))
    }

    /// Milliseconds left in the repetition that owns step `index`, given
    /// `remaining_in_step_ms` left in that step.
    ///
    /// Only the contiguous run of following steps with the same repetition
    /// index counts. A long break is its own repetition.
    pub fn remaining_in_rep_ms(&self, index: usize, remaining_in_step_ms: i64) -> i64 {
        let Some(current) = self.steps.get(index) else {
            return 0;
        };
        if current.is_long_break() {
            return remaining_in_step_ms;
        }

        let ahead = self.steps[index + 1..]
            .iter()
            .take_while(|s| s.rep_index == current.rep_index && !s.is_long_break())
            .fold(0i64, |acc, s| acc.saturating_add(s.duration_ms()));
        remaining_in_step_ms.saturating_add(ahead)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Expand a preset into its schedule
///
/// Produces `repetitions` copies of the preset's sets, each tagged with its
/// 1-based repetition index, followed by a single long break step when
/// `break_duration > 0`. Presets are not validated here: empty `sets` give
/// a schedule with no work at all.
pub fn build_schedule(preset: &Preset) -> Schedule {
    let rep_duration = preset
        .sets
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.duration));
    let mut steps =
        Vec::with_capacity(preset.sets.len() * preset.repetitions as usize + 1);

    for rep_index in 1..=preset.repetitions {
        steps.extend(preset.sets.iter().map(|set| Step {
            kind: set.kind.into(),
            duration: set.duration,
            rep_index,
            total_rep_duration: rep_duration,
            total_reps: preset.repetitions,
        }));
    }

    if preset.break_duration > 0 {
        steps.push(Step {
            kind: StepKind::LongBreak,
            duration: preset.break_duration,
            rep_index: preset.repetitions,
            total_rep_duration: preset.break_duration,
            total_reps: preset.repetitions,
        });
    }

    Schedule { steps }
}
