//! Built-in presets seeded into an empty store.

use crate::types::{Preset, SetSpec};
use once_cell::sync::Lazy;

/// Cached default presets - built once and reused
static DEFAULT_PRESETS: Lazy<Vec<Preset>> = Lazy::new(build_default_presets);

/// Get a reference to the cached default presets
pub fn default_presets() -> &'static [Preset] {
    &DEFAULT_PRESETS
}

fn build_default_presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "preset-1".into(),
            name: "HIIT 20/10".into(),
            sets: vec![SetSpec::work(20), SetSpec::rest(10)],
            repetitions: 8,
            break_duration: 0,
        },
        Preset {
            id: "preset-2".into(),
            name: "Pomodoro 25/5".into(),
            sets: vec![SetSpec::work(25 * 60), SetSpec::rest(5 * 60)],
            repetitions: 4,
            break_duration: 30 * 60,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let presets = default_presets();
        assert_eq!(presets.len(), 2);
        for preset in presets {
            assert!(preset.validate().is_ok(), "{} should validate", preset.name);
        }
    }

    #[test]
    fn test_default_contents() {
        let presets = default_presets();
        assert_eq!(presets[0].name, "HIIT 20/10");
        assert_eq!(presets[0].total_duration_secs(), 240);
        assert_eq!(presets[1].id, "preset-2");
        assert_eq!(presets[1].break_duration, 1800);
    }
}
