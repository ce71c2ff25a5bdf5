//! Application session: the loaded presets and the current selection.
//!
//! Owned by whichever front end drives the timer. The timer engine never
//! sees it; it is handed a single `Preset` at start.

use crate::store::PresetStore;
use crate::{Error, Preset, Result};

#[derive(Clone, Debug, Default)]
pub struct Session {
    presets: Vec<Preset>,
    current_preset_id: Option<String>,
}

impl Session {
    pub fn new(presets: Vec<Preset>) -> Self {
        Self {
            presets,
            current_preset_id: None,
        }
    }

    /// Build a session from whatever the store currently holds
    pub fn load(store: &impl PresetStore) -> Result<Self> {
        Ok(Self::new(store.load()?))
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn find(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn select(&mut self, id: &str) -> Result<&Preset> {
        let preset = self
            .presets
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::PresetNotFound(id.to_string()))?;
        self.current_preset_id = Some(preset.id.clone());
        Ok(preset)
    }

    pub fn current_preset(&self) -> Option<&Preset> {
        self.current_preset_id.as_deref().and_then(|id| self.find(id))
    }

    /// Swap in a fresh preset list, e.g. after a store mutation.
    ///
    /// The selection is kept only if its preset still exists.
    pub fn replace_presets(&mut self, presets: Vec<Preset>) {
        self.presets = presets;
        let still_present = self
            .current_preset_id
            .as_deref()
            .map_or(true, |id| self.find(id).is_some());
        if !still_present {
            self.current_preset_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::default_presets;
    use crate::store::JsonPresetStore;

    #[test]
    fn test_select_and_current() {
        let mut session = Session::new(default_presets().to_vec());
        assert!(session.current_preset().is_none());

        let selected = session.select("preset-2").unwrap();
        assert_eq!(selected.name, "Pomodoro 25/5");
        assert_eq!(session.current_preset().unwrap().id, "preset-2");
    }

    #[test]
    fn test_select_unknown_keeps_previous() {
        let mut session = Session::new(default_presets().to_vec());
        session.select("preset-1").unwrap();

        assert!(matches!(session.select("missing"), Err(Error::PresetNotFound(_))));
        assert_eq!(session.current_preset().unwrap().id, "preset-1");
    }

    #[test]
    fn test_replace_drops_deleted_selection() {
        let mut session = Session::new(default_presets().to_vec());
        session.select("preset-1").unwrap();

        let remaining: Vec<Preset> = session
            .presets()
            .iter()
            .filter(|p| p.id != "preset-1")
            .cloned()
            .collect();
        session.replace_presets(remaining);

        assert!(session.current_preset().is_none());
        assert_eq!(session.presets().len(), 1);
    }

    #[test]
    fn test_load_from_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonPresetStore::new(temp_dir.path().join("presets.json"));

        let session = Session::load(&store).unwrap();
        assert_eq!(session.presets().len(), 2);
    }
}
