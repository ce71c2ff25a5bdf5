//! Preset persistence with file locking.
//!
//! Presets are kept as a single JSON array. Reads take a shared lock, writes
//! go through a locked temp file that is renamed over the original.

use crate::presets::default_presets;
use crate::{Error, Preset, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Preset source and sink
///
/// Every mutator returns the full list as it stands afterwards.
pub trait PresetStore {
    /// Load all presets, seeding the defaults when there are none yet.
    fn load(&self) -> Result<Vec<Preset>>;

    /// Replace the stored presets.
    fn save(&self, presets: &[Preset]) -> Result<()>;

    fn add(&self, preset: Preset) -> Result<Vec<Preset>> {
        preset.validate()?;
        let mut presets = self.load()?;
        presets.push(preset);
        self.save(&presets)?;
        Ok(presets)
    }

    /// Replace the preset with the same id. Unknown ids leave the list untouched.
    fn update(&self, preset: Preset) -> Result<Vec<Preset>> {
        preset.validate()?;
        let mut presets = self.load()?;
        match presets.iter_mut().find(|p| p.id == preset.id) {
            Some(slot) => {
                *slot = preset;
                self.save(&presets)?;
            }
            None => tracing::warn!("No preset with id {} to update", preset.id),
        }
        Ok(presets)
    }

    fn delete(&self, id: &str) -> Result<Vec<Preset>> {
        let mut presets = self.load()?;
        presets.retain(|p| p.id != id);
        self.save(&presets)?;
        Ok(presets)
    }

    fn get(&self, id: &str) -> Result<Preset> {
        self.load()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::PresetNotFound(id.to_string()))
    }
}

/// JSON file backed preset store
pub struct JsonPresetStore {
    path: PathBuf,
}

impl JsonPresetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_locked(&self) -> std::io::Result<String> {
        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();
        read.map(|_| contents)
    }
}

impl PresetStore for JsonPresetStore {
    /// Returns the defaults (and writes them) if the file doesn't exist.
    /// If the file is unreadable or corrupted, logs a warning and returns the
    /// defaults without touching the file.
    fn load(&self) -> Result<Vec<Preset>> {
        if !self.path.exists() {
            tracing::info!("No presets at {:?}, seeding defaults", self.path);
            let presets = default_presets().to_vec();
            self.save(&presets)?;
            return Ok(presets);
        }

        let contents = match self.read_locked() {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    "Unable to read presets {:?}: {}. Using defaults.",
                    self.path,
                    e
                );
                return Ok(default_presets().to_vec());
            }
        };

        match serde_json::from_str::<Vec<Preset>>(&contents) {
            Ok(presets) => {
                tracing::debug!("Loaded {} presets from {:?}", presets.len(), self.path);
                Ok(presets)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse presets {:?}: {}. Using defaults.",
                    self.path,
                    e
                );
                Ok(default_presets().to_vec())
            }
        }
    }

    fn save(&self, presets: &[Preset]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, presets)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} presets to {:?}", presets.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetSpec;

    fn store_in(dir: &tempfile::TempDir) -> JsonPresetStore {
        JsonPresetStore::new(dir.path().join("presets.json"))
    }

    fn custom(id: &str, name: &str) -> Preset {
        Preset {
            id: id.into(),
            name: name.into(),
            sets: vec![SetSpec::work(45), SetSpec::rest(15)],
            repetitions: 3,
            break_duration: 0,
        }
    }

    #[test]
    fn test_seeds_defaults_when_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);

        let presets = store.load().unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].name, "HIIT 20/10");
        assert!(store.path().exists());
    }

    #[test]
    fn test_loads_existing_presets() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(
            store.path(),
            r#"[{"id":"p1","name":"Test Preset","sets":[],"repetitions":1,"break_duration":0}]"#,
        )
        .unwrap();

        let presets = store.load().unwrap();
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].name, "Test Preset");
    }

    #[test]
    fn test_add_preset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);

        let presets = store.add(custom("p3", "New Preset")).unwrap();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[2].id, "p3");

        let on_disk: Vec<Preset> =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 3);
    }

    #[test]
    fn test_add_rejects_invalid_preset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);

        let mut preset = custom("p3", "Broken");
        preset.sets.clear();
        assert!(matches!(store.add(preset), Err(Error::InvalidPreset(_))));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_existing_preset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);

        let presets = store.update(custom("preset-1", "Updated HIIT")).unwrap();
        assert_eq!(
            presets.iter().find(|p| p.id == "preset-1").unwrap().name,
            "Updated HIIT"
        );
        assert_eq!(store.get("preset-1").unwrap().name, "Updated HIIT");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);

        let presets = store.update(custom("nope", "Ghost")).unwrap();
        assert_eq!(presets.len(), 2);
        assert!(presets.iter().all(|p| p.id != "nope"));
    }

    #[test]
    fn test_delete_preset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);

        let presets = store.delete("preset-1").unwrap();
        assert_eq!(presets.len(), 1);
        assert!(presets.iter().all(|p| p.id != "preset-1"));
        assert!(matches!(store.get("preset-1"), Err(Error::PresetNotFound(_))));
    }

    #[test]
    fn test_corrupted_file_returns_defaults_without_overwriting() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(store.path(), "{ invalid json }").unwrap();

        let presets = store.load().unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "{ invalid json }"
        );
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = store_in(&temp_dir);
        store.save(default_presets()).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "presets.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only presets.json, found extras: {:?}",
            extras
        );
    }
}
