//! Named parameter presets.
//!
//! A preset is a snapshot of one cue's parameters, tagged with its kind.
//! Applying a preset to a cue of another kind is a type error that leaves
//! the cue untouched. Presets import and export as JSON, item by item, so
//! one bad entry never poisons a whole file.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entities::{Cue, CueKind, Params};
use crate::error::CueError;

/// A saved parameter snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub kind: CueKind,
    pub params: Params,
}

/// Per-item outcome of an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<String>,
    /// (preset name, reason)
    pub failed: Vec<(String, String)>,
}

/// Name-keyed preset store, insertion-ordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetStore {
    presets: IndexMap<String, Preset>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `cue`'s parameters under `name`. Without `overwrite`, an
    /// existing name is an error.
    pub fn save(&mut self, name: &str, cue: &Cue, overwrite: bool) -> Result<(), CueError> {
        if name.trim().is_empty() {
            return Err(CueError::Validation("empty preset name".into()));
        }
        if !overwrite && self.presets.contains_key(name) {
            return Err(CueError::NameTaken(name.to_string()));
        }
        self.presets.insert(
            name.to_string(),
            Preset {
                name: name.to_string(),
                kind: cue.kind,
                params: cue.params().clone(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    pub fn delete(&mut self, name: &str) -> Result<Preset, CueError> {
        self.presets
            .shift_remove(name)
            .ok_or_else(|| CueError::NoSuchPreset(name.to_string()))
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), CueError> {
        if to.trim().is_empty() {
            return Err(CueError::Validation("empty preset name".into()));
        }
        if from == to {
            return Ok(());
        }
        if self.presets.contains_key(to) {
            return Err(CueError::NameTaken(to.to_string()));
        }
        let mut preset = self.delete(from)?;
        preset.name = to.to_string();
        self.presets.insert(to.to_string(), preset);
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Apply a preset onto a cue of the same kind. Every parameter is
    /// schema-checked; on any failure the cue keeps its previous values.
    pub fn apply_to(&self, name: &str, cue: &mut Cue) -> Result<(), CueError> {
        let preset = self
            .get(name)
            .ok_or_else(|| CueError::NoSuchPreset(name.to_string()))?;
        if preset.kind != cue.kind {
            return Err(CueError::TypeMismatch {
                preset: preset.kind.name().to_string(),
                cue: cue.kind.name().to_string(),
            });
        }
        cue.kind.schema().validate(&preset.params)?;
        for (key, value) in preset.params.iter() {
            cue.set_param(key, value.clone())?;
        }
        Ok(())
    }

    // === Import / export ===

    pub fn export_json(&self) -> Result<String, CueError> {
        let presets: Vec<&Preset> = self.presets.values().collect();
        serde_json::to_string_pretty(&presets)
            .map_err(|e| CueError::ImportExport(format!("serialize presets: {e}")))
    }

    /// Import presets from JSON produced by [`export_json`]. Each item is
    /// validated independently; failures are reported, not fatal. Existing
    /// names are kept (collisions fail the incoming item).
    ///
    /// [`export_json`]: PresetStore::export_json
    pub fn import_json(&mut self, json: &str) -> Result<ImportReport, CueError> {
        let items: Vec<serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| CueError::ImportExport(format!("parse presets: {e}")))?;

        let mut report = ImportReport::default();
        for item in items {
            let name = item
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("<unnamed>")
                .to_string();
            let preset: Preset = match serde_json::from_value(item) {
                Ok(p) => p,
                Err(e) => {
                    report.failed.push((name, e.to_string()));
                    continue;
                }
            };
            if let Err(e) = preset.kind.schema().validate(&preset.params) {
                report.failed.push((preset.name, e.to_string()));
                continue;
            }
            if self.presets.contains_key(&preset.name) {
                report
                    .failed
                    .push((preset.name, "name already taken".to_string()));
                continue;
            }
            report.imported.push(preset.name.clone());
            self.presets.insert(preset.name.clone(), preset);
        }
        log::info!(
            "preset import: {} ok, {} failed",
            report.imported.len(),
            report.failed.len()
        );
        Ok(report)
    }

    pub fn to_file(&self, path: &Path) -> Result<(), CueError> {
        let json = self.export_json()?;
        std::fs::write(path, json)
            .map_err(|e| CueError::ImportExport(format!("write {}: {e}", path.display())))
    }

    pub fn import_file(&mut self, path: &Path) -> Result<ImportReport, CueError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CueError::ImportExport(format!("read {}: {e}", path.display())))?;
        self.import_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::keys::*;
    use crate::entities::ParamValue;

    fn media_cue() -> Cue {
        let mut cue = Cue::new(CueKind::Media, "song");
        cue.set_param(P_VOLUME, ParamValue::Float(0.7)).unwrap();
        cue.set_param(P_DURATION, ParamValue::Float(180.0)).unwrap();
        cue
    }

    #[test]
    fn test_save_and_apply() {
        let mut store = PresetStore::new();
        store.save("quiet", &media_cue(), false).unwrap();

        let mut other = Cue::new(CueKind::Media, "other");
        store.apply_to("quiet", &mut other).unwrap();
        assert_eq!(other.params().get_float(P_VOLUME), Some(0.7));
        assert_eq!(other.params().get_float(P_DURATION), Some(180.0));
    }

    #[test]
    fn test_save_name_collision() {
        let mut store = PresetStore::new();
        store.save("p", &media_cue(), false).unwrap();
        assert!(matches!(
            store.save("p", &media_cue(), false),
            Err(CueError::NameTaken(_))
        ));
        store.save("p", &media_cue(), true).unwrap();
    }

    #[test]
    fn test_type_mismatch_leaves_cue_untouched() {
        let mut store = PresetStore::new();
        store.save("quiet", &media_cue(), false).unwrap();

        let mut cmd = Cue::new(CueKind::Command, "run");
        cmd.set_param(P_COMMAND, ParamValue::Str("echo hi".into()))
            .unwrap();
        let before = cmd.params().clone();

        let err = store.apply_to("quiet", &mut cmd).unwrap_err();
        assert!(matches!(err, CueError::TypeMismatch { .. }));
        assert_eq!(cmd.params(), &before);
    }

    #[test]
    fn test_rename_and_delete() {
        let mut store = PresetStore::new();
        store.save("a", &media_cue(), false).unwrap();
        store.save("b", &media_cue(), false).unwrap();

        assert!(matches!(
            store.rename("a", "b"),
            Err(CueError::NameTaken(_))
        ));
        store.rename("a", "c").unwrap();
        assert!(store.get("a").is_none());
        assert_eq!(store.get("c").map(|p| p.name.as_str()), Some("c"));

        store.delete("b").unwrap();
        assert!(matches!(store.delete("b"), Err(CueError::NoSuchPreset(_))));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut store = PresetStore::new();
        store.save("one", &media_cue(), false).unwrap();
        store
            .save("two", &Cue::new(CueKind::Osc, "lights"), false)
            .unwrap();

        let json = store.export_json().unwrap();
        let mut other = PresetStore::new();
        let report = other.import_json(&json).unwrap();
        assert_eq!(report.imported, vec!["one".to_string(), "two".to_string()]);
        assert!(report.failed.is_empty());
        assert_eq!(other.get("one"), store.get("one"));
    }

    #[test]
    fn test_import_partial_failure() {
        let mut store = PresetStore::new();
        store.save("keep", &media_cue(), false).unwrap();

        // One collision, one unknown kind, one good.
        let json = r#"[
            {"name": "keep", "kind": "Media", "params": {"map": {}}},
            {"name": "bad", "kind": "Warp", "params": {"map": {}}},
            {"name": "good", "kind": "StopAll", "params": {"map": {}}}
        ]"#;
        let report = store.import_json(json).unwrap();
        assert_eq!(report.imported, vec!["good".to_string()]);
        assert_eq!(report.failed.len(), 2);
        // The original survived the collision.
        assert_eq!(store.get("keep").map(|p| p.kind), Some(CueKind::Media));
    }

    #[test]
    fn test_import_garbage_is_fatal() {
        let mut store = PresetStore::new();
        assert!(matches!(
            store.import_json("not json at all"),
            Err(CueError::ImportExport(_))
        ));
    }
}
