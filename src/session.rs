//! Session: the host-facing facade.
//!
//! Owns the cue list, the executor and the preset store, and exposes the
//! transport surface plus persistence. Hosts call `pump()` from their control
//! loop at whatever cadence suits them and read observer events from
//! `events()`.

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::clock::{Clock, SystemClock};
use crate::core::events::{CueEvent, EventSender};
use crate::core::executor::Executor;
use crate::entities::{Cue, CueKind, CueList, ParamValue, Params};
use crate::error::CueError;
use crate::presets::{ImportReport, PresetStore};
use crate::transport::{MidiSender, NullTransport, OscSender};

/// On-disk session shape.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    cues: CueList,
    #[serde(default)]
    presets: PresetStore,
}

pub struct Session {
    cues: Arc<RwLock<CueList>>,
    executor: Executor,
    presets: PresetStore,
    events_rx: Receiver<CueEvent>,
}

impl Session {
    /// Session with the wall clock and no wired transports.
    pub fn new() -> Self {
        let transport = Arc::new(NullTransport);
        Self::with_parts(transport.clone(), transport, Arc::new(SystemClock))
    }

    /// Session with explicit transports and clock.
    pub fn with_parts(
        osc: Arc<dyn OscSender>,
        midi: Arc<dyn MidiSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cues = Arc::new(RwLock::new(CueList::new()));
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let executor = Executor::new(
            cues.clone(),
            EventSender::new(events_tx),
            osc,
            midi,
            clock,
        );
        Self {
            cues,
            executor,
            presets: PresetStore::new(),
            events_rx,
        }
    }

    /// Observer event stream: state changes, subprocess output, errors.
    pub fn events(&self) -> &Receiver<CueEvent> {
        &self.events_rx
    }

    // === Cue list ===

    pub fn create_cue(&mut self, kind: CueKind, name: &str) -> Uuid {
        let cue = Cue::new(kind, name);
        let id = cue.id;
        let mut cues = self.cues.write().expect("cue list lock poisoned");
        // A fresh v4 id cannot collide.
        let _ = cues.insert(cue);
        id
    }

    pub fn add_cue(&mut self, cue: Cue) -> Result<Uuid, CueError> {
        cue.kind.schema().validate(cue.params())?;
        let id = cue.id;
        let mut cues = self.cues.write().expect("cue list lock poisoned");
        cues.insert(cue)?;
        Ok(id)
    }

    /// Remove a cue, stopping it first if active.
    pub fn remove_cue(&mut self, id: Uuid) -> Result<Cue, CueError> {
        self.executor.stop(id)?;
        let mut cues = self.cues.write().expect("cue list lock poisoned");
        cues.remove(id).ok_or(CueError::NoSuchCue(id))
    }

    pub fn set_cue_param(&mut self, id: Uuid, key: &str, value: ParamValue) -> Result<(), CueError> {
        let mut cues = self.cues.write().expect("cue list lock poisoned");
        let cue = cues.get_mut(id).ok_or(CueError::NoSuchCue(id))?;
        cue.set_param(key, value)
    }

    pub fn cue_params(&self, id: Uuid) -> Result<Params, CueError> {
        let cues = self.cues.read().expect("cue list lock poisoned");
        let cue = cues.get(id).ok_or(CueError::NoSuchCue(id))?;
        Ok(cue.params().clone())
    }

    pub fn cue_ids(&self) -> Vec<Uuid> {
        self.cues.read().expect("cue list lock poisoned").ids()
    }

    // === Transport ===

    pub fn trigger(&mut self, id: Uuid) -> Result<(), CueError> {
        self.executor.trigger(id)
    }

    pub fn pause(&mut self, id: Uuid) -> Result<(), CueError> {
        self.executor.pause(id)
    }

    pub fn resume(&mut self, id: Uuid) -> Result<(), CueError> {
        self.executor.resume(id)
    }

    pub fn stop(&mut self, id: Uuid) -> Result<(), CueError> {
        self.executor.stop(id)
    }

    pub fn stop_all(&mut self) {
        self.executor.stop_all();
    }

    pub fn pump(&mut self) {
        self.executor.pump();
    }

    pub fn pump_until_idle(&mut self, timeout: Duration) -> bool {
        self.executor.pump_until_idle(timeout)
    }

    // === Presets ===

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn presets_mut(&mut self) -> &mut PresetStore {
        &mut self.presets
    }

    pub fn save_preset(&mut self, name: &str, id: Uuid, overwrite: bool) -> Result<(), CueError> {
        let cues = self.cues.read().expect("cue list lock poisoned");
        let cue = cues.get(id).ok_or(CueError::NoSuchCue(id))?;
        self.presets.save(name, cue, overwrite)
    }

    pub fn apply_preset(&mut self, name: &str, id: Uuid) -> Result<(), CueError> {
        let mut cues = self.cues.write().expect("cue list lock poisoned");
        let cue = cues.get_mut(id).ok_or(CueError::NoSuchCue(id))?;
        self.presets.apply_to(name, cue)
    }

    pub fn import_presets(&mut self, path: &Path) -> Result<ImportReport, CueError> {
        self.presets.import_file(path)
    }

    pub fn export_presets(&self, path: &Path) -> Result<(), CueError> {
        self.presets.to_file(path)
    }

    // === Persistence ===

    pub fn save(&self, path: &Path) -> Result<(), CueError> {
        let file = {
            let cues = self.cues.read().expect("cue list lock poisoned");
            SessionFile {
                cues: cues.clone(),
                presets: self.presets.clone(),
            }
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| CueError::ImportExport(format!("serialize session: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| CueError::ImportExport(format!("write {}: {e}", path.display())))?;
        log::info!("session saved to {}", path.display());
        Ok(())
    }

    /// Load a session file, replacing the cue list and presets. Active cues
    /// are stopped first; every loaded cue starts Idle.
    pub fn load(&mut self, path: &Path) -> Result<(), CueError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CueError::ImportExport(format!("read {}: {e}", path.display())))?;
        let file: SessionFile = serde_json::from_str(&json)
            .map_err(|e| CueError::ImportExport(format!("parse {}: {e}", path.display())))?;
        for cue in file.cues.iter() {
            cue.kind.schema().validate(cue.params())?;
        }

        self.executor.stop_all();
        {
            let mut cues = self.cues.write().expect("cue list lock poisoned");
            *cues = file.cues;
        }
        self.presets = file.presets;
        log::info!("session loaded from {}", path.display());
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
