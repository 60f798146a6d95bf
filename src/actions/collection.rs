//! Collection cue: fan a batch of commands out to other cues.
//!
//! Entries run in order on the control thread; a failing entry is reported
//! as an observer error event and the rest of the batch still runs. Entries
//! pointing at the collection itself are skipped.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Action, CueCommand, Outcome};
use crate::core::events::CueEvent;
use crate::core::executor::Executor;
use crate::entities::keys::*;
use crate::error::CueError;

/// One (target, command) pair in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub cue: Uuid,
    pub action: CueCommand,
}

pub struct CollectionAction;

impl Action for CollectionAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        let entries: Vec<CollectionEntry> = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
            cue.params()
                .get_json(P_ENTRIES)
                .ok_or_else(|| CueError::Validation("malformed collection entries".into()))?
        };

        for entry in entries {
            if entry.cue == cue_id {
                log::warn!("collection {cue_id} skips self-entry");
                continue;
            }
            if let Err(e) = exec.delegate(entry.cue, entry.action) {
                exec.notifier().emit(CueEvent::Error {
                    cue_id: entry.cue,
                    message: e.to_string(),
                });
            }
        }
        Ok(Outcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serde() {
        let entry = CollectionEntry {
            cue: Uuid::new_v4(),
            action: CueCommand::Stop,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"stop\""));
        let back: CollectionEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
