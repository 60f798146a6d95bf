//! MIDI cue: send raw messages to a named destination.

use uuid::Uuid;

use super::{Action, Outcome};
use crate::core::executor::Executor;
use crate::entities::keys::*;
use crate::error::CueError;
use crate::transport::MidiMessage;

pub struct MidiAction;

impl Action for MidiAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        let (destination, messages) = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
            let destination = cue
                .params()
                .get_str(P_DESTINATION)
                .unwrap_or_default()
                .to_string();
            let messages: Vec<Vec<u8>> = cue
                .params()
                .get_json(P_BYTES)
                .ok_or_else(|| CueError::Validation("malformed midi byte list".into()))?;
            (destination, messages)
        };

        for bytes in messages {
            let msg = MidiMessage { bytes };
            if let Err(e) = exec.midi().send(&destination, &msg) {
                log::warn!("midi send to {destination} failed: {e}");
            }
        }
        Ok(Outcome::Done)
    }
}
