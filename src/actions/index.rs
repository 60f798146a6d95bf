//! Index-jump cue: apply a command to the cue at a list position.
//!
//! The position is either an absolute 0-based index or an offset relative to
//! this cue's own position. Targeting itself is rejected to keep delegation
//! from recursing.

use uuid::Uuid;

use super::{Action, CueCommand, Outcome};
use crate::core::executor::Executor;
use crate::entities::keys::*;
use crate::error::CueError;

pub struct IndexAction;

impl Action for IndexAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        let (resolved, command) = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
            let offset = cue.params().get_int_or(P_TARGET_INDEX, 0);
            let relative = cue.params().get_bool_or(P_RELATIVE, false);
            let command =
                CueCommand::from_name(cue.params().get_str(P_ACTION).unwrap_or("trigger"))?;

            let own_pos = cues.position(cue_id).ok_or(CueError::NoSuchCue(cue_id))? as i64;
            let len = cues.len();
            let index = if relative {
                own_pos
                    .checked_add(offset)
                    .ok_or(CueError::IndexOutOfRange { index: offset, len })?
            } else {
                offset
            };
            if index < 0 || index as usize >= len {
                return Err(CueError::IndexOutOfRange { index, len });
            }
            let resolved = cues
                .by_index(index as usize)
                .map(|c| c.id)
                .ok_or(CueError::IndexOutOfRange { index, len })?;
            (resolved, command)
        };

        if resolved == cue_id {
            return Err(CueError::Validation(
                "index action resolves to itself".into(),
            ));
        }

        exec.delegate(resolved, command)?;
        Ok(Outcome::Done)
    }
}
