//! Command cue: run a shell command as a supervised subprocess.

use uuid::Uuid;

use super::{Action, Outcome};
use crate::core::executor::Executor;
use crate::entities::keys::*;
use crate::error::CueError;

pub struct CommandAction;

impl Action for CommandAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        let (command, discard) = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
            let command = cue
                .params()
                .get_str(P_COMMAND)
                .unwrap_or_default()
                .to_string();
            let discard = cue.params().get_bool_or(P_DISCARD_OUTPUT, false);
            (command, discard)
        };
        if command.trim().is_empty() {
            return Err(CueError::Validation("empty command line".into()));
        }
        exec.procs().spawn(cue_id, &command, discard)?;
        Ok(Outcome::InFlight)
    }
}
