//! Stop-all cue: the panic button. Stops every active cue except itself.

use uuid::Uuid;

use super::{Action, Outcome};
use crate::core::executor::Executor;
use crate::error::CueError;

pub struct StopAllAction;

impl Action for StopAllAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        let active: Vec<Uuid> = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            cues.iter()
                .filter(|c| c.id != cue_id && c.is_active())
                .map(|c| c.id)
                .collect()
        };
        for id in active {
            if let Err(e) = exec.stop(id) {
                log::warn!("stop-all: cue {id} failed to stop: {e}");
            }
        }
        Ok(Outcome::Done)
    }
}
