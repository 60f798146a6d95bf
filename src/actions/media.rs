//! Media playback cue.
//!
//! The engine models playback as a linear fade of the position parameter
//! toward the media duration in real time. Actual audio/video rendering is
//! a host concern; hosts observe the position value and the state machine.

use std::time::Duration;
use uuid::Uuid;

use super::{Action, Outcome};
use crate::core::curve::FadeCurve;
use crate::core::executor::Executor;
use crate::entities::keys::*;
use crate::entities::ParamValue;
use crate::error::CueError;

pub struct MediaAction;

impl Action for MediaAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        start_playback(exec, cue_id)
    }

    fn supports_pause(&self) -> bool {
        true
    }
}

/// Begin (or restart) the position ramp for a media cue. Triggering at or
/// past the end restarts from the top.
pub(crate) fn start_playback(exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
    let (duration, mut position) = {
        let cues = exec.cues().read().expect("cue list lock poisoned");
        let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
        (
            cue.params().get_float_or(P_DURATION, 0.0),
            cue.params().get_float_or(P_POSITION, 0.0),
        )
    };

    if duration <= 0.0 {
        return Ok(Outcome::Done);
    }

    // At or past the end: restart from the top.
    if position >= duration {
        position = 0.0;
        let mut cues = exec.cues().write().expect("cue list lock poisoned");
        if let Some(cue) = cues.get_mut(cue_id) {
            cue.set_param_raw(P_POSITION, ParamValue::Float(0.0));
        }
    }

    let remaining = duration - position;
    exec.start_fade(
        cue_id,
        cue_id,
        P_POSITION,
        position,
        duration,
        Duration::from_secs_f64(remaining),
        FadeCurve::Linear,
    );
    Ok(Outcome::InFlight)
}

/// Hand the position back to playback after a seek. Unlike a trigger, a
/// seek that lands at or past the end completes playback instead of
/// restarting it.
pub(crate) fn resume_playback(exec: &mut Executor, cue_id: Uuid) -> Result<(), CueError> {
    let (duration, position) = {
        let cues = exec.cues().read().expect("cue list lock poisoned");
        let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
        (
            cue.params().get_float_or(P_DURATION, 0.0),
            cue.params().get_float_or(P_POSITION, 0.0),
        )
    };
    if duration <= 0.0 || position >= duration {
        exec.settle(cue_id);
        return Ok(());
    }
    exec.start_fade(
        cue_id,
        cue_id,
        P_POSITION,
        position,
        duration,
        Duration::from_secs_f64(duration - position),
        FadeCurve::Linear,
    );
    Ok(())
}
