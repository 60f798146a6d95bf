//! Seek cue: jump or glide another cue's playback position.
//!
//! Target times are clamped to the target's media duration. A seek on a
//! running media cue hands playback back to the position ramp once it lands.

use std::time::Duration;
use uuid::Uuid;

use super::{media, Action, Outcome};
use crate::core::curve::FadeCurve;
use crate::core::executor::Executor;
use crate::entities::keys::*;
use crate::entities::{CueState, ParamValue};
use crate::error::CueError;

pub struct SeekAction;

impl Action for SeekAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        let (target, time, duration, curve) = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
            let target = cue
                .params()
                .get_uuid(P_TARGET)
                .filter(|t| !t.is_nil())
                .ok_or(CueError::NoTargetSelected)?;
            let time = cue.params().get_float_or(P_TARGET_TIME, 0.0);
            let duration = cue.params().get_float_or(P_FADE_DURATION, 0.0);
            let curve =
                FadeCurve::from_name(cue.params().get_str(P_FADE_CURVE).unwrap_or("Linear"))?;
            (target, time, duration, curve)
        };

        let (from, media_len, target_running) = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            let target_cue = cues.get(target).ok_or(CueError::NoSuchCue(target))?;
            let from = target_cue.params().get_float(P_POSITION).ok_or_else(|| {
                CueError::Validation(format!("seek target '{}' has no position", target_cue.name))
            })?;
            let media_len = target_cue.params().get_float_or(P_DURATION, 0.0);
            (from, media_len, target_cue.state() == CueState::Running)
        };
        let to = time.clamp(0.0, media_len.max(0.0));

        if duration <= 0.0 {
            exec.fade().cancel(target, P_POSITION);
            {
                let mut cues = exec.cues().write().expect("cue list lock poisoned");
                if let Some(cue) = cues.get_mut(target) {
                    cue.set_param_raw(P_POSITION, ParamValue::Float(to));
                }
            }
            if target_running {
                media::resume_playback(exec, target)?;
            }
            return Ok(Outcome::Done);
        }

        // The glide takes over the position key; on FadeFinished the executor
        // restarts playback if the target is still running.
        exec.start_fade(
            cue_id,
            target,
            P_POSITION,
            from,
            to,
            Duration::from_secs_f64(duration),
            curve,
        );
        Ok(Outcome::InFlight)
    }

    fn supports_pause(&self) -> bool {
        true
    }
}
