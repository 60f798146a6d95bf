//! Volume control cue: set or fade another cue's volume.

use std::time::Duration;
use uuid::Uuid;

use super::{Action, Outcome};
use crate::core::curve::FadeCurve;
use crate::core::executor::Executor;
use crate::entities::keys::*;
use crate::entities::ParamValue;
use crate::error::CueError;

pub struct VolumeAction;

impl Action for VolumeAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        let (target, to, duration, curve) = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
            let target = cue
                .params()
                .get_uuid(P_TARGET)
                .filter(|t| !t.is_nil())
                .ok_or(CueError::NoTargetSelected)?;
            let to = cue.params().get_float_or(P_TARGET_VOLUME, 0.0);
            let duration = cue.params().get_float_or(P_FADE_DURATION, 0.0);
            let curve =
                FadeCurve::from_name(cue.params().get_str(P_FADE_CURVE).unwrap_or("Linear"))?;
            (target, to, duration, curve)
        };

        let from = {
            let cues = exec.cues().read().expect("cue list lock poisoned");
            let target_cue = cues
                .get(target)
                .ok_or_else(|| CueError::VolumeControl(format!("target {target} not found")))?;
            target_cue.params().get_float(P_VOLUME).ok_or_else(|| {
                CueError::VolumeControl(format!(
                    "target '{}' has no volume",
                    target_cue.name
                ))
            })?
        };

        if duration <= 0.0 {
            exec.fade().cancel(target, P_VOLUME);
            let mut cues = exec.cues().write().expect("cue list lock poisoned");
            if let Some(cue) = cues.get_mut(target) {
                cue.set_param_raw(P_VOLUME, ParamValue::Float(to));
            }
            return Ok(Outcome::Done);
        }

        exec.start_fade(
            cue_id,
            target,
            P_VOLUME,
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
