//! OSC cue: send a batch of messages, optionally ramping numeric arguments.
//!
//! A message definition carries its resting args plus an optional `fade_to`
//! vector. With a fade duration set, the cue starts a 0..1 level fade; each
//! tick re-sends every fading message with its numeric args interpolated
//! between the resting value and `fade_to`.

use std::time::Duration;
use uuid::Uuid;

use serde::{Deserialize, Serialize};

use super::{Action, Outcome};
use crate::core::curve::FadeCurve;
use crate::core::executor::Executor;
use crate::entities::keys::*;
use crate::error::CueError;
use crate::transport::{OscArg, OscMessage};

/// One configured OSC message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscMessageDef {
    pub path: String,
    #[serde(default)]
    pub args: Vec<OscArg>,
    /// End values for the numeric args, positional. None = send once, no ramp.
    #[serde(default)]
    pub fade_to: Option<Vec<f64>>,
}

pub struct OscAction;

impl Action for OscAction {
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError> {
        let (destination, defs, duration, curve) = read_config(exec, cue_id)?;

        let fading = duration > 0.0 && defs.iter().any(|d| d.fade_to.is_some());

        // Non-ramping messages always go out once, immediately.
        for def in &defs {
            if !fading || def.fade_to.is_none() {
                let msg = OscMessage {
                    path: def.path.clone(),
                    args: def.args.clone(),
                };
                if let Err(e) = exec.osc().send(&destination, &msg) {
                    log::warn!("osc send to {destination} failed: {e}");
                }
            }
        }

        if !fading {
            return Ok(Outcome::Done);
        }

        exec.start_fade(
            cue_id,
            cue_id,
            P_OSC_LEVEL,
            0.0,
            1.0,
            Duration::from_secs_f64(duration),
            curve,
        );
        Ok(Outcome::InFlight)
    }
}

/// Load and parse the cue's OSC configuration.
pub(crate) fn read_config(
    exec: &Executor,
    cue_id: Uuid,
) -> Result<(String, Vec<OscMessageDef>, f64, FadeCurve), CueError> {
    let cues = exec.cues().read().expect("cue list lock poisoned");
    let cue = cues.get(cue_id).ok_or(CueError::NoSuchCue(cue_id))?;
    let destination = cue
        .params()
        .get_str(P_DESTINATION)
        .unwrap_or_default()
        .to_string();
    let defs: Vec<OscMessageDef> = cue
        .params()
        .get_json(P_MESSAGES)
        .ok_or_else(|| CueError::Validation("malformed osc message list".into()))?;
    let duration = cue.params().get_float_or(P_FADE_DURATION, 0.0);
    let curve = FadeCurve::from_name(cue.params().get_str(P_FADE_CURVE).unwrap_or("Linear"))?;
    Ok((destination, defs, duration, curve))
}

/// Compose the ramping messages at fade level `t` in [0, 1]. Numeric args are
/// interpolated toward their positional `fade_to` value; other args pass
/// through unchanged.
pub(crate) fn interpolated(defs: &[OscMessageDef], t: f64) -> Vec<OscMessage> {
    defs.iter()
        .filter_map(|def| {
            let targets = def.fade_to.as_ref()?;
            let args = def
                .args
                .iter()
                .enumerate()
                .map(|(i, arg)| match (arg, targets.get(i)) {
                    (OscArg::Float(v), Some(to)) => OscArg::Float(v + (to - v) * t),
                    (OscArg::Int(v), Some(to)) => {
                        OscArg::Int((*v as f64 + (to - *v as f64) * t).round() as i32)
                    }
                    _ => arg.clone(),
                })
                .collect();
            Some(OscMessage {
                path: def.path.clone(),
                args,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolated_numeric_args() {
        let defs = vec![OscMessageDef {
            path: "/dimmer/1".into(),
            args: vec![OscArg::Float(0.0), OscArg::Int(0), OscArg::Str("x".into())],
            fade_to: Some(vec![1.0, 100.0]),
        }];

        let mid = interpolated(&defs, 0.5);
        assert_eq!(
            mid[0].args,
            vec![OscArg::Float(0.5), OscArg::Int(50), OscArg::Str("x".into())]
        );

        let end = interpolated(&defs, 1.0);
        assert_eq!(end[0].args[0], OscArg::Float(1.0));
        assert_eq!(end[0].args[1], OscArg::Int(100));
    }

    #[test]
    fn test_interpolated_skips_static_messages() {
        let defs = vec![
            OscMessageDef {
                path: "/go".into(),
                args: vec![OscArg::Bool(true)],
                fade_to: None,
            },
            OscMessageDef {
                path: "/level".into(),
                args: vec![OscArg::Float(0.0)],
                fade_to: Some(vec![1.0]),
            },
        ];
        let msgs = interpolated(&defs, 0.25);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].path, "/level");
    }

    #[test]
    fn test_def_serde_defaults() {
        let def: OscMessageDef = serde_json::from_str(r#"{"path": "/ping"}"#).unwrap();
        assert!(def.args.is_empty());
        assert!(def.fade_to.is_none());
    }
}
