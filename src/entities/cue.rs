//! Cue entity: id, kind, display name, typed parameters, runtime state.
//!
//! Parameters are the full persisted configuration of a cue. Runtime state
//! is transient and never serialized - a loaded session starts with every
//! cue Idle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::keys::*;
use super::params::{ParamValue, Params};
use super::schema::{
    Schema, COLLECTION_SCHEMA, COMMAND_SCHEMA, INDEX_SCHEMA, MEDIA_SCHEMA, MIDI_SCHEMA,
    OSC_SCHEMA, SEEK_SCHEMA, STOP_ALL_SCHEMA, VOLUME_SCHEMA,
};
use crate::config::{DEFAULT_MEDIA_DURATION, DEFAULT_VOLUME};
use crate::error::CueError;

/// Every cue kind the engine knows how to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CueKind {
    Media,
    VolumeControl,
    Seek,
    Command,
    Osc,
    Midi,
    IndexAction,
    Collection,
    StopAll,
}

impl CueKind {
    pub fn name(&self) -> &'static str {
        match self {
            CueKind::Media => "Media",
            CueKind::VolumeControl => "VolumeControl",
            CueKind::Seek => "Seek",
            CueKind::Command => "Command",
            CueKind::Osc => "Osc",
            CueKind::Midi => "Midi",
            CueKind::IndexAction => "IndexAction",
            CueKind::Collection => "Collection",
            CueKind::StopAll => "StopAll",
        }
    }

    /// Resolve a kind by name. The registry is closed-world: an unknown
    /// name is a structured error, not a fallback.
    pub fn from_name(name: &str) -> Result<Self, CueError> {
        Self::all()
            .iter()
            .find(|k| k.name() == name)
            .copied()
            .ok_or_else(|| CueError::UnknownActionType(name.to_string()))
    }

    pub fn all() -> &'static [CueKind] {
        &[
            CueKind::Media,
            CueKind::VolumeControl,
            CueKind::Seek,
            CueKind::Command,
            CueKind::Osc,
            CueKind::Midi,
            CueKind::IndexAction,
            CueKind::Collection,
            CueKind::StopAll,
        ]
    }

    pub fn schema(&self) -> &'static Schema {
        match self {
            CueKind::Media => &MEDIA_SCHEMA,
            CueKind::VolumeControl => &VOLUME_SCHEMA,
            CueKind::Seek => &SEEK_SCHEMA,
            CueKind::Command => &COMMAND_SCHEMA,
            CueKind::Osc => &OSC_SCHEMA,
            CueKind::Midi => &MIDI_SCHEMA,
            CueKind::IndexAction => &INDEX_SCHEMA,
            CueKind::Collection => &COLLECTION_SCHEMA,
            CueKind::StopAll => &STOP_ALL_SCHEMA,
        }
    }

    /// Schema-complete defaults for a freshly created cue.
    pub fn default_params(&self) -> Params {
        let mut p = Params::new();
        match self {
            CueKind::Media => {
                p.set(P_URI, ParamValue::Str(String::new()));
                p.set(P_DURATION, ParamValue::Float(DEFAULT_MEDIA_DURATION));
                p.set(P_VOLUME, ParamValue::Float(DEFAULT_VOLUME));
                p.set(P_POSITION, ParamValue::Float(0.0));
            }
            CueKind::VolumeControl => {
                p.set(P_TARGET, ParamValue::Uuid(Uuid::nil()));
                p.set(P_TARGET_VOLUME, ParamValue::Float(DEFAULT_VOLUME));
                p.set(P_FADE_DURATION, ParamValue::Float(0.0));
                p.set(P_FADE_CURVE, ParamValue::Str("Linear".into()));
            }
            CueKind::Seek => {
                p.set(P_TARGET, ParamValue::Uuid(Uuid::nil()));
                p.set(P_TARGET_TIME, ParamValue::Float(0.0));
                p.set(P_FADE_DURATION, ParamValue::Float(0.0));
                p.set(P_FADE_CURVE, ParamValue::Str("Linear".into()));
            }
            CueKind::Command => {
                p.set(P_COMMAND, ParamValue::Str(String::new()));
                p.set(P_DISCARD_OUTPUT, ParamValue::Bool(false));
                p.set(P_IGNORE_ERRORS, ParamValue::Bool(false));
                p.set(P_FORCE_KILL, ParamValue::Bool(false));
            }
            CueKind::Osc => {
                p.set(P_DESTINATION, ParamValue::Str(String::new()));
                p.set(P_MESSAGES, ParamValue::Json(serde_json::json!([])));
            }
            CueKind::Midi => {
                p.set(P_DESTINATION, ParamValue::Str(String::new()));
                p.set(P_BYTES, ParamValue::Json(serde_json::json!([])));
            }
            CueKind::IndexAction => {
                p.set(P_TARGET_INDEX, ParamValue::Int(0));
                p.set(P_RELATIVE, ParamValue::Bool(false));
                p.set(P_ACTION, ParamValue::Str("trigger".into()));
            }
            CueKind::Collection => {
                p.set(P_ENTRIES, ParamValue::Json(serde_json::json!([])));
            }
            CueKind::StopAll => {}
        }
        p
    }
}

/// Runtime lifecycle state of a cue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CueState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Transitional: observers see Stopped before the cue settles back to Idle.
    Stopped,
}

/// A single cue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cue {
    pub id: Uuid,
    pub kind: CueKind,
    pub name: String,
    params: Params,
    #[serde(skip)]
    state: CueState,
}

impl Cue {
    /// Create a cue of `kind` with schema defaults and a fresh id.
    pub fn new(kind: CueKind, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            params: kind.default_params(),
            state: CueState::Idle,
        }
    }

    /// Create a cue with an explicit parameter map, validated against the
    /// kind's schema.
    pub fn with_params(
        kind: CueKind,
        name: impl Into<String>,
        params: Params,
    ) -> Result<Self, CueError> {
        kind.schema().validate(&params)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            params,
            state: CueState::Idle,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Set one parameter, rejecting unknown keys and type mismatches.
    pub fn set_param(&mut self, key: &str, value: ParamValue) -> Result<(), CueError> {
        self.kind.schema().validate_one(key, &value)?;
        self.params.set(key, value);
        Ok(())
    }

    /// Engine-internal write path: the fade engine updates interpolated
    /// values without schema round-trips.
    pub(crate) fn set_param_raw(&mut self, key: &str, value: ParamValue) {
        self.params.set(key, value);
    }

    /// Replace the whole parameter map, validated.
    pub fn set_params(&mut self, params: Params) -> Result<(), CueError> {
        self.kind.schema().validate(&params)?;
        self.params = params;
        Ok(())
    }

    pub fn state(&self) -> CueState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: CueState) {
        self.state = state;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, CueState::Running | CueState::Paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_satisfy_schema() {
        for kind in CueKind::all() {
            let cue = Cue::new(*kind, kind.name());
            assert!(
                kind.schema().validate(cue.params()).is_ok(),
                "defaults invalid for {}",
                kind.name()
            );
            assert_eq!(cue.state(), CueState::Idle);
        }
    }

    #[test]
    fn test_kind_name_roundtrip() {
        for kind in CueKind::all() {
            assert_eq!(CueKind::from_name(kind.name()).unwrap(), *kind);
        }
        assert!(matches!(
            CueKind::from_name("Teleport"),
            Err(CueError::UnknownActionType(_))
        ));
    }

    #[test]
    fn test_set_param_validated() {
        let mut cue = Cue::new(CueKind::Media, "intro");
        cue.set_param(P_VOLUME, ParamValue::Float(0.3)).unwrap();
        assert_eq!(cue.params().get_float(P_VOLUME), Some(0.3));

        assert!(cue.set_param(P_VOLUME, ParamValue::Bool(true)).is_err());
        assert!(cue.set_param("nonsense", ParamValue::Int(1)).is_err());
    }

    #[test]
    fn test_state_not_serialized() {
        let mut cue = Cue::new(CueKind::Command, "ping");
        cue.set_state(CueState::Running);

        let json = serde_json::to_string(&cue).unwrap();
        let back: Cue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state(), CueState::Idle);
        assert_eq!(back.id, cue.id);
    }
}
