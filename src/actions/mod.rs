//! Action strategies: per-kind dispatch behavior.
//!
//! Each cue kind has a stateless strategy implementing [`Action`]. The
//! executor resolves the strategy from the cue's kind and calls it with the
//! cue id; the strategy reads parameters from the shared list and drives the
//! fade engine, process supervisor or transports.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::executor::Executor;
use crate::entities::CueKind;
use crate::error::CueError;

pub mod collection;
pub mod command;
pub mod index;
pub mod media;
pub mod midi;
pub mod osc;
pub mod seek;
pub mod stop_all;
pub mod volume;

pub use collection::{CollectionAction, CollectionEntry};
pub use command::CommandAction;
pub use index::IndexAction;
pub use media::MediaAction;
pub use midi::MidiAction;
pub use osc::{OscAction, OscMessageDef};
pub use seek::SeekAction;
pub use stop_all::StopAllAction;
pub use volume::VolumeAction;

/// What dispatch produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The effect is complete; the cue settles back to Idle.
    Done,
    /// Background work (fade, subprocess) continues; the cue stays Running
    /// until the engine queue reports completion.
    InFlight,
}

/// Transport command a cue can receive, directly or by delegation from
/// IndexAction and Collection cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueCommand {
    Trigger,
    Pause,
    Resume,
    Stop,
}

impl CueCommand {
    pub fn name(&self) -> &'static str {
        match self {
            CueCommand::Trigger => "trigger",
            CueCommand::Pause => "pause",
            CueCommand::Resume => "resume",
            CueCommand::Stop => "stop",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CueError> {
        match name {
            "trigger" => Ok(CueCommand::Trigger),
            "pause" => Ok(CueCommand::Pause),
            "resume" => Ok(CueCommand::Resume),
            "stop" => Ok(CueCommand::Stop),
            other => Err(CueError::Validation(format!("unknown action '{other}'"))),
        }
    }
}

#[enum_dispatch]
pub trait Action {
    /// Perform the cue's effect. Called on the control thread with the cue
    /// already marked Running.
    fn execute(&self, exec: &mut Executor, cue_id: Uuid) -> Result<Outcome, CueError>;

    /// Whether pause/resume make sense for this kind.
    fn supports_pause(&self) -> bool {
        false
    }
}

/// Strategy dispatch enum, one variant per cue kind.
#[enum_dispatch(Action)]
pub enum ActionKind {
    Media(MediaAction),
    Volume(VolumeAction),
    Seek(SeekAction),
    Command(CommandAction),
    Osc(OscAction),
    Midi(MidiAction),
    Index(IndexAction),
    Collection(CollectionAction),
    StopAll(StopAllAction),
}

impl From<CueKind> for ActionKind {
    fn from(kind: CueKind) -> Self {
        match kind {
            CueKind::Media => ActionKind::Media(MediaAction),
            CueKind::VolumeControl => ActionKind::Volume(VolumeAction),
            CueKind::Seek => ActionKind::Seek(SeekAction),
            CueKind::Command => ActionKind::Command(CommandAction),
            CueKind::Osc => ActionKind::Osc(OscAction),
            CueKind::Midi => ActionKind::Midi(MidiAction),
            CueKind::IndexAction => ActionKind::Index(IndexAction),
            CueKind::Collection => ActionKind::Collection(CollectionAction),
            CueKind::StopAll => ActionKind::StopAll(StopAllAction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_roundtrip() {
        for cmd in [
            CueCommand::Trigger,
            CueCommand::Pause,
            CueCommand::Resume,
            CueCommand::Stop,
        ] {
            assert_eq!(CueCommand::from_name(cmd.name()).unwrap(), cmd);
        }
        assert!(CueCommand::from_name("jump").is_err());
    }

    #[test]
    fn test_only_timed_kinds_support_pause() {
        for kind in CueKind::all() {
            let action = ActionKind::from(*kind);
            let expect = matches!(
                kind,
                CueKind::Media | CueKind::VolumeControl | CueKind::Seek
            );
            assert_eq!(action.supports_pause(), expect, "{}", kind.name());
        }
    }
}
