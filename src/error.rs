//! Error taxonomy for cue dispatch and preset handling.
//!
//! Per-cue dispatch failures are reported as events to observers and leave
//! the cue settled - one misbehaving cue must never halt the rest of a show.

use thiserror::Error;
use uuid::Uuid;

/// Structured error type shared by the executor, registry and preset store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CueError {
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    #[error("preset type '{preset}' does not match cue type '{cue}'")]
    TypeMismatch { preset: String, cue: String },

    #[error("'{op}' is not supported for {kind} cues")]
    UnsupportedOperation { kind: String, op: String },

    #[error("index {index} out of range (collection has {len} cues)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("no target cue selected")]
    NoTargetSelected,

    #[error("volume control failed: {0}")]
    VolumeControl(String),

    #[error("process execution failed: {0}")]
    ProcessExecution(String),

    #[error("import/export failed: {0}")]
    ImportExport(String),

    #[error("no cue with id {0}")]
    NoSuchCue(Uuid),

    #[error("duplicate cue id {0}")]
    DuplicateCue(Uuid),

    #[error("preset name already taken: {0}")]
    NameTaken(String),

    #[error("no preset named '{0}'")]
    NoSuchPreset(String),

    #[error("{0}")]
    Validation(String),
}
