//! Static parameter schemas for all cue kinds - the action type registry.
//!
//! The registry is closed-world: every kind is declared here at build time
//! and resolved by name. Each schema defines parameter metadata (type,
//! required, fadeable) used by `Cue` to validate edits and by the preset
//! store to reject structurally invalid imports.

use super::keys::*;
use super::params::{ParamValue, Params};
use crate::error::CueError;

/// Parameter type tag, mirrors [`ParamValue`] discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    Str,
    Int,
    UInt,
    Float,
    Uuid,
    Json,
}

impl ParamType {
    pub fn matches(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (ParamType::Bool, ParamValue::Bool(_))
                | (ParamType::Str, ParamValue::Str(_))
                | (ParamType::Int, ParamValue::Int(_))
                | (ParamType::UInt, ParamValue::UInt(_))
                | (ParamType::Float, ParamValue::Float(_))
                | (ParamType::Uuid, ParamValue::Uuid(_))
                | (ParamType::Json, ParamValue::Json(_))
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Bool => "Bool",
            ParamType::Str => "Str",
            ParamType::Int => "Int",
            ParamType::UInt => "UInt",
            ParamType::Float => "Float",
            ParamType::Uuid => "Uuid",
            ParamType::Json => "Json",
        }
    }
}

// === Flags ===
/// Must be present for the cue to dispatch
pub const FLAG_REQUIRED: u8 = 1 << 0;
/// Continuous value the fade engine may interpolate
pub const FLAG_FADEABLE: u8 = 1 << 1;
/// Integer that may carry a relative-offset meaning
pub const FLAG_RELATIVE: u8 = 1 << 2;

// Shorthand combos
const REQ: u8 = FLAG_REQUIRED;
const FADE: u8 = FLAG_FADEABLE;
const REQ_FADE: u8 = FLAG_REQUIRED | FLAG_FADEABLE;
const REQ_REL: u8 = FLAG_REQUIRED | FLAG_RELATIVE;

/// One parameter declaration.
#[derive(Debug, Clone, Copy)]
pub struct ParamDef {
    pub key: &'static str,
    pub ty: ParamType,
    pub flags: u8,
}

impl ParamDef {
    pub const fn new(key: &'static str, ty: ParamType, flags: u8) -> Self {
        Self { key, ty, flags }
    }

    pub fn required(&self) -> bool {
        self.flags & FLAG_REQUIRED != 0
    }

    pub fn fadeable(&self) -> bool {
        self.flags & FLAG_FADEABLE != 0
    }
}

/// Parameter schema for one cue kind.
#[derive(Debug)]
pub struct Schema {
    pub kind: &'static str,
    pub defs: &'static [ParamDef],
}

impl Schema {
    pub const fn new(kind: &'static str, defs: &'static [ParamDef]) -> Self {
        Self { kind, defs }
    }

    pub fn get(&self, key: &str) -> Option<&ParamDef> {
        self.defs.iter().find(|d| d.key == key)
    }

    /// Validate a full parameter map against this schema: required keys
    /// present, no unknown keys, every value matches its declared type.
    pub fn validate(&self, params: &Params) -> Result<(), CueError> {
        for def in self.defs {
            match params.get(def.key) {
                Some(v) if !def.ty.matches(v) => {
                    return Err(CueError::Validation(format!(
                        "{}.{}: expected {}, got {}",
                        self.kind,
                        def.key,
                        def.ty.name(),
                        v.type_name()
                    )));
                }
                None if def.required() => {
                    return Err(CueError::Validation(format!(
                        "{}.{}: required parameter missing",
                        self.kind, def.key
                    )));
                }
                _ => {}
            }
        }
        for (key, _) in params.iter() {
            if self.get(key).is_none() {
                return Err(CueError::Validation(format!(
                    "{}: unknown parameter '{}'",
                    self.kind, key
                )));
            }
        }
        Ok(())
    }

    /// Validate a single edit against this schema.
    pub fn validate_one(&self, key: &str, value: &ParamValue) -> Result<(), CueError> {
        let def = self.get(key).ok_or_else(|| {
            CueError::Validation(format!("{}: unknown parameter '{}'", self.kind, key))
        })?;
        if !def.ty.matches(value) {
            return Err(CueError::Validation(format!(
                "{}.{}: expected {}, got {}",
                self.kind,
                key,
                def.ty.name(),
                value.type_name()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Schemas per cue kind
// ============================================================================

const MEDIA_DEFS: &[ParamDef] = &[
    ParamDef::new(P_URI, ParamType::Str, REQ),
    ParamDef::new(P_DURATION, ParamType::Float, REQ),
    ParamDef::new(P_VOLUME, ParamType::Float, REQ_FADE),
    ParamDef::new(P_POSITION, ParamType::Float, REQ_FADE),
];

pub static MEDIA_SCHEMA: Schema = Schema::new("Media", MEDIA_DEFS);

const VOLUME_DEFS: &[ParamDef] = &[
    ParamDef::new(P_TARGET, ParamType::Uuid, REQ),
    ParamDef::new(P_TARGET_VOLUME, ParamType::Float, REQ),
    ParamDef::new(P_FADE_DURATION, ParamType::Float, REQ),
    ParamDef::new(P_FADE_CURVE, ParamType::Str, REQ),
];

pub static VOLUME_SCHEMA: Schema = Schema::new("VolumeControl", VOLUME_DEFS);

const SEEK_DEFS: &[ParamDef] = &[
    ParamDef::new(P_TARGET, ParamType::Uuid, REQ),
    ParamDef::new(P_TARGET_TIME, ParamType::Float, REQ),
    ParamDef::new(P_FADE_DURATION, ParamType::Float, REQ),
    ParamDef::new(P_FADE_CURVE, ParamType::Str, REQ),
];

pub static SEEK_SCHEMA: Schema = Schema::new("Seek", SEEK_DEFS);

const COMMAND_DEFS: &[ParamDef] = &[
    ParamDef::new(P_COMMAND, ParamType::Str, REQ),
    ParamDef::new(P_DISCARD_OUTPUT, ParamType::Bool, REQ),
    ParamDef::new(P_IGNORE_ERRORS, ParamType::Bool, REQ),
    ParamDef::new(P_FORCE_KILL, ParamType::Bool, REQ),
];

pub static COMMAND_SCHEMA: Schema = Schema::new("Command", COMMAND_DEFS);

const OSC_DEFS: &[ParamDef] = &[
    ParamDef::new(P_DESTINATION, ParamType::Str, REQ),
    ParamDef::new(P_MESSAGES, ParamType::Json, REQ),
    ParamDef::new(P_FADE_DURATION, ParamType::Float, FADE),
    ParamDef::new(P_FADE_CURVE, ParamType::Str, 0),
];

pub static OSC_SCHEMA: Schema = Schema::new("Osc", OSC_DEFS);

const MIDI_DEFS: &[ParamDef] = &[
    ParamDef::new(P_DESTINATION, ParamType::Str, REQ),
    ParamDef::new(P_BYTES, ParamType::Json, REQ),
];

pub static MIDI_SCHEMA: Schema = Schema::new("Midi", MIDI_DEFS);

const INDEX_DEFS: &[ParamDef] = &[
    ParamDef::new(P_TARGET_INDEX, ParamType::Int, REQ_REL),
    ParamDef::new(P_RELATIVE, ParamType::Bool, REQ),
    ParamDef::new(P_ACTION, ParamType::Str, REQ),
    ParamDef::new(P_SUGGESTED_NAME, ParamType::Str, 0),
];

pub static INDEX_SCHEMA: Schema = Schema::new("IndexAction", INDEX_DEFS);

const COLLECTION_DEFS: &[ParamDef] = &[ParamDef::new(P_ENTRIES, ParamType::Json, REQ)];

pub static COLLECTION_SCHEMA: Schema = Schema::new("Collection", COLLECTION_DEFS);

const STOP_ALL_DEFS: &[ParamDef] = &[];

pub static STOP_ALL_SCHEMA: Schema = Schema::new("StopAll", STOP_ALL_DEFS);
