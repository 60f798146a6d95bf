//! Data model: cues, parameter storage, schemas and key constants.

pub mod cue;
pub mod cue_list;
pub mod keys;
pub mod params;
pub mod schema;

pub use cue::{Cue, CueKind, CueState};
pub use cue_list::CueList;
pub use params::{ParamValue, Params};
