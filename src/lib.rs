//! cueflow: a cue execution and timing engine for live show control.
//!
//! A session holds an ordered list of typed cues (media playback, volume
//! fades, seeks, shell commands, OSC and MIDI sends, index jumps, batch
//! collections, stop-all). Triggering a cue runs it through the
//! Idle -> Running -> Paused/Stopped -> Idle lifecycle; timed effects are
//! driven by a background fade ticker, subprocesses by per-child watchers,
//! and everything reports back to the control thread that owns the session.
//!
//! ```no_run
//! use cueflow::{Session, CueKind};
//!
//! let mut session = Session::new();
//! let cue = session.create_cue(CueKind::Command, "announce");
//! session.set_cue_param(
//!     cue,
//!     cueflow::keys::P_COMMAND,
//!     cueflow::ParamValue::Str("echo places please".into()),
//! ).unwrap();
//! session.trigger(cue).unwrap();
//! loop {
//!     session.pump();
//!     for event in session.events().try_iter() {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod entities;
pub mod error;
pub mod presets;
pub mod session;
pub mod transport;

pub use crate::core::{Clock, CueEvent, FadeCurve, ManualClock, SystemClock};
pub use actions::{CollectionEntry, CueCommand};
pub use entities::keys;
pub use entities::{Cue, CueKind, CueList, CueState, ParamValue, Params};
pub use error::CueError;
pub use presets::{ImportReport, Preset, PresetStore};
pub use session::Session;
pub use transport::{MidiMessage, MidiSender, OscArg, OscMessage, OscSender};

/// Console logger for hosts and examples. `RUST_LOG` overrides the default.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
