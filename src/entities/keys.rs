//! Parameter key constants for Params access.
//!
//! Avoid string typos, enable IDE autocomplete.
//! Usage: `cue.params().get_float(P_VOLUME)`

// === Fade (shared by Media, VolumeControl, Seek, Osc) ===
/// Fade duration in seconds (0 = immediate set)
pub const P_FADE_DURATION: &str = "fade_duration";
/// Fade curve name ("Linear", "EaseIn", "EaseOut", "SCurve")
pub const P_FADE_CURVE: &str = "fade_curve";

// === Media ===
/// Media location (opaque to the engine - the player collaborator resolves it)
pub const P_URI: &str = "uri";
/// Total media duration in seconds
pub const P_DURATION: &str = "duration";
/// Current volume (linear gain)
pub const P_VOLUME: &str = "volume";
/// Current playback position in seconds
pub const P_POSITION: &str = "position";

// === VolumeControl / Seek ===
/// Target cue UUID (nil = unbound)
pub const P_TARGET: &str = "target";
/// Volume to fade to
pub const P_TARGET_VOLUME: &str = "target_volume";
/// Position to seek to, in seconds
pub const P_TARGET_TIME: &str = "target_time";

// === Command ===
/// Shell command line
pub const P_COMMAND: &str = "command";
/// Drop subprocess stdout instead of forwarding it as Output events
pub const P_DISCARD_OUTPUT: &str = "discard_output";
/// Swallow nonzero exit codes instead of emitting an Error event
pub const P_IGNORE_ERRORS: &str = "ignore_errors";
/// Stop with SIGKILL instead of SIGTERM
pub const P_FORCE_KILL: &str = "force_kill";

// === Osc / Midi ===
/// Transport destination ("host:port", port name, ...)
pub const P_DESTINATION: &str = "destination";
/// Osc: Json list of message definitions (path, args, optional fade_to)
pub const P_MESSAGES: &str = "messages";
/// Midi: Json list of raw message bytes
pub const P_BYTES: &str = "bytes";

// === IndexAction ===
/// Target position (absolute 0-based index, or signed offset when relative)
pub const P_TARGET_INDEX: &str = "target_index";
/// Interpret target_index relative to this cue's own position
pub const P_RELATIVE: &str = "relative";
/// Command to apply to the resolved cue ("trigger", "pause", "resume", "stop")
pub const P_ACTION: &str = "action";
/// Suggested display name for the layout layer (engine ignores it)
pub const P_SUGGESTED_NAME: &str = "suggested_name";

// === Collection ===
/// Json list of (cue, action) entries
pub const P_ENTRIES: &str = "entries";

// === Internal fade keys (never part of a schema) ===
/// Virtual 0..1 fade level driving interpolated OSC sends
pub const P_OSC_LEVEL: &str = "osc_level";
