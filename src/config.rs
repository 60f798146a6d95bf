//! Engine-wide constants and defaults.

use std::time::Duration;

/// Fade ticker interval. 100 ticks/sec is fine-grained enough for audible
/// volume ramps while keeping the control queue light.
pub const FADE_TICK: Duration = Duration::from_millis(10);

/// Poll interval for subprocess exit detection.
pub const PROC_POLL: Duration = Duration::from_millis(10);

/// Capacity of the worker -> control thread event queue.
/// Fade ticks are droppable; completion events block until drained.
pub const EVENT_QUEUE_CAP: usize = 1024;

/// Default media volume (linear gain, 1.0 = unity).
pub const DEFAULT_VOLUME: f64 = 1.0;

/// Default media duration in seconds for newly created media cues.
pub const DEFAULT_MEDIA_DURATION: f64 = 0.0;

/// Shell used to run Command cues.
#[cfg(unix)]
pub const SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
pub const SHELL: (&str, &str) = ("cmd", "/C");
