//! Engine internals: timing, fades, subprocesses, the executor.

pub mod clock;
pub mod curve;
pub mod events;
pub mod executor;
pub mod fade;
pub mod process;

pub use clock::{Clock, ManualClock, SystemClock};
pub use curve::{fade_value, FadeCurve};
pub use events::{CueEvent, EventSender};
pub use executor::Executor;
pub use process::StopMode;
