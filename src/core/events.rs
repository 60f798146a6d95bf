//! Event plumbing between worker threads, the control thread and observers.
//!
//! Two layers:
//! - `EngineEvent`: internal, worker threads -> control thread (bounded queue,
//!   drained by `Executor::pump`).
//! - `CueEvent`: external, control thread -> session observers.

use std::time::SystemTime;

use crossbeam_channel::{Receiver, Sender};
use uuid::Uuid;

use crate::config::EVENT_QUEUE_CAP;
use crate::entities::CueState;

/// Internal events produced by the fade ticker and process watchers.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Intermediate fade sample. Droppable under backpressure.
    FadeTick {
        owner: Uuid,
        target: Uuid,
        key: String,
        value: f64,
    },
    /// Fade reached its end value. Never dropped.
    FadeFinished {
        owner: Uuid,
        target: Uuid,
        key: String,
    },
    /// One line of subprocess stdout.
    ProcessOutput { cue_id: Uuid, line: String },
    /// Subprocess exited. `code` is None when killed by a signal.
    ProcessExited { cue_id: Uuid, code: Option<i32> },
}

/// Bounded internal queue. Ticks use try_send, completions block.
pub fn engine_channel() -> (Sender<EngineEvent>, Receiver<EngineEvent>) {
    crossbeam_channel::bounded(EVENT_QUEUE_CAP)
}

/// Events visible to session observers.
#[derive(Debug, Clone, PartialEq)]
pub enum CueEvent {
    StateChanged {
        cue_id: Uuid,
        old: CueState,
        new: CueState,
        at: SystemTime,
    },
    /// Subprocess stdout forwarded from a Command cue.
    Output { cue_id: Uuid, line: String },
    /// Per-cue dispatch failure. The cue is settled; the show goes on.
    Error { cue_id: Uuid, message: String },
}

/// Optional observer-event sender. `dummy()` for headless and test setups
/// that don't subscribe.
#[derive(Debug, Clone, Default)]
pub struct EventSender {
    sender: Option<Sender<CueEvent>>,
}

impl EventSender {
    pub fn new(sender: Sender<CueEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    pub fn dummy() -> Self {
        Self { sender: None }
    }

    pub fn emit(&self, event: CueEvent) {
        if let Some(sender) = &self.sender {
            if let Err(e) = sender.send(event) {
                log::warn!("observer event dropped: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_sender_is_silent() {
        let sender = EventSender::dummy();
        sender.emit(CueEvent::Output {
            cue_id: Uuid::new_v4(),
            line: "hello".into(),
        });
    }

    #[test]
    fn test_emit_delivers() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();
        sender.emit(CueEvent::Error {
            cue_id: id,
            message: "boom".into(),
        });
        match rx.try_recv().unwrap() {
            CueEvent::Error { cue_id, message } => {
                assert_eq!(cue_id, id);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
