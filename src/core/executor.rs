//! Cue executor: the control-thread state machine.
//!
//! All state transitions happen here, on the thread that owns the executor.
//! Worker threads (fade ticker, process watchers) only report back over the
//! engine queue; `pump()` drains it and applies the results. This keeps the
//! lifecycle single-writer: no transition ever races another.
//!
//! Lifecycle: Idle -> Running -> (Paused <-> Running) -> Stopped -> Idle.
//! Stopped is transitional; observers always see it before the cue settles.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant, SystemTime};

use crossbeam_channel::Receiver;
use uuid::Uuid;

use super::clock::Clock;
use super::curve::FadeCurve;
use super::events::{engine_channel, CueEvent, EngineEvent, EventSender};
use super::fade::FadeEngine;
use super::process::{ProcessSupervisor, StopMode};
use crate::actions::{self, Action, ActionKind, CueCommand, Outcome};
use crate::entities::keys::*;
use crate::entities::{CueKind, CueList, CueState, ParamValue};
use crate::error::CueError;
use crate::transport::{MidiSender, OscSender};

pub struct Executor {
    cues: Arc<RwLock<CueList>>,
    fade: FadeEngine,
    procs: ProcessSupervisor,
    engine_rx: Receiver<EngineEvent>,
    notifier: EventSender,
    osc: Arc<dyn OscSender>,
    midi: Arc<dyn MidiSender>,
}

impl Executor {
    pub fn new(
        cues: Arc<RwLock<CueList>>,
        notifier: EventSender,
        osc: Arc<dyn OscSender>,
        midi: Arc<dyn MidiSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (engine_tx, engine_rx) = engine_channel();
        Self {
            cues,
            fade: FadeEngine::new(clock, engine_tx.clone()),
            procs: ProcessSupervisor::new(engine_tx),
            engine_rx,
            notifier,
            osc,
            midi,
        }
    }

    pub fn cues(&self) -> &Arc<RwLock<CueList>> {
        &self.cues
    }

    pub(crate) fn fade(&self) -> &FadeEngine {
        &self.fade
    }

    /// Start a fade on (target, key). A fade already holding that key dies
    /// without a FadeFinished, so its owner settles here unless it is also
    /// the cue starting the new one.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn start_fade(
        &mut self,
        owner: Uuid,
        target: Uuid,
        key: &str,
        from: f64,
        to: f64,
        duration: Duration,
        curve: FadeCurve,
    ) {
        let replaced = self.fade.start(owner, target, key, from, to, duration, curve);
        if let Some(prev) = replaced {
            if prev != owner {
                self.settle(prev);
            }
        }
    }

    pub(crate) fn procs(&self) -> &ProcessSupervisor {
        &self.procs
    }

    pub(crate) fn notifier(&self) -> &EventSender {
        &self.notifier
    }

    pub(crate) fn osc(&self) -> &dyn OscSender {
        self.osc.as_ref()
    }

    pub(crate) fn midi(&self) -> &dyn MidiSender {
        self.midi.as_ref()
    }

    // === Transport operations ===

    /// Fire a cue. Triggering an active cue cancels its side effects first,
    /// then dispatches again without dropping out of Running in between.
    pub fn trigger(&mut self, id: Uuid) -> Result<(), CueError> {
        let (kind, state) = self.kind_and_state(id)?;

        if matches!(state, CueState::Running | CueState::Paused) {
            log::debug!("retrigger {id}: cancelling previous run");
            self.fade.cancel_owned(id);
            if kind == CueKind::Media {
                for owner in self.fade.cancel_targeting(id) {
                    if owner != id {
                        self.settle(owner);
                    }
                }
            }
            if kind == CueKind::Command {
                let mode = self.command_stop_mode(id);
                self.procs.stop(id, mode).ok();
            }
            if state == CueState::Paused {
                self.set_state(id, CueState::Running);
            }
        } else {
            self.set_state(id, CueState::Running);
        }

        let action = ActionKind::from(kind);
        match action.execute(self, id) {
            Ok(Outcome::Done) => {
                self.set_state(id, CueState::Idle);
                Ok(())
            }
            Ok(Outcome::InFlight) => Ok(()),
            Err(e) => {
                self.notifier.emit(CueEvent::Error {
                    cue_id: id,
                    message: e.to_string(),
                });
                self.set_state(id, CueState::Idle);
                Err(e)
            }
        }
    }

    /// Pause a running timed cue. Pausing a cue that is not Running is a
    /// no-op; pausing a kind with no timeline is an error.
    pub fn pause(&mut self, id: Uuid) -> Result<(), CueError> {
        let (kind, state) = self.kind_and_state(id)?;
        if !ActionKind::from(kind).supports_pause() {
            return Err(CueError::UnsupportedOperation {
                kind: kind.name().to_string(),
                op: "pause".to_string(),
            });
        }
        if state != CueState::Running {
            return Ok(());
        }
        self.fade.pause_owned(id);
        self.set_state(id, CueState::Paused);
        Ok(())
    }

    /// Resume a paused cue. Elapsed pause time does not count against fades.
    pub fn resume(&mut self, id: Uuid) -> Result<(), CueError> {
        let (kind, state) = self.kind_and_state(id)?;
        if !ActionKind::from(kind).supports_pause() {
            return Err(CueError::UnsupportedOperation {
                kind: kind.name().to_string(),
                op: "resume".to_string(),
            });
        }
        if state != CueState::Paused {
            return Ok(());
        }
        self.fade.resume_owned(id);
        self.set_state(id, CueState::Running);
        Ok(())
    }

    /// Stop a cue: cancel its side effects and settle it through Stopped to
    /// Idle. Stopping an Idle cue is a no-op. Interrupted fades leave their
    /// last written value in place.
    pub fn stop(&mut self, id: Uuid) -> Result<(), CueError> {
        let (kind, state) = self.kind_and_state(id)?;
        if state == CueState::Idle {
            return Ok(());
        }

        self.fade.cancel_owned(id);
        if kind == CueKind::Media {
            // Foreign fades writing into this cue (seek glides, volume ramps)
            // die with it; their owners settle too.
            for owner in self.fade.cancel_targeting(id) {
                if owner != id {
                    self.settle(owner);
                }
            }
        }
        if kind == CueKind::Command {
            let mode = self.command_stop_mode(id);
            if let Err(e) = self.procs.stop(id, mode) {
                self.notifier.emit(CueEvent::Error {
                    cue_id: id,
                    message: e.to_string(),
                });
            }
        }

        self.set_state(id, CueState::Stopped);
        self.set_state(id, CueState::Idle);
        Ok(())
    }

    /// Stop every active cue, best effort.
    pub fn stop_all(&mut self) {
        let ids = {
            let cues = self.cues.read().expect("cue list lock poisoned");
            cues.iter().filter(|c| c.is_active()).map(|c| c.id).collect::<Vec<_>>()
        };
        for id in ids {
            if let Err(e) = self.stop(id) {
                log::warn!("stop-all: cue {id} failed to stop: {e}");
            }
        }
    }

    /// Apply a delegated command (from IndexAction or Collection cues).
    pub fn delegate(&mut self, id: Uuid, command: CueCommand) -> Result<(), CueError> {
        match command {
            CueCommand::Trigger => self.trigger(id),
            CueCommand::Pause => self.pause(id),
            CueCommand::Resume => self.resume(id),
            CueCommand::Stop => self.stop(id),
        }
    }

    // === Engine queue ===

    /// Drain worker reports and apply them. Call regularly from the control
    /// loop (the session pumps at its own cadence).
    pub fn pump(&mut self) {
        while let Ok(event) = self.engine_rx.try_recv() {
            self.apply(event);
        }
    }

    /// Pump until no cue is active or the timeout passes. Returns true when
    /// everything settled.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            let any_active = {
                let cues = self.cues.read().expect("cue list lock poisoned");
                let active = cues.iter().any(|c| c.is_active());
                active
            };
            if !any_active {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::FadeTick {
                owner,
                target,
                key,
                value,
            } => {
                if key == P_OSC_LEVEL {
                    self.send_osc_level(owner, value);
                } else {
                    let mut cues = self.cues.write().expect("cue list lock poisoned");
                    if let Some(cue) = cues.get_mut(target) {
                        cue.set_param_raw(&key, ParamValue::Float(value));
                    }
                }
            }
            EngineEvent::FadeFinished { owner, target, key } => {
                // A finished seek glide hands the position back to playback.
                if key == P_POSITION && owner != target {
                    let restart = {
                        let cues = self.cues.read().expect("cue list lock poisoned");
                        cues.get(target).map(|c| {
                            c.kind == CueKind::Media && c.state() == CueState::Running
                        })
                    };
                    if restart == Some(true) {
                        if let Err(e) = actions::media::resume_playback(self, target) {
                            log::warn!("playback handoff after seek failed: {e}");
                        }
                    }
                }
                self.settle(owner);
            }
            EngineEvent::ProcessOutput { cue_id, line } => {
                self.notifier.emit(CueEvent::Output { cue_id, line });
            }
            EngineEvent::ProcessExited { cue_id, code } => {
                let ignore = {
                    let cues = self.cues.read().expect("cue list lock poisoned");
                    cues.get(cue_id)
                        .map(|c| c.params().get_bool_or(P_IGNORE_ERRORS, false))
                        .unwrap_or(true)
                };
                if let Some(c) = code {
                    if c != 0 && !ignore {
                        self.notifier.emit(CueEvent::Error {
                            cue_id,
                            message: format!("process exited with code {c}"),
                        });
                    }
                }
                self.settle(cue_id);
            }
        }
    }

    /// Send the ramping OSC messages of `cue_id` at fade level `level`.
    fn send_osc_level(&mut self, cue_id: Uuid, level: f64) {
        let config = actions::osc::read_config(self, cue_id);
        let Ok((destination, defs, _, _)) = config else {
            return;
        };
        for msg in actions::osc::interpolated(&defs, level) {
            if let Err(e) = self.osc.send(&destination, &msg) {
                log::warn!("osc send to {destination} failed: {e}");
            }
        }
    }

    /// Settle a cue back to Idle once its last in-flight work has finished.
    pub(crate) fn settle(&mut self, id: Uuid) {
        if self.fade.has_owned(id) || self.procs.is_running(id) {
            return;
        }
        let state = {
            let cues = self.cues.read().expect("cue list lock poisoned");
            cues.get(id).map(|c| c.state())
        };
        match state {
            Some(CueState::Running) => self.set_state(id, CueState::Idle),
            // A paused cue whose pending work was cancelled has nothing to
            // resume into; it settles through Stopped.
            Some(CueState::Paused) => {
                self.set_state(id, CueState::Stopped);
                self.set_state(id, CueState::Idle);
            }
            _ => {}
        }
    }

    /// Kill or terminate, per the cue's force_kill parameter.
    fn command_stop_mode(&self, id: Uuid) -> StopMode {
        let cues = self.cues.read().expect("cue list lock poisoned");
        match cues.get(id).map(|c| c.params().get_bool_or(P_FORCE_KILL, false)) {
            Some(true) => StopMode::Kill,
            _ => StopMode::Terminate,
        }
    }

    fn kind_and_state(&self, id: Uuid) -> Result<(CueKind, CueState), CueError> {
        let cues = self.cues.read().expect("cue list lock poisoned");
        let cue = cues.get(id).ok_or(CueError::NoSuchCue(id))?;
        Ok((cue.kind, cue.state()))
    }

    /// The single place cue state changes. Emits an ordered StateChanged
    /// event per transition.
    fn set_state(&mut self, id: Uuid, new: CueState) {
        let old = {
            let mut cues = self.cues.write().expect("cue list lock poisoned");
            let Some(cue) = cues.get_mut(id) else {
                return;
            };
            let old = cue.state();
            if old == new {
                return;
            }
            cue.set_state(new);
            old
        };
        log::debug!("cue {id}: {old:?} -> {new:?}");
        self.notifier.emit(CueEvent::StateChanged {
            cue_id: id,
            old,
            new,
            at: SystemTime::now(),
        });
    }
}
