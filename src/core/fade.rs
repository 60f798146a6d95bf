//! Time-based fade engine.
//!
//! A single ticker thread samples every active fade on each tick and reports
//! values to the control thread over the engine queue. Fades are keyed by
//! (target cue, parameter key): starting a fade on an occupied key replaces
//! the old fade atomically, so the value follows one authority at a time.
//!
//! `owner` is the cue that initiated the fade (a VolumeControl cue fading
//! another cue's volume owns the fade; the target just holds the value).
//! Pause, resume and cancel address fades by owner.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use uuid::Uuid;

use super::clock::Clock;
use super::curve::{fade_value, FadeCurve};
use super::events::EngineEvent;
use crate::config::FADE_TICK;

struct FadeTask {
    owner: Uuid,
    from: f64,
    to: f64,
    duration: Duration,
    curve: FadeCurve,
    started: Instant,
    paused_at: Option<Instant>,
}

type TaskMap = HashMap<(Uuid, String), FadeTask>;

pub struct FadeEngine {
    tasks: Arc<Mutex<TaskMap>>,
    clock: Arc<dyn Clock>,
    shutdown: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
}

impl FadeEngine {
    pub fn new(clock: Arc<dyn Clock>, tx: Sender<EngineEvent>) -> Self {
        let tasks: Arc<Mutex<TaskMap>> = Arc::new(Mutex::new(HashMap::new()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let ticker = {
            let tasks = tasks.clone();
            let clock = clock.clone();
            let shutdown = shutdown.clone();
            std::thread::Builder::new()
                .name("fade-ticker".into())
                .spawn(move || {
                    while !shutdown.load(Ordering::Relaxed) {
                        std::thread::sleep(FADE_TICK);
                        tick(&tasks, clock.as_ref(), &tx);
                    }
                })
                .ok()
        };

        Self {
            tasks,
            clock,
            shutdown,
            ticker,
        }
    }

    /// Start (or replace) a fade on (target, key). Duration must be positive;
    /// zero-duration changes are applied directly by the caller. A replaced
    /// fade never finishes, so its owner is returned for the caller to settle.
    pub fn start(
        &self,
        owner: Uuid,
        target: Uuid,
        key: &str,
        from: f64,
        to: f64,
        duration: Duration,
        curve: FadeCurve,
    ) -> Option<Uuid> {
        debug_assert!(!duration.is_zero());
        let task = FadeTask {
            owner,
            from,
            to,
            duration,
            curve,
            started: self.clock.now(),
            paused_at: None,
        };
        let mut tasks = self.tasks.lock().expect("fade task map lock poisoned");
        let replaced = tasks.insert((target, key.to_string()), task);
        if replaced.is_some() {
            log::debug!("fade on {target}/{key} replaced");
        }
        replaced.map(|t| t.owner)
    }

    /// Cancel the fade on one (target, key). The parameter keeps whatever
    /// value the last tick wrote.
    pub fn cancel(&self, target: Uuid, key: &str) {
        let mut tasks = self.tasks.lock().expect("fade task map lock poisoned");
        tasks.remove(&(target, key.to_string()));
    }

    /// Cancel every fade started by `owner`.
    pub fn cancel_owned(&self, owner: Uuid) {
        let mut tasks = self.tasks.lock().expect("fade task map lock poisoned");
        tasks.retain(|_, t| t.owner != owner);
    }

    /// Cancel every fade writing into `target`, whoever started it.
    /// Returns the owners of the removed fades so they can be settled.
    pub fn cancel_targeting(&self, target: Uuid) -> Vec<Uuid> {
        let mut owners = Vec::new();
        let mut tasks = self.tasks.lock().expect("fade task map lock poisoned");
        tasks.retain(|(t, _), task| {
            if *t == target {
                owners.push(task.owner);
                false
            } else {
                true
            }
        });
        owners
    }

    /// Freeze every fade started by `owner`.
    pub fn pause_owned(&self, owner: Uuid) {
        let now = self.clock.now();
        let mut tasks = self.tasks.lock().expect("fade task map lock poisoned");
        for task in tasks.values_mut() {
            if task.owner == owner && task.paused_at.is_none() {
                task.paused_at = Some(now);
            }
        }
    }

    /// Resume paused fades for `owner`, shifting their start so elapsed time
    /// excludes the paused interval.
    pub fn resume_owned(&self, owner: Uuid) {
        let now = self.clock.now();
        let mut tasks = self.tasks.lock().expect("fade task map lock poisoned");
        for task in tasks.values_mut() {
            if task.owner == owner {
                if let Some(paused_at) = task.paused_at.take() {
                    task.started += now.saturating_duration_since(paused_at);
                }
            }
        }
    }

    pub fn has_owned(&self, owner: Uuid) -> bool {
        let tasks = self.tasks.lock().expect("fade task map lock poisoned");
        tasks.values().any(|t| t.owner == owner)
    }
}

/// One ticker pass: sample active fades, retire finished ones, then send
/// events with the lock released.
fn tick(tasks: &Arc<Mutex<TaskMap>>, clock: &dyn Clock, tx: &Sender<EngineEvent>) {
    let now = clock.now();
    let mut ticks = Vec::new();
    let mut finished = Vec::new();

    {
        let mut tasks = tasks.lock().expect("fade task map lock poisoned");
        tasks.retain(|(target, key), task| {
            if task.paused_at.is_some() {
                return true;
            }
            let elapsed = now.saturating_duration_since(task.started);
            if elapsed >= task.duration {
                // Final sample lands exactly on the end value.
                finished.push((task.owner, *target, key.clone(), task.to));
                false
            } else {
                let progress = elapsed.as_secs_f64() / task.duration.as_secs_f64();
                let value = fade_value(task.from, task.to, progress, task.curve);
                ticks.push((task.owner, *target, key.clone(), value));
                true
            }
        });
    }

    for (owner, target, key, value) in ticks {
        // Intermediate samples are droppable under backpressure.
        let _ = tx.try_send(EngineEvent::FadeTick {
            owner,
            target,
            key,
            value,
        });
    }
    for (owner, target, key, value) in finished {
        if tx
            .send(EngineEvent::FadeTick {
                owner,
                target,
                key: key.clone(),
                value,
            })
            .is_err()
        {
            return;
        }
        let _ = tx.send(EngineEvent::FadeFinished { owner, target, key });
    }
}

impl Drop for FadeEngine {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.ticker.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use std::time::Duration;

    fn engine_with_manual_clock() -> (FadeEngine, ManualClock, crossbeam_channel::Receiver<EngineEvent>) {
        let clock = ManualClock::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        let engine = FadeEngine::new(Arc::new(clock.clone()), tx);
        (engine, clock, rx)
    }

    /// Wait until the ticker reports `expected`. Ticks computed before the
    /// manual clock moved may still be queued, so earlier values are skipped.
    fn wait_for_value(rx: &crossbeam_channel::Receiver<EngineEvent>, expected: f64) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(EngineEvent::FadeTick { value, .. }) if value == expected => return true,
                Ok(_) => {}
                Err(_) => {}
            }
        }
        false
    }

    #[test]
    fn test_halfway_value_with_manual_clock() {
        let (engine, clock, rx) = engine_with_manual_clock();
        let owner = Uuid::new_v4();
        let target = Uuid::new_v4();
        engine.start(
            owner,
            target,
            "volume",
            0.0,
            100.0,
            Duration::from_secs(2),
            FadeCurve::Linear,
        );

        clock.advance(Duration::from_secs(1));
        assert!(wait_for_value(&rx, 50.0));
        assert!(engine.has_owned(owner));
    }

    #[test]
    fn test_finish_emits_exact_end_value() {
        let (engine, clock, rx) = engine_with_manual_clock();
        let owner = Uuid::new_v4();
        let target = Uuid::new_v4();
        engine.start(
            owner,
            target,
            "position",
            0.0,
            10.0,
            Duration::from_secs(1),
            FadeCurve::SCurve,
        );

        clock.advance(Duration::from_secs(5));
        let mut final_value = None;
        let mut finished = false;
        for _ in 0..50 {
            std::thread::sleep(FADE_TICK);
            while let Ok(ev) = rx.try_recv() {
                match ev {
                    EngineEvent::FadeTick { value, .. } => final_value = Some(value),
                    EngineEvent::FadeFinished { .. } => finished = true,
                    _ => {}
                }
            }
            if finished {
                break;
            }
        }
        assert!(finished, "fade never finished");
        assert_eq!(final_value, Some(10.0));
        assert!(!engine.has_owned(owner));
    }

    #[test]
    fn test_cancel_owned_drops_tasks() {
        let (engine, _clock, _rx) = engine_with_manual_clock();
        let owner = Uuid::new_v4();
        engine.start(
            owner,
            Uuid::new_v4(),
            "volume",
            1.0,
            0.0,
            Duration::from_secs(60),
            FadeCurve::Linear,
        );
        assert!(engine.has_owned(owner));
        engine.cancel_owned(owner);
        assert!(!engine.has_owned(owner));
    }

    #[test]
    fn test_pause_excludes_elapsed_time() {
        let (engine, clock, rx) = engine_with_manual_clock();
        let owner = Uuid::new_v4();
        let target = Uuid::new_v4();
        engine.start(
            owner,
            target,
            "volume",
            0.0,
            100.0,
            Duration::from_secs(4),
            FadeCurve::Linear,
        );

        clock.advance(Duration::from_secs(1));
        engine.pause_owned(owner);
        // Time passing while paused must not advance the fade.
        clock.advance(Duration::from_secs(10));
        engine.resume_owned(owner);
        clock.advance(Duration::from_secs(1));

        assert!(wait_for_value(&rx, 50.0));
    }

    #[test]
    fn test_replacement_on_same_key() {
        let (engine, clock, rx) = engine_with_manual_clock();
        let target = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let replaced = engine.start(
            first,
            target,
            "volume",
            0.0,
            100.0,
            Duration::from_secs(10),
            FadeCurve::Linear,
        );
        assert_eq!(replaced, None);
        let replaced = engine.start(
            second,
            target,
            "volume",
            100.0,
            0.0,
            Duration::from_secs(2),
            FadeCurve::Linear,
        );
        // The evicted fade never finishes; its owner comes back for settling.
        assert_eq!(replaced, Some(first));
        assert!(!engine.has_owned(first));
        assert!(engine.has_owned(second));

        clock.advance(Duration::from_secs(1));
        assert!(wait_for_value(&rx, 50.0));
    }
}
