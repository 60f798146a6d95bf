//! Subprocess supervision for Command cues.
//!
//! Each spawn gets a watcher thread that forwards stdout lines and reports
//! the exit status over the engine queue. Stopping sends SIGTERM or SIGKILL
//! on unix; elsewhere it falls back to `Child::kill`.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;
use uuid::Uuid;

use super::events::EngineEvent;
use crate::config::{PROC_POLL, SHELL};
use crate::error::CueError;

/// How to stop a running subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// SIGTERM: let the process clean up.
    Terminate,
    /// SIGKILL: immediate.
    Kill,
}

struct ChildHandle {
    child: Arc<Mutex<Child>>,
    pid: u32,
}

type ChildMap = HashMap<Uuid, ChildHandle>;

pub struct ProcessSupervisor {
    children: Arc<Mutex<ChildMap>>,
    tx: Sender<EngineEvent>,
}

impl ProcessSupervisor {
    pub fn new(tx: Sender<EngineEvent>) -> Self {
        Self {
            children: Arc::new(Mutex::new(HashMap::new())),
            tx,
        }
    }

    /// Spawn `command` through the platform shell for `cue_id`. The caller
    /// stops any previous child first; a new spawn takes over the handle
    /// slot either way.
    pub fn spawn(&self, cue_id: Uuid, command: &str, discard_output: bool) -> Result<(), CueError> {
        let (shell, flag) = SHELL;
        let mut cmd = Command::new(shell);
        cmd.arg(flag)
            .arg(command)
            .stdin(Stdio::null())
            .stderr(Stdio::null());
        if discard_output {
            cmd.stdout(Stdio::null());
        } else {
            cmd.stdout(Stdio::piped());
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| CueError::ProcessExecution(format!("spawn '{command}': {e}")))?;
        let pid = child.id();
        log::info!("spawned pid {pid} for cue {cue_id}: {command}");

        let stdout = child.stdout.take();
        let child = Arc::new(Mutex::new(child));
        {
            let mut children = self.children.lock().expect("child map lock poisoned");
            children.insert(cue_id, ChildHandle {
                child: child.clone(),
                pid,
            });
        }

        let tx = self.tx.clone();
        let children = self.children.clone();
        let watcher = move || {
            if let Some(stdout) = stdout {
                for line in BufReader::new(stdout).lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(EngineEvent::ProcessOutput { cue_id, line }).is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
            }
            // stdout is closed (or was never piped); poll for the exit status.
            let code = loop {
                let status = {
                    let mut child = child.lock().expect("child lock poisoned");
                    child.try_wait()
                };
                match status {
                    Ok(Some(status)) => break status.code(),
                    Ok(None) => std::thread::sleep(PROC_POLL),
                    Err(e) => {
                        log::warn!("wait failed for pid {pid}: {e}");
                        break None;
                    }
                }
            };
            log::debug!("pid {pid} exited with {code:?}");
            {
                let mut children = children.lock().expect("child map lock poisoned");
                // Only remove if this watcher's child is still the current one.
                if children.get(&cue_id).map(|h| h.pid) == Some(pid) {
                    children.remove(&cue_id);
                }
            }
            let _ = tx.send(EngineEvent::ProcessExited { cue_id, code });
        };
        std::thread::Builder::new()
            .name(format!("proc-watch-{pid}"))
            .spawn(watcher)
            .map_err(|e| CueError::ProcessExecution(format!("watcher thread: {e}")))?;
        Ok(())
    }

    /// Stop the child of `cue_id`, if any. Stopping a cue with no live child
    /// is a no-op.
    pub fn stop(&self, cue_id: Uuid, mode: StopMode) -> Result<(), CueError> {
        let handle = {
            let children = self.children.lock().expect("child map lock poisoned");
            children
                .get(&cue_id)
                .map(|h| (h.child.clone(), h.pid))
        };
        let Some((child, pid)) = handle else {
            return Ok(());
        };
        log::info!("stopping pid {pid} ({mode:?})");

        #[cfg(unix)]
        {
            let _ = child;
            let sig = match mode {
                StopMode::Terminate => libc::SIGTERM,
                StopMode::Kill => libc::SIGKILL,
            };
            let rc = unsafe { libc::kill(pid as i32, sig) };
            if rc != 0 {
                // ESRCH: the child already exited between lookup and signal.
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() != Some(libc::ESRCH) {
                    return Err(CueError::ProcessExecution(format!(
                        "signal pid {pid}: {err}"
                    )));
                }
            }
            Ok(())
        }
        #[cfg(not(unix))]
        {
            let _ = mode;
            let mut child = child.lock().expect("child lock poisoned");
            match child.kill() {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
                Err(e) => Err(CueError::ProcessExecution(format!("kill pid {pid}: {e}"))),
            }
        }
    }

    pub fn is_running(&self, cue_id: Uuid) -> bool {
        let children = self.children.lock().expect("child map lock poisoned");
        children.contains_key(&cue_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_exit(
        rx: &crossbeam_channel::Receiver<EngineEvent>,
        cue: Uuid,
    ) -> (Vec<String>, Option<i32>) {
        let mut lines = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(EngineEvent::ProcessOutput { cue_id, line }) if cue_id == cue => {
                    lines.push(line)
                }
                Ok(EngineEvent::ProcessExited { cue_id, code }) if cue_id == cue => {
                    return (lines, code)
                }
                _ => {}
            }
        }
        panic!("process never exited");
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_captures_output_and_exit() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let procs = ProcessSupervisor::new(tx);
        let cue = Uuid::new_v4();
        procs.spawn(cue, "echo hello", false).unwrap();

        let (lines, code) = wait_for_exit(&rx, cue);
        assert_eq!(lines, vec!["hello".to_string()]);
        assert_eq!(code, Some(0));
        assert!(!procs.is_running(cue));
    }

    #[test]
    #[cfg(unix)]
    fn test_discard_output_still_reports_exit() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let procs = ProcessSupervisor::new(tx);
        let cue = Uuid::new_v4();
        procs.spawn(cue, "echo ignored; exit 3", true).unwrap();

        let (lines, code) = wait_for_exit(&rx, cue);
        assert!(lines.is_empty());
        assert_eq!(code, Some(3));
    }

    #[test]
    #[cfg(unix)]
    fn test_kill_long_running_child() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let procs = ProcessSupervisor::new(tx);
        let cue = Uuid::new_v4();
        procs.spawn(cue, "sleep 30", false).unwrap();
        assert!(procs.is_running(cue));

        procs.stop(cue, StopMode::Kill).unwrap();
        let (_, code) = wait_for_exit(&rx, cue);
        // Killed by signal, no exit code.
        assert_eq!(code, None);
    }

    #[test]
    fn test_stop_without_child_is_noop() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let procs = ProcessSupervisor::new(tx);
        assert!(procs.stop(Uuid::new_v4(), StopMode::Terminate).is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn test_missing_binary_reports_nonzero_exit() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let procs = ProcessSupervisor::new(tx);
        let cue = Uuid::new_v4();
        procs
            .spawn(cue, "/definitely/not/a/binary", true)
            .unwrap();
        let (_, code) = wait_for_exit(&rx, cue);
        assert_ne!(code, Some(0));
    }
}
