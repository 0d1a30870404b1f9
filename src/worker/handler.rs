//! The background index worker.
//!
//! One thread owns every build. Callers never run the builder themselves;
//! they post a request into a single slot and the worker picks it up:
//!
//! ```text
//!  request()/rebuild() ──► Slot { pending, requested } ──► worker loop
//!                                   ▲                         │
//!  update_settings() ── cancel ─────┘                         ▼
//!                                                 IndexState::run_build
//!                                                             │
//!  rebuild() waiters ◄── done.notify_all ◄── completed = ticket
//! ```
//!
//! Every request gets a ticket. A build records the newest ticket present
//! when it started and, once finished, marks all tickets up to it served, so
//! requests that arrive mid-build coalesce into the next single build.

use super::messages::BuildTrigger;
use crate::domain::error::{QuickdexError, Result};
use crate::index::{BuildAttempt, CancelToken, IndexBuilder, IndexState, RebuildOutcome};
use crate::settings::{SearchSettings, SettingsChange};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

#[derive(Debug)]
struct Slot {
    pending: Option<BuildTrigger>,
    /// Newest ticket handed out.
    requested: u64,
    /// Newest ticket covered by a finished build.
    completed: u64,
    last_outcome: Option<RebuildOutcome>,
    settings: SearchSettings,
    /// Token of the build in flight, if any.
    cancel: CancelToken,
    shutdown: bool,
}

#[derive(Debug)]
struct Shared {
    slot: Mutex<Slot>,
    /// Wakes the worker thread.
    wake: Condvar,
    /// Wakes callers blocked in `rebuild`.
    done: Condvar,
}

/// Handle to the background index worker.
///
/// Dropping the handle stops the thread.
#[derive(Debug)]
pub struct IndexWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl IndexWorker {
    /// Spawns the worker and queues the startup build.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(state: Arc<IndexState>, builder: IndexBuilder, settings: SearchSettings) -> Result<Self> {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot {
                pending: Some(BuildTrigger::Startup),
                requested: 1,
                completed: 0,
                last_outcome: None,
                settings,
                cancel: CancelToken::new(),
                shutdown: false,
            }),
            wake: Condvar::new(),
            done: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name("quickdex-index".to_string())
            .spawn(move || run(&thread_shared, &state, &builder))?;

        tracing::debug!("index worker started");
        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Queues a build without waiting for it.
    pub fn request(&self, trigger: BuildTrigger) {
        let mut slot = self.shared.slot.lock();
        if slot.shutdown {
            return;
        }
        enqueue(&mut slot, trigger);
        self.shared.wake.notify_one();
    }

    /// Requests a build and blocks until one that started after this call finishes.
    ///
    /// Concurrent callers share a single build.
    ///
    /// # Errors
    ///
    /// Returns [`QuickdexError::Worker`] if the worker stops before serving the request.
    pub fn rebuild(&self) -> Result<RebuildOutcome> {
        let mut slot = self.shared.slot.lock();
        if slot.shutdown {
            return Err(stopped());
        }
        let ticket = enqueue(&mut slot, BuildTrigger::Explicit);
        self.shared.wake.notify_one();

        while slot.completed < ticket {
            if slot.shutdown {
                return Err(stopped());
            }
            self.shared.done.wait(&mut slot);
        }
        slot.last_outcome.clone().ok_or_else(stopped)
    }

    /// Blocks until every request made before this call has been served.
    ///
    /// # Errors
    ///
    /// Returns [`QuickdexError::Worker`] if the worker stops first.
    pub fn wait_idle(&self) -> Result<()> {
        let mut slot = self.shared.slot.lock();
        let ticket = slot.requested;
        while slot.completed < ticket {
            if slot.shutdown {
                return Err(stopped());
            }
            self.shared.done.wait(&mut slot);
        }
        Ok(())
    }

    /// Hands the worker a new settings record.
    ///
    /// A change to what is indexed cancels the build in flight and queues a
    /// fresh one; a refresh-interval change only re-arms the timer.
    pub fn apply_settings(&self, settings: SearchSettings, change: SettingsChange) {
        let mut slot = self.shared.slot.lock();
        slot.settings = settings;
        match change {
            SettingsChange::Unchanged => return,
            SettingsChange::RefreshOnly => {}
            SettingsChange::Index => {
                slot.cancel.cancel();
                enqueue(&mut slot, BuildTrigger::SettingsChanged);
            }
        }
        self.shared.wake.notify_one();
    }

    /// Stops the worker, cancelling the build in flight and waking waiters.
    pub fn shutdown(&mut self) {
        {
            let mut slot = self.shared.slot.lock();
            if slot.shutdown && self.handle.is_none() {
                return;
            }
            slot.shutdown = true;
            slot.cancel.cancel();
        }
        self.shared.wake.notify_all();
        self.shared.done.notify_all();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("index worker panicked");
            }
        }
        tracing::debug!("index worker stopped");
    }
}

impl Drop for IndexWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn stopped() -> QuickdexError {
    QuickdexError::Worker("index worker stopped".to_string())
}

fn enqueue(slot: &mut Slot, trigger: BuildTrigger) -> u64 {
    slot.pending = Some(BuildTrigger::merge(slot.pending, trigger));
    slot.requested += 1;
    slot.requested
}

/// Worker loop: wait for a request or the refresh deadline, build, repeat.
fn run(shared: &Shared, state: &IndexState, builder: &IndexBuilder) {
    let mut last_finished = Instant::now();

    loop {
        let (trigger, ticket, settings, cancel) = {
            let mut slot = shared.slot.lock();
            let trigger = loop {
                if slot.shutdown {
                    return;
                }
                if let Some(trigger) = slot.pending.take() {
                    break trigger;
                }
                let deadline = last_finished + slot.settings.refresh_interval();
                if Instant::now() >= deadline {
                    slot.requested += 1;
                    break BuildTrigger::Timer;
                }
                shared.wake.wait_until(&mut slot, deadline);
            };
            slot.cancel = CancelToken::new();
            (trigger, slot.requested, slot.settings.clone(), slot.cancel.clone())
        };

        let span = tracing::info_span!("index_worker_build", trigger = %trigger, ticket);
        let _guard = span.enter();

        let attempt = state.run_build(builder, &settings, &cancel);
        last_finished = Instant::now();

        let mut slot = shared.slot.lock();
        match attempt {
            BuildAttempt::Published(outcome) | BuildAttempt::Failed(outcome) => {
                slot.completed = slot.completed.max(ticket);
                slot.last_outcome = Some(outcome);
            }
            BuildAttempt::Cancelled => {
                // superseded; the request that cancelled it is already pending
                tracing::debug!("build superseded");
            }
        }
        drop(slot);
        shared.done.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NoApplications;
    use std::path::PathBuf;

    fn settings(roots: Vec<PathBuf>) -> SearchSettings {
        SearchSettings {
            roots,
            exclude_patterns: Vec::new(),
            ..SearchSettings::default()
        }
    }

    fn spawn(roots: Vec<PathBuf>) -> (Arc<IndexState>, IndexWorker) {
        let state = Arc::new(IndexState::default());
        let builder = IndexBuilder::new(Arc::new(NoApplications));
        let worker = IndexWorker::spawn(Arc::clone(&state), builder, settings(roots)).unwrap();
        (state, worker)
    }

    #[test]
    fn startup_build_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let (state, worker) = spawn(vec![dir.path().to_path_buf()]);
        worker.wait_idle().unwrap();
        assert!(state.status().ready);
        assert!(state.snapshot().version() >= 1);
    }

    #[test]
    fn rebuild_returns_fresh_outcome() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let (state, worker) = spawn(vec![dir.path().to_path_buf()]);
        worker.wait_idle().unwrap();
        let before = state.snapshot().version();

        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
        let outcome = worker.rebuild().unwrap();
        assert!(outcome.success);
        assert!(state.snapshot().version() > before);
        assert_eq!(outcome.indexed_items, state.snapshot().len());
    }

    #[test]
    fn queued_request_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let (state, worker) = spawn(vec![dir.path().to_path_buf()]);
        worker.wait_idle().unwrap();
        let before = state.snapshot().version();

        worker.request(BuildTrigger::Explicit);
        worker.wait_idle().unwrap();
        assert_eq!(state.snapshot().version(), before + 1);
    }

    #[test]
    fn concurrent_rebuilds_coalesce() {
        let dir = tempfile::tempdir().unwrap();
        let (state, worker) = spawn(vec![dir.path().to_path_buf()]);
        worker.wait_idle().unwrap();
        let before = state.snapshot().version();

        let worker = Arc::new(worker);
        let callers: Vec<_> = (0..8)
            .map(|_| {
                let worker = Arc::clone(&worker);
                std::thread::spawn(move || worker.rebuild().unwrap())
            })
            .collect();
        for caller in callers {
            assert!(caller.join().unwrap().success);
        }
        // at most one build in flight plus one pending build per wave
        let builds = state.snapshot().version() - before;
        assert!((1..=8).contains(&builds));
    }

    #[test]
    fn settings_change_triggers_build() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join("note.md"), b"x").unwrap();
        let (state, worker) = spawn(vec![first.path().to_path_buf()]);
        worker.wait_idle().unwrap();

        worker.apply_settings(settings(vec![second.path().to_path_buf()]), SettingsChange::Index);
        worker.wait_idle().unwrap();

        let snapshot = state.snapshot();
        assert!(snapshot
            .items()
            .iter()
            .any(|item| item.title == "note.md"));
    }

    #[test]
    fn shutdown_rejects_new_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, mut worker) = spawn(vec![dir.path().to_path_buf()]);
        worker.shutdown();
        assert!(matches!(worker.rebuild(), Err(QuickdexError::Worker(_))));
        // second shutdown is a no-op
        worker.shutdown();
    }
}
