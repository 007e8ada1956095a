//! Background single-flight sync trigger worker.
//!
//! External collaborators (connectivity-restored events, app foregrounding,
//! post-mutation hooks) fire triggers without waiting for the pass to run.
//! One background task executes passes; requests arriving while a pass is in
//! flight coalesce into at most one further pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::db::{JournalStore, ProfileStore};
use crate::remote::RemoteStore;

use super::SyncEngine;

#[derive(Default)]
struct WorkerState {
    push_pending: AtomicBool,
    pull_pending: AtomicBool,
    closed: AtomicBool,
    wake: Notify,
}

/// Fire-and-forget trigger surface over a [`SyncEngine`].
///
/// Triggers never block the caller and are safe to invoke concurrently.
/// Pass faults are logged, never surfaced: failed records stay dirty and
/// retry on the next trigger.
pub struct SyncWorker {
    state: Arc<WorkerState>,
    task: JoinHandle<()>,
}

impl SyncWorker {
    /// Spawn the worker task for the given engine
    pub fn spawn<L, R, P>(engine: Arc<SyncEngine<L, R, P>>) -> Self
    where
        L: JournalStore + Send + Sync + 'static,
        R: RemoteStore + Send + Sync + 'static,
        P: ProfileStore + Send + Sync + 'static,
    {
        let state = Arc::new(WorkerState::default());
        let shared = Arc::clone(&state);

        let task = tokio::spawn(async move {
            loop {
                let run_push = shared.push_pending.swap(false, Ordering::AcqRel);
                let run_pull = shared.pull_pending.swap(false, Ordering::AcqRel);

                if run_push {
                    if let Err(error) = engine.push_all().await {
                        tracing::warn!(%error, "background push failed");
                    }
                }
                if run_pull {
                    if let Err(error) = engine.pull_all().await {
                        tracing::warn!(%error, "background pull failed");
                    }
                }

                if run_push || run_pull {
                    // Drain requests that arrived while a pass was running
                    continue;
                }
                if shared.closed.load(Ordering::Acquire) {
                    break;
                }
                shared.wake.notified().await;
            }
        });

        Self { state, task }
    }

    /// Request a push pass
    pub fn request_push(&self) {
        self.state.push_pending.store(true, Ordering::Release);
        self.state.wake.notify_one();
    }

    /// Request a pull pass
    pub fn request_pull(&self) {
        self.state.pull_pending.store(true, Ordering::Release);
        self.state.wake.notify_one();
    }

    /// Request a push followed by a pull
    pub fn request_full(&self) {
        self.state.push_pending.store(true, Ordering::Release);
        self.state.pull_pending.store(true, Ordering::Release);
        self.state.wake.notify_one();
    }

    /// Stop the worker after draining already-requested passes.
    ///
    /// Never interrupts a pass mid-record; a pass that started runs each
    /// per-record step to completion.
    pub async fn shutdown(self) {
        self.state.closed.store(true, Ordering::Release);
        self.state.wake.notify_one();
        let _ = self.task.await;
    }
}
