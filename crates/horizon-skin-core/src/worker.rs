//! Dedicated background thread for threaded commands.
//!
//! A [`Worker`] owns one thread and a FIFO job queue guarded by a
//! `parking_lot` mutex. Jobs are plain closures; they never touch widget
//! state and report back by posting an event to their window's queue.
//!
//! Shutdown discards every job that has not started yet and then joins the
//! thread, so a job that is already running always finishes.
//!
//! # Example
//!
//! ```no_run
//! use horizon_skin_core::{EventQueue, SkinEvent, Worker};
//!
//! let queue = EventQueue::new();
//! let sender = queue.sender();
//! let worker = Worker::spawn("export").unwrap();
//!
//! worker
//!     .submit(move || {
//!         let _ = sender.post(SkinEvent::WorkerDone {
//!             command: "export".into(),
//!             result: Ok("done".into()),
//!         });
//!     })
//!     .unwrap();
//!
//! worker.shutdown_and_join();
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{CoreError, CoreResult};
use crate::logging::targets;

/// A unit of background work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Queue state shared between the handle and the thread.
#[derive(Default)]
struct QueueState {
    jobs: VecDeque<Job>,
    /// A job is executing right now.
    busy: bool,
    shutdown: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    /// Signalled when a job is queued or shutdown is requested.
    work_available: Condvar,
    /// Signalled whenever the worker goes idle.
    idle: Condvar,
}

/// A single background thread processing jobs in submission order.
pub struct Worker {
    name: String,
    shared: Arc<Shared>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("pending", &self.pending())
            .finish()
    }
}

impl Worker {
    /// Start a worker thread with the given name.
    pub fn spawn(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState::default()),
            work_available: Condvar::new(),
            idle: Condvar::new(),
        });

        let thread_shared = shared.clone();
        let handle = thread::Builder::new()
            .name(format!("horizon-skin-{name}"))
            .spawn(move || worker_loop(&thread_shared))
            .map_err(|source| CoreError::WorkerSpawn {
                name: name.clone(),
                source,
            })?;

        tracing::debug!(target: targets::WORKER, worker = %name, "worker started");

        Ok(Self {
            name,
            shared,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// The worker's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a job. Fails once shutdown has been requested.
    pub fn submit<F>(&self, job: F) -> CoreResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.state.lock();
        if state.shutdown {
            return Err(CoreError::WorkerStopped(self.name.clone()));
        }
        state.jobs.push_back(Box::new(job));
        tracing::trace!(
            target: targets::WORKER,
            worker = %self.name,
            pending = state.jobs.len(),
            "job queued"
        );
        drop(state);
        self.shared.work_available.notify_one();
        Ok(())
    }

    /// Number of queued jobs that have not started.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().jobs.len()
    }

    /// Check whether the worker still accepts jobs.
    pub fn is_running(&self) -> bool {
        !self.shared.state.lock().shutdown
    }

    /// Block until the queue is empty and no job is executing, or until the
    /// timeout elapses. Returns `true` when the worker went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.busy || !state.jobs.is_empty() {
            if self.shared.idle.wait_until(&mut state, deadline).timed_out() {
                return !state.busy && state.jobs.is_empty();
            }
        }
        true
    }

    /// Stop accepting jobs and discard those not yet started.
    ///
    /// Returns the number of discarded jobs.
    pub fn shutdown(&self) -> usize {
        let mut state = self.shared.state.lock();
        let discarded = state.jobs.len();
        state.jobs.clear();
        state.shutdown = true;
        drop(state);
        self.shared.work_available.notify_all();

        if discarded > 0 {
            tracing::debug!(
                target: targets::WORKER,
                worker = %self.name,
                discarded,
                "pending jobs discarded"
            );
        }
        discarded
    }

    /// Wait for the thread to exit. Returns `false` if it was already joined
    /// or a job panicked.
    pub fn join(&self) -> bool {
        let Some(handle) = self.handle.lock().take() else {
            return false;
        };
        let ok = handle.join().is_ok();
        if !ok {
            tracing::error!(target: targets::WORKER, worker = %self.name, "worker thread panicked");
        }
        ok
    }

    /// Shut down and join.
    pub fn shutdown_and_join(&self) -> bool {
        self.shutdown();
        self.join()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let job = {
            let mut state = shared.state.lock();
            state.busy = false;
            loop {
                if state.shutdown {
                    shared.idle.notify_all();
                    return;
                }
                if let Some(job) = state.jobs.pop_front() {
                    state.busy = true;
                    break job;
                }
                shared.idle.notify_all();
                shared.work_available.wait(&mut state);
            }
        };
        job();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_jobs_run_in_order() {
        let worker = Worker::spawn("order").unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let log = log.clone();
            worker.submit(move || log.lock().push(i)).unwrap();
        }
        assert!(worker.wait_idle(Duration::from_secs(5)));
        assert_eq!(*log.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let worker = Worker::spawn("closed").unwrap();
        worker.shutdown();
        assert!(!worker.is_running());
        assert!(matches!(
            worker.submit(|| {}),
            Err(CoreError::WorkerStopped(name)) if name == "closed"
        ));
        assert!(worker.join());
        assert!(!worker.join());
    }

    #[test]
    fn test_shutdown_discards_pending_but_finishes_running() {
        let worker = Worker::spawn("discard").unwrap();
        let gate = Arc::new((Mutex::new(false), Condvar::new()));
        let ran = Arc::new(AtomicUsize::new(0));

        {
            let gate = gate.clone();
            let ran = ran.clone();
            worker
                .submit(move || {
                    let (lock, cvar) = &*gate;
                    let mut open = lock.lock();
                    while !*open {
                        cvar.wait(&mut open);
                    }
                    ran.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        for _ in 0..3 {
            let ran = ran.clone();
            worker
                .submit(move || {
                    ran.fetch_add(10, Ordering::SeqCst);
                })
                .unwrap();
        }

        // Wait until the first job has been picked up.
        while worker.pending() == 4 {
            thread::yield_now();
        }
        let discarded = worker.shutdown();
        *gate.0.lock() = true;
        gate.1.notify_all();
        worker.join();

        assert_eq!(discarded, 3);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
