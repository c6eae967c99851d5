//! WorkerUnit - one OS thread and the main-loop-side view of its progress

use std::fmt;
use std::mem;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, error, info, trace, warn};

use super::config::WorkerConfig;
use super::error::WorkerError;
use crate::console::Console;
use crate::coordinator::CoordEvent;
use crate::dispatcher::DispatchSender;

/// Worker identifier, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(u32);

impl WorkerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of handling one notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Progress moved to the given count, more iterations remain
    Advanced(u32),
    /// The last iteration was just observed; reported exactly once
    Finished,
}

enum Lifecycle {
    Created,
    Running(JoinHandle<()>),
    Joined,
}

/// A worker thread plus its progress counter
///
/// The thread only ever sees its id, a copy of the config and a dispatcher
/// sender. `progress` is owned by whoever holds the `WorkerUnit` (the main
/// loop) and advanced through [`WorkerUnit::on_notified`].
///
/// Once launched, the unit must be joined before it is dropped. Dropping a
/// unit whose thread is still attached panics.
pub struct WorkerUnit {
    id: WorkerId,
    config: WorkerConfig,
    progress: u32,
    notifier: DispatchSender<CoordEvent>,
    console: Console,
    lifecycle: Lifecycle,
    thread_id: Option<ThreadId>,
}

impl WorkerUnit {
    /// Create a worker that will report to `notifier`
    pub fn new(
        id: WorkerId,
        config: WorkerConfig,
        notifier: DispatchSender<CoordEvent>,
        console: Console,
    ) -> Result<Self, WorkerError> {
        debug!(%id, "WorkerUnit::new: called");
        config.validate()?;
        Ok(Self {
            id,
            config,
            progress: 0,
            notifier,
            console,
            lifecycle: Lifecycle::Created,
            thread_id: None,
        })
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn target(&self) -> u32 {
        self.config.iterations
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= self.config.iterations
    }

    pub fn is_unfinished(&self) -> bool {
        !self.is_finished()
    }

    /// Thread launched and not yet joined
    pub fn is_running(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Running(_))
    }

    pub fn is_joined(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Joined)
    }

    /// Id of the worker's OS thread, once launched
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.thread_id
    }

    /// Spawn the worker thread
    pub fn launch(&mut self) -> Result<ThreadId, WorkerError> {
        debug!(id = %self.id, "WorkerUnit::launch: called");
        if !matches!(self.lifecycle, Lifecycle::Created) {
            return Err(WorkerError::AlreadyLaunched(self.id));
        }

        let id = self.id;
        let config = self.config.clone();
        let notifier = self.notifier.clone();
        let console = self.console;

        let handle = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || work(id, &config, &notifier, console))
            .map_err(|source| WorkerError::Spawn { id, source })?;

        let thread_id = handle.thread().id();
        self.thread_id = Some(thread_id);
        self.lifecycle = Lifecycle::Running(handle);

        info!(%id, thread = ?thread_id, "Worker thread created");
        self.console.thread_created(id, thread_id);
        Ok(thread_id)
    }

    /// Handle one notification from the worker thread
    ///
    /// Call only from the main loop thread.
    pub fn on_notified(&mut self) -> Progress {
        self.progress += 1;
        trace!(id = %self.id, progress = self.progress, "WorkerUnit::on_notified");
        self.console.received(self.id, self.progress, thread::current().id());

        if self.progress == self.config.iterations {
            debug!(id = %self.id, "WorkerUnit::on_notified: finished");
            Progress::Finished
        } else {
            if self.progress > self.config.iterations {
                warn!(id = %self.id, progress = self.progress, "Notification after worker finished");
            }
            Progress::Advanced(self.progress)
        }
    }

    /// Wait for the worker thread to exit, returning how long that took
    ///
    /// Only valid once the worker is finished: the thread has sent its last
    /// notification and is on its way out, so this returns promptly.
    pub fn join(&mut self) -> Result<Duration, WorkerError> {
        debug!(id = %self.id, "WorkerUnit::join: called");
        match &self.lifecycle {
            Lifecycle::Created => return Err(WorkerError::NotLaunched(self.id)),
            Lifecycle::Joined => return Err(WorkerError::AlreadyJoined(self.id)),
            Lifecycle::Running(_) if self.is_unfinished() => {
                return Err(WorkerError::Unfinished {
                    id: self.id,
                    progress: self.progress,
                    target: self.config.iterations,
                });
            }
            Lifecycle::Running(_) => {}
        }
        self.join_thread()
    }

    /// Join without the finished check
    ///
    /// For tearing down after a failed run, when notifications will no longer
    /// be processed. Blocks until the thread runs out of iterations.
    pub fn force_join(&mut self) -> Result<Duration, WorkerError> {
        debug!(id = %self.id, "WorkerUnit::force_join: called");
        match &self.lifecycle {
            Lifecycle::Created => Err(WorkerError::NotLaunched(self.id)),
            Lifecycle::Joined => Err(WorkerError::AlreadyJoined(self.id)),
            Lifecycle::Running(_) => self.join_thread(),
        }
    }

    fn join_thread(&mut self) -> Result<Duration, WorkerError> {
        let Lifecycle::Running(handle) = mem::replace(&mut self.lifecycle, Lifecycle::Joined) else {
            return Err(WorkerError::NotLaunched(self.id));
        };

        let start = Instant::now();
        handle.join().map_err(|_| WorkerError::Panicked(self.id))?;
        let elapsed = start.elapsed();
        debug!(id = %self.id, ?elapsed, "WorkerUnit: thread joined");
        Ok(elapsed)
    }
}

impl fmt::Debug for WorkerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerUnit")
            .field("id", &self.id)
            .field("progress", &self.progress)
            .field("target", &self.config.iterations)
            .field("running", &self.is_running())
            .field("joined", &self.is_joined())
            .finish()
    }
}

impl Drop for WorkerUnit {
    fn drop(&mut self) {
        if self.is_running() && !thread::panicking() {
            error!(id = %self.id, progress = self.progress, "Worker dropped while its thread is still attached");
            panic!("worker {} dropped before its thread was joined", self.id);
        }
    }
}

/// Thread body: pause, report, repeat
fn work(id: WorkerId, config: &WorkerConfig, notifier: &DispatchSender<CoordEvent>, console: Console) {
    let mut rng = rand::rng();
    let thread = thread::current().id();

    for step in 1..=config.iterations {
        let pause = rng.random_range(config.pause_range_us());
        thread::sleep(Duration::from_micros(pause));

        console.emitted(id, step, thread);
        if notifier.send(CoordEvent::Progress(id)).is_err() {
            warn!(%id, step, "Main loop gone, worker stopping early");
            return;
        }
    }

    debug!(%id, "Worker thread done");
}
