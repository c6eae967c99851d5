//! Coordinator event loop implementation

use std::time::Duration;

use eyre::{Context, Result, eyre};
use tracing::{debug, error, info, warn};

use super::config::CoordinatorConfig;
use super::messages::{CoordEvent, CoordinatorState, RunReport};
use crate::console::Console;
use crate::mainloop::{MainLoop, TimerId};
use crate::worker::{Progress, WorkerConfig, WorkerId, WorkerUnit};

/// Owns the main loop and all worker units
///
/// Every method runs on the loop thread. Worker threads only reach the
/// coordinator through [`CoordEvent`]s posted to the loop.
pub struct Coordinator {
    config: CoordinatorConfig,
    main_loop: MainLoop<CoordEvent>,
    workers: Vec<WorkerUnit>,
    state: CoordinatorState,
    report: RunReport,
    console: Console,
}

impl Coordinator {
    /// Create the coordinator and its worker units (ids `1..=workers`)
    ///
    /// If any unit fails to build, the ones already built are dropped before
    /// the error is returned. None of them has been launched yet.
    pub fn new(config: CoordinatorConfig, worker_config: WorkerConfig) -> Result<Self> {
        debug!(?config, ?worker_config, "Coordinator::new: called");
        config.validate()?;

        let main_loop = MainLoop::new();
        let console = Console::new(config.echo);

        let workers = (1..=config.workers)
            .map(|id| WorkerUnit::new(WorkerId::new(id), worker_config.clone(), main_loop.sender(), console))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to create worker units")?;

        let report = RunReport::new(workers.iter().map(WorkerUnit::id));

        Ok(Self {
            config,
            main_loop,
            workers,
            state: CoordinatorState::Idle,
            report,
            console,
        })
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn workers(&self) -> &[WorkerUnit] {
        &self.workers
    }

    /// Schedule the one-shot "launch all workers" action
    ///
    /// Scheduling it more than once is harmless: only the first firing
    /// launches anything.
    pub fn schedule_launch(&mut self, delay: Duration) -> TimerId {
        debug!(?delay, "Coordinator::schedule_launch: called");
        self.main_loop.timeout_once(delay, CoordEvent::LaunchThreads)
    }

    /// Run the main loop until every worker has finished and been joined
    ///
    /// Consumes the coordinator; when this returns, all worker threads have
    /// been joined.
    pub async fn run(mut self) -> Result<RunReport> {
        let delay = self.config.launch_delay();
        self.console.launch_delay(self.config.launch_delay_ms);
        self.schedule_launch(delay);

        info!(workers = self.workers.len(), ?delay, "Coordinator started");

        if let Err(e) = self.process_events().await {
            error!(error = %e, "Coordinator failed, joining launched workers");
            self.abort_workers();
            return Err(e);
        }

        self.report.dispatch_thread = self.main_loop.owner();
        info!(
            notifications = self.report.notifications_received,
            max_join_time = ?self.report.max_join_time(),
            "Coordinator stopped"
        );
        Ok(self.report)
    }

    async fn process_events(&mut self) -> Result<()> {
        while let Some(event) = self.main_loop.next_event().await {
            match event {
                CoordEvent::LaunchThreads => self.launch_threads()?,
                CoordEvent::Progress(id) => self.on_notified(id)?,
            }
        }
        Ok(())
    }

    /// Launch every worker thread; fires once
    fn launch_threads(&mut self) -> Result<()> {
        if self.state != CoordinatorState::Idle {
            warn!(state = %self.state, "Launch already happened, ignoring");
            self.report.ignored_launches += 1;
            return Ok(());
        }

        self.transition(CoordinatorState::Launching);
        self.report.launches += 1;
        info!(count = self.workers.len(), "Launching worker threads");
        self.console.launching(self.workers.len());

        for worker in &mut self.workers {
            let id = worker.id();
            let thread = worker
                .launch()
                .with_context(|| format!("Failed to launch worker {}", id))?;
            if let Some(record) = self.report.worker_mut(id) {
                record.thread = Some(thread);
            }
        }

        self.console.separator();
        self.transition(CoordinatorState::Running);
        Ok(())
    }

    fn on_notified(&mut self, id: WorkerId) -> Result<()> {
        self.report.notifications_received += 1;

        let progress = self.worker_mut(id)?.on_notified();
        if let Some(record) = self.report.worker_mut(id) {
            record.notifications += 1;
        }

        if progress == Progress::Finished {
            self.on_worker_finished(id)?;
        }
        Ok(())
    }

    /// Join a finished worker and quit the loop if it was the last one
    fn on_worker_finished(&mut self, id: WorkerId) -> Result<()> {
        debug!(%id, "Coordinator::on_worker_finished: called");
        let worker = self.worker_mut(id)?;
        let progress = worker.progress();
        let join_time = worker.join().with_context(|| format!("Failed to join worker {}", id))?;

        info!(%id, ?join_time, "Worker finished");
        self.console.finished(id);

        if let Some(record) = self.report.worker_mut(id) {
            record.finished_callbacks += 1;
            record.progress_at_finish = Some(progress);
            record.join_time = Some(join_time);
        }
        self.report.finished_order.push(id);

        if self.workers.iter().all(|w| w.is_finished() && w.is_joined()) {
            info!("All workers finished");
            self.main_loop.quit();
            self.transition(CoordinatorState::Stopped);
        }
        Ok(())
    }

    fn worker_mut(&mut self, id: WorkerId) -> Result<&mut WorkerUnit> {
        self.workers
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or_else(|| eyre!("Unknown worker {}", id))
    }

    fn transition(&mut self, next: CoordinatorState) {
        debug!(from = %self.state, to = %next, "Coordinator state change");
        self.state = next;
        self.report.transitions.push(next);
    }

    /// Join every still-attached worker after a failed run
    fn abort_workers(&mut self) {
        for worker in self.workers.iter_mut().filter(|w| w.is_running()) {
            if let Err(e) = worker.force_join() {
                warn!(id = %worker.id(), error = %e, "Failed to join worker during abort");
            }
        }
        self.main_loop.quit();
    }
}
