//! Event and report types for the Coordinator

use std::collections::BTreeMap;
use std::fmt;
use std::thread::ThreadId;
use std::time::Duration;

use crate::worker::WorkerId;

/// Events delivered to the coordinator's main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordEvent {
    /// A worker finished one iteration (posted from the worker thread)
    Progress(WorkerId),

    /// One-shot launch timer fired
    LaunchThreads,
}

/// Coordinator lifecycle, traversed once in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Launching,
    Running,
    Stopped,
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CoordinatorState::Idle => "idle",
            CoordinatorState::Launching => "launching",
            CoordinatorState::Running => "running",
            CoordinatorState::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

/// What the coordinator observed for one worker
#[derive(Debug, Clone, Default)]
pub struct WorkerReport {
    pub notifications: u32,
    pub finished_callbacks: u32,
    pub progress_at_finish: Option<u32>,
    pub join_time: Option<Duration>,
    pub thread: Option<ThreadId>,
}

/// Summary of a completed coordinator run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub notifications_received: u64,
    pub workers: BTreeMap<WorkerId, WorkerReport>,
    pub finished_order: Vec<WorkerId>,
    pub launches: u32,
    pub ignored_launches: u32,
    pub transitions: Vec<CoordinatorState>,
    /// Thread every event was handled on
    pub dispatch_thread: Option<ThreadId>,
}

impl RunReport {
    pub(crate) fn new(ids: impl IntoIterator<Item = WorkerId>) -> Self {
        Self {
            workers: ids.into_iter().map(|id| (id, WorkerReport::default())).collect(),
            transitions: vec![CoordinatorState::Idle],
            ..Default::default()
        }
    }

    pub fn worker(&self, id: WorkerId) -> Option<&WorkerReport> {
        self.workers.get(&id)
    }

    pub(crate) fn worker_mut(&mut self, id: WorkerId) -> Option<&mut WorkerReport> {
        self.workers.get_mut(&id)
    }

    /// Slowest join across all workers
    pub fn max_join_time(&self) -> Duration {
        self.workers
            .values()
            .filter_map(|w| w.join_time)
            .max()
            .unwrap_or_default()
    }

    /// Every worker saw exactly one finished callback
    pub fn all_finished_once(&self) -> bool {
        self.workers.values().all(|w| w.finished_callbacks == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_has_entry_per_worker() {
        let report = RunReport::new((1..=3).map(WorkerId::new));
        assert_eq!(report.workers.len(), 3);
        assert_eq!(report.transitions, vec![CoordinatorState::Idle]);
        assert!(report.worker(WorkerId::new(2)).is_some());
        assert!(report.worker(WorkerId::new(4)).is_none());
        assert!(!report.all_finished_once());
    }

    #[test]
    fn test_max_join_time() {
        let mut report = RunReport::new((1..=2).map(WorkerId::new));
        assert_eq!(report.max_join_time(), Duration::ZERO);

        report.worker_mut(WorkerId::new(1)).unwrap().join_time = Some(Duration::from_millis(3));
        report.worker_mut(WorkerId::new(2)).unwrap().join_time = Some(Duration::from_millis(7));
        assert_eq!(report.max_join_time(), Duration::from_millis(7));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(CoordinatorState::Launching.to_string(), "launching");
        assert_eq!(CoordinatorState::Stopped.to_string(), "stopped");
    }
}
