//! MainLoop implementation

use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::timers::{TimerId, Timers};
use crate::dispatcher::{DispatchSender, Dispatcher};

/// Single-threaded cooperative event loop
///
/// Events come from two places: [`DispatchSender`]s held by other threads and
/// one-shot timers scheduled with [`MainLoop::timeout_once`]. The loop runs
/// until [`MainLoop::quit`] is called. It keeps a sender of its own, so it
/// never stops just because every other sender went away.
pub struct MainLoop<E> {
    dispatcher: Dispatcher<E>,
    timers: Timers<E>,
    running: bool,
    owner: Option<ThreadId>,
}

impl<E> MainLoop<E> {
    /// Create a new, not yet bound, main loop
    pub fn new() -> Self {
        debug!("MainLoop::new: called");
        Self {
            dispatcher: Dispatcher::new(),
            timers: Timers::new(),
            running: true,
            owner: None,
        }
    }

    /// Get a sender for posting events from any thread
    pub fn sender(&self) -> DispatchSender<E> {
        self.dispatcher.sender()
    }

    /// Schedule `event` for delivery once `delay` has elapsed
    ///
    /// The event is delivered at most once, on the loop's thread.
    pub fn timeout_once(&mut self, delay: Duration, event: E) -> TimerId {
        let id = self.timers.schedule(Instant::now() + delay, event);
        debug!(%id, ?delay, "MainLoop::timeout_once: scheduled");
        id
    }

    /// Stop the loop; subsequent `next_event` calls return `None`
    pub fn quit(&mut self) {
        if self.running {
            info!(
                pending_timers = self.timers.len(),
                pending_events = self.dispatcher.pending(),
                "Main loop quitting"
            );
        }
        self.running = false;
    }

    /// Whether `quit` has not been called yet
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The thread this loop is bound to, once it has been polled
    pub fn owner(&self) -> Option<ThreadId> {
        self.owner
    }

    /// Number of timers that have not fired yet
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Wait for the next event
    ///
    /// Due timers are delivered before queued events. Suspends until a timer
    /// is due or an event arrives. Returns `None` once the loop has quit.
    pub async fn next_event(&mut self) -> Option<E> {
        self.bind_to_current_thread();

        loop {
            if !self.running {
                return None;
            }

            if let Some((id, event)) = self.timers.pop_due(Instant::now()) {
                debug!(%id, "MainLoop::next_event: timer fired");
                return Some(event);
            }

            match self.timers.next_deadline() {
                Some(deadline) => {
                    tokio::select! {
                        received = self.dispatcher.recv() => return received,
                        _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => continue,
                    }
                }
                None => return self.dispatcher.recv().await,
            }
        }
    }

    fn bind_to_current_thread(&mut self) {
        let current = thread::current().id();
        match self.owner {
            None => {
                debug!(thread = ?current, "MainLoop: bound to thread");
                self.owner = Some(current);
            }
            Some(owner) => debug_assert_eq!(owner, current, "MainLoop polled from a thread it does not belong to"),
        }
    }
}

impl<E> Default for MainLoop<E> {
    fn default() -> Self {
        Self::new()
    }
}
