//! Cooperative main loop
//!
//! A single-threaded event loop: dispatched events from other threads plus
//! one-shot deferred timers, consumed in order by whoever drives
//! [`MainLoop::next_event`]. The loop binds to the first thread that polls it.

mod event_loop;
mod timers;

pub use event_loop::MainLoop;
pub use timers::TimerId;
