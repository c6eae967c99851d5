//! Cross-thread dispatcher
//!
//! A many-producer, single-consumer channel bound to the main loop. Any thread
//! may hold a [`DispatchSender`] and post events; only the loop that owns the
//! [`Dispatcher`] receives them, so every handler runs on the loop's thread.
//!
//! ```text
//!  worker-1 ──┐
//!  worker-2 ──┼── DispatchSender::send ──▶ [ queue + wake-up ] ──▶ Dispatcher::recv (main loop)
//!  worker-N ──┘
//! ```
//!
//! Events from one sender arrive in the order they were sent. Events from
//! different senders interleave in no particular order.

mod channel;

pub use channel::{DispatchError, DispatchSender, Dispatcher};
