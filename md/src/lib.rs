//! maindispatch - worker threads reporting to a single main loop
//!
//! N worker threads each run a fixed number of iterations and, after every
//! iteration, post a notification to the main loop. The coordinator owns all
//! shared counters and only touches them on the loop thread, so no locks are
//! involved anywhere.
//!
//! # Modules
//!
//! - [`dispatcher`] - many-producer, single-consumer channel into the loop
//! - [`mainloop`] - cooperative event loop with one-shot timers
//! - [`worker`] - worker units and their threads
//! - [`coordinator`] - owns the loop and the workers, sequences the run
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//!
//! # Example
//!
//! ```ignore
//! use maindispatch::{Coordinator, CoordinatorConfig, WorkerConfig};
//!
//! let coordinator = Coordinator::new(CoordinatorConfig::default(), WorkerConfig::default())?;
//! let report = coordinator.run().await?;
//! assert_eq!(report.notifications_received, 40);
//! ```

pub mod cli;
pub mod config;
pub mod console;
pub mod coordinator;
pub mod dispatcher;
pub mod mainloop;
pub mod worker;

pub use config::Config;
pub use console::Console;
pub use coordinator::{CoordEvent, Coordinator, CoordinatorConfig, CoordinatorState, RunReport, WorkerReport};
pub use dispatcher::{DispatchError, DispatchSender, Dispatcher};
pub use mainloop::{MainLoop, TimerId};
pub use worker::{Progress, WorkerConfig, WorkerError, WorkerId, WorkerUnit};
