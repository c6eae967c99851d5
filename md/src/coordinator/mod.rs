//! Coordinator - owner of the main loop and of every worker unit
//!
//! Workers never touch coordinator state. They post [`CoordEvent::Progress`]
//! through the dispatcher, and the coordinator applies it on the loop thread:
//!
//! - **Idle:** loop running, launch timer pending
//! - **Launching:** timer fired, worker threads being spawned
//! - **Running:** all threads started, notifications flowing
//! - **Stopped:** last worker finished and joined, loop quit

mod config;
mod engine;
mod messages;

pub use config::CoordinatorConfig;
pub use engine::Coordinator;
pub use messages::{CoordEvent, CoordinatorState, RunReport, WorkerReport};
