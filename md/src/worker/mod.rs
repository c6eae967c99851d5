//! Worker units
//!
//! A worker unit owns one OS thread that performs a fixed number of
//! iterations. After each iteration the thread posts a notification to the
//! main loop; the progress counter itself lives on the main loop's side and is
//! only touched there.

mod config;
mod error;
mod unit;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use unit::{Progress, WorkerId, WorkerUnit};
