//! Human-readable progress lines on stdout
//!
//! Informational only; structured logs go through `tracing`.

use std::thread::ThreadId;

use colored::*;

use crate::worker::WorkerId;

/// Console printer, copied into every worker thread
#[derive(Debug, Clone, Copy)]
pub struct Console {
    enabled: bool,
}

impl Console {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A console that prints nothing
    pub fn silent() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn separator(&self) {
        if self.enabled {
            println!("{}", "-".repeat(40).dimmed());
        }
    }

    pub fn main_thread(&self, thread: ThreadId) {
        if self.enabled {
            self.separator();
            println!("Main thread: {}", format!("{:?}", thread).cyan());
            self.separator();
        }
    }

    pub fn launch_delay(&self, delay_ms: u64) {
        if self.enabled {
            println!("Launching workers in {} ms", delay_ms);
        }
    }

    pub fn launching(&self, count: usize) {
        if self.enabled {
            println!("Launching {} threads:", count);
        }
    }

    pub fn thread_created(&self, id: WorkerId, thread: ThreadId) {
        if self.enabled {
            println!("Logic thread {} created as {}", id, format!("{:?}", thread).cyan());
        }
    }

    pub fn emitted(&self, id: WorkerId, step: u32, thread: ThreadId) {
        if self.enabled {
            println!(
                "Logical thread {}: {}% | Signal emitted from {}",
                id,
                step,
                format!("{:?}", thread).yellow()
            );
        }
    }

    pub fn received(&self, id: WorkerId, progress: u32, thread: ThreadId) {
        if self.enabled {
            println!(
                "Logical thread {}: {}% | Signal received by {}",
                id,
                progress,
                format!("{:?}", thread).cyan()
            );
        }
    }

    pub fn finished(&self, id: WorkerId) {
        if self.enabled {
            println!("{} Thread {}: finished.", "✓".green(), id);
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(true)
    }
}
