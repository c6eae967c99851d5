//! Dispatcher channel halves

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Errors from posting to a dispatcher
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Main loop closed")]
    Closed,
}

/// Receiving half, owned by the main loop
pub struct Dispatcher<E> {
    rx: mpsc::UnboundedReceiver<E>,
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Dispatcher<E> {
    /// Create a new dispatcher
    pub fn new() -> Self {
        debug!("Dispatcher::new: called");
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Get a sender that can be moved to another thread
    pub fn sender(&self) -> DispatchSender<E> {
        DispatchSender { tx: self.tx.clone() }
    }

    /// Wait for the next event
    ///
    /// The dispatcher keeps a sender of its own, so this only returns `None`
    /// if the channel was closed explicitly.
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Number of events queued and not yet received
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half, cheap to clone and safe to move across threads
pub struct DispatchSender<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for DispatchSender<E> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<E> DispatchSender<E> {
    /// Post an event to the main loop
    ///
    /// Never blocks. Fails only once the receiving loop has been dropped.
    pub fn send(&self, event: E) -> Result<(), DispatchError> {
        self.tx.send(event).map_err(|_| DispatchError::Closed)
    }

    /// Check whether the receiving loop is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_send_and_receive_same_thread() {
        let mut dispatcher = Dispatcher::new();
        let sender = dispatcher.sender();

        sender.send(1u32).unwrap();
        sender.send(2u32).unwrap();

        assert_eq!(dispatcher.pending(), 2);
        assert_eq!(dispatcher.try_recv(), Some(1));
        assert_eq!(dispatcher.try_recv(), Some(2));
        assert_eq!(dispatcher.try_recv(), None);
    }

    #[test]
    fn test_fifo_per_sender_across_threads() {
        let mut dispatcher = Dispatcher::new();

        let producers: Vec<_> = (0..3u32)
            .map(|id| {
                let sender = dispatcher.sender();
                thread::spawn(move || {
                    for seq in 0..50u32 {
                        sender.send((id, seq)).unwrap();
                    }
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }

        let mut last_seen = [None::<u32>; 3];
        let mut total = 0;
        while let Some((id, seq)) = dispatcher.try_recv() {
            let slot = &mut last_seen[id as usize];
            if let Some(prev) = *slot {
                assert!(seq > prev, "sender {} delivered {} after {}", id, seq, prev);
            }
            *slot = Some(seq);
            total += 1;
        }

        assert_eq!(total, 150);
        assert!(last_seen.iter().all(|s| *s == Some(49)));
    }

    #[test]
    fn test_send_after_dispatcher_dropped() {
        let dispatcher = Dispatcher::<u32>::new();
        let sender = dispatcher.sender();
        assert!(!sender.is_closed());

        drop(dispatcher);

        assert!(sender.is_closed());
        assert_eq!(sender.send(7), Err(DispatchError::Closed));
    }

    #[tokio::test]
    async fn test_recv_wakes_on_send_from_other_thread() {
        let mut dispatcher = Dispatcher::new();
        let sender = dispatcher.sender();

        let producer = thread::spawn(move || {
            thread::sleep(std::time::Duration::from_millis(20));
            sender.send("ping").unwrap();
        });

        let event = tokio::time::timeout(std::time::Duration::from_secs(5), dispatcher.recv())
            .await
            .expect("dispatcher did not wake");
        assert_eq!(event, Some("ping"));

        producer.join().unwrap();
    }
}
