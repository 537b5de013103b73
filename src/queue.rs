//! Blocking multi-producer / single-consumer FIFO queue.
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Unbounded FIFO shared between any number of producers and one consumer.
///
/// Items come out in the order their [`push`](Self::push) calls completed.
/// [`wait_and_pop`](Self::wait_and_pop) parks the consumer on a [`Condvar`]
/// until an item is available; producers only ever hold the lock for the
/// duration of a `VecDeque::push_back`.
pub struct SharedQueue<T> {
    queue: Mutex<VecDeque<T>>,
    data_cond: Condvar,
}

impl<T> SharedQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            data_cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `item` and wake the consumer.
    pub fn push(&self, item: T) {
        let mut queue = self.lock();
        queue.push_back(item);
        drop(queue);
        self.data_cond.notify_one();
    }

    /// Remove the front item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Block until an item is available, then remove and return it.
    pub fn wait_and_pop(&self) -> T {
        let mut queue = self.lock();
        loop {
            if let Some(item) = queue.pop_front() {
                return item;
            }
            queue = self
                .data_cond
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Snapshot of whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the number of queued items.
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

impl<T> Default for SharedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SharedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedQueue")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn pops_in_push_order() {
        let q = SharedQueue::new();
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.len(), 3);
        assert_eq!(q.wait_and_pop(), 1);
        assert_eq!(q.try_pop(), Some(2));
        assert_eq!(q.wait_and_pop(), 3);
        assert!(q.is_empty());
    }

    #[test]
    fn try_pop_on_empty_returns_none() {
        let q: SharedQueue<u8> = SharedQueue::default();
        assert_eq!(q.try_pop(), None);
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn wait_and_pop_blocks_until_push() {
        let q = Arc::new(SharedQueue::new());
        let consumer = {
            let q = Arc::clone(&q);
            std::thread::spawn(move || q.wait_and_pop())
        };
        std::thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished(), "consumer should still be parked");
        q.push("wake");
        assert_eq!(consumer.join().unwrap(), "wake");
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        let q = Arc::new(SharedQueue::new());
        std::thread::scope(|s| {
            for producer in 0..8u32 {
                let q = &q;
                s.spawn(move || {
                    for i in 0..250u32 {
                        q.push((producer, i));
                    }
                });
            }
        });
        assert_eq!(q.len(), 2000);

        // Per-producer order survives the interleaving.
        let mut next = [0u32; 8];
        while let Some((producer, i)) = q.try_pop() {
            let slot = &mut next[producer as usize];
            assert_eq!(i, *slot, "producer {producer} reordered");
            *slot += 1;
        }
        assert!(next.iter().all(|&n| n == 250));
    }

    #[test]
    fn debug_shows_length() {
        let q = SharedQueue::new();
        q.push(());
        assert!(format!("{q:?}").contains("len: 1"));
    }
}
