//! The bounded result collector.
//!
//! A `Collector<T>` is armed with an expected delivery count and converts
//! that many asynchronous single-value deliveries into a wait-then-poll
//! interface for a synchronous consumer: producers `deliver`, the test
//! thread `wait_*`s for the completion counter to reach zero, then
//! `poll`s/`peek`s the collected values in delivery order.
//!
//! Queue capacity equals the expected count, so a delivery beyond it (or
//! one racing a slow consumer) blocks up to the configured timeout and is
//! then dropped; the drop is logged and visible in `deliver`'s return
//! value, and the consumer simply observes a short count.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time::timeout;
use tracing::warn;

/// Delivery timeout used by [`Collector::new`].
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_millis(1000);

struct Inner<T> {
    /// Collected values, oldest first.
    queue: Mutex<VecDeque<T>>,
    /// Free queue slots; acquired by producers, released by `poll`.
    slots: Semaphore,
    /// Occupied queue slots; released by producers, acquired by `poll`.
    items: Semaphore,
    /// Completion counter: expected deliveries not yet made, saturating
    /// at zero. Zero releases all waiters and is terminal.
    remaining: watch::Sender<usize>,
    expected: usize,
    delivery_timeout: Duration,
}

/// A fixed-capacity synchronization primitive collecting asynchronous
/// deliveries for synchronous assertions.
///
/// Cloning is cheap and shares state, so each producer task can hold its
/// own handle.
pub struct Collector<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Collector<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Collector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("expected", &self.inner.expected)
            .field("remaining", &self.remaining())
            .field("queued", &self.len())
            .finish()
    }
}

impl<T> Collector<T> {
    /// Create a collector expecting `expected` deliveries, with the
    /// default delivery timeout of one second.
    ///
    /// # Panics
    ///
    /// Panics if `expected` is zero.
    pub fn new(expected: usize) -> Self {
        Self::with_timeout(expected, DEFAULT_DELIVERY_TIMEOUT)
    }

    /// Create a collector with an explicit delivery timeout.
    ///
    /// The timeout bounds how long a producer blocks on a full queue and
    /// is the wait window of [`Collector::wait_default`].
    ///
    /// # Panics
    ///
    /// Panics if `expected` is zero.
    pub fn with_timeout(expected: usize, delivery_timeout: Duration) -> Self {
        assert!(expected > 0, "expected delivery count must be at least 1");
        let (remaining, _) = watch::channel(expected);
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::with_capacity(expected)),
                slots: Semaphore::new(expected),
                items: Semaphore::new(0),
                remaining,
                expected,
                delivery_timeout,
            }),
        }
    }

    /// Deliver one value, blocking up to the configured timeout for a free
    /// queue slot.
    ///
    /// On success the completion counter is decremented and `true` is
    /// returned. If no slot frees up in time the value is dropped, a
    /// warning is logged, and `false` is returned; the waiting consumer
    /// only observes the short count.
    pub async fn deliver(&self, value: T) -> bool {
        match timeout(self.inner.delivery_timeout, self.inner.slots.acquire()).await {
            Ok(permit) => {
                permit.expect("slot semaphore is never closed").forget();
                self.enqueue(value);
                true
            }
            Err(_elapsed) => {
                warn!(
                    capacity = self.inner.expected,
                    "result queue full, dropping delivery"
                );
                false
            }
        }
    }

    /// Non-blocking [`Collector::deliver`] for synchronous callers; drops
    /// immediately when the queue is full.
    pub fn try_deliver(&self, value: T) -> bool {
        match self.inner.slots.try_acquire() {
            Ok(permit) => {
                permit.forget();
                self.enqueue(value);
                true
            }
            Err(_) => {
                warn!(
                    capacity = self.inner.expected,
                    "result queue full, dropping delivery"
                );
                false
            }
        }
    }

    fn enqueue(&self, value: T) {
        self.lock_queue().push_back(value);
        self.inner.items.add_permits(1);
        self.inner.remaining.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Block until the completion counter reaches zero.
    pub async fn wait_all(&self) {
        let mut rx = self.inner.remaining.subscribe();
        rx.wait_for(|remaining| *remaining == 0)
            .await
            .expect("counter sender lives as long as the collector");
    }

    /// Block up to `duration` for the counter to reach zero.
    ///
    /// Returns whether it did; on expiry the collector state is unchanged
    /// and deliveries already in flight are not cancelled.
    pub async fn wait_timeout(&self, duration: Duration) -> bool {
        timeout(duration, self.wait_all()).await.is_ok()
    }

    /// [`Collector::wait_timeout`] with the configured timeout.
    pub async fn wait_default(&self) -> bool {
        self.wait_timeout(self.inner.delivery_timeout).await
    }

    /// Remove and return the oldest collected value, or `None` when the
    /// store is empty. Dequeueing frees one slot of queue capacity.
    pub fn poll(&self) -> Option<T> {
        match self.inner.items.try_acquire() {
            Ok(permit) => {
                permit.forget();
                Some(self.dequeue())
            }
            Err(_) => None,
        }
    }

    /// Like [`Collector::poll`], but waits up to `duration` for a value to
    /// arrive.
    pub async fn poll_timeout(&self, duration: Duration) -> Option<T> {
        match timeout(duration, self.inner.items.acquire()).await {
            Ok(permit) => {
                permit.expect("item semaphore is never closed").forget();
                Some(self.dequeue())
            }
            Err(_elapsed) => None,
        }
    }

    fn dequeue(&self) -> T {
        let value = self
            .lock_queue()
            .pop_front()
            .expect("an item permit implies a queued value");
        self.inner.slots.add_permits(1);
        value
    }

    /// Return the oldest collected value without removing it.
    pub fn peek(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock_queue().front().cloned()
    }

    /// Current occupancy of the result store (not the counter).
    pub fn len(&self) -> usize {
        self.lock_queue().len()
    }

    /// Whether the result store is empty (not whether the counter is).
    pub fn is_empty(&self) -> bool {
        self.lock_queue().is_empty()
    }

    /// Deliveries still outstanding before waiters release. Zero means
    /// released, which is terminal.
    pub fn remaining(&self) -> usize {
        *self.inner.remaining.borrow()
    }

    /// The expected delivery count this collector was armed with.
    pub fn expected(&self) -> usize {
        self.inner.expected
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.inner.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}
