//! Snapshot Publishing
//!
//! Single writer, many readers. The writer replaces the current snapshot and
//! fans the new value out to every subscriber:
//!
//! ```text
//!   coordinator ──publish──▶ current: RwLock<Arc<EffectSnapshot>>
//!                       └──▶ subscriber queues (crossbeam, bounded)
//! ```
//!
//! A new subscriber is handed the current value first, then every later one.
//! When a subscriber falls behind and its queue is full, the oldest queued
//! value is dropped so the newest always gets through.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};

use crate::error::{EffectError, EffectResult};
use crate::snapshot::EffectSnapshot;

type SharedSnapshot = Arc<RwLock<Arc<EffectSnapshot>>>;

struct Subscriber {
    tx: Sender<Arc<EffectSnapshot>>,
    /// Publisher-side handle on the same queue, used to evict the oldest value
    overflow: Receiver<Arc<EffectSnapshot>>,
    alive: Weak<()>,
}

impl Subscriber {
    /// Queue a snapshot; false once the subscriber is gone
    fn deliver(&self, snapshot: &Arc<EffectSnapshot>) -> bool {
        if self.alive.strong_count() == 0 {
            return false;
        }

        let mut value = Arc::clone(snapshot);
        loop {
            match self.tx.try_send(value) {
                Ok(()) => return true,
                Err(TrySendError::Full(v)) => {
                    let _ = self.overflow.try_recv();
                    value = v;
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }
}

struct Shared {
    current: SharedSnapshot,
    subscribers: Mutex<Vec<Subscriber>>,
    capacity: usize,
}

impl Shared {
    fn subscribe(&self) -> SnapshotReceiver {
        let (tx, rx) = bounded(self.capacity);
        let alive = Arc::new(());

        // Registration and replay happen under the subscriber lock so no
        // publish can slip in between them.
        let mut subscribers = self.subscribers.lock();
        let current = Arc::clone(&self.current.read());
        let _ = tx.try_send(current);
        subscribers.push(Subscriber {
            tx,
            overflow: rx.clone(),
            alive: Arc::downgrade(&alive),
        });

        SnapshotReceiver {
            rx,
            current: Arc::clone(&self.current),
            _alive: alive,
        }
    }

    fn current(&self) -> Arc<EffectSnapshot> {
        Arc::clone(&self.current.read())
    }
}

/// Write side, owned by the coordinator
pub struct SnapshotPublisher {
    shared: Arc<Shared>,
}

impl SnapshotPublisher {
    pub fn new(initial: EffectSnapshot, capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                current: Arc::new(RwLock::new(Arc::new(initial))),
                subscribers: Mutex::new(Vec::new()),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Replace the current snapshot and notify subscribers
    pub fn publish(&self, snapshot: EffectSnapshot) {
        let snapshot = Arc::new(snapshot);

        let mut subscribers = self.shared.subscribers.lock();
        *self.shared.current.write() = Arc::clone(&snapshot);
        subscribers.retain(|sub| sub.deliver(&snapshot));
    }

    pub fn current(&self) -> Arc<EffectSnapshot> {
        self.shared.current()
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.shared.subscribe()
    }

    /// Cloneable read-side handle
    pub fn watcher(&self) -> SnapshotWatcher {
        SnapshotWatcher {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Live subscribers (dropped ones are pruned first)
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.shared.subscribers.lock();
        subscribers.retain(|sub| sub.alive.strong_count() > 0);
        subscribers.len()
    }
}

/// Read-only handle to the coordinator's snapshot
///
/// Handed to the presentation layer; it can read the current value or open
/// its own subscription, but never mutate.
#[derive(Clone)]
pub struct SnapshotWatcher {
    shared: Arc<Shared>,
}

impl SnapshotWatcher {
    pub fn current(&self) -> Arc<EffectSnapshot> {
        self.shared.current()
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.shared.subscribe()
    }
}

/// Stream of snapshots for one subscriber
pub struct SnapshotReceiver {
    rx: Receiver<Arc<EffectSnapshot>>,
    current: SharedSnapshot,
    _alive: Arc<()>,
}

impl SnapshotReceiver {
    /// The latest published snapshot, regardless of what is queued
    pub fn latest(&self) -> Arc<EffectSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Block until the next queued snapshot
    pub fn recv(&self) -> EffectResult<Arc<EffectSnapshot>> {
        self.rx.recv().map_err(|_| EffectError::PublisherClosed)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> EffectResult<Arc<EffectSnapshot>> {
        self.rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => EffectError::Timeout,
            RecvTimeoutError::Disconnected => EffectError::PublisherClosed,
        })
    }

    pub fn try_recv(&self) -> Option<Arc<EffectSnapshot>> {
        self.rx.try_recv().ok()
    }

    /// Collapse everything queued into the newest value
    pub fn drain_latest(&self) -> Option<Arc<EffectSnapshot>> {
        self.rx.try_iter().last()
    }

    /// Number of queued snapshots
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
