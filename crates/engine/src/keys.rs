//! The player's key channel: a bounded FIFO of pressed slots.

use std::collections::VecDeque;
use std::sync::Mutex;

use set_core::Slot;
use tokio::sync::Notify;

/// Bounded key-press queue, capacity equal to the feature size.
///
/// The producer side never blocks: pressing into a full queue drops the
/// oldest pending press, not the new one. The consumer wakes the producer
/// side on every drain so a key generator can keep the queue topped up;
/// generators back off through [`ready`](Self::ready) rather than by
/// blocking in [`press`](Self::press).
#[derive(Debug)]
pub struct KeyQueue {
    pending: Mutex<VecDeque<Slot>>,
    capacity: usize,
    pressed: Notify,
    drained: Notify,
}

impl KeyQueue {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            pressed: Notify::new(),
            drained: Notify::new(),
        }
    }

    /// Record a key press from any thread; never blocks.
    pub fn press(&self, slot: Slot) {
        {
            let mut pending = self.pending.lock().unwrap();
            if pending.len() == self.capacity {
                pending.pop_front();
            }
            pending.push_back(slot);
        }
        self.pressed.notify_one();
    }

    /// Take the next pending press, waiting for one if the queue is empty.
    pub async fn take(&self) -> Slot {
        loop {
            let pressed = self.pressed.notified();
            tokio::pin!(pressed);
            pressed.as_mut().enable();
            if let Some(slot) = self.pop() {
                return slot;
            }
            pressed.await;
        }
    }

    /// Drop every pending press and wake the producer side.
    pub fn clear(&self) {
        self.pending.lock().unwrap().clear();
        self.drained.notify_one();
    }

    /// Wait until the queue has room for another press.
    pub async fn ready(&self) {
        loop {
            let drained = self.drained.notified();
            tokio::pin!(drained);
            drained.as_mut().enable();
            if !self.is_full() {
                return;
            }
            drained.await;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    fn pop(&self) -> Option<Slot> {
        let slot = self.pending.lock().unwrap().pop_front();
        if slot.is_some() {
            self.drained.notify_one();
        }
        slot
    }
}
