use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Producer side of a single-slot channel where a new value replaces any
/// value the consumer has not taken yet.
pub(crate) struct LatestSlot<T> {
    tx: Sender<T>,
    // Held to evict the stale value. Also keeps the channel connected so
    // publishing never fails while the producer lives.
    evict_rx: Receiver<T>,
}

pub(crate) fn latest_slot<T>() -> (LatestSlot<T>, Receiver<T>) {
    let (tx, rx) = bounded(1);
    let slot = LatestSlot {
        tx,
        evict_rx: rx.clone(),
    };
    (slot, rx)
}

impl<T> LatestSlot<T> {
    /// Stores `value` without blocking. Returns `true` if an undelivered value
    /// was replaced.
    pub(crate) fn publish(&self, mut value: T) -> bool {
        let mut replaced = false;
        loop {
            match self.tx.try_send(value) {
                Ok(()) => return replaced,
                Err(TrySendError::Full(v)) => {
                    replaced |= self.evict_rx.try_recv().is_ok();
                    value = v;
                }
                Err(TrySendError::Disconnected(_)) => return replaced,
            }
        }
    }
}
