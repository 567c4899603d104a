//! Delivery serialization gate
//!
//! At most one delivery runs at a time, even when the subscriber invokes the
//! handler from many tasks, and each delivery is followed by a mandatory
//! cooldown that throttles the modem hardware. The cooldown is kept as a
//! monotonic "earliest next admission" stamp rather than a sleep under the
//! lock, so tests can drive it with tokio's virtual clock.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

pub struct DeliveryGate {
    cooldown: Duration,
    slot: Mutex<Option<Instant>>,
}

/// Exclusive right to run one delivery. Dropping the permit stamps the
/// cooldown, so the next admission waits out the dead time first.
pub struct DeliveryPermit<'a> {
    cooldown: Duration,
    slot: MutexGuard<'a, Option<Instant>>,
}

impl DeliveryGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            slot: Mutex::new(None),
        }
    }

    /// Wait for the single delivery slot, including any cooldown left over
    /// from the previous delivery.
    pub async fn admit(&self) -> DeliveryPermit<'_> {
        let slot = self.slot.lock().await;
        if let Some(earliest) = *slot {
            tokio::time::sleep_until(earliest).await;
        }
        DeliveryPermit {
            cooldown: self.cooldown,
            slot,
        }
    }
}

impl Drop for DeliveryPermit<'_> {
    fn drop(&mut self) {
        *self.slot = Some(Instant::now() + self.cooldown);
    }
}
