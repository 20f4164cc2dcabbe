//! Dismissal on pointer-down outside a region.
//!
//! `OutsideInteractionDetector` holds at most one [`Subscription`] on a
//! [`PointerHub`]. `attach` acquires it and `detach` releases it; drop
//! releases it on every path, including unwinding. The region and callback
//! live behind shared cells that the listener reads on each event, so
//! updates made after `attach` are always seen.

#[cfg(test)]
#[path = "outside_test.rs"]
mod outside_test;

use std::sync::{Arc, Mutex, Weak};

use super::lock;
use super::pointer::{PointerEvent, PointerHub, PointerKind, Region, Subscription};

type Callback = Box<dyn FnMut() + Send>;
type Slot = Mutex<Option<Subscription>>;

pub struct OutsideInteractionDetector {
    hub: PointerHub,
    region: Arc<Mutex<Region>>,
    callback: Arc<Mutex<Callback>>,
    subscription: Arc<Slot>,
}

impl OutsideInteractionDetector {
    /// Create an inactive detector.
    pub fn new(hub: &PointerHub, region: Region, callback: impl FnMut() + Send + 'static) -> Self {
        Self {
            hub: hub.clone(),
            region: Arc::new(Mutex::new(region)),
            callback: Arc::new(Mutex::new(Box::new(callback))),
            subscription: Arc::new(Mutex::new(None)),
        }
    }

    /// Subscribe to the hub. Returns `false` if already attached.
    pub fn attach(&self) -> bool {
        let mut slot = lock(&self.subscription);
        if slot.is_some() {
            return false;
        }

        let region = Arc::clone(&self.region);
        let callback = Arc::clone(&self.callback);
        let subscription = self.hub.subscribe(move |event: &PointerEvent| {
            if event.kind != PointerKind::Down || !event.user_originated {
                return;
            }
            if lock(&region).contains(event.x, event.y) {
                return;
            }
            let mut callback = lock(&callback);
            (*callback)();
        });
        tracing::debug!(listener = subscription.id(), "outside-interaction detector attached");
        *slot = Some(subscription);
        true
    }

    /// Unsubscribe from the hub. Returns `false` if already detached.
    pub fn detach(&self) -> bool {
        release(&self.subscription)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        lock(&self.subscription).is_some()
    }

    #[must_use]
    pub fn region(&self) -> Region {
        *lock(&self.region)
    }

    pub fn set_region(&self, region: Region) {
        *lock(&self.region) = region;
    }

    /// Replace the callback. Takes effect from the next event.
    ///
    /// Must not be called from inside the callback itself.
    pub fn set_callback(&self, callback: impl FnMut() + Send + 'static) {
        *lock(&self.callback) = Box::new(callback);
    }

    /// A weak handle that can detach this detector, including from inside
    /// its own callback.
    #[must_use]
    pub fn handle(&self) -> DetectorHandle {
        DetectorHandle { subscription: Arc::downgrade(&self.subscription) }
    }
}

impl Drop for OutsideInteractionDetector {
    fn drop(&mut self) {
        release(&self.subscription);
    }
}

/// Detach-only handle to an [`OutsideInteractionDetector`].
#[derive(Clone)]
pub struct DetectorHandle {
    subscription: Weak<Slot>,
}

impl DetectorHandle {
    /// Returns `false` if the detector was already detached or dropped.
    pub fn detach(&self) -> bool {
        self.subscription.upgrade().is_some_and(|slot| release(&slot))
    }
}

fn release(slot: &Slot) -> bool {
    let taken = lock(slot).take();
    let Some(subscription) = taken else {
        return false;
    };
    tracing::debug!(listener = subscription.id(), "outside-interaction detector detached");
    subscription.cancel();
    true
}
