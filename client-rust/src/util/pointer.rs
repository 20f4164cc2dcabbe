//! Process-wide pointer event registry.
//!
//! `PointerHub` plays the role of the document-level listener list: any
//! component may subscribe, and the host shell emits every pointer event it
//! receives. A `Subscription` owns its registration and removes it on
//! `cancel` or drop, so a listener cannot outlive its owner.

#[cfg(test)]
#[path = "pointer_test.rs"]
mod pointer_test;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use super::lock;

pub type ListenerId = u64;

type Listener = Arc<dyn Fn(&PointerEvent) + Send + Sync>;

/// A registered listener and its liveness flag. The flag is cleared before
/// removal so an in-progress delivery skips it.
#[derive(Clone)]
struct Entry {
    live: Arc<AtomicBool>,
    listener: Listener,
}

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Move,
}

/// A pointer event in shell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
    /// `false` for events synthesized by code rather than a person.
    pub user_originated: bool,
}

impl PointerEvent {
    /// A user pointer-down at `(x, y)`.
    #[must_use]
    pub fn down(x: f64, y: f64) -> Self {
        Self { x, y, kind: PointerKind::Down, user_originated: true }
    }

    #[must_use]
    pub fn up(x: f64, y: f64) -> Self {
        Self { x, y, kind: PointerKind::Up, user_originated: true }
    }

    /// Mark the event as generated by code.
    #[must_use]
    pub fn synthetic(mut self) -> Self {
        self.user_originated = false;
        self
    }
}

/// Axis-aligned rectangle. Edges count as inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

// =============================================================================
// HUB
// =============================================================================

#[derive(Default)]
struct HubInner {
    next_id: ListenerId,
    listeners: BTreeMap<ListenerId, Entry>,
}

/// Shared pointer listener registry. Clones refer to the same registry.
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Arc<Mutex<HubInner>>,
}

impl PointerHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every subsequent event.
    pub fn subscribe(&self, listener: impl Fn(&PointerEvent) + Send + Sync + 'static) -> Subscription {
        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let id = inner.next_id;
        let live = Arc::new(AtomicBool::new(true));
        inner.listeners.insert(id, Entry { live: Arc::clone(&live), listener: Arc::new(listener) });
        tracing::trace!(listener = id, total = inner.listeners.len(), "pointer listener added");

        Subscription { hub: Arc::downgrade(&self.inner), id, live }
    }

    /// Deliver `event` to every listener registered when delivery starts.
    ///
    /// The registry lock is released before listeners run, so a listener may
    /// subscribe or unsubscribe during delivery. A listener removed part-way
    /// through is not called for the rest of that delivery; one added
    /// part-way through waits for the next event. Returns the number of
    /// listeners notified.
    pub fn emit(&self, event: &PointerEvent) -> usize {
        let snapshot: Vec<Entry> = lock(&self.inner).listeners.values().cloned().collect();
        let mut notified = 0;
        for entry in &snapshot {
            if !entry.live.load(Ordering::Acquire) {
                continue;
            }
            (entry.listener)(event);
            notified += 1;
        }
        notified
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

/// Registration handle returned by [`PointerHub::subscribe`].
#[must_use = "dropping a subscription removes the listener"]
pub struct Subscription {
    hub: Weak<Mutex<HubInner>>,
    id: ListenerId,
    live: Arc<AtomicBool>,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the listener now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.live.swap(false, Ordering::AcqRel) {
            return;
        }
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        let removed = lock(&hub).listeners.remove(&self.id);
        tracing::trace!(listener = self.id, removed = removed.is_some(), "pointer listener removed");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
