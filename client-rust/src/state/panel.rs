#[cfg(test)]
#[path = "panel_test.rs"]
mod panel_test;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::util::lock;
use crate::util::outside::OutsideInteractionDetector;
use crate::util::pointer::{PointerHub, Region};

/// Visibility of the angle-entry popover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Disclosure panel for the angle field.
///
/// Opening attaches an [`OutsideInteractionDetector`] over the panel
/// region; every path back to `Closed` (toggle, `force_close`, a pointer-down
/// outside) detaches it, and dropping the panel detaches it too. While closed
/// the panel holds no hub subscription.
pub struct DisclosurePanel {
    state: Arc<Mutex<PanelState>>,
    detector: OutsideInteractionDetector,
}

impl DisclosurePanel {
    pub fn new(hub: &PointerHub, region: Region) -> Self {
        let state = Arc::new(Mutex::new(PanelState::Closed));
        let detector = OutsideInteractionDetector::new(hub, region, || {});

        let shared = Arc::clone(&state);
        let handle = detector.handle();
        detector.set_callback(move || {
            let closed = close(&shared);
            handle.detach();
            if closed {
                tracing::debug!("angle panel dismissed by outside interaction");
            }
        });

        Self { state, detector }
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        *lock(&self.state)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == PanelState::Open
    }

    /// Whether the outside-interaction subscription is currently held.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.detector.is_active()
    }

    /// Flip between `Closed` and `Open`. Returns the new state.
    pub fn toggle(&self) -> PanelState {
        let next = {
            let mut state = lock(&self.state);
            *state = match *state {
                PanelState::Closed => PanelState::Open,
                PanelState::Open => PanelState::Closed,
            };
            *state
        };
        match next {
            PanelState::Open => {
                self.detector.attach();
            }
            PanelState::Closed => {
                self.detector.detach();
            }
        }
        next
    }

    /// Close the panel. Returns `false` if it was already closed.
    pub fn force_close(&self) -> bool {
        let closed = close(&self.state);
        self.detector.detach();
        closed
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.detector.region()
    }

    /// Move or resize the panel; applies to an open panel immediately.
    pub fn set_region(&self, region: Region) {
        self.detector.set_region(region);
    }
}

fn close(state: &Mutex<PanelState>) -> bool {
    let mut state = lock(state);
    let was_open = *state == PanelState::Open;
    *state = PanelState::Closed;
    was_open
}
