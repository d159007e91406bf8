//! One-per-kind holder for the in-flight operation's cancellation token.

use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Handle to one operation started through a [`FlightSlot`].
#[derive(Debug, Clone)]
pub(crate) struct Flight {
    generation: u64,
    token: CancellationToken,
}

impl Flight {
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct SlotState {
    next_generation: u64,
    current: Option<Flight>,
}

/// Holds the operation currently in flight, if any.
///
/// Starting a new operation cancels the previous one and stores the new
/// handle under the same lock, so at most one live token exists per slot.
#[derive(Debug, Default)]
pub(crate) struct FlightSlot {
    state: Mutex<SlotState>,
}

impl FlightSlot {
    /// Cancels the previous occupant and installs a fresh flight.
    ///
    /// Returns the new flight and whether a live operation was superseded.
    pub(crate) fn begin(&self) -> (Flight, bool) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let flight = Flight {
            generation: state.next_generation,
            token: CancellationToken::new(),
        };
        state.next_generation = state.next_generation.wrapping_add(1);

        let superseded = state
            .current
            .replace(flight.clone())
            .is_some_and(|previous| cancel_live(&previous));
        (flight, superseded)
    }

    /// Cancels whatever is in flight. Safe to call on an empty slot.
    ///
    /// Returns whether a live operation was cancelled.
    pub(crate) fn cancel(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .take()
            .is_some_and(|previous| cancel_live(&previous))
    }

    /// Empties the slot if `flight` is still its occupant.
    pub(crate) fn finish(&self, flight: &Flight) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state
            .current
            .as_ref()
            .is_some_and(|current| current.generation == flight.generation)
        {
            state.current = None;
        }
    }

    #[cfg(test)]
    pub(crate) fn is_occupied(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .is_some()
    }
}

fn cancel_live(flight: &Flight) -> bool {
    let live = !flight.token.is_cancelled();
    flight.token.cancel();
    live
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_cancels_previous_flight() {
        let slot = FlightSlot::default();
        let (first, superseded) = slot.begin();
        assert!(!superseded);

        let (second, superseded) = slot.begin();
        assert!(superseded);
        assert!(first.token().is_cancelled());
        assert!(!second.token().is_cancelled());
        assert_ne!(first.generation(), second.generation());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let slot = FlightSlot::default();
        assert!(!slot.cancel(), "empty slot has nothing to cancel");

        let (flight, _) = slot.begin();
        assert!(slot.cancel());
        assert!(flight.token().is_cancelled());
        assert!(!slot.cancel());
        assert!(!slot.is_occupied());
    }

    #[test]
    fn test_finish_only_clears_own_flight() {
        let slot = FlightSlot::default();
        let (first, _) = slot.begin();
        let (second, _) = slot.begin();

        slot.finish(&first);
        assert!(slot.is_occupied(), "stale flight must not clear the newer one");

        slot.finish(&second);
        assert!(!slot.is_occupied());
    }
}
