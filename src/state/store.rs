// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Owner of the canonical home state.

use super::{HomeState, StateChange};

/// Holds the live [`HomeState`] for one session.
///
/// The store is created once with the session defaults and then mutated in
/// place; it is never reset, only superseded by [`apply_state`](Self::apply_state).
/// It does no locking of its own: the panel serializes access to it together
/// with the scenario registry.
///
/// # Examples
///
/// ```
/// use home_scenes::state::{HomeState, HomeStateStore, StateChange};
///
/// let mut store = HomeStateStore::new();
/// store.set_field(&StateChange::temperature_step(-10));
/// assert_eq!(store.get().temperature().value(), 16);
///
/// let snapshot = HomeState::new().with_security(true);
/// store.apply_state(snapshot);
/// assert_eq!(store.get(), snapshot);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HomeStateStore {
    state: HomeState,
}

impl HomeStateStore {
    /// Creates a store holding the session defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given state.
    #[must_use]
    pub fn with_state(state: HomeState) -> Self {
        Self { state }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn get(&self) -> HomeState {
        self.state
    }

    /// Applies a single field edit.
    ///
    /// Returns `true` if the state changed.
    pub fn set_field(&mut self, change: &StateChange) -> bool {
        let changed = self.state.apply(change);
        if changed {
            tracing::debug!(
                ?change,
                fields = change.change_count(),
                climate = change.is_climate(),
                "home state field updated"
            );
        }
        changed
    }

    /// Replaces every field at once.
    ///
    /// Returns `true` if the state changed.
    pub fn apply_state(&mut self, state: HomeState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        tracing::debug!(?state, "home state replaced");
        true
    }
}
