// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration types for the control panel.

use std::time::Duration;

use crate::state::HomeState;

/// What a manual edit does to the selected preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// A manual edit that changes the state clears the selection, since the
    /// live state no longer matches the highlighted preset.
    #[default]
    ClearOnEdit,
    /// The selection survives manual edits until another preset is applied
    /// or the selected one is deleted.
    Retain,
}

/// Configuration for a [`ControlPanel`](super::ControlPanel).
///
/// # Examples
///
/// ```
/// use home_scenes::panel::{PanelConfig, SelectionPolicy};
/// use std::time::Duration;
///
/// let config = PanelConfig::new()
///     .with_selection_policy(SelectionPolicy::Retain)
///     .with_remote_timeout(Duration::from_secs(5))
///     .with_event_capacity(64);
///
/// assert_eq!(config.selection_policy, SelectionPolicy::Retain);
/// ```
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Effect of manual edits on the selection.
    pub selection_policy: SelectionPolicy,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
    /// Upper bound for a single remote write.
    ///
    /// Writes run one at a time, so with `None` a write that never completes
    /// stalls every later write and [`flush_mirror`] never returns.
    ///
    /// [`flush_mirror`]: super::ControlPanel::flush_mirror
    pub remote_timeout: Option<Duration>,
    /// Whether to write the local state when the remote has none.
    pub seed_remote: bool,
    /// State the session starts from.
    pub initial_state: HomeState,
}

impl PanelConfig {
    /// Default event channel capacity.
    pub const DEFAULT_EVENT_CAPACITY: usize = 256;

    /// Default upper bound for a single remote write.
    pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selection_policy: SelectionPolicy::default(),
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
            remote_timeout: Some(Self::DEFAULT_REMOTE_TIMEOUT),
            seed_remote: true,
            initial_state: HomeState::new(),
        }
    }

    /// Sets the selection policy.
    #[must_use]
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Sets the event channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Bounds every remote write by `timeout`.
    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = Some(timeout);
        self
    }

    /// Lets remote writes run without a time limit.
    ///
    /// Only for mirrors that bound their own requests.
    #[must_use]
    pub fn without_remote_timeout(mut self) -> Self {
        self.remote_timeout = None;
        self
    }

    /// Enables or disables seeding an empty remote.
    #[must_use]
    pub fn with_seed_remote(mut self, seed: bool) -> Self {
        self.seed_remote = seed;
        self
    }

    /// Sets the session-start state.
    #[must_use]
    pub fn with_initial_state(mut self, state: HomeState) -> Self {
        self.initial_state = state;
        self
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new()
    }
}
