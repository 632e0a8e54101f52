// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named state snapshots.

use serde::{Deserialize, Serialize};

use crate::state::HomeState;
use crate::types::PresetKey;

/// A named, immutable snapshot of [`HomeState`].
///
/// Applying a preset replaces the full state; no field of the previous state
/// survives.
///
/// # Examples
///
/// ```
/// use home_scenes::scenario::Preset;
/// use home_scenes::state::HomeState;
///
/// let preset = Preset::new("custom_1", "Movie Night", HomeState::new().with_ac(true));
/// assert_eq!(preset.key(), "custom_1");
/// assert_eq!(preset.name(), "Movie Night");
/// assert!(preset.state().ac_on);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    key: PresetKey,
    name: String,
    state: HomeState,
}

impl Preset {
    /// Creates a preset.
    #[must_use]
    pub fn new(key: impl Into<PresetKey>, name: impl Into<String>, state: HomeState) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            state,
        }
    }

    /// Returns the preset key.
    #[must_use]
    pub fn key(&self) -> &PresetKey {
        &self.key
    }

    /// Returns the display label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored snapshot.
    #[must_use]
    pub fn state(&self) -> HomeState {
        self.state
    }
}
