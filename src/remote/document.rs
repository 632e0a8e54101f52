// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document layout of the remote store.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::scenario::Preset;
use crate::state::HomeState;
use crate::types::PresetKey;

/// Path of the home state document.
pub const HOME_STATE_PATH: &str = "homeState";

/// Path of the custom preset collection.
pub const CUSTOM_PRESETS_PATH: &str = "customPresets";

/// Returns the path of one custom preset document.
#[must_use]
pub fn preset_path(key: &PresetKey) -> String {
    format!("{CUSTOM_PRESETS_PATH}/{key}")
}

/// Body of a `customPresets/{key}` document.
///
/// The key is the document path, not part of the body.
///
/// # Examples
///
/// ```
/// use home_scenes::remote::PresetDocument;
/// use home_scenes::scenario::Preset;
/// use home_scenes::state::HomeState;
///
/// let preset = Preset::new("custom_1", "Movie Night", HomeState::new());
/// let document = PresetDocument::from(&preset);
/// assert_eq!(document.into_preset("custom_1".into()), preset);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDocument {
    /// Display label.
    pub name: String,
    /// Stored snapshot.
    pub state: HomeState,
}

impl PresetDocument {
    /// Attaches the key taken from the document path.
    #[must_use]
    pub fn into_preset(self, key: PresetKey) -> Preset {
        Preset::new(key, self.name, self.state)
    }
}

impl From<&Preset> for PresetDocument {
    fn from(preset: &Preset) -> Self {
        Self {
            name: preset.name().to_string(),
            state: preset.state(),
        }
    }
}

/// Orders documents keyed `custom_{n}` by `n`, everything else after them by key.
///
/// Stores hand collections back sorted lexicographically, which would put
/// `custom_10` before `custom_2`.
pub(crate) fn sort_presets(presets: &mut [Preset]) {
    fn sequence(preset: &Preset) -> Option<u64> {
        preset
            .key()
            .as_str()
            .strip_prefix(PresetKey::CUSTOM_PREFIX)
            .and_then(|n| n.parse().ok())
    }

    presets.sort_by(|a, b| match (sequence(a), sequence(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.key().cmp(b.key()),
    });
}
