// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preset identifier type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a preset.
///
/// Built-in presets use fixed keys (`morning`, `night`, `away`); custom
/// presets get generated keys with the [`PresetKey::CUSTOM_PREFIX`] prefix.
///
/// # Examples
///
/// ```
/// use home_scenes::types::PresetKey;
///
/// let key = PresetKey::new("night");
/// assert_eq!(key.as_str(), "night");
/// assert_eq!(key, "night");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetKey(String);

impl PresetKey {
    /// Prefix of generated custom preset keys.
    pub const CUSTOM_PREFIX: &'static str = "custom_";

    /// Creates a key from any string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Creates the custom key for a sequence number.
    #[must_use]
    pub fn custom(sequence: u64) -> Self {
        Self(format!("{}{sequence}", Self::CUSTOM_PREFIX))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PresetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PresetKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PresetKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for PresetKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PresetKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PresetKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PresetKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
