// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of built-in and custom presets.

use crate::error::{Error, Result};
use crate::state::HomeState;
use crate::types::PresetKey;

use super::{Builtin, Preset};

/// Built-in and custom presets sharing one key namespace, plus the current
/// selection.
///
/// Built-ins are created with the registry and can never be deleted. Custom
/// presets keep their insertion order. Generated keys come from a counter
/// that only moves forward, so a key is never handed out twice in a
/// session, even after the preset holding it was deleted. Should remote keys
/// push the counter past `u64::MAX`, the lowest free number is used instead.
///
/// The registry does no locking of its own; the panel serializes access to
/// it together with the state store.
///
/// # Examples
///
/// ```
/// use home_scenes::scenario::ScenarioRegistry;
/// use home_scenes::state::HomeState;
///
/// let mut registry = ScenarioRegistry::new();
///
/// let key = registry
///     .create("Movie Night", HomeState::new().with_ac(true))
///     .unwrap();
/// assert!(registry.apply(key.as_str()).unwrap().ac_on);
/// assert_eq!(registry.selected(), Some(&key));
///
/// // Built-ins cannot be deleted
/// assert!(registry.delete("morning").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRegistry {
    builtins: Vec<Preset>,
    custom: Vec<Preset>,
    selected: Option<PresetKey>,
    /// `None` once the counter has passed `u64::MAX`.
    next_sequence: Option<u64>,
}

impl ScenarioRegistry {
    /// Creates a registry holding only the built-ins.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builtins: Builtin::ALL.iter().map(Builtin::preset).collect(),
            custom: Vec::new(),
            selected: None,
            next_sequence: Some(1),
        }
    }

    // ========== Queries ==========

    /// Returns the built-ins: morning, night, away.
    #[must_use]
    pub fn builtins(&self) -> &[Preset] {
        &self.builtins
    }

    /// Returns the custom presets in insertion order.
    #[must_use]
    pub fn custom(&self) -> &[Preset] {
        &self.custom
    }

    /// Looks up a preset of either kind.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Preset> {
        self.builtins
            .iter()
            .chain(self.custom.iter())
            .find(|p| p.key() == key)
    }

    /// Returns `true` if a preset of either kind has this key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if the key belongs to a built-in.
    #[must_use]
    pub fn is_builtin(&self, key: &str) -> bool {
        self.builtins.iter().any(|p| p.key() == key)
    }

    /// Returns `true` if the key belongs to a custom preset.
    #[must_use]
    pub fn is_custom(&self, key: &str) -> bool {
        self.custom_index(key).is_some()
    }

    /// Returns the key of the most recently applied preset.
    #[must_use]
    pub fn selected(&self) -> Option<&PresetKey> {
        self.selected.as_ref()
    }

    // ========== Mutations ==========

    /// Stores a new custom preset and returns its key.
    ///
    /// Returns `None` without touching anything when `name` is empty or
    /// whitespace-only. The name is stored as given. The selection is left
    /// alone; callers decide whether the new preset becomes selected.
    pub fn create(&mut self, name: &str, snapshot: HomeState) -> Option<PresetKey> {
        if name.trim().is_empty() {
            tracing::debug!("ignoring custom preset with blank name");
            return None;
        }

        let key = self.generate_key();
        tracing::debug!(%key, name, "custom preset created");
        self.custom.push(Preset::new(key.clone(), name, snapshot));
        Some(key)
    }

    /// Returns the snapshot of a preset and marks it as selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no preset has this key.
    pub fn apply(&mut self, key: &str) -> Result<HomeState> {
        let preset = self.get(key).ok_or_else(|| Error::not_found(key))?;
        let state = preset.state();
        self.selected = Some(preset.key().clone());
        Ok(state)
    }

    /// Removes a custom preset.
    ///
    /// Clears the selection if it pointed at the removed preset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the key is a built-in or unknown.
    pub fn delete(&mut self, key: &str) -> Result<Preset> {
        let index = self.custom_index(key).ok_or_else(|| Error::not_found(key))?;
        let removed = self.custom.remove(index);

        if self.selected.as_ref() == Some(removed.key()) {
            self.selected = None;
        }

        tracing::debug!(key, "custom preset deleted");
        Ok(removed)
    }

    /// Replaces the whole custom mapping, as delivered by the remote mirror.
    ///
    /// Entries using a built-in key are dropped and for duplicate keys the
    /// last entry wins. Keys that look generated advance the counter so
    /// later local keys never collide with them.
    ///
    /// Returns `true` if the selection was cleared because its preset
    /// disappeared.
    pub fn replace_custom(&mut self, presets: Vec<Preset>) -> bool {
        let mut custom: Vec<Preset> = Vec::with_capacity(presets.len());
        for preset in presets {
            if self.is_builtin(preset.key().as_str()) {
                tracing::warn!(key = %preset.key(), "ignoring remote preset shadowing a built-in");
                continue;
            }
            self.reserve_key(preset.key());
            match custom.iter_mut().find(|p| p.key() == preset.key()) {
                Some(existing) => *existing = preset,
                None => custom.push(preset),
            }
        }
        self.custom = custom;

        let dangling = self
            .selected
            .as_ref()
            .is_some_and(|key| !self.contains(key.as_str()));
        if dangling {
            self.selected = None;
        }
        dangling
    }

    /// Clears the selection and returns the previous one.
    pub fn clear_selection(&mut self) -> Option<PresetKey> {
        self.selected.take()
    }

    // ========== Key generation ==========

    fn custom_index(&self, key: &str) -> Option<usize> {
        self.custom.iter().position(|p| p.key() == key)
    }

    fn generate_key(&mut self) -> PresetKey {
        while let Some(sequence) = self.next_sequence {
            self.next_sequence = sequence.checked_add(1);
            let key = PresetKey::custom(sequence);
            if !self.contains(key.as_str()) {
                return key;
            }
        }

        // Counter exhausted by remote keys: take the lowest free number
        tracing::warn!("custom preset counter exhausted, reusing a free key");
        let mut sequence = 1;
        loop {
            let key = PresetKey::custom(sequence);
            if !self.contains(key.as_str()) {
                return key;
            }
            sequence += 1;
        }
    }

    fn reserve_key(&mut self, key: &PresetKey) {
        let sequence = key
            .as_str()
            .strip_prefix(PresetKey::CUSTOM_PREFIX)
            .and_then(|n| n.parse::<u64>().ok());
        if let (Some(n), Some(next)) = (sequence, self.next_sequence)
            && n >= next
        {
            self.next_sequence = n.checked_add(1);
        }
    }
}

impl Default for ScenarioRegistry {
    fn default() -> Self {
        Self::new()
    }
}
