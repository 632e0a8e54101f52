// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for panel subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::event::{ChangeOrigin, PanelEvent, SyncOperation};
use crate::scenario::Preset;
use crate::state::HomeState;
use crate::types::PresetKey;

/// Unique identifier for a subscription.
///
/// IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type StateCallback = Arc<dyn Fn(&HomeState, &ChangeOrigin) + Send + Sync>;

type SelectionCallback = Arc<dyn Fn(Option<&PresetKey>) + Send + Sync>;

type PresetsCallback = Arc<dyn Fn(&PresetsChange) + Send + Sync>;

type SyncFailedCallback = Arc<dyn Fn(&SyncOperation, &str) + Send + Sync>;

/// Change to the set of custom presets, passed to preset callbacks.
#[derive(Debug, Clone)]
pub enum PresetsChange {
    /// A preset was created locally.
    Created(Preset),
    /// A preset was deleted locally.
    Deleted(PresetKey),
    /// The whole set was replaced by a remote snapshot.
    Replaced(Vec<Preset>),
}

/// Registry for panel callbacks.
///
/// Thread-safe through `parking_lot::RwLock`; callbacks are wrapped in `Arc`
/// and run synchronously on the thread that dispatches the event, never
/// while the panel's state lock is held.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_callbacks: RwLock<HashMap<SubscriptionId, StateCallback>>,
    selection_callbacks: RwLock<HashMap<SubscriptionId, SelectionCallback>>,
    presets_callbacks: RwLock<HashMap<SubscriptionId, PresetsCallback>>,
    sync_failed_callbacks: RwLock<HashMap<SubscriptionId, SyncFailedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_callbacks: RwLock::new(HashMap::new()),
            selection_callbacks: RwLock::new(HashMap::new()),
            presets_callbacks: RwLock::new(HashMap::new()),
            sync_failed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for home state changes.
    ///
    /// The callback receives the complete new state and what caused it.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&HomeState, &ChangeOrigin) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for selection changes.
    pub fn on_selection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Option<&PresetKey>) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.selection_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for changes to the custom presets.
    pub fn on_presets_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresetsChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.presets_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for remote sync failures.
    ///
    /// The callback receives the failed operation and a description.
    pub fn on_sync_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&SyncOperation, &str) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.sync_failed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_callbacks.write().remove(&id).is_some()
            || self.selection_callbacks.write().remove(&id).is_some()
            || self.presets_callbacks.write().remove(&id).is_some()
            || self.sync_failed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_callbacks.write().clear();
        self.selection_callbacks.write().clear();
        self.presets_callbacks.write().clear();
        self.sync_failed_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches an event to the matching callbacks.
    ///
    /// Callbacks are snapshotted before they run, so a callback may register
    /// or unregister others without deadlocking.
    pub fn dispatch(&self, event: &PanelEvent) {
        match event {
            PanelEvent::StateChanged { state, origin } => {
                let callbacks: Vec<_> = self.state_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(state, origin);
                }
            }
            PanelEvent::SelectionChanged { selected } => {
                let callbacks: Vec<_> =
                    self.selection_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(selected.as_ref());
                }
            }
            PanelEvent::PresetCreated { preset } => {
                self.dispatch_presets(&PresetsChange::Created(preset.clone()));
            }
            PanelEvent::PresetDeleted { key } => {
                self.dispatch_presets(&PresetsChange::Deleted(key.clone()));
            }
            PanelEvent::PresetsReplaced { presets } => {
                self.dispatch_presets(&PresetsChange::Replaced(presets.clone()));
            }
            PanelEvent::SyncFailed { operation, message } => {
                let callbacks: Vec<_> = self
                    .sync_failed_callbacks
                    .read()
                    .values()
                    .cloned()
                    .collect();
                for callback in callbacks {
                    callback(operation, message);
                }
            }
        }
    }

    fn dispatch_presets(&self, change: &PresetsChange) {
        let callbacks: Vec<_> = self.presets_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(change);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_callbacks.read().len()
            + self.selection_callbacks.read().len()
            + self.presets_callbacks.read().len()
            + self.sync_failed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(42).to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
    }

    #[test]
    fn state_callback_and_unsubscribe() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_state_changed(move |_state, _origin| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(registry.callback_count(), 1);

        let event = PanelEvent::state_changed(HomeState::new(), ChangeOrigin::Manual);
        registry.dispatch(&event);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        registry.dispatch(&event);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn selection_callback_receives_key() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<PresetKey>));
        let received_clone = received.clone();

        registry.on_selection_changed(move |key| {
            *received_clone.write() = key.cloned();
        });

        registry.dispatch(&PanelEvent::selection_changed(Some(PresetKey::new("night"))));
        assert_eq!(received.read().as_ref().unwrap(), "night");
    }

    #[test]
    fn presets_callback_sees_each_kind() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_presets_changed(move |_change| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&PanelEvent::PresetCreated {
            preset: Preset::new("custom_1", "a", HomeState::new()),
        });
        registry.dispatch(&PanelEvent::PresetDeleted {
            key: PresetKey::custom(1),
        });
        registry.dispatch(&PanelEvent::PresetsReplaced {
            presets: Vec::new(),
        });
        registry.dispatch(&PanelEvent::selection_changed(None));

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn sync_failed_callback_gets_message() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(String::new()));
        let received_clone = received.clone();

        registry.on_sync_failed(move |operation, message| {
            *received_clone.write() = format!("{operation}: {message}");
        });

        registry.dispatch(&PanelEvent::sync_failed(
            SyncOperation::WriteHomeState,
            "offline",
        ));
        assert_eq!(*received.read(), "write homeState: offline");
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let id_slot = Arc::new(RwLock::new(None::<SubscriptionId>));

        let registry_clone = Arc::clone(&registry);
        let slot_clone = Arc::clone(&id_slot);
        let id = registry.on_selection_changed(move |_| {
            if let Some(id) = *slot_clone.read() {
                registry_clone.unsubscribe(id);
            }
        });
        *id_slot.write() = Some(id);

        registry.dispatch(&PanelEvent::selection_changed(None));
        assert!(registry.is_empty());
    }

    #[test]
    fn unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn clear_removes_everything() {
        let registry = CallbackRegistry::new();
        registry.on_state_changed(|_, _| {});
        registry.on_presets_changed(|_| {});
        registry.on_sync_failed(|_, _| {});
        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn unique_ids() {
        let registry = CallbackRegistry::new();
        let id1 = registry.on_state_changed(|_, _| {});
        let id2 = registry.on_selection_changed(|_| {});
        assert_ne!(id1, id2);
    }
}
