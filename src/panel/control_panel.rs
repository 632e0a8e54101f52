// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The control panel session.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot};

use crate::error::{Error, Result};
use crate::event::{ChangeOrigin, EventBus, PanelEvent};
use crate::remote::RemoteMirror;
use crate::scenario::{Preset, ScenarioRegistry};
use crate::state::{HomeState, HomeStateStore, StateChange};
use crate::subscription::CallbackRegistry;
use crate::types::{PresetKey, Room, Temperature};

use super::config::{PanelConfig, SelectionPolicy};
use super::sync::{MirrorCommand, MirrorLink};

// ============================================================================
// Shared state
// ============================================================================

#[derive(Debug)]
struct PanelCore {
    store: HomeStateStore,
    registry: ScenarioRegistry,
}

/// State shared between panel handles and the mirror tasks.
///
/// Lock order is `core`, then `mirror` or `pending`. Events are queued in
/// `pending` while `core` is held, so the queue follows the order in which
/// changes were applied, and delivered after `core` is released by whichever
/// thread holds `delivering`.
#[derive(Debug)]
pub(super) struct PanelShared {
    core: Mutex<PanelCore>,
    config: PanelConfig,
    event_bus: EventBus,
    callbacks: CallbackRegistry,
    mirror: Mutex<Option<MirrorLink>>,
    pending: Mutex<VecDeque<PanelEvent>>,
    delivering: Mutex<()>,
}

impl PanelShared {
    /// Queues events and delivers them.
    pub(super) fn emit(&self, events: Vec<PanelEvent>) {
        self.enqueue(events);
        self.deliver();
    }

    /// Queues events for delivery; called with the core lock held.
    fn enqueue(&self, events: Vec<PanelEvent>) {
        if !events.is_empty() {
            self.pending.lock().extend(events);
        }
    }

    /// Delivers queued events in queue order.
    ///
    /// Only one thread delivers at a time. A caller that finds delivery in
    /// progress leaves its events to that thread, which also makes it safe
    /// for callbacks to call back into the panel.
    fn deliver(&self) {
        loop {
            {
                let Some(_delivering) = self.delivering.try_lock() else {
                    return;
                };
                loop {
                    let next = self.pending.lock().pop_front();
                    let Some(event) = next else {
                        break;
                    };
                    self.event_bus.publish(event.clone());
                    self.callbacks.dispatch(&event);
                }
            }
            // Events queued between the last pop and the unlock
            if self.pending.lock().is_empty() {
                return;
            }
        }
    }

    /// Queues a remote write if a mirror is attached.
    ///
    /// Called with the core lock held so remote order matches local order.
    fn push_remote(&self, command: MirrorCommand) {
        if let Some(link) = self.mirror.lock().as_ref() {
            link.send(command);
        }
    }

    /// Handles a `homeState` snapshot from the remote.
    pub(super) fn ingest_home_state(&self, snapshot: Option<HomeState>) {
        let mut events = Vec::new();
        {
            let mut core = self.core.lock();
            match snapshot {
                Some(state) => {
                    if core.store.apply_state(state) {
                        tracing::debug!("home state overwritten by remote");
                        events.push(PanelEvent::state_changed(state, ChangeOrigin::Remote));
                    }
                }
                None if self.config.seed_remote => {
                    tracing::info!("remote home state absent, seeding with local state");
                    self.push_remote(MirrorCommand::WriteHomeState(core.store.get()));
                }
                None => tracing::debug!("remote home state absent"),
            }
            self.enqueue(events);
        }
        self.deliver();
    }

    /// Handles a custom presets snapshot from the remote.
    pub(super) fn ingest_presets(&self, presets: Vec<Preset>) {
        let mut events = Vec::new();
        {
            let mut core = self.core.lock();
            let before = core.registry.custom().to_vec();
            let cleared = core.registry.replace_custom(presets);
            let after = core.registry.custom();
            if before.as_slice() != after {
                tracing::debug!(count = after.len(), "custom presets replaced by remote");
                events.push(PanelEvent::PresetsReplaced {
                    presets: after.to_vec(),
                });
            }
            if cleared {
                events.push(PanelEvent::selection_changed(None));
            }
            self.enqueue(events);
        }
        self.deliver();
    }
}

// ============================================================================
// ControlPanel
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PresetKind {
    Any,
    Builtin,
    Custom,
}

/// A control panel session.
///
/// Owns the home state, the preset registry and the optional link to a
/// remote mirror. Clones are cheap and share the same session.
///
/// Every operation completes locally before it returns. When a mirror is
/// attached, local changes are queued for the remote and written in the
/// background; failures surface as [`PanelEvent::SyncFailed`] and never
/// roll back local state.
///
/// # Examples
///
/// ```
/// use home_scenes::{ControlPanel, Room};
///
/// # fn main() -> home_scenes::Result<()> {
/// let panel = ControlPanel::new();
///
/// let state = panel.apply_builtin("night")?;
/// assert!(state.ac_on);
/// assert_eq!(panel.selected().unwrap(), "night");
///
/// panel.set_light(Room::Kitchen, true);
/// assert!(panel.state().kitchen_light);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ControlPanel {
    shared: Arc<PanelShared>,
}

impl ControlPanel {
    /// Creates a panel with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PanelConfig::default())
    }

    /// Creates a panel with the given configuration.
    #[must_use]
    pub fn with_config(config: PanelConfig) -> Self {
        let shared = PanelShared {
            core: Mutex::new(PanelCore {
                store: HomeStateStore::with_state(config.initial_state),
                registry: ScenarioRegistry::new(),
            }),
            event_bus: EventBus::with_capacity(config.event_capacity),
            callbacks: CallbackRegistry::new(),
            mirror: Mutex::new(None),
            pending: Mutex::new(VecDeque::new()),
            delivering: Mutex::new(()),
            config,
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Returns the panel configuration.
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.shared.config
    }

    // ========== Reads ==========

    /// Returns the current home state.
    #[must_use]
    pub fn state(&self) -> HomeState {
        self.shared.core.lock().store.get()
    }

    /// Returns the key of the selected preset.
    #[must_use]
    pub fn selected(&self) -> Option<PresetKey> {
        self.shared.core.lock().registry.selected().cloned()
    }

    /// Returns the built-in presets in display order.
    #[must_use]
    pub fn builtins(&self) -> Vec<Preset> {
        self.shared.core.lock().registry.builtins().to_vec()
    }

    /// Returns the custom presets in creation order.
    #[must_use]
    pub fn custom_presets(&self) -> Vec<Preset> {
        self.shared.core.lock().registry.custom().to_vec()
    }

    /// Looks up a preset of either kind.
    #[must_use]
    pub fn preset(&self, key: &str) -> Option<Preset> {
        self.shared.core.lock().registry.get(key).cloned()
    }

    // ========== Observation ==========

    /// Subscribes to panel events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.shared.event_bus.subscribe()
    }

    /// Returns the callback registry.
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.shared.callbacks
    }

    // ========== State edits ==========

    /// Applies a manual edit and returns the resulting state.
    ///
    /// Temperature edits clamp to the allowed range.
    pub fn edit(&self, change: &StateChange) -> HomeState {
        self.edit_with(|_| change.clone())
    }

    /// Switches the light of one room.
    pub fn set_light(&self, room: Room, on: bool) -> HomeState {
        self.edit(&StateChange::light(room, on))
    }

    /// Switches the air conditioner.
    pub fn set_ac(&self, on: bool) -> HomeState {
        self.edit(&StateChange::air_conditioner(on))
    }

    /// Sets the target temperature.
    pub fn set_temperature(&self, temperature: Temperature) -> HomeState {
        self.edit(&StateChange::temperature(temperature))
    }

    /// Moves the target temperature by `delta` degrees, clamping at the
    /// bounds.
    pub fn step_temperature(&self, delta: i8) -> HomeState {
        self.edit(&StateChange::temperature_step(delta))
    }

    /// Arms or disarms the security system.
    pub fn set_security(&self, active: bool) -> HomeState {
        self.edit(&StateChange::security(active))
    }

    /// Flips the security system.
    pub fn toggle_security(&self) -> HomeState {
        self.edit_with(|state| StateChange::security(!state.security_active))
    }

    fn edit_with<F>(&self, change: F) -> HomeState
    where
        F: FnOnce(&HomeState) -> StateChange,
    {
        let mut events = Vec::new();
        let state = {
            let mut core = self.shared.core.lock();
            let change = change(&core.store.get());
            let changed = core.store.set_field(&change);
            let state = core.store.get();

            if changed {
                events.push(PanelEvent::state_changed(state, ChangeOrigin::Manual));
                if self.shared.config.selection_policy == SelectionPolicy::ClearOnEdit
                    && core.registry.clear_selection().is_some()
                {
                    events.push(PanelEvent::selection_changed(None));
                }
                self.shared.push_remote(MirrorCommand::WriteHomeState(state));
            }
            self.shared.enqueue(events);
            state
        };
        self.shared.deliver();
        state
    }

    // ========== Presets ==========

    /// Applies a built-in preset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] unless `key` names a built-in preset.
    pub fn apply_builtin(&self, key: &str) -> Result<HomeState> {
        self.apply(key, PresetKind::Builtin)
    }

    /// Applies a custom preset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] unless `key` names a custom preset.
    pub fn apply_custom(&self, key: &str) -> Result<HomeState> {
        self.apply(key, PresetKind::Custom)
    }

    /// Applies a preset of either kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no preset has this key.
    pub fn apply_preset(&self, key: &str) -> Result<HomeState> {
        self.apply(key, PresetKind::Any)
    }

    fn apply(&self, key: &str, kind: PresetKind) -> Result<HomeState> {
        let mut events = Vec::new();
        let state = {
            let mut core = self.shared.core.lock();
            let kind_matches = match kind {
                PresetKind::Any => true,
                PresetKind::Builtin => core.registry.is_builtin(key),
                PresetKind::Custom => core.registry.is_custom(key),
            };
            if !kind_matches {
                return Err(Error::not_found(key));
            }

            let previous = core.registry.selected().cloned();
            let state = core.registry.apply(key)?;
            let selected = core.registry.selected().cloned();

            if core.store.apply_state(state) {
                let origin = ChangeOrigin::Preset(selected.clone().unwrap_or_else(|| key.into()));
                events.push(PanelEvent::state_changed(state, origin));
                self.shared.push_remote(MirrorCommand::WriteHomeState(state));
            }
            if previous != selected {
                events.push(PanelEvent::selection_changed(selected));
            }
            tracing::info!(key, "preset applied");
            self.shared.enqueue(events);
            state
        };
        self.shared.deliver();
        Ok(state)
    }

    /// Saves the live state as a new custom preset.
    ///
    /// Returns `None` and changes nothing when `name` is blank.
    pub fn create_custom(&self, name: &str) -> Option<PresetKey> {
        self.create(name, None)
    }

    /// Saves `state` as a new custom preset.
    ///
    /// Returns `None` and changes nothing when `name` is blank.
    pub fn create_custom_with(&self, name: &str, state: HomeState) -> Option<PresetKey> {
        self.create(name, Some(state))
    }

    fn create(&self, name: &str, state: Option<HomeState>) -> Option<PresetKey> {
        let key = {
            let mut core = self.shared.core.lock();
            let snapshot = state.unwrap_or_else(|| core.store.get());
            let key = core.registry.create(name, snapshot)?;
            let preset = core.registry.get(key.as_str())?.clone();
            self.shared.push_remote(MirrorCommand::WritePreset(preset.clone()));
            self.shared.enqueue(vec![PanelEvent::PresetCreated { preset }]);
            key
        };
        self.shared.deliver();
        Some(key)
    }

    /// Deletes a custom preset, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `key` is a built-in or unknown.
    pub fn delete_custom(&self, key: &str) -> Result<()> {
        let mut events = Vec::new();
        {
            let mut core = self.shared.core.lock();
            let previous = core.registry.selected().cloned();
            let removed = core.registry.delete(key)?;
            self.shared.push_remote(MirrorCommand::DeletePreset(removed.key().clone()));

            let cleared = previous.is_some() && core.registry.selected().is_none();
            events.push(PanelEvent::PresetDeleted {
                key: removed.key().clone(),
            });
            if cleared {
                events.push(PanelEvent::selection_changed(None));
            }
            self.shared.enqueue(events);
        }
        self.shared.deliver();
        Ok(())
    }

    // ========== Remote mirror ==========

    /// Attaches a remote mirror, replacing any previous one.
    ///
    /// Subscribes to both remote documents, then spawns the tasks that apply
    /// remote snapshots and write local changes. An absent remote home state
    /// is seeded with the local one unless
    /// [`PanelConfig::seed_remote`] is off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if either subscription cannot be set up.
    pub async fn attach_mirror<M: RemoteMirror>(&self, mirror: M) -> Result<()> {
        let home_state = mirror.watch_home_state().await?;
        let presets = mirror.watch_custom_presets().await?;

        let panel = Arc::downgrade(&self.shared);
        let mut slot = self.shared.mirror.lock();
        let mut link = MirrorLink::spawn_writer(
            Arc::new(mirror),
            panel.clone(),
            self.shared.config.remote_timeout,
        );
        link.spawn_feeds(&panel, home_state, presets);
        if slot.replace(link).is_some() {
            tracing::debug!("replaced previously attached mirror");
        }

        tracing::info!("remote mirror attached");
        Ok(())
    }

    /// Detaches the remote mirror, stopping its tasks.
    ///
    /// Returns `false` if no mirror was attached. Queued writes that have
    /// not started yet are dropped.
    pub fn detach_mirror(&self) -> bool {
        let detached = self.shared.mirror.lock().take().is_some();
        if detached {
            tracing::info!("remote mirror detached");
        }
        detached
    }

    /// Returns `true` if a remote mirror is attached.
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.shared.mirror.lock().is_some()
    }

    /// Waits until every remote write queued so far has been attempted.
    ///
    /// Returns immediately when no mirror is attached.
    pub async fn flush_mirror(&self) {
        let (done, wait) = oneshot::channel();
        let queued = {
            let slot = self.shared.mirror.lock();
            slot.as_ref()
                .is_some_and(|link| link.send(MirrorCommand::Flush(done)))
        };
        if queued {
            let _ = wait.await;
        }
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Builtin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn starts_from_default_state_without_selection() {
        let panel = ControlPanel::new();
        assert_eq!(panel.state(), HomeState::new());
        assert!(panel.selected().is_none());
        assert_eq!(panel.builtins().len(), 3);
        assert!(panel.custom_presets().is_empty());
        assert!(!panel.is_mirrored());
    }

    #[test]
    fn starts_from_configured_state() {
        let initial = HomeState::new().with_ac(true);
        let panel = ControlPanel::with_config(PanelConfig::new().with_initial_state(initial));
        assert_eq!(panel.state(), initial);
    }

    #[test]
    fn step_temperature_clamps() {
        let panel = ControlPanel::new();
        for _ in 0..20 {
            panel.step_temperature(1);
        }
        assert_eq!(panel.state().temperature, Temperature::MAX);
        for _ in 0..20 {
            panel.step_temperature(-1);
        }
        assert_eq!(panel.state().temperature, Temperature::MIN);
    }

    #[test]
    fn toggle_security_flips() {
        let panel = ControlPanel::new();
        assert!(panel.toggle_security().security_active);
        assert!(!panel.toggle_security().security_active);
    }

    #[test]
    fn apply_builtin_sets_state_and_selection() {
        let panel = ControlPanel::new();
        let state = panel.apply_builtin("away").unwrap();
        assert_eq!(state, Builtin::Away.state());
        assert_eq!(panel.state(), state);
        assert_eq!(panel.selected().unwrap(), "away");
    }

    #[test]
    fn apply_rejects_wrong_kind() {
        let panel = ControlPanel::new();
        let key = panel.create_custom("Movie").unwrap();

        assert!(panel.apply_builtin(key.as_str()).unwrap_err().is_not_found());
        assert!(panel.apply_custom("morning").unwrap_err().is_not_found());
        assert!(panel.selected().is_none());

        assert!(panel.apply_preset(key.as_str()).is_ok());
        assert!(panel.apply_preset("morning").is_ok());
    }

    #[test]
    fn unknown_key_changes_nothing() {
        let panel = ControlPanel::new();
        panel.apply_builtin("night").unwrap();
        let before = panel.state();

        assert!(panel.apply_preset("nonexistent").is_err());
        assert_eq!(panel.state(), before);
        assert_eq!(panel.selected().unwrap(), "night");
    }

    #[test]
    fn manual_edit_clears_selection_by_default() {
        let panel = ControlPanel::new();
        panel.apply_builtin("night").unwrap();

        // No-op edit keeps the selection
        panel.set_ac(true);
        assert_eq!(panel.selected().unwrap(), "night");

        panel.set_ac(false);
        assert!(panel.selected().is_none());
    }

    #[test]
    fn retain_policy_keeps_selection() {
        let panel = ControlPanel::with_config(
            PanelConfig::new().with_selection_policy(SelectionPolicy::Retain),
        );
        panel.apply_builtin("night").unwrap();
        panel.set_ac(false);
        assert_eq!(panel.selected().unwrap(), "night");
    }

    #[test]
    fn create_custom_snapshots_live_state() {
        let panel = ControlPanel::new();
        panel.set_security(true);
        let key = panel.create_custom("Guarded").unwrap();

        panel.set_security(false);
        let preset = panel.preset(key.as_str()).unwrap();
        assert!(preset.state().security_active);
        assert_eq!(preset.name(), "Guarded");
    }

    #[test]
    fn blank_name_is_ignored() {
        let panel = ControlPanel::new();
        assert!(panel.create_custom("   ").is_none());
        assert!(panel.create_custom_with("", HomeState::new()).is_none());
        assert!(panel.custom_presets().is_empty());
    }

    #[test]
    fn delete_selected_custom_clears_selection() {
        let panel = ControlPanel::new();
        let key = panel
            .create_custom_with("Cozy", HomeState::new().with_ac(true))
            .unwrap();
        panel.apply_custom(key.as_str()).unwrap();

        panel.delete_custom(key.as_str()).unwrap();
        assert!(panel.selected().is_none());
        assert!(panel.preset(key.as_str()).is_none());
        // State is unaffected by deletion
        assert!(panel.state().ac_on);
    }

    #[test]
    fn delete_builtin_fails() {
        let panel = ControlPanel::new();
        assert!(panel.delete_custom("morning").unwrap_err().is_not_found());
        assert_eq!(panel.builtins().len(), 3);
    }

    #[tokio::test]
    async fn events_follow_changes() {
        let panel = ControlPanel::new();
        let mut rx = panel.subscribe();

        panel.apply_builtin("night").unwrap();

        match rx.recv().await.unwrap() {
            PanelEvent::StateChanged { state, origin } => {
                assert_eq!(state, Builtin::Night.state());
                assert_eq!(origin, ChangeOrigin::Preset(PresetKey::new("night")));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        match rx.recv().await.unwrap() {
            PanelEvent::SelectionChanged { selected } => {
                assert_eq!(selected.unwrap(), "night");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn callbacks_receive_manual_changes() {
        let panel = ControlPanel::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        panel.callbacks().on_state_changed(move |_, origin| {
            assert_eq!(origin, &ChangeOrigin::Manual);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        panel.set_light(Room::Bedroom, true);
        panel.set_light(Room::Bedroom, true);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callbacks_may_call_back_into_the_panel() {
        let panel = ControlPanel::new();
        let inner = panel.clone();
        panel.callbacks().on_selection_changed(move |selected| {
            if selected.is_some_and(|key| key == "night") {
                inner.set_light(Room::Kitchen, true);
            }
        });
        let mut rx = panel.subscribe();

        panel.apply_builtin("night").unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            PanelEvent::StateChanged { origin: ChangeOrigin::Preset(_), .. }
        ));
        assert!(matches!(
            &events[1],
            PanelEvent::SelectionChanged { selected: Some(_) }
        ));
        match &events[2] {
            PanelEvent::StateChanged { state, origin } => {
                assert_eq!(origin, &ChangeOrigin::Manual);
                assert_eq!(*state, panel.state());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            &events[3],
            PanelEvent::SelectionChanged { selected: None }
        ));
        assert!(panel.state().kitchen_light);
    }

    #[tokio::test]
    async fn flush_without_mirror_returns() {
        let panel = ControlPanel::new();
        panel.flush_mirror().await;
        assert!(!panel.detach_mirror());
    }
}
