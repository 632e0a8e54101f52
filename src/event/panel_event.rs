// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel event types.

use std::fmt;

use crate::scenario::Preset;
use crate::state::HomeState;
use crate::types::PresetKey;

/// What caused a home state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// A toggle or the temperature stepper.
    Manual,
    /// A preset was applied.
    Preset(PresetKey),
    /// A snapshot arrived from the remote mirror.
    Remote,
}

/// The remote operation a sync failure relates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOperation {
    /// Writing the `homeState` document.
    WriteHomeState,
    /// Writing a `customPresets/{key}` document.
    WriteCustomPreset(PresetKey),
    /// Deleting a `customPresets/{key}` document.
    DeleteCustomPreset(PresetKey),
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteHomeState => f.write_str("write homeState"),
            Self::WriteCustomPreset(key) => write!(f, "write customPresets/{key}"),
            Self::DeleteCustomPreset(key) => write!(f, "delete customPresets/{key}"),
        }
    }
}

/// Events emitted by the control panel.
///
/// The presentation layer re-renders from these; a [`SyncFailed`] event is
/// the non-fatal notice to show when the remote mirror could not be updated.
///
/// [`SyncFailed`]: PanelEvent::SyncFailed
///
/// # Examples
///
/// ```
/// use home_scenes::event::{ChangeOrigin, PanelEvent};
/// use home_scenes::state::HomeState;
///
/// let event = PanelEvent::state_changed(HomeState::new(), ChangeOrigin::Manual);
/// assert!(event.is_state_change());
/// ```
#[derive(Debug, Clone)]
pub enum PanelEvent {
    /// The home state changed.
    StateChanged {
        /// The complete new state.
        state: HomeState,
        /// What caused the change.
        origin: ChangeOrigin,
    },

    /// The selected preset changed.
    SelectionChanged {
        /// The new selection, if any.
        selected: Option<PresetKey>,
    },

    /// A custom preset was created locally.
    PresetCreated {
        /// The new preset.
        preset: Preset,
    },

    /// A custom preset was deleted locally.
    PresetDeleted {
        /// Key of the removed preset.
        key: PresetKey,
    },

    /// The custom presets were replaced by a remote snapshot.
    PresetsReplaced {
        /// The new custom presets.
        presets: Vec<Preset>,
    },

    /// A remote write or delete failed. Local state is unaffected.
    SyncFailed {
        /// The operation that failed.
        operation: SyncOperation,
        /// Description of the failure.
        message: String,
    },
}

impl PanelEvent {
    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` if this event changes the set of custom presets.
    #[must_use]
    pub fn is_preset_change(&self) -> bool {
        matches!(
            self,
            Self::PresetCreated { .. } | Self::PresetDeleted { .. } | Self::PresetsReplaced { .. }
        )
    }

    /// Returns `true` if this is a sync failure.
    #[must_use]
    pub fn is_sync_failure(&self) -> bool {
        matches!(self, Self::SyncFailed { .. })
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(state: HomeState, origin: ChangeOrigin) -> Self {
        Self::StateChanged { state, origin }
    }

    /// Creates a selection changed event.
    #[must_use]
    pub fn selection_changed(selected: Option<PresetKey>) -> Self {
        Self::SelectionChanged { selected }
    }

    /// Creates a sync failure event.
    #[must_use]
    pub fn sync_failed(operation: SyncOperation, message: impl Into<String>) -> Self {
        Self::SyncFailed {
            operation,
            message: message.into(),
        }
    }
}
