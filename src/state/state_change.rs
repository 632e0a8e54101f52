// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field-level edits of the home state.
//!
//! A [`StateChange`] is what the state edit surface produces: one toggle or
//! one step of the temperature stepper. Presets never go through this type;
//! they replace the whole [`HomeState`](super::HomeState) at once.
//!
//! # Examples
//!
//! ```
//! use home_scenes::state::{HomeState, StateChange};
//! use home_scenes::types::Room;
//!
//! let mut state = HomeState::new();
//!
//! assert!(state.apply(&StateChange::light(Room::Kitchen, true)));
//! // Applying the same change again is a no-op
//! assert!(!state.apply(&StateChange::light(Room::Kitchen, true)));
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Room, Temperature};

/// A single edit of the home state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateChange {
    /// A room light was switched.
    Light {
        /// The room.
        room: Room,
        /// Whether the light is on.
        on: bool,
    },

    /// The air conditioner was switched.
    AirConditioner(bool),

    /// The set point was set to an absolute value.
    Temperature(Temperature),

    /// The set point was moved by a relative amount, clamped to 16-30.
    TemperatureStep(i8),

    /// The locks/alarm were engaged or released.
    Security(bool),

    /// Multiple edits at once.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a light change.
    #[must_use]
    pub fn light(room: Room, on: bool) -> Self {
        Self::Light { room, on }
    }

    /// Creates an air conditioner change.
    #[must_use]
    pub fn air_conditioner(on: bool) -> Self {
        Self::AirConditioner(on)
    }

    /// Creates an absolute temperature change.
    #[must_use]
    pub fn temperature(value: Temperature) -> Self {
        Self::Temperature(value)
    }

    /// Creates a relative temperature change.
    #[must_use]
    pub fn temperature_step(delta: i8) -> Self {
        Self::TemperatureStep(delta)
    }

    /// Creates a security change.
    #[must_use]
    pub fn security(active: bool) -> Self {
        Self::Security(active)
    }

    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }

    /// Returns `true` if this change touches the climate fields.
    ///
    /// A batch is a climate change if any nested change is.
    #[must_use]
    pub fn is_climate(&self) -> bool {
        match self {
            Self::AirConditioner(_) | Self::Temperature(_) | Self::TemperatureStep(_) => true,
            Self::Batch(changes) => changes.iter().any(Self::is_climate),
            Self::Light { .. } | Self::Security(_) => false,
        }
    }

    /// Returns the number of individual changes.
    ///
    /// For batch changes, returns the total count of nested changes.
    #[must_use]
    pub fn change_count(&self) -> usize {
        match self {
            Self::Batch(changes) => changes.iter().map(Self::change_count).sum(),
            _ => 1,
        }
    }
}
