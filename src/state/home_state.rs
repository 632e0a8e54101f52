// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The flat device record.

use serde::{Deserialize, Serialize};

use crate::types::{Room, Temperature};

use super::StateChange;

/// Complete state of the controlled home.
///
/// This is a plain value: presets store it, the mirror transports it, and
/// the store replaces it as a whole. The serialized form uses the camelCase
/// field names of the remote `homeState` document.
///
/// # Examples
///
/// ```
/// use home_scenes::state::HomeState;
/// use home_scenes::types::{Room, Temperature};
///
/// let state = HomeState::new()
///     .with_light(Room::LivingRoom, true)
///     .with_ac(true)
///     .with_temperature(Temperature::new(24).unwrap());
///
/// assert!(state.light(Room::LivingRoom));
/// assert_eq!(state.temperature().value(), 24);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeState {
    /// Living room light.
    pub living_room_light: bool,
    /// Kitchen light.
    pub kitchen_light: bool,
    /// Bedroom light.
    pub bedroom_light: bool,
    /// Air conditioner power.
    pub ac_on: bool,
    /// Air conditioner set point.
    #[serde(default)]
    pub temperature: Temperature,
    /// Locks/alarm engaged.
    pub security_active: bool,
}

impl HomeState {
    /// Creates the session-start state: everything off, 22 °C.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the light state of a room.
    #[must_use]
    pub fn light(&self, room: Room) -> bool {
        match room {
            Room::LivingRoom => self.living_room_light,
            Room::Kitchen => self.kitchen_light,
            Room::Bedroom => self.bedroom_light,
        }
    }

    /// Sets the light state of a room.
    pub fn set_light(&mut self, room: Room, on: bool) {
        match room {
            Room::LivingRoom => self.living_room_light = on,
            Room::Kitchen => self.kitchen_light = on,
            Room::Bedroom => self.bedroom_light = on,
        }
    }

    /// Returns the set point.
    #[must_use]
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Returns the number of lights that are on.
    #[must_use]
    pub fn lights_on(&self) -> usize {
        Room::ALL.iter().filter(|room| self.light(**room)).count()
    }

    /// Builder-style light setter.
    #[must_use]
    pub fn with_light(mut self, room: Room, on: bool) -> Self {
        self.set_light(room, on);
        self
    }

    /// Builder-style air conditioner setter.
    #[must_use]
    pub fn with_ac(mut self, on: bool) -> Self {
        self.ac_on = on;
        self
    }

    /// Builder-style set point setter.
    #[must_use]
    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builder-style security setter.
    #[must_use]
    pub fn with_security(mut self, active: bool) -> Self {
        self.security_active = active;
        self
    }

    /// Applies a state change and returns whether the state actually changed.
    ///
    /// Temperature edits are clamped to 16-30.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        let before = *self;
        match change {
            StateChange::Light { room, on } => self.set_light(*room, *on),
            StateChange::AirConditioner(on) => self.ac_on = *on,
            StateChange::Temperature(value) => self.temperature = *value,
            StateChange::TemperatureStep(delta) => {
                self.temperature = self.temperature.step(*delta);
            }
            StateChange::Security(active) => self.security_active = *active,
            StateChange::Batch(changes) => {
                for c in changes {
                    self.apply(c);
                }
            }
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_session_start() {
        let state = HomeState::new();
        assert!(!state.living_room_light);
        assert!(!state.kitchen_light);
        assert!(!state.bedroom_light);
        assert!(!state.ac_on);
        assert_eq!(state.temperature().value(), 22);
        assert!(!state.security_active);
    }

    #[test]
    fn light_accessors() {
        let mut state = HomeState::new();
        state.set_light(Room::Kitchen, true);
        assert!(state.light(Room::Kitchen));
        assert!(!state.light(Room::Bedroom));
        assert_eq!(state.lights_on(), 1);
    }

    #[test]
    fn apply_reports_change() {
        let mut state = HomeState::new();
        assert!(state.apply(&StateChange::security(true)));
        assert!(!state.apply(&StateChange::security(true)));
    }

    #[test]
    fn apply_temperature_step_clamps() {
        let mut state = HomeState::new().with_temperature(Temperature::MAX);
        assert!(!state.apply(&StateChange::temperature_step(1)));
        assert_eq!(state.temperature(), Temperature::MAX);

        let mut state = HomeState::new().with_temperature(Temperature::MIN);
        assert!(!state.apply(&StateChange::temperature_step(-1)));
        assert!(state.apply(&StateChange::temperature_step(1)));
        assert_eq!(state.temperature().value(), 17);
    }

    #[test]
    fn apply_batch() {
        let mut state = HomeState::new();
        let changes = StateChange::batch(vec![
            StateChange::air_conditioner(true),
            StateChange::temperature_step(2),
            StateChange::light(Room::Bedroom, true),
        ]);
        assert!(state.apply(&changes));
        assert!(state.ac_on);
        assert_eq!(state.temperature().value(), 24);
        assert!(state.bedroom_light);
    }

    #[test]
    fn document_form_uses_camel_case() {
        let state = HomeState::new().with_ac(true);
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "livingRoomLight": false,
                "kitchenLight": false,
                "bedroomLight": false,
                "acOn": true,
                "temperature": 22,
                "securityActive": false
            })
        );
    }

    #[test]
    fn document_with_out_of_range_temperature_is_clamped() {
        let json = r#"{
            "livingRoomLight": true,
            "kitchenLight": false,
            "bedroomLight": false,
            "acOn": true,
            "temperature": 35,
            "securityActive": false
        }"#;
        let state: HomeState = serde_json::from_str(json).unwrap();
        assert_eq!(state.temperature(), Temperature::MAX);
        assert!(state.living_room_light);
    }
}
