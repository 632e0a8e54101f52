// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Behavioral tests for the control panel without a remote mirror.

use std::sync::{Arc, Mutex};

use home_scenes::{
    Builtin, ChangeOrigin, ControlPanel, Error, HomeState, HomeStateStore, PanelEvent,
    PresetsChange, Room, StateChange, Temperature,
};

fn every_state() -> Vec<HomeState> {
    let mut states = Vec::new();
    for bits in 0u8..32 {
        for t in Temperature::MIN.value()..=Temperature::MAX.value() {
            states.push(HomeState {
                living_room_light: bits & 1 != 0,
                kitchen_light: bits & 2 != 0,
                bedroom_light: bits & 4 != 0,
                ac_on: bits & 8 != 0,
                temperature: Temperature::clamped(i32::from(t)),
                security_active: bits & 16 != 0,
            });
        }
    }
    states
}

// ============================================================================
// Temperature
// ============================================================================

mod temperature {
    use super::*;

    #[test]
    fn stepping_never_leaves_range() {
        let panel = ControlPanel::new();
        for delta in [1i8, 1, 1, -1, 5, 5, 5, -20, -20, 3] {
            let t = panel.step_temperature(delta).temperature.value();
            assert!((16..=30).contains(&t), "temperature {t} out of range");
        }
    }

    #[test]
    fn out_of_range_values_clamp_through_edits() {
        let panel = ControlPanel::new();

        panel.set_temperature(Temperature::clamped(45));
        assert_eq!(panel.state().temperature, Temperature::MAX);

        panel.set_temperature(Temperature::clamped(-3));
        assert_eq!(panel.state().temperature, Temperature::MIN);
    }

    #[test]
    fn strict_constructor_reports_range() {
        for t in 16..=30 {
            assert_eq!(i32::from(Temperature::new(t).unwrap().value()), t);
        }
        let err = Temperature::new(31).unwrap_err();
        assert_eq!(Error::from(err).to_string(), "value error: value 31 is out of range [16, 30]");
    }
}

// ============================================================================
// Presets
// ============================================================================

mod presets {
    use super::*;

    #[test]
    fn builtin_apply_replaces_the_whole_state() {
        let panel = ControlPanel::new();
        panel.apply_builtin("night").unwrap();
        assert!(panel.state().ac_on);

        let state = panel.apply_builtin("away").unwrap();
        assert_eq!(state, Builtin::Away.state());
        assert!(!panel.state().ac_on);
        assert_eq!(panel.state().lights_on(), 0);
        assert_eq!(panel.state().temperature.value(), 22);
    }

    #[test]
    fn every_builtin_applies_exactly_from_any_state() {
        for builtin in Builtin::ALL {
            for start in [HomeState::new(), Builtin::Night.state(), every_state()[100]] {
                let panel = ControlPanel::new();
                panel.edit(&StateChange::batch(vec![
                    StateChange::light(Room::LivingRoom, start.living_room_light),
                    StateChange::light(Room::Kitchen, start.kitchen_light),
                    StateChange::light(Room::Bedroom, start.bedroom_light),
                    StateChange::air_conditioner(start.ac_on),
                    StateChange::temperature(start.temperature),
                    StateChange::security(start.security_active),
                ]));

                assert_eq!(panel.apply_builtin(builtin.key()).unwrap(), builtin.state());
                assert_eq!(panel.state(), builtin.state());
            }
        }
    }

    #[test]
    fn blank_names_change_nothing() {
        let panel = ControlPanel::new();
        panel.apply_builtin("morning").unwrap();

        assert!(panel.create_custom("").is_none());
        assert!(panel.create_custom("   ").is_none());
        assert!(panel.custom_presets().is_empty());
        assert_eq!(panel.selected().unwrap(), "morning");
    }

    #[test]
    fn custom_preset_keeps_its_snapshot() {
        let panel = ControlPanel::new();
        panel.set_light(Room::LivingRoom, true);
        panel.set_ac(true);
        panel.step_temperature(-3);
        let captured = panel.state();

        let key = panel.create_custom("Movie Night").unwrap();

        panel.set_light(Room::LivingRoom, false);
        panel.set_ac(false);
        panel.toggle_security();

        assert_eq!(panel.apply_custom(key.as_str()).unwrap(), captured);
        assert_eq!(panel.state(), captured);
        assert_eq!(panel.selected(), Some(key));
    }

    #[test]
    fn builtins_cannot_be_deleted() {
        let panel = ControlPanel::new();
        let before = panel.builtins();

        let err = panel.delete_custom("morning").unwrap_err();
        assert!(matches!(err, Error::NotFound { ref key } if key == "morning"));
        assert_eq!(panel.builtins(), before);
        assert!(panel.preset("morning").is_some());
    }

    #[test]
    fn deleting_the_selected_custom_preset_clears_selection() {
        let panel = ControlPanel::new();
        let key = panel.create_custom("Late").unwrap();
        panel.apply_custom(key.as_str()).unwrap();
        assert_eq!(panel.selected().as_ref(), Some(&key));

        panel.delete_custom(key.as_str()).unwrap();
        assert!(panel.selected().is_none());
    }

    #[test]
    fn deleting_another_preset_keeps_selection() {
        let panel = ControlPanel::new();
        let kept = panel.create_custom("Kept").unwrap();
        let removed = panel.create_custom("Removed").unwrap();
        panel.apply_custom(kept.as_str()).unwrap();

        panel.delete_custom(removed.as_str()).unwrap();
        assert_eq!(panel.selected(), Some(kept));
    }

    #[test]
    fn keys_are_never_reused() {
        let panel = ControlPanel::new();
        let first = panel.create_custom("A").unwrap();
        panel.delete_custom(first.as_str()).unwrap();
        let second = panel.create_custom("B").unwrap();
        assert_ne!(first, second);
    }
}

// ============================================================================
// State store
// ============================================================================

mod store {
    use super::*;

    #[test]
    fn apply_state_round_trips_every_state() {
        let mut store = HomeStateStore::new();
        for state in every_state() {
            store.apply_state(state);
            assert_eq!(store.get(), state);
        }
    }

    #[test]
    fn default_state() {
        let state = HomeStateStore::new().get();
        assert_eq!(
            serde_json::to_value(state).unwrap(),
            serde_json::json!({
                "livingRoomLight": false,
                "kitchenLight": false,
                "bedroomLight": false,
                "acOn": false,
                "temperature": 22,
                "securityActive": false
            })
        );
    }
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn night_scenario_from_defaults() {
    let panel = ControlPanel::new();
    assert_eq!(panel.state(), HomeState::new());

    let state = panel.apply_builtin("night").unwrap();

    assert_eq!(
        serde_json::to_value(state).unwrap(),
        serde_json::json!({
            "livingRoomLight": true,
            "kitchenLight": false,
            "bedroomLight": true,
            "acOn": true,
            "temperature": 24,
            "securityActive": true
        })
    );
    assert_eq!(panel.selected().unwrap(), "night");
}

#[test]
fn callbacks_see_the_whole_session() {
    let panel = ControlPanel::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&log);
    panel.callbacks().on_state_changed(move |_, origin| {
        sink.lock().unwrap().push(format!("state:{origin:?}"));
    });
    let sink = Arc::clone(&log);
    panel.callbacks().on_selection_changed(move |selected| {
        sink.lock()
            .unwrap()
            .push(format!("selected:{}", selected.map_or("none", |k| k.as_str())));
    });
    let sink = Arc::clone(&log);
    panel.callbacks().on_presets_changed(move |change| {
        let label = match change {
            PresetsChange::Created(preset) => format!("created:{}", preset.name()),
            PresetsChange::Deleted(key) => format!("deleted:{key}"),
            PresetsChange::Replaced(_) => "replaced".to_string(),
        };
        sink.lock().unwrap().push(label);
    });

    panel.apply_builtin("morning").unwrap();
    panel.set_light(Room::Bedroom, true);
    let key = panel.create_custom("Wake").unwrap();
    panel.delete_custom(key.as_str()).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        [
            "state:Preset(PresetKey(\"morning\"))".to_string(),
            "selected:morning".to_string(),
            "state:Manual".to_string(),
            "selected:none".to_string(),
            "created:Wake".to_string(),
            format!("deleted:{key}"),
        ]
    );
}

#[tokio::test]
async fn broadcast_subscribers_see_manual_origin() {
    let panel = ControlPanel::new();
    let mut rx = panel.subscribe();

    panel.toggle_security();

    match rx.recv().await.unwrap() {
        PanelEvent::StateChanged { state, origin } => {
            assert!(state.security_active);
            assert_eq!(origin, ChangeOrigin::Manual);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    // Nothing was selected, so no selection event follows
    assert!(rx.try_recv().is_err());
}
