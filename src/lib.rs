// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Scenes - state model, scenarios and remote mirroring for a home
//! control panel.
//!
//! The panel controls three room lights, an air conditioner with a target
//! temperature and a security system. Whole configurations can be saved and
//! re-applied as presets, and the live state can be mirrored to a real-time
//! document store so several panels stay in step.
//!
//! # Features
//!
//! - **State edits**: per-field toggles and a clamped temperature stepper
//! - **Presets**: three built-in scenarios plus user-defined ones
//! - **Observation**: broadcast events and callbacks after every change
//! - **Remote mirror**: last-write-wins sync over [`RemoteMirror`](remote::RemoteMirror)
//!
//! # Quick Start
//!
//! ```
//! use home_scenes::{ControlPanel, Room};
//!
//! # fn main() -> home_scenes::Result<()> {
//! let panel = ControlPanel::new();
//!
//! panel.set_light(Room::LivingRoom, true);
//! panel.step_temperature(1);
//!
//! let key = panel.create_custom("Reading").expect("name is not blank");
//! panel.apply_builtin("away")?;
//! panel.apply_custom(key.as_str())?;
//!
//! assert!(panel.state().living_room_light);
//! assert_eq!(panel.state().temperature.value(), 23);
//! # Ok(())
//! # }
//! ```
//!
//! ## Mirroring
//!
//! ```
//! use home_scenes::ControlPanel;
//! use home_scenes::remote::MemoryMirror;
//!
//! # async fn example() -> home_scenes::Result<()> {
//! let mirror = MemoryMirror::new();
//!
//! let panel = ControlPanel::new();
//! panel.attach_mirror(mirror.clone()).await?;
//!
//! panel.set_ac(true);
//! panel.flush_mirror().await;
//! assert!(mirror.home_state().is_some_and(|state| state.ac_on));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event;
pub mod panel;
pub mod remote;
pub mod scenario;
pub mod state;
pub mod subscription;
pub mod types;

pub use error::{Error, RemoteError, Result, ValueError};
pub use event::{ChangeOrigin, EventBus, PanelEvent, SyncOperation};
pub use panel::{ControlPanel, PanelConfig, SelectionPolicy};
pub use scenario::{Builtin, Preset, ScenarioRegistry};
pub use state::{HomeState, HomeStateStore, StateChange};
pub use subscription::{CallbackRegistry, PresetsChange, SubscriptionId};
pub use types::{PresetKey, Room, Temperature};
