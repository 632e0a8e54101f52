// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home state management types.
//!
//! [`HomeState`] is the flat record of device state, [`StateChange`] a single
//! field edit, and [`HomeStateStore`] the owner of the live record.
//!
//! # Examples
//!
//! ```
//! use home_scenes::state::{HomeStateStore, StateChange};
//! use home_scenes::types::Room;
//!
//! let mut store = HomeStateStore::new();
//! store.set_field(&StateChange::light(Room::LivingRoom, true));
//!
//! assert!(store.get().living_room_light);
//! ```

mod home_state;
mod state_change;
mod store;

pub use home_state::HomeState;
pub use state_change::StateChange;
pub use store::HomeStateStore;
