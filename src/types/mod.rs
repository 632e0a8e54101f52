// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the control panel.
//!
//! Each constrained type checks its range at construction time, so invalid
//! values never reach the state store.
//!
//! # Types
//!
//! - [`Temperature`] - Air conditioner set point (16-30 °C)
//! - [`Room`] - Room with a controllable light
//! - [`PresetKey`] - Stable identity of a preset

mod preset_key;
mod room;
mod temperature;

pub use preset_key::PresetKey;
pub use room::Room;
pub use temperature::Temperature;
