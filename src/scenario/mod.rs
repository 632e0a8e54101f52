// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scenarios: named snapshots of the home state.
//!
//! A scenario (preset) is pure data, a key, a label and a [`HomeState`]
//! snapshot. Applying one is a full-state replace performed by the caller
//! with the snapshot the registry hands back.
//!
//! - [`Builtin`] - The three fixed scenarios (morning, night, away)
//! - [`Preset`] - A named snapshot
//! - [`ScenarioRegistry`] - Built-in and custom presets plus the selection
//!
//! [`HomeState`]: crate::state::HomeState

mod builtin;
mod preset;
mod registry;

pub use builtin::Builtin;
pub use preset::Preset;
pub use registry::ScenarioRegistry;
