// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The control panel: state, presets and remote mirroring in one session.
//!
//! [`ControlPanel`] composes the [`HomeStateStore`](crate::state::HomeStateStore)
//! and the [`ScenarioRegistry`](crate::scenario::ScenarioRegistry) behind a
//! single lock, publishes [`PanelEvent`](crate::event::PanelEvent)s after every
//! change and, once a [`RemoteMirror`](crate::remote::RemoteMirror) is
//! attached, keeps the remote copy in step with last-write-wins semantics:
//!
//! - local changes are applied immediately and written to the remote in the
//!   background
//! - remote snapshots overwrite the local state atomically
//! - an absent remote home state is seeded with the local one

mod config;
mod control_panel;
mod sync;

pub use config::{PanelConfig, SelectionPolicy};
pub use control_panel::ControlPanel;
