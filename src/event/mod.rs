// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for panel changes.
//!
//! The [`EventBus`] uses tokio's broadcast channel so that several views can
//! follow the same panel.
//!
//! # Examples
//!
//! ```
//! use home_scenes::event::{EventBus, PanelEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(PanelEvent::selection_changed(None));
//! ```

mod event_bus;
mod panel_event;

pub use event_bus::EventBus;
pub use panel_event::{ChangeOrigin, PanelEvent, SyncOperation};
