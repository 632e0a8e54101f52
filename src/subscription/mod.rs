// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback-based subscriptions to panel changes.
//!
//! For hosts that prefer closures over a broadcast receiver. Every panel
//! event is dispatched both to the [`EventBus`](crate::event::EventBus) and
//! to the [`CallbackRegistry`].
//!
//! ```
//! use home_scenes::ControlPanel;
//!
//! let panel = ControlPanel::new();
//! let id = panel.callbacks().on_state_changed(|state, origin| {
//!     println!("{origin:?}: {state:?}");
//! });
//! panel.callbacks().unsubscribe(id);
//! ```

mod callback;

pub use callback::{CallbackRegistry, PresetsChange, SubscriptionId};
