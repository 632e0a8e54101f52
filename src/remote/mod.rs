// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote mirror of the panel state.
//!
//! The panel can mirror its home state and custom presets to a keyed
//! real-time document store. The store is reached through the
//! [`RemoteMirror`] trait, so the synchronization discipline lives in the
//! panel and the transport can be swapped.
//!
//! # Documents
//!
//! | path | content |
//! |------|---------|
//! | `homeState` | [`HomeState`] |
//! | `customPresets/{key}` | [`PresetDocument`] |
//!
//! Every write replaces a whole document; there are no partial updates.
//!
//! # Implementations
//!
//! - [`MemoryMirror`]: in-process store, shared by clones
//! - [`RestMirror`]: JSON-over-HTTP store (`rest` feature)

mod document;
mod memory;
#[cfg(feature = "rest")]
mod rest;

pub use document::{CUSTOM_PRESETS_PATH, HOME_STATE_PATH, PresetDocument, preset_path};
pub use memory::MemoryMirror;
#[cfg(feature = "rest")]
pub use rest::{RestMirror, RestMirrorConfig};

use std::future::Future;

use tokio::sync::mpsc;

use crate::error::RemoteError;
use crate::scenario::Preset;
use crate::state::HomeState;
use crate::types::PresetKey;

/// Stream of `homeState` snapshots; `None` while the document is absent.
pub type HomeStateFeed = mpsc::UnboundedReceiver<Option<HomeState>>;

/// Stream of complete custom preset snapshots.
pub type PresetFeed = mpsc::UnboundedReceiver<Vec<Preset>>;

/// A keyed real-time document store the panel mirrors itself to.
///
/// Both watch methods must deliver the current remote value as their first
/// message, then one message per remote change. The panel treats every
/// message as a full snapshot; the last one delivered wins.
pub trait RemoteMirror: Send + Sync + 'static {
    /// Replaces the `homeState` document.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the store cannot be updated.
    fn write_home_state(
        &self,
        state: &HomeState,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Subscribes to the `homeState` document.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the subscription cannot be established.
    fn watch_home_state(&self) -> impl Future<Output = Result<HomeStateFeed, RemoteError>> + Send;

    /// Replaces the `customPresets/{key}` document.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the store cannot be updated.
    fn write_custom_preset(
        &self,
        key: &PresetKey,
        document: &PresetDocument,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Removes the `customPresets/{key}` document.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the store cannot be updated.
    fn delete_custom_preset(
        &self,
        key: &PresetKey,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Subscribes to the `customPresets` collection.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the subscription cannot be established.
    fn watch_custom_presets(&self) -> impl Future<Output = Result<PresetFeed, RemoteError>> + Send;
}
