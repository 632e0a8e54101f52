// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process document store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::RemoteError;
use crate::scenario::Preset;
use crate::state::HomeState;
use crate::types::PresetKey;

use super::{HomeStateFeed, PresetDocument, PresetFeed, RemoteMirror};

#[derive(Debug, Default)]
struct Documents {
    home_state: Option<HomeState>,
    presets: Vec<(PresetKey, PresetDocument)>,
    home_state_watchers: Vec<mpsc::UnboundedSender<Option<HomeState>>>,
    preset_watchers: Vec<mpsc::UnboundedSender<Vec<Preset>>>,
}

impl Documents {
    fn preset_snapshot(&self) -> Vec<Preset> {
        self.presets
            .iter()
            .map(|(key, document)| document.clone().into_preset(key.clone()))
            .collect()
    }

    fn notify_home_state(&mut self) {
        let value = self.home_state;
        self.home_state_watchers
            .retain(|watcher| watcher.send(value).is_ok());
    }

    fn notify_presets(&mut self) {
        let snapshot = self.preset_snapshot();
        self.preset_watchers
            .retain(|watcher| watcher.send(snapshot.clone()).is_ok());
    }
}

/// A real-time document store living in the current process.
///
/// Clones share the same documents, so two panels attached to clones of one
/// `MemoryMirror` stay in sync with each other. Watchers are notified
/// synchronously on every write, including writes that do not change the
/// stored value, the way real-time stores echo writes back.
///
/// Failure injection ([`fail_writes`](Self::fail_writes)) makes every write
/// and delete return [`RemoteError::Unavailable`].
///
/// # Examples
///
/// ```
/// use home_scenes::remote::{MemoryMirror, RemoteMirror};
/// use home_scenes::state::HomeState;
///
/// # async fn example() -> Result<(), home_scenes::error::RemoteError> {
/// let mirror = MemoryMirror::new();
/// let mut feed = mirror.watch_home_state().await?;
///
/// // The current value arrives first
/// assert_eq!(feed.recv().await, Some(None));
///
/// mirror.write_home_state(&HomeState::new().with_ac(true)).await?;
/// assert!(feed.recv().await.unwrap().unwrap().ac_on);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryMirror {
    documents: Arc<Mutex<Documents>>,
    failing: Arc<AtomicBool>,
}

impl MemoryMirror {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a `homeState` document.
    #[must_use]
    pub fn with_home_state(state: HomeState) -> Self {
        let mirror = Self::new();
        mirror.documents.lock().home_state = Some(state);
        mirror
    }

    /// Makes every subsequent write and delete fail (or succeed again).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the stored `homeState` document.
    #[must_use]
    pub fn home_state(&self) -> Option<HomeState> {
        self.documents.lock().home_state
    }

    /// Returns the stored custom presets in insertion order.
    #[must_use]
    pub fn custom_presets(&self) -> Vec<Preset> {
        self.documents.lock().preset_snapshot()
    }

    /// Replaces the `homeState` document as another client would.
    ///
    /// Bypasses failure injection.
    pub fn put_home_state(&self, state: HomeState) {
        let mut documents = self.documents.lock();
        documents.home_state = Some(state);
        documents.notify_home_state();
    }

    /// Removes the `homeState` document as another client would.
    pub fn remove_home_state(&self) {
        let mut documents = self.documents.lock();
        documents.home_state = None;
        documents.notify_home_state();
    }

    /// Replaces one preset document as another client would.
    ///
    /// Bypasses failure injection.
    pub fn put_custom_preset(&self, key: PresetKey, document: PresetDocument) {
        let mut documents = self.documents.lock();
        if let Some(index) = documents.presets.iter().position(|(k, _)| *k == key) {
            documents.presets[index].1 = document;
        } else {
            documents.presets.push((key, document));
        }
        documents.notify_presets();
    }

    /// Removes one preset document as another client would.
    pub fn remove_custom_preset(&self, key: &PresetKey) {
        let mut documents = self.documents.lock();
        documents.presets.retain(|(k, _)| k != key);
        documents.notify_presets();
    }

    fn check_available(&self, operation: &str) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable(format!(
                "{operation} rejected by memory store"
            )));
        }
        Ok(())
    }
}

impl RemoteMirror for MemoryMirror {
    async fn write_home_state(&self, state: &HomeState) -> Result<(), RemoteError> {
        self.check_available("write homeState")?;
        self.put_home_state(*state);
        Ok(())
    }

    async fn watch_home_state(&self) -> Result<HomeStateFeed, RemoteError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut documents = self.documents.lock();
        tx.send(documents.home_state)
            .map_err(|_| RemoteError::ChannelClosed("home state feed".to_string()))?;
        documents.home_state_watchers.push(tx);
        Ok(rx)
    }

    async fn write_custom_preset(
        &self,
        key: &PresetKey,
        document: &PresetDocument,
    ) -> Result<(), RemoteError> {
        self.check_available("write customPresets")?;
        self.put_custom_preset(key.clone(), document.clone());
        Ok(())
    }

    async fn delete_custom_preset(&self, key: &PresetKey) -> Result<(), RemoteError> {
        self.check_available("delete customPresets")?;
        self.remove_custom_preset(key);
        Ok(())
    }

    async fn watch_custom_presets(&self) -> Result<PresetFeed, RemoteError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut documents = self.documents.lock();
        tx.send(documents.preset_snapshot())
            .map_err(|_| RemoteError::ChannelClosed("preset feed".to_string()))?;
        documents.preset_watchers.push(tx);
        Ok(rx)
    }
}
