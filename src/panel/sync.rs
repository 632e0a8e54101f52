// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background tasks linking a panel to a remote mirror.
//!
//! One writer task drains queued local changes in order, so the remote sees
//! writes in the same order the panel applied them. Two feed tasks forward
//! remote snapshots into the panel. All tasks hold only a weak reference to
//! the panel and are aborted when the link is dropped.

use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::RemoteError;
use crate::event::{PanelEvent, SyncOperation};
use crate::remote::{HomeStateFeed, PresetDocument, PresetFeed, RemoteMirror};
use crate::scenario::Preset;
use crate::state::HomeState;
use crate::types::PresetKey;

use super::control_panel::PanelShared;

/// A write queued for the remote mirror.
#[derive(Debug)]
pub(super) enum MirrorCommand {
    WriteHomeState(HomeState),
    WritePreset(Preset),
    DeletePreset(PresetKey),
    /// Resolves once every command queued before it has been handled.
    Flush(oneshot::Sender<()>),
}

/// Handle to the tasks serving one attached mirror.
#[derive(Debug)]
pub(super) struct MirrorLink {
    commands: mpsc::UnboundedSender<MirrorCommand>,
    tasks: Vec<JoinHandle<()>>,
}

impl MirrorLink {
    /// Spawns the writer task for `mirror`.
    pub(super) fn spawn_writer<M: RemoteMirror>(
        mirror: Arc<M>,
        panel: Weak<PanelShared>,
        timeout: Option<Duration>,
    ) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(run_writer(mirror, rx, panel, timeout));
        Self {
            commands,
            tasks: vec![writer],
        }
    }

    /// Spawns the tasks forwarding remote snapshots into the panel.
    pub(super) fn spawn_feeds(
        &mut self,
        panel: &Weak<PanelShared>,
        home_state: HomeStateFeed,
        presets: PresetFeed,
    ) {
        self.tasks
            .push(tokio::spawn(run_home_state_feed(home_state, panel.clone())));
        self.tasks
            .push(tokio::spawn(run_preset_feed(presets, panel.clone())));
    }

    /// Queues a command; returns `false` if the writer has stopped.
    pub(super) fn send(&self, command: MirrorCommand) -> bool {
        if self.commands.send(command).is_err() {
            tracing::warn!("remote writer stopped, dropping queued write");
            return false;
        }
        true
    }
}

impl Drop for MirrorLink {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn run_writer<M: RemoteMirror>(
    mirror: Arc<M>,
    mut commands: mpsc::UnboundedReceiver<MirrorCommand>,
    panel: Weak<PanelShared>,
    timeout: Option<Duration>,
) {
    tracing::debug!("remote writer started");

    while let Some(command) = commands.recv().await {
        let (operation, result) = match command {
            MirrorCommand::Flush(done) => {
                let _ = done.send(());
                continue;
            }
            MirrorCommand::WriteHomeState(state) => (
                SyncOperation::WriteHomeState,
                bounded(timeout, mirror.write_home_state(&state)).await,
            ),
            MirrorCommand::WritePreset(preset) => {
                let document = PresetDocument::from(&preset);
                let result =
                    bounded(timeout, mirror.write_custom_preset(preset.key(), &document)).await;
                (SyncOperation::WriteCustomPreset(preset.key().clone()), result)
            }
            MirrorCommand::DeletePreset(key) => {
                let result = bounded(timeout, mirror.delete_custom_preset(&key)).await;
                (SyncOperation::DeleteCustomPreset(key), result)
            }
        };

        if let Err(e) = result {
            tracing::warn!(%operation, error = %e, "remote mirror update failed");
            let Some(panel) = panel.upgrade() else {
                break;
            };
            panel.emit(vec![PanelEvent::sync_failed(operation, e.to_string())]);
        }
    }

    tracing::debug!("remote writer stopped");
}

async fn bounded<F>(timeout: Option<Duration>, operation: F) -> Result<(), RemoteError>
where
    F: Future<Output = Result<(), RemoteError>>,
{
    let Some(limit) = timeout else {
        return operation.await;
    };
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(RemoteError::Timeout(
            u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

async fn run_home_state_feed(mut feed: HomeStateFeed, panel: Weak<PanelShared>) {
    while let Some(snapshot) = feed.recv().await {
        let Some(panel) = panel.upgrade() else {
            break;
        };
        panel.ingest_home_state(snapshot);
    }
    tracing::debug!("home state feed closed");
}

async fn run_preset_feed(mut feed: PresetFeed, panel: Weak<PanelShared>) {
    while let Some(presets) = feed.recv().await {
        let Some(panel) = panel.upgrade() else {
            break;
        };
        panel.ingest_presets(presets);
    }
    tracing::debug!("preset feed closed");
}
