// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON-over-HTTP document store.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::error::RemoteError;
use crate::scenario::Preset;
use crate::state::HomeState;
use crate::types::PresetKey;

use super::document::sort_presets;
use super::{
    CUSTOM_PRESETS_PATH, HOME_STATE_PATH, HomeStateFeed, PresetDocument, PresetFeed, RemoteMirror,
};

// ============================================================================
// RestMirrorConfig
// ============================================================================

/// Configuration for a [`RestMirror`].
///
/// # Examples
///
/// ```
/// use home_scenes::remote::RestMirrorConfig;
/// use std::time::Duration;
///
/// let config = RestMirrorConfig::new("https://my-home.example-rtdb.com")
///     .with_auth_token("secret")
///     .with_timeout(Duration::from_secs(5))
///     .with_poll_interval(Duration::from_secs(1));
///
/// assert_eq!(config.base_url(), "https://my-home.example-rtdb.com");
/// ```
#[derive(Debug, Clone)]
pub struct RestMirrorConfig {
    base_url: String,
    auth_token: Option<String>,
    timeout: Duration,
    poll_interval: Duration,
}

impl RestMirrorConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default interval between subscription polls.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

    /// Creates a configuration for the store rooted at `base_url`.
    ///
    /// A trailing slash is ignored.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the token sent as the `auth` query parameter.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the interval between subscription polls.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the auth token if set.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Creates a `RestMirror` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_mirror(self) -> Result<RestMirror, RemoteError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(RemoteError::Http)?;

        Ok(RestMirror {
            client,
            base_url: self.base_url,
            auth_token: self.auth_token,
            poll_interval: self.poll_interval,
        })
    }
}

// ============================================================================
// RestMirror
// ============================================================================

/// Remote mirror for stores exposing documents as `{base}/{path}.json`.
///
/// Writes are `PUT` (whole-document replace), deletes are `DELETE`, and a
/// missing document reads as JSON `null`. Subscriptions poll the document
/// on the configured interval in a background task and emit whenever the
/// value differs from the last one emitted; the task ends when the feed is
/// dropped.
///
/// # Examples
///
/// ```no_run
/// use home_scenes::ControlPanel;
/// use home_scenes::remote::RestMirrorConfig;
///
/// # async fn example() -> home_scenes::Result<()> {
/// let mirror = RestMirrorConfig::new("https://my-home.example-rtdb.com").into_mirror()?;
///
/// let panel = ControlPanel::new();
/// panel.attach_mirror(mirror).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestMirror {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    poll_interval: Duration,
}

impl RestMirror {
    /// Creates a mirror with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        RestMirrorConfig::new(base_url).into_mirror()
    }

    /// Builds the URL of a document path.
    #[must_use]
    pub fn document_url(&self, path: &str) -> String {
        let mut url = format!("{}/{path}.json", self.base_url);
        if let Some(token) = &self.auth_token {
            url.push_str("?auth=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    fn preset_url(&self, key: &PresetKey) -> String {
        let path = format!("{CUSTOM_PRESETS_PATH}/{}", urlencoding::encode(key.as_str()));
        self.document_url(&path)
    }

    async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        url: String,
        body: &T,
    ) -> Result<(), RemoteError> {
        tracing::debug!(path, "PUT remote document");
        let response = self.client.put(url).json(body).send().await?;
        check_status(path, response.status())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, RemoteError> {
        let response = self.client.get(self.document_url(path)).send().await?;
        check_status(path, response.status())?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_home_state(&self) -> Result<Option<HomeState>, RemoteError> {
        self.get_json(HOME_STATE_PATH).await
    }

    async fn fetch_custom_presets(&self) -> Result<Vec<Preset>, RemoteError> {
        let documents: BTreeMap<String, PresetDocument> = self
            .get_json(CUSTOM_PRESETS_PATH)
            .await?
            .unwrap_or_default();
        let mut presets: Vec<Preset> = documents
            .into_iter()
            .map(|(key, document)| document.into_preset(PresetKey::new(key)))
            .collect();
        sort_presets(&mut presets);
        Ok(presets)
    }

    fn spawn_poller<T, F, Fut>(
        &self,
        path: &'static str,
        mut last: T,
        tx: mpsc::UnboundedSender<T>,
        fetch: F,
    ) where
        T: PartialEq + Clone + Send + 'static,
        F: Fn(RestMirror) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, RemoteError>> + Send + 'static,
    {
        let mirror = self.clone();
        let period = self.poll_interval;

        tokio::spawn(async move {
            tracing::debug!(path, "starting remote poller");
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial value is already sent
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                match fetch(mirror.clone()).await {
                    Ok(current) => {
                        if current != last {
                            last = current.clone();
                            if tx.send(current).is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => tracing::warn!(path, error = %e, "remote poll failed"),
                }
            }

            tracing::debug!(path, "remote poller stopped");
        });
    }
}

fn check_status(path: &str, status: reqwest::StatusCode) -> Result<(), RemoteError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RemoteError::Status {
            status: status.as_u16(),
            path: path.to_string(),
        })
    }
}

impl RemoteMirror for RestMirror {
    async fn write_home_state(&self, state: &HomeState) -> Result<(), RemoteError> {
        self.put_json(HOME_STATE_PATH, self.document_url(HOME_STATE_PATH), state)
            .await
    }

    async fn watch_home_state(&self) -> Result<HomeStateFeed, RemoteError> {
        let initial = self.fetch_home_state().await?;
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(initial)
            .map_err(|_| RemoteError::ChannelClosed("home state feed".to_string()))?;
        self.spawn_poller(HOME_STATE_PATH, initial, tx, |mirror| async move {
            mirror.fetch_home_state().await
        });
        Ok(rx)
    }

    async fn write_custom_preset(
        &self,
        key: &PresetKey,
        document: &PresetDocument,
    ) -> Result<(), RemoteError> {
        self.put_json(CUSTOM_PRESETS_PATH, self.preset_url(key), document)
            .await
    }

    async fn delete_custom_preset(&self, key: &PresetKey) -> Result<(), RemoteError> {
        tracing::debug!(%key, "DELETE remote preset");
        let response = self.client.delete(self.preset_url(key)).send().await?;
        check_status(CUSTOM_PRESETS_PATH, response.status())
    }

    async fn watch_custom_presets(&self) -> Result<PresetFeed, RemoteError> {
        let initial = self.fetch_custom_presets().await?;
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(initial.clone())
            .map_err(|_| RemoteError::ChannelClosed("preset feed".to_string()))?;
        self.spawn_poller(CUSTOM_PRESETS_PATH, initial, tx, |mirror| async move {
            mirror.fetch_custom_presets().await
        });
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = RestMirrorConfig::new("https://example.com/");
        assert_eq!(config.base_url(), "https://example.com");
        assert_eq!(config.timeout(), RestMirrorConfig::DEFAULT_TIMEOUT);
        assert_eq!(config.poll_interval(), RestMirrorConfig::DEFAULT_POLL_INTERVAL);
        assert!(config.auth_token().is_none());
    }

    #[test]
    fn document_url_without_token() {
        let mirror = RestMirror::new("https://example.com").unwrap();
        assert_eq!(
            mirror.document_url(HOME_STATE_PATH),
            "https://example.com/homeState.json"
        );
    }

    #[test]
    fn document_url_encodes_token() {
        let mirror = RestMirrorConfig::new("https://example.com")
            .with_auth_token("a b&c")
            .into_mirror()
            .unwrap();
        assert_eq!(
            mirror.document_url(HOME_STATE_PATH),
            "https://example.com/homeState.json?auth=a%20b%26c"
        );
    }

    #[test]
    fn preset_url_encodes_key() {
        let mirror = RestMirror::new("https://example.com").unwrap();
        assert_eq!(
            mirror.preset_url(&PresetKey::new("my preset")),
            "https://example.com/customPresets/my%20preset.json"
        );
    }

    #[test]
    fn check_status_maps_failures() {
        assert!(check_status("homeState", reqwest::StatusCode::OK).is_ok());
        let err = check_status("homeState", reqwest::StatusCode::UNAUTHORIZED).unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 401, .. }));
    }
}
