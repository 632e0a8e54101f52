// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `home_scenes` library.
//!
//! Local failures (invalid values, unknown preset keys) refuse the operation
//! and leave every piece of state untouched. Remote failures are reported
//! out-of-band by the panel and never roll back local state.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// No preset with this key can serve the requested operation.
    ///
    /// Returned for unknown keys, for deleting a built-in preset and for
    /// applying a preset through the surface of the other kind.
    #[error("preset not found: {key}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// Error occurred while talking to the remote mirror.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl Error {
    /// Creates a not-found error for the given key.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Returns `true` if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i32,
        /// Maximum allowed value.
        max: i32,
        /// The actual value that was provided.
        actual: i32,
    },

    /// An unknown room name was provided.
    #[error("invalid room: {0}")]
    InvalidRoom(String),
}

/// Errors related to the remote mirror.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[cfg(feature = "rest")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("unexpected status {status} for {path}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Document path that was accessed.
        path: String,
    },

    /// A document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote operation timed out.
    #[error("remote operation timed out after {0} ms")]
    Timeout(u64),

    /// The store refused or could not serve the request.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
